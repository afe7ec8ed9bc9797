// catalog-domain library entry point
pub mod column;
pub mod error;
pub mod record;
pub mod table;
pub use column::Column;
pub use error::DomainError;
pub use record::StoredTableRecord;
pub use table::{TableDescription, TableKey};
