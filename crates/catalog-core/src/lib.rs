//! catalog-core: reconciliación de catálogo warehouse → document store.
//!
//! - `hashing`: JSON canónico + SHA-256.
//! - `signature`: firma estructural de una tabla.
//! - `source` / `store`: contratos de los colaboradores (y versiones en memoria).
//! - `reconcile`: una pasada completa fetch → diff → write → resumen.
pub mod errors;
pub mod hashing;
pub mod reconcile;
pub mod signature;
pub mod source;
pub mod store;

pub use errors::{SourceError, StoreError, SyncError, SyncPhase, TableStage};
pub use reconcile::{Classification, PassMode, Reconciler, SyncSummary};
pub use signature::{compute_signature, signature_matches};
pub use source::{CatalogSource, InMemoryCatalogSource};
pub use store::{InMemoryTableStore, TableStore, UpsertOutcome};
