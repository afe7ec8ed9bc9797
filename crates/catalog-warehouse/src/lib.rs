//! catalog-warehouse
//!
//! Catalog Source respaldado por el warehouse analítico: una única consulta
//! sobre `information_schema` trae tablas y columnas, y se agrupan en
//! `TableDescription` preservando el orden de llegada.
//!
//! Módulos:
//! - `config`: URL y límite de tablas desde .env / entorno.
//! - `client`: conexión de larga vida y la consulta de metadatos.
//! - `rows`: filas planas → tablas con columnas.
//! - `source`: implementación de `CatalogSource`.

pub mod client;
pub mod config;
pub mod error;
pub mod rows;
pub mod source;

pub use client::{PgWarehouseClient, WarehouseClient};
pub use config::WarehouseConfig;
pub use error::WarehouseError;
pub use rows::{assemble_tables, MetadataRow};
pub use source::WarehouseCatalogSource;
