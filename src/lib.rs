//! catalog-sync
//!
//! Sincroniza el catálogo de tablas de un warehouse analítico hacia un
//! document store local:
//! - `config`: configuración de proceso desde entorno y logging.
//! - `cli`: interpretación de argumentos del binario.
//! - `service`: cableado warehouse → Postgres y operaciones expuestas.
//! - `errors`: errores de proceso y códigos de salida.
//!
//! El núcleo (firma, clasificación, upsert) vive en `catalog-core`.

pub mod cli;
pub mod config;
pub mod errors;
pub mod service;

pub use catalog_core::{PassMode, Reconciler, SyncSummary};
