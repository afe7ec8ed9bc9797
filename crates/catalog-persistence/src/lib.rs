//! catalog-persistence
//!
//! Document store Postgres (Diesel) para los registros de tabla del catálogo.
//! Implementa `TableStore` de `catalog-core` sobre la tabla `table_metadata`
//! (una fila por clave natural, columnas como JSONB).
//!
//! Módulos:
//! - `pg`: `PgTableStore`, proveedor de conexiones y construcción del pool.
//! - `migrations`: runner embebido de migraciones Diesel.
//! - `config`: carga de configuración desde .env.
//! - `schema`: tablas Diesel declaradas para compilar queries.

pub mod config;
pub mod error;
pub mod migrations;
pub mod pg;
pub mod schema;

pub use config::init_dotenv;
pub use error::PersistenceError;
pub use pg::{build_pool, ConnectionProvider, PgPool, PgTableStore, PoolProvider};
