//! Cliente del warehouse.
//!
//! La conexión se abre una vez al arrancar, se reutiliza (sólo lectura) en
//! todas las pasadas y se cierra al soltar el cliente.

use diesel::pg::PgConnection;
use diesel::{Connection, RunQueryDsl};
use log::{debug, info};
use std::sync::Mutex;

use crate::error::WarehouseError;
use crate::rows::MetadataRow;

/// Consulta única: tablas base (sin esquemas de sistema) con LEFT JOIN a sus
/// columnas, ordenadas para que el agrupado preserve el orden de columnas.
pub const METADATA_SQL: &str = r#"
SELECT
    t.table_catalog::text   AS database,
    t.table_schema::text    AS schema_name,
    t.table_name::text      AS table_name,
    obj_description(format('%I.%I', t.table_schema, t.table_name)::regclass, 'pg_class') AS table_comment,
    c.column_name::text     AS column_name,
    c.data_type::text       AS data_type,
    c.is_nullable::text     AS is_nullable,
    col_description(format('%I.%I', t.table_schema, t.table_name)::regclass, c.ordinal_position::int) AS column_comment,
    c.ordinal_position::int AS ordinal_position
FROM information_schema.tables t
LEFT JOIN information_schema.columns c
    ON c.table_catalog = t.table_catalog
   AND c.table_schema = t.table_schema
   AND c.table_name = t.table_name
WHERE t.table_type = 'BASE TABLE'
  AND t.table_schema NOT IN ('pg_catalog', 'information_schema')
ORDER BY
    t.table_catalog,
    t.table_schema,
    t.table_name,
    c.ordinal_position
"#;

/// Acceso a los metadatos crudos del warehouse (inyectable en tests).
pub trait WarehouseClient: Send + Sync {
    /// Devuelve todas las filas tabla × columna en una sola llamada.
    fn fetch_metadata_rows(&self) -> Result<Vec<MetadataRow>, WarehouseError>;
}

/// Cliente sobre una conexión Postgres-compatible de larga vida.
pub struct PgWarehouseClient {
    conn: Mutex<PgConnection>,
}

impl PgWarehouseClient {
    /// Abre la conexión. Falla temprano si el warehouse no es alcanzable.
    pub fn connect(url: &str) -> Result<Self, WarehouseError> {
        let conn = PgConnection::establish(url)?;
        info!("warehouse:connected");
        Ok(Self { conn: Mutex::new(conn) })
    }
}

impl WarehouseClient for PgWarehouseClient {
    fn fetch_metadata_rows(&self) -> Result<Vec<MetadataRow>, WarehouseError> {
        let mut conn = self.conn
                           .lock()
                           .map_err(|e| WarehouseError::Connection(format!("lock poisoned: {e}")))?;
        debug!("warehouse:query metadata");
        let rows: Vec<MetadataRow> = diesel::sql_query(METADATA_SQL).load(&mut *conn)?;
        debug!("warehouse:query rows={}", rows.len());
        Ok(rows)
    }
}

impl Drop for PgWarehouseClient {
    fn drop(&mut self) {
        info!("warehouse:connection closed");
    }
}
