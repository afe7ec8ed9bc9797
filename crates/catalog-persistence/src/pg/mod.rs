//! Implementación Postgres (Diesel) de `TableStore`.
//!
//! Objetivo general del módulo:
//! - Una fila por clave natural `(database, schema_name, name)` protegida por
//!   constraint UNIQUE.
//! - Lectura de firma con proyección mínima (sólo la columna `signature`).
//! - Upsert en una única sentencia `INSERT ... ON CONFLICT DO UPDATE` que
//!   escribe columnas y firma juntas y reporta si la fila se creó o se
//!   reemplazó. Un lector concurrente nunca observa una firma que no
//!   corresponda a sus propios campos.
//! - Reintento con backoff: lecturas ante cualquier error transitorio, el
//!   upsert sólo ante errores con rollback garantizado.

use catalog_core::{StoreError, TableStore, UpsertOutcome};
use catalog_domain::{Column, StoredTableRecord, TableDescription, TableKey};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use diesel::sql_types::{Bool, Jsonb, Nullable, Text};
use log::{debug, warn};
use serde_json::Value;
use uuid::Uuid;

use crate::config::DbConfig;
use crate::error::PersistenceError;
use crate::migrations::run_pending_migrations;
use crate::schema::table_metadata;

/// Alias de tipo para el pool r2d2 de conexiones Postgres.
///
/// Notas operativas:
/// - El pool se construye con `min_idle` (mínimo de conexiones inactivas) y
///   `max_size` (límite superior total).
/// - Al construirlo, se corre automáticamente el set de migraciones pendientes
///   (una sola vez).
pub type PgPool = r2d2::Pool<ConnectionManager<PgConnection>>;

/// Proveedor abstracto de conexiones.
///
/// Este trait permite:
/// - Inyectar un pool real (producción/tests de integración).
/// - Simular/factorear en tests unitarios sin acoplar a r2d2.
///
/// Contrato:
/// - Debe devolver una conexión válida o
///   `PersistenceError::TransientIo`/equivalente en caso de error.
pub trait ConnectionProvider: Send + Sync + 'static {
    /// Obtiene una conexión lista para ejecutar consultas Diesel.
    fn connection(&self) -> Result<r2d2::PooledConnection<ConnectionManager<PgConnection>>, PersistenceError>;
}

/// Implementación concreta de `ConnectionProvider` respaldada por un `PgPool`.
pub struct PoolProvider {
    pub pool: PgPool,
}
impl ConnectionProvider for PoolProvider {
    fn connection(&self) -> Result<r2d2::PooledConnection<ConnectionManager<PgConnection>>, PersistenceError> {
        self.pool
            .get()
            .map_err(|e| PersistenceError::TransientIo(format!("pool error: {e}")))
    }
}

/// Fila mapeada de la tabla `table_metadata` para lecturas completas.
///
/// `column_defs` llega como JSONB y se decodifica a `Vec<Column>` al convertir.
#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = table_metadata)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TableRow {
    pub id: Uuid,
    pub database: String,
    pub schema_name: String,
    pub name: String,
    pub comment: Option<String>,
    pub column_defs: Value,
    pub signature: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<TableRow> for StoredTableRecord {
    type Error = PersistenceError;

    fn try_from(row: TableRow) -> Result<Self, Self::Error> {
        let columns: Vec<Column> = serde_json::from_value(row.column_defs)?;
        Ok(StoredTableRecord { id: row.id,
                               database: row.database,
                               schema_name: row.schema_name,
                               name: row.name,
                               comment: row.comment,
                               columns,
                               signature: row.signature,
                               created_at: row.created_at,
                               updated_at: row.updated_at })
    }
}

/// Resultado del `RETURNING` del upsert: `xmax = 0` sólo en filas recién
/// insertadas (una fila actualizada por ON CONFLICT lleva el xid de la
/// transacción que la actualizó).
#[derive(QueryableByName, Debug)]
struct UpsertRow {
    #[diesel(sql_type = Bool)]
    inserted: bool,
}

const UPSERT_SQL: &str = "INSERT INTO table_metadata (database, schema_name, name, comment, column_defs, signature) \
                          VALUES ($1, $2, $3, $4, $5, $6) \
                          ON CONFLICT (database, schema_name, name) DO UPDATE \
                          SET comment = EXCLUDED.comment, column_defs = EXCLUDED.column_defs, \
                              signature = EXCLUDED.signature, updated_at = now() \
                          RETURNING (xmax = 0) AS inserted";

/// Qué errores puede reintentar una operación.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Retry {
    /// Lecturas: repetirlas no cambia nada, se reintenta todo lo transitorio.
    Idempotent,
    /// Escrituras: sólo errores tras los que Postgres garantiza rollback. Una
    /// conexión caída tras enviar el upsert puede haber confirmado ya la fila;
    /// repetirlo la reportaría como `Replaced`.
    RolledBack,
}

fn is_deadlock(msg: &str) -> bool {
    msg.to_lowercase().contains("deadlock detected")
}

fn is_retryable(e: &PersistenceError, retry: Retry) -> bool {
    match (e, retry) {
        (PersistenceError::SerializationConflict, _) => true,
        (PersistenceError::Unknown(msg), _) if is_deadlock(msg) => true,
        (PersistenceError::TransientIo(_), Retry::Idempotent) => true,
        _ => false,
    }
}

/// Hasta 3 reintentos con backoff 15ms, 30ms, 45ms.
fn with_retry<F, T>(op: &str, retry: Retry, mut f: F) -> Result<T, PersistenceError>
    where F: FnMut() -> Result<T, PersistenceError>
{
    let mut attempts = 0;
    loop {
        match f() {
            Err(e) if is_retryable(&e, retry) && attempts < 3 => {
                attempts += 1;
                let delay_ms = 15 * attempts as u64;
                warn!("{op}: attempt {attempts} failed ({e}), retrying in {delay_ms}ms");
                std::thread::sleep(std::time::Duration::from_millis(delay_ms));
            }
            r => return r,
        }
    }
}

/// Implementación Postgres de `TableStore`.
///
/// Responsabilidades:
/// - `read_signature`: `SELECT signature` por clave natural.
/// - `upsert`: escritura atómica del registro completo con resultado
///   explícito `Created`/`Replaced`; cualquier fallo es `Err`.
/// - `find_record` / `list_keys`: lecturas para consumidores downstream.
pub struct PgTableStore<P: ConnectionProvider> {
    pub provider: P,
}
impl<P: ConnectionProvider> PgTableStore<P> {
    /// Crea un `PgTableStore` a partir de un `ConnectionProvider` (generalmente
    /// `PoolProvider`).
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    fn read_signature_pg(&self, key: &TableKey) -> Result<Option<String>, PersistenceError> {
        with_retry("read_signature", Retry::Idempotent, || {
            let mut conn = self.provider.connection()?;
            table_metadata::table.filter(table_metadata::database.eq(&key.database))
                                 .filter(table_metadata::schema_name.eq(&key.schema_name))
                                 .filter(table_metadata::name.eq(&key.name))
                                 .select(table_metadata::signature)
                                 .first::<String>(&mut conn)
                                 .optional()
                                 .map_err(PersistenceError::from)
        })
    }

    fn upsert_pg(&self, table: &TableDescription, signature: &str) -> Result<UpsertOutcome, PersistenceError> {
        let columns = serde_json::to_value(&table.columns)?;
        // Mismo criterio que el modelo: comentario vacío se guarda como NULL.
        let comment = table.comment.as_deref().filter(|c| !c.is_empty());
        // El checkout ocurre antes de enviar nada: se reintenta como lectura.
        let mut conn = with_retry("upsert:checkout", Retry::Idempotent, || self.provider.connection())?;
        let row: UpsertRow = with_retry("upsert", Retry::RolledBack, || {
            diesel::sql_query(UPSERT_SQL).bind::<Text, _>(&table.database)
                                         .bind::<Text, _>(&table.schema_name)
                                         .bind::<Text, _>(&table.name)
                                         .bind::<Nullable<Text>, _>(comment)
                                         .bind::<Jsonb, _>(&columns)
                                         .bind::<Text, _>(signature)
                                         .get_result(&mut conn)
                                         .map_err(PersistenceError::from)
        })?;
        Ok(if row.inserted { UpsertOutcome::Created } else { UpsertOutcome::Replaced })
    }

    fn find_record_pg(&self, key: &TableKey) -> Result<Option<StoredTableRecord>, PersistenceError> {
        let row: Option<TableRow> = with_retry("find_record", Retry::Idempotent, || {
            let mut conn = self.provider.connection()?;
            table_metadata::table.filter(table_metadata::database.eq(&key.database))
                                 .filter(table_metadata::schema_name.eq(&key.schema_name))
                                 .filter(table_metadata::name.eq(&key.name))
                                 .select(TableRow::as_select())
                                 .first(&mut conn)
                                 .optional()
                                 .map_err(PersistenceError::from)
        })?;
        row.map(StoredTableRecord::try_from).transpose()
    }

    fn list_keys_pg(&self) -> Result<Vec<TableKey>, PersistenceError> {
        let rows: Vec<(String, String, String)> = with_retry("list_keys", Retry::Idempotent, || {
            let mut conn = self.provider.connection()?;
            table_metadata::table.select((table_metadata::database, table_metadata::schema_name, table_metadata::name))
                                 .order((table_metadata::database.asc(),
                                         table_metadata::schema_name.asc(),
                                         table_metadata::name.asc()))
                                 .load(&mut conn)
                                 .map_err(PersistenceError::from)
        })?;
        Ok(rows.into_iter().map(|(d, s, n)| TableKey::new(d, s, n)).collect())
    }
}

impl<P: ConnectionProvider> TableStore for PgTableStore<P> {
    fn read_signature(&self, key: &TableKey) -> Result<Option<String>, StoreError> {
        let sig = self.read_signature_pg(key)?;
        debug!("read_signature key={key} found={}", sig.is_some());
        Ok(sig)
    }

    fn upsert(&self, table: &TableDescription, signature: &str) -> Result<UpsertOutcome, StoreError> {
        debug!("upsert:start key={} columns={}", table.key(), table.columns.len());
        let outcome = self.upsert_pg(table, signature)?;
        debug!("upsert:done key={} outcome={:?}", table.key(), outcome);
        Ok(outcome)
    }

    fn find_record(&self, key: &TableKey) -> Result<Option<StoredTableRecord>, StoreError> {
        Ok(self.find_record_pg(key)?)
    }

    fn list_keys(&self) -> Result<Vec<TableKey>, StoreError> {
        Ok(self.list_keys_pg()?)
    }
}

/// Pool r2d2 según `DbConfig`, con las migraciones pendientes ya aplicadas.
///
/// Un store inalcanzable falla aquí (tras `connect_timeout`) y no en la
/// primera pasada.
pub fn build_pool(cfg: &DbConfig) -> Result<PgPool, PersistenceError> {
    let (min_idle, max_size) = cfg.pool_sizes();
    let pool = r2d2::Pool::builder().min_idle(Some(min_idle))
                                    .max_size(max_size)
                                    .connection_timeout(cfg.connect_timeout)
                                    .test_on_check_out(true)
                                    .build(ConnectionManager::<PgConnection>::new(&cfg.url))
                                    .map_err(|e| PersistenceError::TransientIo(format!("pool build: {e}")))?;
    let mut conn = pool.get()
                       .map_err(|e| PersistenceError::TransientIo(format!("pool checkout for migrations: {e}")))?;
    run_pending_migrations(&mut conn)?;
    drop(conn);
    debug!("pool:ready min_idle={min_idle} max_size={max_size}");
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        assert!(is_retryable(&PersistenceError::TransientIo("x".into()), Retry::Idempotent));
        assert!(is_retryable(&PersistenceError::Unknown("Deadlock detected".into()), Retry::Idempotent));
        assert!(!is_retryable(&PersistenceError::UniqueViolation("dup".into()), Retry::Idempotent));
        assert!(!is_retryable(&PersistenceError::CheckViolation("len".into()), Retry::Idempotent));
    }

    #[test]
    fn writes_retry_only_rolled_back_errors() {
        assert!(is_retryable(&PersistenceError::SerializationConflict, Retry::RolledBack));
        assert!(is_retryable(&PersistenceError::Unknown("deadlock detected".into()), Retry::RolledBack));
        assert!(!is_retryable(&PersistenceError::TransientIo("connection closed".into()), Retry::RolledBack));
        assert!(!is_retryable(&PersistenceError::Unknown("timeout".into()), Retry::RolledBack));
    }

    #[test]
    fn with_retry_gives_up_after_three_retries() {
        let mut calls = 0;
        let r: Result<(), _> = with_retry("test", Retry::Idempotent, || {
            calls += 1;
            Err(PersistenceError::TransientIo("down".into()))
        });
        assert!(r.is_err());
        assert_eq!(calls, 4);
    }

    #[test]
    fn write_dropped_after_send_is_not_replayed() {
        let mut calls = 0;
        let r: Result<(), _> = with_retry("upsert", Retry::RolledBack, || {
            calls += 1;
            Err(PersistenceError::TransientIo("server closed the connection unexpectedly".into()))
        });
        assert!(matches!(r, Err(PersistenceError::TransientIo(_))));
        assert_eq!(calls, 1);
    }

    #[test]
    fn write_conflict_is_retried_until_success() {
        let mut calls = 0;
        let r = with_retry("upsert", Retry::RolledBack, || {
            calls += 1;
            if calls < 3 { Err(PersistenceError::SerializationConflict) } else { Ok(UpsertOutcome::Created) }
        });
        assert_eq!(r.unwrap(), UpsertOutcome::Created);
        assert_eq!(calls, 3);
    }

    #[test]
    fn corrupt_columns_json_is_reported() {
        let row = TableRow { id: Uuid::new_v4(),
                             database: "D".into(),
                             schema_name: "S".into(),
                             name: "T".into(),
                             comment: None,
                             column_defs: serde_json::json!({"not": "an array"}),
                             signature: "x".repeat(64),
                             created_at: Utc::now(),
                             updated_at: Utc::now() };
        assert!(matches!(StoredTableRecord::try_from(row), Err(PersistenceError::Corrupt(_))));
    }
}
