//! Cableado de colaboradores reales y operaciones expuestas por el binario.

use catalog_core::{PassMode, Reconciler, SyncSummary, TableStore};
use catalog_domain::{StoredTableRecord, TableKey};
use catalog_persistence::{build_pool, PgTableStore, PoolProvider};
use catalog_persistence::config::DbConfig;
use catalog_warehouse::{PgWarehouseClient, WarehouseCatalogSource};
use log::info;

use crate::config::AppConfig;
use crate::errors::AppError;

/// Reconciler de producción: warehouse → Postgres.
pub type CatalogSyncService = Reconciler<WarehouseCatalogSource<PgWarehouseClient>, PgTableStore<PoolProvider>>;

/// Store Postgres con pool ya migrado.
pub fn open_store(cfg: &DbConfig) -> Result<PgTableStore<PoolProvider>, AppError> {
    let pool = build_pool(cfg)?;
    Ok(PgTableStore::new(PoolProvider { pool }))
}

/// Abre la conexión al warehouse (una vez por proceso) y el pool del store.
pub fn build_service(cfg: &AppConfig, mode: PassMode) -> Result<CatalogSyncService, AppError> {
    let store = open_store(&cfg.database)?;
    let client = PgWarehouseClient::connect(&cfg.warehouse.url)?;
    let source = WarehouseCatalogSource::new(client).with_table_limit(cfg.warehouse.table_limit);
    info!("service:ready mode={mode:?} table_limit={}", cfg.warehouse.table_limit);
    Ok(Reconciler::new(source, store).with_mode(mode))
}

/// Una pasada completa.
pub fn run_sync<S, T>(reconciler: &Reconciler<S, T>) -> Result<SyncSummary, AppError>
    where S: catalog_core::CatalogSource,
          T: TableStore
{
    Ok(reconciler.run_pass()?)
}

pub fn show_table<T: TableStore>(store: &T, key: &TableKey) -> Result<Option<StoredTableRecord>, AppError> {
    Ok(store.find_record(key)?)
}

pub fn list_tables<T: TableStore>(store: &T) -> Result<Vec<TableKey>, AppError> {
    Ok(store.list_keys()?)
}
