use catalog_core::{StoreError, SyncError, SyncPhase};
use catalog_domain::TableKey;
use catalog_persistence::PersistenceError;
use catalog_warehouse::WarehouseError;
use thiserror::Error;

/// Errores del proceso (configuración, arranque de colaboradores, pasada).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Uso incorrecto: {0}")]
    Usage(String),
    #[error("Error de configuración: {0}")]
    Config(String),
    #[error("tabla no encontrada: {0}")]
    NotFound(TableKey),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error(transparent)]
    Warehouse(#[from] WarehouseError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Sync(#[from] SyncError),
    #[error("Error de serialización: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    /// Código de salida del binario.
    ///
    /// - 1: la tabla pedida no existe en el store
    /// - 2: uso incorrecto
    /// - 3: falló la fase de fetch (nada se escribió)
    /// - 4: falló la fase de reconciliación
    /// - 5: configuración / infraestructura
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::NotFound(_) => 1,
            AppError::Usage(_) => 2,
            AppError::Sync(e) => match e.phase() {
                SyncPhase::Fetch => 3,
                SyncPhase::Reconcile => 4,
            },
            _ => 5,
        }
    }
}
