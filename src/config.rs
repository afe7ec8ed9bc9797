//! Configuración central del proceso.
//! Carga variables de entorno (.env) y agrupa la configuración de cada
//! colaborador: document store, warehouse y modo de la pasada.
use catalog_core::PassMode;
use catalog_persistence::config::DbConfig;
use catalog_warehouse::WarehouseConfig;
use std::env;

use crate::errors::AppError;

/// Configuración global de la aplicación.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Document store (Postgres).
    pub database: DbConfig,
    /// Warehouse origen del catálogo.
    pub warehouse: WarehouseConfig,
    /// Parámetros de la pasada.
    pub sync: SyncConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncConfig {
    /// Hilos para reconciliar tablas; `1` = secuencial.
    pub parallelism: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self { parallelism: 1 }
    }
}

impl SyncConfig {
    pub fn from_env() -> Result<Self, AppError> {
        match env::var("SYNC_PARALLELISM") {
            Ok(raw) => Ok(Self { parallelism: parse_parallelism(&raw)? }),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn pass_mode(&self) -> PassMode {
        PassMode::from_parallelism(self.parallelism)
    }
}

pub fn parse_parallelism(raw: &str) -> Result<usize, AppError> {
    match raw.trim().parse::<usize>() {
        Ok(0) | Err(_) => Err(AppError::Config(format!("SYNC_PARALLELISM inválido: {raw}"))),
        Ok(n) => Ok(n),
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        catalog_persistence::init_dotenv();
        Ok(Self { database: DbConfig::from_env()?,
                  warehouse: WarehouseConfig::from_env()?,
                  sync: SyncConfig::from_env()? })
    }
}

/// Inicializa `env_logger` (nivel `info` si `RUST_LOG` no está definido).
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).try_init();
}
