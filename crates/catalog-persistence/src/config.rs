//! Configuración del document store desde variables de entorno
//! (`DATABASE_URL` y tamaños/timeout del pool).

use dotenvy::dotenv;
use log::warn;
use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

use crate::error::PersistenceError;

static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv();
});

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub url: String,
    pub min_connections: u32,
    pub max_connections: u32,
    /// Espera máxima para obtener una conexión del pool.
    pub connect_timeout: Duration,
}

impl DbConfig {
    pub fn from_env() -> Result<Self, PersistenceError> {
        Lazy::force(&DOTENV_LOADED);
        let url = env::var("DATABASE_URL").map_err(|_| PersistenceError::Config("DATABASE_URL no definido".into()))?;
        Ok(Self { url,
                  min_connections: env_u32("DATABASE_MIN_CONNECTIONS")?.unwrap_or(2),
                  max_connections: env_u32("DATABASE_MAX_CONNECTIONS")?.unwrap_or(16),
                  connect_timeout: Duration::from_secs(env_u32("DATABASE_CONNECT_TIMEOUT_SECS")?.unwrap_or(5).into()) })
    }

    /// Config mínima para una URL dada (tests, herramientas).
    pub fn for_url(url: impl Into<String>) -> Self {
        Self { url: url.into(),
               min_connections: 1,
               max_connections: 4,
               connect_timeout: Duration::from_secs(5) }
    }

    /// `(min_idle, max_size)` efectivos: ambos ≥ 1 y `min_idle ≤ max_size`.
    pub fn pool_sizes(&self) -> (u32, u32) {
        let max = self.max_connections.max(1);
        let min = self.min_connections.max(1);
        if min > max {
            warn!("DATABASE_MIN_CONNECTIONS={min} > DATABASE_MAX_CONNECTIONS={max}, usando {max}");
        }
        (min.min(max), max)
    }
}

/// Un valor presente pero no numérico es error de configuración, no default.
fn env_u32(name: &str) -> Result<Option<u32>, PersistenceError> {
    match env::var(name) {
        Ok(v) if !v.trim().is_empty() => v.trim()
                                          .parse()
                                          .map(Some)
                                          .map_err(|_| PersistenceError::Config(format!("{name} inválido: {v:?}"))),
        _ => Ok(None),
    }
}

pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_sizes_are_clamped() {
        let mut cfg = DbConfig::for_url("postgres://x");
        cfg.min_connections = 0;
        cfg.max_connections = 0;
        assert_eq!(cfg.pool_sizes(), (1, 1));
        cfg.min_connections = 8;
        cfg.max_connections = 3;
        assert_eq!(cfg.pool_sizes(), (3, 3));
        cfg.min_connections = 2;
        cfg.max_connections = 16;
        assert_eq!(cfg.pool_sizes(), (2, 16));
    }
}
