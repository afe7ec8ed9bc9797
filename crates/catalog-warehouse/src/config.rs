//! Configuración del warehouse desde variables de entorno.
//! `WAREHOUSE_URL` es obligatoria; `WAREHOUSE_TABLE_LIMIT` (> 0) recorta el
//! inventario, útil para pruebas contra cuentas grandes.

use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;

use crate::error::WarehouseError;

static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv();
});

#[derive(Debug, Clone)]
pub struct WarehouseConfig {
    pub url: String,
    /// `0` = sin límite.
    pub table_limit: usize,
}

impl WarehouseConfig {
    pub fn from_env() -> Result<Self, WarehouseError> {
        Lazy::force(&DOTENV_LOADED);
        let url = env::var("WAREHOUSE_URL").map_err(|_| WarehouseError::Config("WAREHOUSE_URL no definido".into()))?;
        let table_limit = parse_limit(env::var("WAREHOUSE_TABLE_LIMIT").ok().as_deref())?;
        Ok(Self { url, table_limit })
    }
}

fn parse_limit(raw: Option<&str>) -> Result<usize, WarehouseError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(0),
        Some(v) => v.parse()
                    .map_err(|_| WarehouseError::Config(format!("WAREHOUSE_TABLE_LIMIT inválido: {v}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::parse_limit;

    #[test]
    fn limit_defaults_to_zero() {
        assert_eq!(parse_limit(None).unwrap(), 0);
        assert_eq!(parse_limit(Some(" ")).unwrap(), 0);
    }

    #[test]
    fn limit_parses_positive_value() {
        assert_eq!(parse_limit(Some("25")).unwrap(), 25);
    }

    #[test]
    fn limit_rejects_garbage() {
        assert!(parse_limit(Some("-3")).is_err());
        assert!(parse_limit(Some("many")).is_err());
    }
}
