use catalog_core::SourceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WarehouseError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("warehouse connection error: {0}")]
    Connection(String),
    #[error("warehouse query error: {0}")]
    Query(String),
    #[error("malformed metadata row: {0}")]
    Malformed(String),
}

impl From<diesel::ConnectionError> for WarehouseError {
    fn from(e: diesel::ConnectionError) -> Self {
        WarehouseError::Connection(e.to_string())
    }
}

impl From<diesel::result::Error> for WarehouseError {
    fn from(e: diesel::result::Error) -> Self {
        WarehouseError::Query(e.to_string())
    }
}

impl From<WarehouseError> for SourceError {
    fn from(e: WarehouseError) -> Self {
        match e {
            WarehouseError::Config(m) | WarehouseError::Connection(m) => SourceError::Unavailable(m),
            WarehouseError::Query(m) => SourceError::Query(m),
            WarehouseError::Malformed(m) => SourceError::Invalid(m),
        }
    }
}
