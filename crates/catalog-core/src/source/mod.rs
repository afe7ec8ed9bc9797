//! Catalog Source: origen del inventario completo de tablas.

use catalog_domain::TableDescription;
use std::sync::RwLock;

use crate::errors::SourceError;

/// Colaborador que obtiene, en una sola llamada, todas las tablas visibles
/// con su lista completa de columnas en orden de presentación.
///
/// Contrato:
/// - Sin resultados parciales: o devuelve el inventario completo o un error.
/// - No debe devolver claves naturales duplicadas.
pub trait CatalogSource: Send + Sync {
    fn fetch_all(&self) -> Result<Vec<TableDescription>, SourceError>;
}

impl<S: CatalogSource + ?Sized> CatalogSource for Box<S> {
    fn fetch_all(&self) -> Result<Vec<TableDescription>, SourceError> {
        (**self).fetch_all()
    }
}

impl<S: CatalogSource + ?Sized> CatalogSource for std::sync::Arc<S> {
    fn fetch_all(&self) -> Result<Vec<TableDescription>, SourceError> {
        (**self).fetch_all()
    }
}

/// Source en memoria con inventario reemplazable entre pasadas.
#[derive(Default)]
pub struct InMemoryCatalogSource {
    tables: RwLock<Vec<TableDescription>>,
}

impl InMemoryCatalogSource {
    pub fn new(tables: Vec<TableDescription>) -> Self {
        Self { tables: RwLock::new(tables) }
    }

    /// Reemplaza el inventario que verá la siguiente pasada.
    pub fn set_tables(&self, tables: Vec<TableDescription>) -> Result<(), SourceError> {
        let mut guard = self.tables
                            .write()
                            .map_err(|e| SourceError::Unavailable(format!("lock poisoned: {e}")))?;
        *guard = tables;
        Ok(())
    }
}

impl CatalogSource for InMemoryCatalogSource {
    fn fetch_all(&self) -> Result<Vec<TableDescription>, SourceError> {
        self.tables
            .read()
            .map(|g| g.clone())
            .map_err(|e| SourceError::Unavailable(format!("lock poisoned: {e}")))
    }
}
