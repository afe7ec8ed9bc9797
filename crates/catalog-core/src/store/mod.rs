//! Document Store: un registro por tabla, direccionado por clave natural.

use catalog_domain::{StoredTableRecord, TableDescription, TableKey};
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::errors::StoreError;

/// Resultado explícito de un upsert exitoso. Un upsert fallido es `Err`,
/// nunca una tercera variante que pueda contarse como éxito.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No existía registro para la clave.
    Created,
    /// Existía y se reemplazó completo (comentario, columnas y firma).
    Replaced,
}

/// Store de registros de tabla con clave natural única.
///
/// Contrato:
/// - `read_signature` es una lectura de proyección mínima: sólo la firma, o
///   `None` si la clave no existe.
/// - `upsert` escribe o reemplaza el registro completo de forma atómica: un
///   lector concurrente nunca ve una firma que no corresponda a sus campos.
pub trait TableStore: Send + Sync {
    fn read_signature(&self, key: &TableKey) -> Result<Option<String>, StoreError>;

    fn upsert(&self, table: &TableDescription, signature: &str) -> Result<UpsertOutcome, StoreError>;

    /// Registro completo para consumidores downstream.
    fn find_record(&self, key: &TableKey) -> Result<Option<StoredTableRecord>, StoreError>;

    /// Claves almacenadas, en orden natural.
    fn list_keys(&self) -> Result<Vec<TableKey>, StoreError>;
}

impl<T: TableStore + ?Sized> TableStore for std::sync::Arc<T> {
    fn read_signature(&self, key: &TableKey) -> Result<Option<String>, StoreError> {
        (**self).read_signature(key)
    }
    fn upsert(&self, table: &TableDescription, signature: &str) -> Result<UpsertOutcome, StoreError> {
        (**self).upsert(table, signature)
    }
    fn find_record(&self, key: &TableKey) -> Result<Option<StoredTableRecord>, StoreError> {
        (**self).find_record(key)
    }
    fn list_keys(&self) -> Result<Vec<TableKey>, StoreError> {
        (**self).list_keys()
    }
}

/// Store en memoria. `DashMap::entry` bloquea el shard de la clave durante el
/// upsert, así que la escritura es atómica por clave.
#[derive(Default)]
pub struct InMemoryTableStore {
    inner: DashMap<TableKey, StoredTableRecord>,
}

impl InMemoryTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl TableStore for InMemoryTableStore {
    fn read_signature(&self, key: &TableKey) -> Result<Option<String>, StoreError> {
        Ok(self.inner.get(key).map(|r| r.signature.clone()))
    }

    fn upsert(&self, table: &TableDescription, signature: &str) -> Result<UpsertOutcome, StoreError> {
        let now = Utc::now();
        match self.inner.entry(table.key()) {
            Entry::Occupied(mut slot) => {
                slot.get_mut().replace_with(table, signature, now);
                Ok(UpsertOutcome::Replaced)
            }
            Entry::Vacant(slot) => {
                slot.insert(StoredTableRecord::from_description(table, signature, now));
                Ok(UpsertOutcome::Created)
            }
        }
    }

    fn find_record(&self, key: &TableKey) -> Result<Option<StoredTableRecord>, StoreError> {
        Ok(self.inner.get(key).map(|r| r.clone()))
    }

    fn list_keys(&self) -> Result<Vec<TableKey>, StoreError> {
        let mut keys: Vec<TableKey> = self.inner.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        Ok(keys)
    }
}
