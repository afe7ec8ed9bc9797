// record.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Column, TableDescription, TableKey};

/// Contraparte persistida de una `TableDescription`.
///
/// `signature` se recalcula y se reescribe en la misma operación atómica que
/// el resto de campos; nunca se modifica por separado. `id`, `created_at` y
/// `updated_at` los gestiona el store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredTableRecord {
    pub id: Uuid,
    pub database: String,
    pub schema_name: String,
    pub name: String,
    pub comment: Option<String>,
    pub columns: Vec<Column>,
    pub signature: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredTableRecord {
    /// Construye un registro nuevo a partir de una descripción y su firma.
    /// Un comentario vacío se guarda como `None`.
    pub fn from_description(table: &TableDescription, signature: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self { id: Uuid::new_v4(),
               database: table.database.clone(),
               schema_name: table.schema_name.clone(),
               name: table.name.clone(),
               comment: table.comment.clone().filter(|c| !c.is_empty()),
               columns: table.columns.clone(),
               signature: signature.into(),
               created_at: now,
               updated_at: now }
    }

    /// Reemplaza los campos estructurales y la firma conservando identidad y
    /// `created_at`.
    pub fn replace_with(&mut self, table: &TableDescription, signature: impl Into<String>, now: DateTime<Utc>) {
        self.comment = table.comment.clone().filter(|c| !c.is_empty());
        self.columns = table.columns.clone();
        self.signature = signature.into();
        self.updated_at = now;
    }

    pub fn key(&self) -> TableKey {
        TableKey::new(self.database.clone(), self.schema_name.clone(), self.name.clone())
    }

    /// Vista estructural del registro (sin firma ni timestamps).
    pub fn to_description(&self) -> TableDescription {
        TableDescription { database: self.database.clone(),
                           schema_name: self.schema_name.clone(),
                           name: self.name.clone(),
                           comment: self.comment.clone(),
                           columns: self.columns.clone() }
    }
}
