// table.rs
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::{Column, DomainError};

/// Clave natural de una tabla: `(database, schema_name, name)`.
///
/// Es única tanto en el conjunto obtenido del warehouse como en el store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableKey {
    pub database: String,
    pub schema_name: String,
    pub name: String,
}

impl TableKey {
    pub fn new(database: impl Into<String>, schema_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self { database: database.into(),
               schema_name: schema_name.into(),
               name: name.into() }
    }
}

impl fmt::Display for TableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.database, self.schema_name, self.name)
    }
}

/// Una tabla tal como la reporta el warehouse en el momento del fetch.
///
/// Las columnas vienen ordenadas por `ordinal_position`; ese orden forma
/// parte del contenido estructural de la tabla y nunca se reordena.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDescription {
    pub database: String,
    pub schema_name: String,
    pub name: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub columns: Vec<Column>,
}

impl TableDescription {
    /// Crea una tabla vacía (sin comentario ni columnas).
    pub fn new(database: impl Into<String>, schema_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self { database: database.into(),
               schema_name: schema_name.into(),
               name: name.into(),
               comment: None,
               columns: Vec::new() }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Clave natural de la tabla.
    pub fn key(&self) -> TableKey {
        TableKey::new(self.database.clone(), self.schema_name.clone(), self.name.clone())
    }

    /// Comentario normalizado: `None` y `""` son equivalentes.
    pub fn normalized_comment(&self) -> &str {
        self.comment.as_deref().unwrap_or("")
    }

    /// Verifica la forma estructural de la tabla.
    ///
    /// # Errores
    /// Retorna `DomainError::Validation` si algún componente de la clave está
    /// vacío, si una columna es inválida, o si las posiciones ordinales no
    /// son únicas y estrictamente crecientes en el orden de la lista.
    pub fn validate(&self) -> Result<(), DomainError> {
        for (label, value) in [("database", &self.database), ("schema", &self.schema_name), ("name", &self.name)] {
            if value.trim().is_empty() {
                return Err(DomainError::Validation(format!("Tabla con {label} vacío: {}", self.key())));
            }
        }
        let mut seen = HashSet::new();
        let mut previous = 0;
        for column in &self.columns {
            column.validate()?;
            if !seen.insert(column.ordinal_position) {
                return Err(DomainError::Validation(format!("Posición ordinal duplicada {} en {}",
                                                           column.ordinal_position,
                                                           self.key())));
            }
            if column.ordinal_position <= previous {
                return Err(DomainError::Validation(format!("Columnas fuera de orden en {}: {} después de {}",
                                                           self.key(),
                                                           column.ordinal_position,
                                                           previous)));
            }
            previous = column.ordinal_position;
        }
        Ok(())
    }
}
