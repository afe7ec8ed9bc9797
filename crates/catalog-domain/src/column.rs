// column.rs
use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Una columna de una tabla tal como la reporta el warehouse.
///
/// `data_type` es opaco para este sistema: se guarda y se compara tal cual.
/// `ordinal_position` empieza en 1 y define el orden de presentación.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub name: String,
    pub data_type: String,
    pub is_nullable: bool,
    #[serde(default)]
    pub comment: Option<String>,
    pub ordinal_position: i32,
}

impl Column {
    /// Crea una columna sin comentario.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>, is_nullable: bool, ordinal_position: i32) -> Self {
        Self { name: name.into(),
               data_type: data_type.into(),
               is_nullable,
               comment: None,
               ordinal_position }
    }

    /// Crea una nueva instancia con comentario modificado
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Comentario normalizado: `None` y `""` son equivalentes.
    pub fn normalized_comment(&self) -> &str {
        self.comment.as_deref().unwrap_or("")
    }

    /// Valida nombre no vacío y posición ordinal >= 1.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::Validation(format!("Columna sin nombre en posición {}", self.ordinal_position)));
        }
        if self.ordinal_position < 1 {
            return Err(DomainError::Validation(format!("Posición ordinal inválida para columna {}: {}",
                                                       self.name, self.ordinal_position)));
        }
        Ok(())
    }
}
