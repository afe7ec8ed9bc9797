//! Firma estructural de una tabla.
//!
//! La firma es SHA-256 (hex minúsculas) sobre el JSON canónico de los campos
//! estructurales. Los comentarios ausentes se normalizan a `""` y las
//! columnas se serializan en el orden recibido (el orden ya lo define
//! `ordinal_position`; no se reordena).

use catalog_domain::{StoredTableRecord, TableDescription};
use serde_json::{json, Value};

use crate::hashing::hash_value;

fn signature_payload(table: &TableDescription) -> Value {
    let columns: Vec<Value> = table.columns
                                   .iter()
                                   .map(|c| {
                                       json!({
                                           "name": c.name,
                                           "dataType": c.data_type,
                                           "isNullable": c.is_nullable,
                                           "comment": c.normalized_comment(),
                                           "ordinalPosition": c.ordinal_position,
                                       })
                                   })
                                   .collect();
    json!({
        "database": table.database,
        "schemaName": table.schema_name,
        "name": table.name,
        "comment": table.normalized_comment(),
        "columns": columns,
    })
}

/// Calcula la firma de una tabla. Función pura.
pub fn compute_signature(table: &TableDescription) -> String {
    hash_value(&signature_payload(table))
}

/// Verifica que la firma almacenada corresponda a los campos del registro.
pub fn signature_matches(record: &StoredTableRecord) -> bool {
    compute_signature(&record.to_description()) == record.signature
}
