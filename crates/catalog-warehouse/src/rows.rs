//! Filas planas de la consulta de metadatos → tablas con columnas.

use catalog_domain::{Column, TableDescription, TableKey};
use diesel::sql_types::{Integer, Nullable, Text};
use diesel::QueryableByName;
use indexmap::IndexMap;

use crate::error::WarehouseError;

/// Una fila del join tablas × columnas. Las columnas son `None` cuando el
/// LEFT JOIN no encontró ninguna (tabla sin columnas visibles).
#[derive(QueryableByName, Debug, Clone, PartialEq, Eq)]
pub struct MetadataRow {
    #[diesel(sql_type = Text)]
    pub database: String,
    #[diesel(sql_type = Text)]
    pub schema_name: String,
    #[diesel(sql_type = Text)]
    pub table_name: String,
    #[diesel(sql_type = Nullable<Text>)]
    pub table_comment: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub column_name: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub data_type: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub is_nullable: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub column_comment: Option<String>,
    #[diesel(sql_type = Nullable<Integer>)]
    pub ordinal_position: Option<i32>,
}

/// Agrupa filas por clave natural preservando el orden de primera aparición.
///
/// Las filas llegan ordenadas por (database, schema, tabla, ordinal); el
/// orden de columnas dentro de cada tabla es el de llegada.
///
/// # Errores
/// `WarehouseError::Malformed` si una fila trae nombre de columna pero le
/// falta el tipo o la posición ordinal.
pub fn assemble_tables(rows: Vec<MetadataRow>) -> Result<Vec<TableDescription>, WarehouseError> {
    let mut tables: IndexMap<TableKey, TableDescription> = IndexMap::new();
    for row in rows {
        let key = TableKey::new(row.database.clone(), row.schema_name.clone(), row.table_name.clone());
        let table = tables.entry(key)
                          .or_insert_with(|| TableDescription { database: row.database,
                                                                schema_name: row.schema_name,
                                                                name: row.table_name,
                                                                comment: row.table_comment,
                                                                columns: Vec::new() });
        let Some(column_name) = row.column_name else {
            continue;
        };
        let data_type = row.data_type
                           .ok_or_else(|| WarehouseError::Malformed(format!("{}.{}: sin data_type", table.key(), column_name)))?;
        let ordinal_position =
            row.ordinal_position
               .ok_or_else(|| WarehouseError::Malformed(format!("{}.{}: sin ordinal_position", table.key(), column_name)))?;
        table.columns.push(Column { name: column_name,
                                    data_type,
                                    is_nullable: row.is_nullable.as_deref() == Some("YES"),
                                    comment: row.column_comment,
                                    ordinal_position });
    }
    Ok(tables.into_values().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(table: &str, column: Option<(&str, i32)>) -> MetadataRow {
        MetadataRow { database: "D".into(),
                      schema_name: "S".into(),
                      table_name: table.into(),
                      table_comment: Some("c".into()),
                      column_name: column.map(|(n, _)| n.to_string()),
                      data_type: column.map(|_| "TEXT".to_string()),
                      is_nullable: column.map(|_| "YES".to_string()),
                      column_comment: None,
                      ordinal_position: column.map(|(_, p)| p) }
    }

    #[test]
    fn groups_rows_by_table_in_arrival_order() {
        let rows = vec![row("B", Some(("x", 1))), row("B", Some(("y", 2))), row("A", Some(("z", 1)))];
        let tables = assemble_tables(rows).unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].name, "B");
        assert_eq!(tables[0].columns.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(), vec!["x", "y"]);
        assert_eq!(tables[1].name, "A");
        assert!(tables[1].columns[0].is_nullable);
    }

    #[test]
    fn table_without_columns_has_empty_column_list() {
        let tables = assemble_tables(vec![row("EMPTY", None)]).unwrap();
        assert_eq!(tables.len(), 1);
        assert!(tables[0].columns.is_empty());
        assert_eq!(tables[0].comment.as_deref(), Some("c"));
    }

    #[test]
    fn is_nullable_only_true_for_yes() {
        let mut r = row("T", Some(("x", 1)));
        r.is_nullable = Some("NO".into());
        assert!(!assemble_tables(vec![r]).unwrap()[0].columns[0].is_nullable);
    }

    #[test]
    fn missing_ordinal_is_malformed() {
        let mut r = row("T", Some(("x", 1)));
        r.ordinal_position = None;
        assert!(matches!(assemble_tables(vec![r]), Err(WarehouseError::Malformed(_))));
    }
}
