use catalog_domain::{Column, DomainError, StoredTableRecord, TableDescription, TableKey};
use chrono::Utc;

fn orders_table() -> TableDescription {
    TableDescription::new("SALES", "PUBLIC", "ORDERS").with_comment("pedidos")
                                                      .with_column(Column::new("ID", "NUMBER", false, 1))
                                                      .with_column(Column::new("CUSTOMER", "TEXT", true, 2).with_comment("cliente"))
}

#[test]
fn test_valid_table_passes_validation() {
    assert!(orders_table().validate().is_ok());
}

#[test]
fn test_empty_column_name_is_rejected() {
    let t = TableDescription::new("D", "S", "T").with_column(Column::new("  ", "TEXT", true, 1));
    assert!(matches!(t.validate(), Err(DomainError::Validation(_))));
}

#[test]
fn test_duplicate_ordinal_is_rejected() {
    let t = TableDescription::new("D", "S", "T").with_column(Column::new("a", "TEXT", true, 1))
                                                .with_column(Column::new("b", "TEXT", true, 1));
    let err = t.validate().unwrap_err();
    assert!(err.to_string().contains("duplicada"), "mensaje inesperado: {err}");
}

#[test]
fn test_out_of_order_columns_are_rejected() {
    let t = TableDescription::new("D", "S", "T").with_column(Column::new("b", "TEXT", true, 2))
                                                .with_column(Column::new("a", "TEXT", true, 1));
    assert!(t.validate().is_err());
}

#[test]
fn test_empty_key_component_is_rejected() {
    assert!(TableDescription::new("D", "", "T").validate().is_err());
}

#[test]
fn test_gaps_in_ordinals_are_allowed() {
    // Columnas eliminadas dejan huecos en las posiciones reportadas.
    let t = TableDescription::new("D", "S", "T").with_column(Column::new("a", "TEXT", true, 1))
                                                .with_column(Column::new("c", "TEXT", true, 3));
    assert!(t.validate().is_ok());
}

#[test]
fn test_record_roundtrips_structural_view() {
    let table = orders_table();
    let record = StoredTableRecord::from_description(&table, "abc", Utc::now());
    assert_eq!(record.key(), TableKey::new("SALES", "PUBLIC", "ORDERS"));
    assert_eq!(record.to_description(), table);
}

#[test]
fn test_record_stores_empty_comment_as_none() {
    let table = TableDescription::new("D", "S", "T").with_comment("");
    let record = StoredTableRecord::from_description(&table, "abc", Utc::now());
    assert_eq!(record.comment, None);
}

#[test]
fn test_replace_keeps_identity_and_created_at() {
    let created = Utc::now();
    let mut record = StoredTableRecord::from_description(&orders_table(), "old", created);
    let id = record.id;
    let changed = orders_table().with_column(Column::new("TOTAL", "NUMBER", true, 3));
    record.replace_with(&changed, "new", Utc::now());
    assert_eq!(record.id, id);
    assert_eq!(record.created_at, created);
    assert_eq!(record.signature, "new");
    assert_eq!(record.columns.len(), 3);
}

#[test]
fn test_table_description_deserializes_document_shape() {
    let doc = serde_json::json!({
        "database": "D", "schemaName": "S", "name": "T",
        "columns": [{ "name": "id", "dataType": "NUMBER", "isNullable": false, "ordinalPosition": 1 }]
    });
    let t: TableDescription = serde_json::from_value(doc).unwrap();
    assert_eq!(t.comment, None);
    assert_eq!(t.columns[0].comment, None);
    assert_eq!(t.columns[0].data_type, "NUMBER");
}
