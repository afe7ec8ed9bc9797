use catalog_core::{InMemoryCatalogSource, InMemoryTableStore, PassMode, Reconciler, SyncSummary};
use catalog_domain::{Column, TableDescription, TableKey};
use catalog_sync::errors::AppError;
use catalog_sync::service::{list_tables, run_sync, show_table};

fn catalog() -> Vec<TableDescription> {
    vec![TableDescription::new("D", "S", "T").with_column(Column::new("id", "NUMBER", false, 1)),
         TableDescription::new("D", "S", "U").with_comment("otra")
                                             .with_column(Column::new("id", "NUMBER", false, 1))
                                             .with_column(Column::new("at", "TIMESTAMP_NTZ", true, 2)),]
}

#[test]
fn run_sync_returns_summary_json_shape() {
    let reconciler = Reconciler::new(InMemoryCatalogSource::new(catalog()), InMemoryTableStore::new()).with_mode(PassMode::Parallel { workers: 2 });
    let summary = run_sync(&reconciler).unwrap();
    assert_eq!(summary, SyncSummary { total_tables: 2, inserted: 2, updated: 0, skipped: 0 });
    let json = serde_json::to_value(summary).unwrap();
    assert_eq!(json["totalTables"], 2);
}

#[test]
fn show_and_list_read_reconciled_records() {
    let reconciler = Reconciler::new(InMemoryCatalogSource::new(catalog()), InMemoryTableStore::new());
    run_sync(&reconciler).unwrap();

    let keys = list_tables(reconciler.store()).unwrap();
    assert_eq!(keys, vec![TableKey::new("D", "S", "T"), TableKey::new("D", "S", "U")]);

    let record = show_table(reconciler.store(), &TableKey::new("D", "S", "U")).unwrap().unwrap();
    assert_eq!(record.comment.as_deref(), Some("otra"));
    assert_eq!(record.columns[1].data_type, "TIMESTAMP_NTZ");
    assert!(show_table(reconciler.store(), &TableKey::new("D", "S", "NONE")).unwrap().is_none());
}

#[test]
fn duplicate_fetch_maps_to_fetch_exit_code() {
    let mut tables = catalog();
    tables.push(tables[0].clone());
    let reconciler = Reconciler::new(InMemoryCatalogSource::new(tables), InMemoryTableStore::new());
    let err: AppError = run_sync(&reconciler).unwrap_err();
    assert_eq!(err.exit_code(), 3);
    assert!(reconciler.store().is_empty());
}
