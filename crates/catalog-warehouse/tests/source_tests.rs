use catalog_core::{CatalogSource, InMemoryTableStore, Reconciler, SourceError, SyncError};
use catalog_warehouse::{MetadataRow, WarehouseCatalogSource, WarehouseClient, WarehouseError};
use std::sync::atomic::{AtomicUsize, Ordering};

fn row(table: &str, column: &str, position: i32) -> MetadataRow {
    MetadataRow { database: "ANALYTICS".into(),
                  schema_name: "PUBLIC".into(),
                  table_name: table.into(),
                  table_comment: None,
                  column_name: Some(column.into()),
                  data_type: Some("NUMBER".into()),
                  is_nullable: Some("NO".into()),
                  column_comment: None,
                  ordinal_position: Some(position) }
}

struct FakeClient {
    rows: Vec<MetadataRow>,
    calls: AtomicUsize,
}

impl FakeClient {
    fn new(rows: Vec<MetadataRow>) -> Self {
        Self { rows, calls: AtomicUsize::new(0) }
    }
}

impl WarehouseClient for FakeClient {
    fn fetch_metadata_rows(&self) -> Result<Vec<MetadataRow>, WarehouseError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.rows.clone())
    }
}

struct DownClient;
impl WarehouseClient for DownClient {
    fn fetch_metadata_rows(&self) -> Result<Vec<MetadataRow>, WarehouseError> {
        Err(WarehouseError::Connection("authentication failed".into()))
    }
}

#[test]
fn fetch_all_issues_one_query_and_groups_tables() {
    let source = WarehouseCatalogSource::new(FakeClient::new(vec![row("A", "id", 1), row("A", "v", 2), row("B", "id", 1)]));
    let tables = source.fetch_all().unwrap();
    assert_eq!(tables.len(), 2);
    assert_eq!(tables[0].columns.len(), 2);
    assert_eq!(source.client().calls.load(Ordering::SeqCst), 1);
}

#[test]
fn table_limit_truncates_inventory() {
    let rows = (0..10).map(|i| row(&format!("T{i}"), "id", 1)).collect();
    let source = WarehouseCatalogSource::new(FakeClient::new(rows)).with_table_limit(3);
    let tables = source.fetch_all().unwrap();
    assert_eq!(tables.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(), vec!["T0", "T1", "T2"]);
}

#[test]
fn connection_failure_maps_to_unavailable() {
    let err = WarehouseCatalogSource::new(DownClient).fetch_all().unwrap_err();
    assert_eq!(err, SourceError::Unavailable("authentication failed".into()));
}

#[test]
fn reconciler_over_warehouse_source_is_idempotent() {
    let source = WarehouseCatalogSource::new(FakeClient::new(vec![row("A", "id", 1), row("B", "id", 1)]));
    let reconciler = Reconciler::new(source, InMemoryTableStore::new());
    assert_eq!(reconciler.run_pass().unwrap().inserted, 2);
    let second = reconciler.run_pass().unwrap();
    assert_eq!((second.inserted, second.updated, second.skipped), (0, 0, 2));
}

#[test]
fn warehouse_failure_aborts_pass_without_writes() {
    let reconciler = Reconciler::new(WarehouseCatalogSource::new(DownClient), InMemoryTableStore::new());
    assert!(matches!(reconciler.run_pass(), Err(SyncError::Fetch(SourceError::Unavailable(_)))));
    assert!(reconciler.store().is_empty());
}
