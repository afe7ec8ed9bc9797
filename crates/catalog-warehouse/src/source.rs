use catalog_core::{CatalogSource, SourceError};
use catalog_domain::TableDescription;
use log::info;

use crate::client::WarehouseClient;
use crate::rows::assemble_tables;

/// `CatalogSource` sobre un `WarehouseClient`: una consulta, agrupado de
/// filas y recorte opcional por `table_limit`.
pub struct WarehouseCatalogSource<C: WarehouseClient> {
    client: C,
    table_limit: usize,
}

impl<C: WarehouseClient> WarehouseCatalogSource<C> {
    pub fn new(client: C) -> Self {
        Self { client, table_limit: 0 }
    }

    /// `0` desactiva el límite.
    pub fn with_table_limit(mut self, table_limit: usize) -> Self {
        self.table_limit = table_limit;
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }
}

impl<C: WarehouseClient> CatalogSource for WarehouseCatalogSource<C> {
    fn fetch_all(&self) -> Result<Vec<TableDescription>, SourceError> {
        let rows = self.client.fetch_metadata_rows()?;
        let row_count = rows.len();
        let mut tables = assemble_tables(rows)?;
        if self.table_limit > 0 && tables.len() > self.table_limit {
            tables.truncate(self.table_limit);
        }
        info!("warehouse:fetched rows={row_count} tables={}", tables.len());
        Ok(tables)
    }
}
