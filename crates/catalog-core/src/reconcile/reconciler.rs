use catalog_domain::{TableDescription, TableKey};
use log::{debug, error, info};
use rayon::prelude::*;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

use super::{Classification, SyncSummary};
use crate::errors::{SourceError, StoreError, SyncError, TableStage};
use crate::signature::compute_signature;
use crate::source::CatalogSource;
use crate::store::{TableStore, UpsertOutcome};

/// Modo de ejecución de la fase de reconciliación.
///
/// Ambos modos producen el mismo resumen: ninguna tabla depende de otra
/// dentro de la misma pasada.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PassMode {
    /// Una tabla tras otra, en el orden del fetch.
    #[default]
    Sequential,
    /// Fan-out acotado a `workers` hilos; agregación en un único punto al
    /// final.
    Parallel { workers: usize },
}

impl PassMode {
    /// `0` o `1` → secuencial.
    pub fn from_parallelism(workers: usize) -> Self {
        if workers <= 1 {
            PassMode::Sequential
        } else {
            PassMode::Parallel { workers }
        }
    }
}

/// Fallo de una tabla concreta, antes de conocer el resumen parcial.
struct TableFailure {
    key: TableKey,
    stage: TableStage,
    source: StoreError,
}

impl TableFailure {
    fn into_sync_error(self, partial: SyncSummary) -> SyncError {
        SyncError::Reconcile { key: self.key,
                               stage: self.stage,
                               source: self.source,
                               partial }
    }
}

/// Orquesta una pasada completa entre un `CatalogSource` y un `TableStore`.
///
/// Responsabilidades:
/// - Un único fetch; si falla, la pasada aborta sin escribir nada.
/// - Por cada tabla: firma, lectura mínima de la firma guardada, y upsert
///   sólo si no existe o difiere.
/// - Clasificar a partir del resultado explícito del upsert; un upsert
///   fallido nunca se cuenta.
pub struct Reconciler<S, T> {
    source: S,
    store: T,
    mode: PassMode,
}

impl<S: CatalogSource, T: TableStore> Reconciler<S, T> {
    pub fn new(source: S, store: T) -> Self {
        Self { source,
               store,
               mode: PassMode::Sequential }
    }

    pub fn with_mode(mut self, mode: PassMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> PassMode {
        self.mode
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn store(&self) -> &T {
        &self.store
    }

    /// Ejecuta una pasada y devuelve `{total_tables, inserted, updated, skipped}`.
    ///
    /// Errores:
    /// - `SyncError::Fetch` si el source falla o devuelve un conjunto inválido
    ///   (tabla mal formada o clave duplicada). No se escribe nada.
    /// - `SyncError::Reconcile` ante el primer fallo de lectura o escritura;
    ///   `partial` refleja sólo las tablas ya clasificadas.
    pub fn run_pass(&self) -> Result<SyncSummary, SyncError> {
        info!("sync:start mode={:?}", self.mode);
        let tables = self.source.fetch_all().map_err(|e| {
                                                 error!("sync:fetch failed err={e}");
                                                 SyncError::Fetch(e)
                                             })?;
        info!("sync:fetched tables={}", tables.len());
        check_fetched(&tables).map_err(|e| {
                                  error!("sync:fetch rejected err={e}");
                                  SyncError::Fetch(e)
                              })?;

        let result = match self.mode {
            PassMode::Sequential => self.run_sequential(&tables),
            PassMode::Parallel { workers } => self.run_parallel(&tables, workers),
        };
        match &result {
            Ok(s) => info!("sync:done total={} inserted={} updated={} skipped={}",
                           s.total_tables,
                           s.inserted,
                           s.updated,
                           s.skipped),
            Err(e) => error!("sync:aborted err={e}"),
        }
        result
    }

    fn run_sequential(&self, tables: &[TableDescription]) -> Result<SyncSummary, SyncError> {
        let mut summary = SyncSummary::default();
        for table in tables {
            match self.reconcile_table(table) {
                Ok(c) => summary.record(c),
                Err(f) => return Err(f.into_sync_error(summary)),
            }
        }
        Ok(summary)
    }

    fn run_parallel(&self, tables: &[TableDescription], workers: usize) -> Result<SyncSummary, SyncError> {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(workers)
                                                  .thread_name(|i| format!("catalog-sync-{i}"))
                                                  .build()
                                                  .map_err(|e| SyncError::WorkerPool(e.to_string()))?;
        let abort = AtomicBool::new(false);
        // `None` = no iniciada porque otra tabla ya falló.
        let results: Vec<Option<Result<Classification, TableFailure>>> = pool.install(|| {
            tables.par_iter()
                  .map(|table| {
                      if abort.load(Ordering::Acquire) {
                          return None;
                      }
                      let r = self.reconcile_table(table);
                      if r.is_err() {
                          abort.store(true, Ordering::Release);
                      }
                      Some(r)
                  })
                  .collect()
        });

        let mut summary = SyncSummary::default();
        let mut first_failure = None;
        for r in results.into_iter().flatten() {
            match r {
                Ok(c) => summary.record(c),
                Err(f) => {
                    if first_failure.is_none() {
                        first_failure = Some(f);
                    }
                }
            }
        }
        match first_failure {
            Some(f) => Err(f.into_sync_error(summary)),
            None => Ok(summary),
        }
    }

    fn reconcile_table(&self, table: &TableDescription) -> Result<Classification, TableFailure> {
        let key = table.key();
        let signature = compute_signature(table);
        let stored = self.store.read_signature(&key).map_err(|source| TableFailure { key: key.clone(),
                                                                                       stage: TableStage::Read,
                                                                                       source })?;
        if stored.as_deref() == Some(signature.as_str()) {
            debug!("sync:table key={key} skipped");
            return Ok(Classification::Skipped);
        }
        let outcome = self.store.upsert(table, &signature).map_err(|source| TableFailure { key: key.clone(),
                                                                                           stage: TableStage::Write,
                                                                                           source })?;
        let classification = match outcome {
            UpsertOutcome::Created => Classification::Inserted,
            UpsertOutcome::Replaced => Classification::Updated,
        };
        debug!("sync:table key={key} {:?} columns={}", classification, table.columns.len());
        Ok(classification)
    }
}

/// Validación del conjunto obtenido antes de cualquier escritura.
fn check_fetched(tables: &[TableDescription]) -> Result<(), SourceError> {
    let mut seen = HashSet::with_capacity(tables.len());
    for table in tables {
        table.validate()?;
        let key = table.key();
        if !seen.insert(key.clone()) {
            return Err(SourceError::DuplicateKey(key));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_parallelism_maps_small_values_to_sequential() {
        assert_eq!(PassMode::from_parallelism(0), PassMode::Sequential);
        assert_eq!(PassMode::from_parallelism(1), PassMode::Sequential);
        assert_eq!(PassMode::from_parallelism(4), PassMode::Parallel { workers: 4 });
    }

    #[test]
    fn check_fetched_rejects_duplicate_keys() {
        let t = TableDescription::new("D", "S", "T");
        let err = check_fetched(&[t.clone(), t]).unwrap_err();
        assert_eq!(err, SourceError::DuplicateKey(TableKey::new("D", "S", "T")));
    }
}
