//! Taxonomía de errores de una pasada de sincronización.
//!
//! - `SourceError`: fallo del Catalog Source (o conjunto obtenido inválido).
//!   Fatal para la pasada, sin escrituras.
//! - `StoreError`: fallo del Document Store en lectura de firma o upsert.
//! - `SyncError`: lo que recibe quien dispara la pasada; identifica la fase.

use catalog_domain::{DomainError, TableKey};
use std::fmt;
use thiserror::Error;

use crate::reconcile::SyncSummary;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("catalog source unavailable: {0}")]
    Unavailable(String),
    #[error("catalog query failed: {0}")]
    Query(String),
    #[error("invalid table in fetched catalog: {0}")]
    Invalid(String),
    #[error("duplicate natural key in fetched catalog: {0}")]
    DuplicateKey(TableKey),
}

impl From<DomainError> for SourceError {
    fn from(e: DomainError) -> Self {
        SourceError::Invalid(e.to_string())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("document store unavailable: {0}")]
    Unavailable(String),
    #[error("unique violation: {0}")]
    UniqueViolation(String),
    #[error("corrupt stored record: {0}")]
    Corrupt(String),
    #[error("document store error: {0}")]
    Other(String),
}

/// Fase de la pasada en la que ocurrió un fallo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Fetch,
    Reconcile,
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncPhase::Fetch => f.write_str("fetch"),
            SyncPhase::Reconcile => f.write_str("reconcile"),
        }
    }
}

/// Operación sobre el store que falló para una tabla.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableStage {
    /// Lectura mínima de la firma almacenada.
    Read,
    /// Upsert del registro completo.
    Write,
}

impl fmt::Display for TableStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableStage::Read => f.write_str("read"),
            TableStage::Write => f.write_str("write"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("fetch phase failed: {0}")]
    Fetch(#[from] SourceError),
    /// `partial` cuenta sólo las tablas clasificadas antes del fallo.
    #[error("reconcile phase failed at {stage} of {key}: {source}")]
    Reconcile {
        key: TableKey,
        stage: TableStage,
        #[source]
        source: StoreError,
        partial: SyncSummary,
    },
    #[error("worker pool: {0}")]
    WorkerPool(String),
}

impl SyncError {
    pub fn phase(&self) -> SyncPhase {
        match self {
            SyncError::Fetch(_) => SyncPhase::Fetch,
            // El pool se crea después de un fetch exitoso.
            SyncError::Reconcile { .. } | SyncError::WorkerPool(_) => SyncPhase::Reconcile,
        }
    }

    /// Resumen parcial (si la pasada llegó a escribir algo).
    pub fn partial_summary(&self) -> Option<&SyncSummary> {
        match self {
            SyncError::Reconcile { partial, .. } => Some(partial),
            _ => None,
        }
    }
}
