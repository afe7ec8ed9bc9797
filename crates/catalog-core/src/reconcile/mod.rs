//! Reconciliación: una pasada fetch → diff → write → resumen.

mod reconciler;
mod summary;

pub use reconciler::{PassMode, Reconciler};
pub use summary::{Classification, SyncSummary};
