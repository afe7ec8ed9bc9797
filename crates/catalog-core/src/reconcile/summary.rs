use serde::{Deserialize, Serialize};

/// Clasificación terminal de una tabla dentro de una pasada.
///
/// `Start → Inserted` (sin registro previo), `Start → Skipped` (firma
/// igual), `Start → Updated` (firma distinta). No hay más estados.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Inserted,
    Updated,
    Skipped,
}

/// Resumen agregado de una pasada.
///
/// Invariante: `inserted + updated + skipped == total_tables`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSummary {
    pub total_tables: usize,
    pub inserted: usize,
    pub updated: usize,
    pub skipped: usize,
}

impl SyncSummary {
    /// Suma una clasificación terminal.
    pub fn record(&mut self, classification: Classification) {
        self.total_tables += 1;
        match classification {
            Classification::Inserted => self.inserted += 1,
            Classification::Updated => self.updated += 1,
            Classification::Skipped => self.skipped += 1,
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.inserted + self.updated + self.skipped == self.total_tables
    }
}

impl FromIterator<Classification> for SyncSummary {
    fn from_iter<I: IntoIterator<Item = Classification>>(iter: I) -> Self {
        let mut summary = SyncSummary::default();
        for c in iter {
            summary.record(c);
        }
        summary
    }
}
