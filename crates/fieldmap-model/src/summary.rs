use serde::{Deserialize, Serialize};

/// Coverage and confidence statistics for one assignment set.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_columns: usize,
    pub mapped: usize,
    pub unmapped: usize,
    pub high_confidence: usize,
    pub medium_confidence: usize,
    pub low_confidence: usize,
    /// Mapped entries committed by the forced-coverage pass.
    pub forced: usize,
    /// Entries still pinned to a contested field.
    pub unresolved_conflicts: usize,
    /// Mean over mapped entries only, 0 when nothing is mapped.
    pub mean_confidence: f64,
}

impl SummaryStats {
    /// Share of columns that ended up mapped, 0 for an empty run.
    pub fn coverage(&self) -> f64 {
        if self.total_columns == 0 {
            0.0
        } else {
            self.mapped as f64 / self.total_columns as f64
        }
    }
}
