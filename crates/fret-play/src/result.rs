use serde::{Deserialize, Serialize};

/// How a playthrough ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayOutcome {
    Completed,
    /// Health ran out before the end of the song
    Failed,
}

/// End-of-song summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaySummary {
    pub notes_hit: u32,
    pub total_notes: u32,
    pub max_combo: u32,
    pub score: u64,
    pub outcome: PlayOutcome,
}

impl PlaySummary {
    /// Fraction of notes hit in `[0, 1]`, 0 for an empty track.
    pub fn accuracy(&self) -> f64 {
        if self.total_notes == 0 {
            return 0.0;
        }
        f64::from(self.notes_hit) / f64::from(self.total_notes)
    }

    pub fn is_full_combo(&self) -> bool {
        self.outcome == PlayOutcome::Completed
            && self.total_notes > 0
            && self.max_combo == self.total_notes
    }
}
