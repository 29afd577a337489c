use serde::{Deserialize, Serialize};

use crate::error::RuleError;

/// Combo to multiplier mapping: every `notes_per_tier` consecutive hits
/// move one step up the table, saturating at its last entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiplierTable {
    tiers: Vec<u32>,
    notes_per_tier: u32,
}

impl MultiplierTable {
    pub fn new(tiers: Vec<u32>, notes_per_tier: u32) -> Result<Self, RuleError> {
        if tiers.is_empty() {
            return Err(RuleError::EmptyMultiplierTable);
        }
        if tiers[0] == 0 || tiers.windows(2).any(|w| w[0] > w[1]) {
            return Err(RuleError::InvalidMultiplierTable(tiers));
        }
        if notes_per_tier == 0 {
            return Err(RuleError::ZeroNotesPerTier);
        }
        Ok(Self {
            tiers,
            notes_per_tier,
        })
    }

    pub fn tier_for(&self, combo: u32) -> u32 {
        let idx = ((combo / self.notes_per_tier) as usize).min(self.tiers.len() - 1);
        self.tiers[idx]
    }

    /// Multiplier of a broken combo.
    pub fn base(&self) -> u32 {
        self.tiers[0]
    }

    pub fn tiers(&self) -> &[u32] {
        &self.tiers
    }

    pub fn notes_per_tier(&self) -> u32 {
        self.notes_per_tier
    }
}

impl Default for MultiplierTable {
    fn default() -> Self {
        Self {
            tiers: vec![1, 2, 3, 4],
            notes_per_tier: 10,
        }
    }
}
