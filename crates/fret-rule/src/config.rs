use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::METER_MAX;
use crate::error::RuleError;
use crate::multiplier::MultiplierTable;

/// Gameplay tuning: judgment windows, multiplier table, meters and boost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct RuleConfig {
    /// Half-width of the hit window in seconds
    pub hit_window: f64,
    /// Seconds a note is visible before its hit time
    pub fall_duration: f64,
    pub multiplier_tiers: Vec<u32>,
    pub notes_per_tier: u32,
    pub base_note_value: u64,

    pub initial_health: u32,
    pub health_gain: u32,
    pub health_loss: u32,

    /// Charge added per boost note hit
    pub boost_gain: u32,
    pub boost_activation_threshold: u32,
    /// Seconds a full charge lasts once activated
    pub boost_duration: f64,

    /// Shortest note duration that is scored as a sustain
    pub sustain_threshold: f64,
    pub sustain_tick_value: u64,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            hit_window: 0.085,
            fall_duration: 1.5,
            multiplier_tiers: vec![1, 2, 3, 4],
            notes_per_tier: 10,
            base_note_value: 50,
            initial_health: 50,
            health_gain: 2,
            health_loss: 8,
            boost_gain: 5,
            boost_activation_threshold: 50,
            boost_duration: 8.0,
            sustain_threshold: 0.1,
            sustain_tick_value: 1,
        }
    }
}

impl RuleConfig {
    /// Repair nonsensical values in place, falling back to defaults.
    pub fn validate(&mut self) {
        let defaults = Self::default();

        if !is_positive(self.hit_window) {
            self.hit_window = defaults.hit_window;
        }
        if !is_positive(self.fall_duration) {
            self.fall_duration = defaults.fall_duration;
        }
        if !is_positive(self.boost_duration) {
            self.boost_duration = defaults.boost_duration;
        }
        if !(self.sustain_threshold.is_finite() && self.sustain_threshold >= 0.0) {
            self.sustain_threshold = defaults.sustain_threshold;
        }

        self.multiplier_tiers.retain(|&t| t > 0);
        self.multiplier_tiers.sort_unstable();
        if self.multiplier_tiers.is_empty() {
            self.multiplier_tiers = defaults.multiplier_tiers;
        }
        self.notes_per_tier = self.notes_per_tier.max(1);

        self.initial_health = self.initial_health.clamp(1, METER_MAX);
        self.boost_activation_threshold = self.boost_activation_threshold.clamp(1, METER_MAX);
        self.health_gain = self.health_gain.min(METER_MAX);
        self.health_loss = self.health_loss.min(METER_MAX);
        self.boost_gain = self.boost_gain.min(METER_MAX);
    }

    /// Strict counterpart of [`validate`](Self::validate): report the first
    /// problem instead of repairing it.
    pub fn check(&self) -> Result<(), RuleError> {
        for (name, value) in [
            ("hitWindow", self.hit_window),
            ("fallDuration", self.fall_duration),
            ("boostDuration", self.boost_duration),
        ] {
            if !is_positive(value) {
                return Err(RuleError::InvalidDuration { name, value });
            }
        }
        if !(self.sustain_threshold.is_finite() && self.sustain_threshold >= 0.0) {
            return Err(RuleError::InvalidDuration {
                name: "sustainThreshold",
                value: self.sustain_threshold,
            });
        }
        for (name, value) in [
            ("initialHealth", self.initial_health),
            ("boostActivationThreshold", self.boost_activation_threshold),
        ] {
            if !(1..=METER_MAX).contains(&value) {
                return Err(RuleError::OutOfRange {
                    name,
                    value,
                    max: METER_MAX,
                });
            }
        }
        for (name, value) in [
            ("healthGain", self.health_gain),
            ("healthLoss", self.health_loss),
            ("boostGain", self.boost_gain),
        ] {
            if value > METER_MAX {
                return Err(RuleError::TooLarge {
                    name,
                    value,
                    max: METER_MAX,
                });
            }
        }
        self.multiplier_table().map(|_| ())
    }

    pub fn multiplier_table(&self) -> Result<MultiplierTable, RuleError> {
        MultiplierTable::new(self.multiplier_tiers.clone(), self.notes_per_tier)
    }

    /// Read config from a JSON file.
    pub fn read(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let mut config: RuleConfig = serde_json::from_str(&data)?;
        config.validate();
        log::debug!("Loaded rule config from {}", path.display());
        Ok(config)
    }

    /// Write config to a JSON file.
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
