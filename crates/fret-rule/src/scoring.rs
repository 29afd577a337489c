use serde::{Deserialize, Serialize};

use crate::METER_MAX;
use crate::config::RuleConfig;
use crate::error::RuleError;
use crate::multiplier::MultiplierTable;

/// Live scoring values exposed to the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreSnapshot {
    pub score: u64,
    pub combo: u32,
    /// Displayed multiplier, doubled while boost is active
    pub multiplier: u32,
    pub boost_active: bool,
    pub health: u32,
    pub boost_charge: f64,
}

/// Per-playthrough scoring state machine.
///
/// Health reaching zero is terminal: once failed, hits, misses, sustain
/// ticks and boost changes are all ignored.
#[derive(Debug, Clone)]
pub struct ScoringState {
    table: MultiplierTable,
    base_note_value: u64,
    health_gain: u32,
    health_loss: u32,
    boost_gain: u32,
    boost_activation_threshold: u32,
    /// Charge units drained per second while active
    boost_drain_rate: f64,
    sustain_tick_value: u64,

    score: u64,
    combo: u32,
    max_combo: u32,
    notes_hit: u32,
    multiplier: u32,
    health: u32,
    boost_charge: f64,
    boost_active: bool,
    failed: bool,
}

impl ScoringState {
    pub fn new(config: &RuleConfig) -> Result<Self, RuleError> {
        config.check()?;
        let table = config.multiplier_table()?;
        Ok(Self {
            multiplier: table.base(),
            table,
            base_note_value: config.base_note_value,
            health_gain: config.health_gain,
            health_loss: config.health_loss,
            boost_gain: config.boost_gain,
            boost_activation_threshold: config.boost_activation_threshold,
            boost_drain_rate: f64::from(METER_MAX) / config.boost_duration,
            sustain_tick_value: config.sustain_tick_value,
            score: 0,
            combo: 0,
            max_combo: 0,
            notes_hit: 0,
            health: config.initial_health,
            boost_charge: 0.0,
            boost_active: false,
            failed: false,
        })
    }

    fn boost_factor(&self) -> u64 {
        if self.boost_active { 2 } else { 1 }
    }

    /// Register a hit and return the points it scored.
    pub fn on_hit(&mut self, is_boost: bool) -> u64 {
        if self.failed {
            return 0;
        }
        self.combo += 1;
        self.max_combo = self.max_combo.max(self.combo);
        self.notes_hit += 1;
        self.multiplier = self.table.tier_for(self.combo);

        let points = self
            .base_note_value
            .saturating_mul(u64::from(self.multiplier))
            .saturating_mul(self.boost_factor());
        self.score = self.score.saturating_add(points);

        self.health = self.health.saturating_add(self.health_gain).min(METER_MAX);
        if is_boost {
            self.boost_charge = (self.boost_charge + f64::from(self.boost_gain)).min(f64::from(METER_MAX));
        }
        points
    }

    /// Register a miss. Returns `true` when this miss failed the playthrough.
    pub fn on_miss(&mut self) -> bool {
        if self.failed {
            return false;
        }
        self.combo = 0;
        self.multiplier = self.table.base();
        self.health = self.health.saturating_sub(self.health_loss);
        if self.health == 0 {
            self.failed = true;
            log::debug!("Health depleted at score {}", self.score);
        }
        self.failed
    }

    /// Try to start boost. Returns whether it was activated.
    pub fn activate_boost(&mut self) -> bool {
        if self.failed
            || self.boost_active
            || self.boost_charge < f64::from(self.boost_activation_threshold)
        {
            return false;
        }
        self.boost_active = true;
        true
    }

    /// Drain active boost by `dt` seconds of playback.
    pub fn drain_boost(&mut self, dt: f64) {
        if !self.boost_active || self.failed || dt <= 0.0 {
            return;
        }
        self.boost_charge = (self.boost_charge - self.boost_drain_rate * dt).max(0.0);
        if self.boost_charge == 0.0 {
            self.boost_active = false;
        }
    }

    /// Points for one scheduler tick of a held sustain.
    pub fn award_sustain(&mut self) -> u64 {
        if self.failed {
            return 0;
        }
        let points = self.sustain_tick_value.saturating_mul(self.boost_factor());
        self.score = self.score.saturating_add(points);
        points
    }

    pub fn snapshot(&self) -> ScoreSnapshot {
        ScoreSnapshot {
            score: self.score,
            combo: self.combo,
            multiplier: self.multiplier * self.boost_factor() as u32,
            boost_active: self.boost_active,
            health: self.health,
            boost_charge: self.boost_charge,
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn max_combo(&self) -> u32 {
        self.max_combo
    }

    pub fn notes_hit(&self) -> u32 {
        self.notes_hit
    }

    /// Multiplier tier without the boost doubling.
    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn boost_charge(&self) -> f64 {
        self.boost_charge
    }

    pub fn is_boost_active(&self) -> bool {
        self.boost_active
    }

    pub fn is_failed(&self) -> bool {
        self.failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> ScoringState {
        ScoringState::new(&RuleConfig::default()).unwrap()
    }

    #[test]
    fn initial_values() {
        let s = state();
        assert_eq!(s.health(), 50);
        assert_eq!(s.multiplier(), 1);
        assert_eq!(s.boost_charge(), 0.0);
        assert!(!s.is_failed());
    }

    #[test]
    fn hit_hit_miss_hit() {
        let mut s = state();
        let mut combos = Vec::new();
        let mut tiers = Vec::new();
        for hit in [true, true, false, true] {
            if hit {
                s.on_hit(false);
            } else {
                s.on_miss();
            }
            combos.push(s.combo());
            tiers.push(s.multiplier());
        }
        assert_eq!(combos, vec![1, 2, 0, 1]);
        assert_eq!(tiers, vec![1, 1, 1, 1]);
        assert_eq!(s.max_combo(), 2);
        assert_eq!(s.notes_hit(), 3);
        assert_eq!(s.score(), 150);
        assert_eq!(s.health(), 48);
    }

    #[test]
    fn tenth_hit_scores_at_second_tier() {
        let mut s = state();
        for _ in 0..9 {
            assert_eq!(s.on_hit(false), 50);
        }
        assert_eq!(s.on_hit(false), 100);
        assert_eq!(s.multiplier(), 2);
    }

    #[test]
    fn health_caps_and_fails() {
        let mut s = state();
        for _ in 0..40 {
            s.on_hit(false);
        }
        assert_eq!(s.health(), 100);

        let mut misses = 0;
        while !s.on_miss() {
            misses += 1;
        }
        // 100 -> 4 after 12 misses, the 13th fails
        assert_eq!(misses, 12);
        assert_eq!(s.health(), 0);
        assert!(s.is_failed());

        let score = s.score();
        assert_eq!(s.on_hit(true), 0);
        assert_eq!(s.score(), score);
        assert!(!s.on_miss());
    }

    #[test]
    fn boost_below_threshold_is_noop() {
        let mut s = state();
        for _ in 0..9 {
            s.on_hit(true);
        }
        assert_eq!(s.boost_charge(), 45.0);
        assert!(!s.activate_boost());
        assert!(!s.is_boost_active());
    }

    #[test]
    fn boost_drains_and_clears() {
        let mut s = state();
        for _ in 0..10 {
            s.on_hit(true);
        }
        assert!(s.activate_boost());
        assert!(!s.activate_boost());
        assert_eq!(s.snapshot().multiplier, 4);

        let mut last = s.boost_charge();
        let mut ticks = 0;
        while s.is_boost_active() {
            s.drain_boost(0.5);
            assert!(s.boost_charge() < last);
            last = s.boost_charge();
            ticks += 1;
        }
        // 50 charge at 12.5 per second
        assert_eq!(ticks, 8);
        assert_eq!(s.boost_charge(), 0.0);
        assert_eq!(s.snapshot().multiplier, 2);
    }

    #[test]
    fn boost_doubles_points() {
        let mut s = state();
        for _ in 0..10 {
            s.on_hit(true);
        }
        s.activate_boost();
        assert_eq!(s.on_hit(false), 200);
        assert_eq!(s.award_sustain(), 2);
    }

    #[test]
    fn sustain_leaves_combo_alone() {
        let mut s = state();
        s.on_hit(false);
        s.award_sustain();
        s.award_sustain();
        assert_eq!(s.combo(), 1);
        assert_eq!(s.multiplier(), 1);
        assert_eq!(s.score(), 52);
    }

    #[test]
    fn extreme_values_saturate() {
        let mut config = RuleConfig {
            health_gain: u32::MAX,
            base_note_value: u64::MAX,
            ..Default::default()
        };
        assert!(matches!(
            ScoringState::new(&config),
            Err(RuleError::TooLarge { name: "healthGain", .. })
        ));

        config.validate();
        let mut s = ScoringState::new(&config).unwrap();
        assert_eq!(s.on_hit(false), u64::MAX);
        s.on_hit(false);
        assert_eq!(s.score(), u64::MAX);
        assert_eq!(s.health(), METER_MAX);
    }
}
