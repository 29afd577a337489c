// Tuning config, multiplier table and the scoring state machine

mod config;
mod error;
mod multiplier;
mod scoring;

pub use config::RuleConfig;
pub use error::RuleError;
pub use multiplier::MultiplierTable;
pub use scoring::{ScoreSnapshot, ScoringState};

/// Upper bound of both health and boost charge.
pub const METER_MAX: u32 = 100;
