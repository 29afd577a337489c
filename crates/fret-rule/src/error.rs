use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum RuleError {
    #[error("Multiplier table is empty")]
    EmptyMultiplierTable,

    #[error("Multiplier table must be non-decreasing and start at 1 or more: {0:?}")]
    InvalidMultiplierTable(Vec<u32>),

    #[error("Notes per multiplier tier must be positive")]
    ZeroNotesPerTier,

    #[error("{name} must be a positive number of seconds, got {value}")]
    InvalidDuration { name: &'static str, value: f64 },

    #[error("{name} must be within 1..={max}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: u32,
        max: u32,
    },

    #[error("{name} must be at most {max}, got {value}")]
    TooLarge {
        name: &'static str,
        value: u32,
        max: u32,
    },
}
