use serde::{Deserialize, Serialize};

/// A playable note after tempo conversion.
///
/// Timing fields never change after decode. Per-playthrough state lives in
/// the playback session, not here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Absolute playback time in seconds
    pub time: f64,
    /// Lane index (0-4)
    pub lane: u8,
    /// Sustain length in seconds (0 for a tap)
    pub duration: f64,
    /// Whether the note lies inside a boost phrase
    pub is_boost: bool,
}

impl Note {
    pub fn end_time(&self) -> f64 {
        self.time + self.duration
    }
}

/// Note as read from a chart, still in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNote {
    pub tick: u64,
    /// Raw fret/lane number; values above 4 are non-gameplay lanes
    pub lane: u8,
    pub duration_ticks: u64,
}

/// Boost phrase covering `[start_tick, end_tick)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoostPhrase {
    pub start_tick: u64,
    pub end_tick: u64,
}

impl BoostPhrase {
    pub fn new(start_tick: u64, duration_ticks: u64) -> Self {
        Self {
            start_tick,
            end_tick: start_tick.saturating_add(duration_ticks),
        }
    }

    pub fn contains(&self, tick: u64) -> bool {
        self.start_tick <= tick && tick < self.end_tick
    }
}
