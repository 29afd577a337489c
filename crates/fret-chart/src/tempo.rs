use serde::{Deserialize, Serialize};

use crate::error::ChartError;

/// Ticks per quarter note used when a chart does not declare its own.
pub const DEFAULT_RESOLUTION: u32 = 192;

/// BPM assumed when a chart has no tempo events at all.
pub const DEFAULT_BPM: f64 = 120.0;

/// Tempo change as read from a chart, before accumulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TempoEvent {
    pub tick: u64,
    pub bpm: f64,
}

impl TempoEvent {
    pub fn new(tick: u64, bpm: f64) -> Self {
        Self { tick, bpm }
    }
}

/// A point in the chart where the tempo is known together with the
/// absolute time already elapsed at that tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TempoCheckpoint {
    pub tick: u64,
    pub time_seconds: f64,
    pub bpm: f64,
}

/// Tick to seconds conversion table.
///
/// Checkpoints are strictly increasing in tick and the first one is always
/// at tick 0, so `to_seconds` is defined for every tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TempoMap {
    resolution: u32,
    checkpoints: Vec<TempoCheckpoint>,
}

impl TempoMap {
    /// Build the checkpoint table from unsorted tempo events.
    ///
    /// Events are stably sorted by tick. Several events on the same tick
    /// collapse into one checkpoint, the last one in source order winning.
    pub fn build(resolution: u32, events: &[TempoEvent]) -> Result<Self, ChartError> {
        if resolution == 0 {
            return Err(ChartError::InvalidResolution(0));
        }
        if let Some(bad) = events.iter().find(|e| !(e.bpm.is_finite() && e.bpm > 0.0)) {
            return Err(ChartError::InvalidTempo {
                tick: bad.tick,
                bpm: bad.bpm,
            });
        }

        let mut sorted = events.to_vec();
        sorted.sort_by_key(|e| e.tick);

        let initial_bpm = sorted.first().map(|e| e.bpm).unwrap_or(DEFAULT_BPM);
        let mut checkpoints = vec![TempoCheckpoint {
            tick: 0,
            time_seconds: 0.0,
            bpm: initial_bpm,
        }];

        for event in sorted {
            // The table always holds the tick-0 checkpoint, so last() is Some.
            let Some(last) = checkpoints.last_mut() else {
                break;
            };
            if event.tick == last.tick {
                last.bpm = event.bpm;
                continue;
            }
            let elapsed = Self::span_seconds(event.tick - last.tick, resolution, last.bpm);
            let time_seconds = last.time_seconds + elapsed;
            checkpoints.push(TempoCheckpoint {
                tick: event.tick,
                time_seconds,
                bpm: event.bpm,
            });
        }

        Ok(Self {
            resolution,
            checkpoints,
        })
    }

    /// Convert an absolute tick to seconds from the start of the chart.
    pub fn to_seconds(&self, tick: u64) -> f64 {
        let idx = self
            .checkpoints
            .partition_point(|c| c.tick <= tick)
            .saturating_sub(1);
        let cp = &self.checkpoints[idx];
        cp.time_seconds + Self::span_seconds(tick - cp.tick, self.resolution, cp.bpm)
    }

    /// BPM in effect at the given tick.
    pub fn bpm_at(&self, tick: u64) -> f64 {
        let idx = self
            .checkpoints
            .partition_point(|c| c.tick <= tick)
            .saturating_sub(1);
        self.checkpoints[idx].bpm
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn checkpoints(&self) -> &[TempoCheckpoint] {
        &self.checkpoints
    }

    fn span_seconds(ticks: u64, resolution: u32, bpm: f64) -> f64 {
        (ticks as f64 / resolution as f64) * (60.0 / bpm)
    }
}
