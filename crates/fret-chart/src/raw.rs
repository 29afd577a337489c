use crate::chart::ChartMetadata;
use crate::error::ChartError;
use crate::note::{BoostPhrase, RawNote};
use crate::part::PartKey;
use crate::tempo::TempoEvent;

/// Notes and boost phrases of one difficulty track, still in ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPart {
    pub key: PartKey,
    pub notes: Vec<RawNote>,
    pub phrases: Vec<BoostPhrase>,
}

impl RawPart {
    pub fn new(key: PartKey) -> Self {
        Self {
            key,
            notes: Vec::new(),
            phrases: Vec::new(),
        }
    }
}

/// Everything a front end extracts from a chart before tempo conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct RawChart {
    pub metadata: ChartMetadata,
    pub resolution: u32,
    pub tempo_events: Vec<TempoEvent>,
    pub parts: Vec<RawPart>,
}

impl RawChart {
    pub fn new(resolution: u32) -> Self {
        Self {
            metadata: ChartMetadata::default(),
            resolution,
            tempo_events: Vec::new(),
            parts: Vec::new(),
        }
    }

    /// Part for `key`, created on first use. Parts keep first-seen order.
    pub fn part_mut(&mut self, key: PartKey) -> &mut RawPart {
        let idx = match self.parts.iter().position(|p| p.key == key) {
            Some(idx) => idx,
            None => {
                self.parts.push(RawPart::new(key));
                self.parts.len() - 1
            }
        };
        &mut self.parts[idx]
    }
}

/// A chart front end: turns one encoding into a [`RawChart`].
pub trait RawChartSource {
    fn read_raw(&self, bytes: &[u8]) -> Result<RawChart, ChartError>;
}
