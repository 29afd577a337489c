use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::LANE_COUNT;
use crate::error::ChartError;
use crate::midi::MidiChartDecoder;
use crate::note::Note;
use crate::part::{Difficulty, Instrument, PartKey};
use crate::raw::{RawChart, RawChartSource, RawPart};
use crate::tempo::TempoMap;
use crate::text::TextChartDecoder;

const MIDI_MAGIC: &[u8] = b"MThd";

/// Song fields a chart may carry about itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartMetadata {
    pub name: Option<String>,
    pub artist: Option<String>,
    pub charter: Option<String>,
}

/// Source encoding of a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartFormat {
    Text,
    Midi,
}

impl ChartFormat {
    pub fn detect(bytes: &[u8]) -> Self {
        if bytes.starts_with(MIDI_MAGIC) {
            Self::Midi
        } else {
            Self::Text
        }
    }

    pub fn source(&self) -> &'static dyn RawChartSource {
        match self {
            Self::Text => &TextChartDecoder,
            Self::Midi => &MidiChartDecoder,
        }
    }
}

/// One playable difficulty track, notes sorted by time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub notes: Vec<Note>,
    pub total_notes: usize,
}

impl Track {
    pub fn new(notes: Vec<Note>) -> Self {
        let total_notes = notes
            .iter()
            .filter(|n| usize::from(n.lane) < LANE_COUNT)
            .count();
        Self { notes, total_notes }
    }

    /// Time of the last note end, 0 for an empty track.
    pub fn end_time(&self) -> f64 {
        self.notes
            .iter()
            .map(Note::end_time)
            .fold(0.0, f64::max)
    }
}

/// A decoded chart: tempo map plus every playable difficulty track.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub metadata: ChartMetadata,
    pub tempo_map: TempoMap,
    tracks: BTreeMap<PartKey, Track>,
}

impl Chart {
    /// Decode chart bytes, picking the front end from the leading bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, ChartError> {
        let format = ChartFormat::detect(bytes);
        let raw = format.source().read_raw(bytes)?;
        Self::from_raw(raw)
    }

    /// Shared finishing step for both front ends.
    pub fn from_raw(raw: RawChart) -> Result<Self, ChartError> {
        let tempo_map = TempoMap::build(raw.resolution, &raw.tempo_events)?;

        let mut tracks = BTreeMap::new();
        for part in raw.parts {
            let key = part.key;
            let notes = Self::finish_part(&tempo_map, part);
            if notes.is_empty() {
                log::debug!("{key}: no playable notes, skipped");
                continue;
            }
            tracks.insert(key, Track::new(notes));
        }

        if tracks.is_empty() {
            return Err(ChartError::NoPlayableTracks);
        }

        Ok(Self {
            metadata: raw.metadata,
            tempo_map,
            tracks,
        })
    }

    fn finish_part(tempo_map: &TempoMap, part: RawPart) -> Vec<Note> {
        let mut notes: Vec<Note> = part
            .notes
            .iter()
            .filter(|raw| usize::from(raw.lane) < LANE_COUNT)
            .map(|raw| {
                let time = tempo_map.to_seconds(raw.tick);
                let end = tempo_map.to_seconds(raw.tick.saturating_add(raw.duration_ticks));
                Note {
                    time,
                    lane: raw.lane,
                    duration: end - time,
                    is_boost: part.phrases.iter().any(|p| p.contains(raw.tick)),
                }
            })
            .collect();
        // sort_by is stable, so simultaneous notes keep source order
        notes.sort_by(|a, b| a.time.total_cmp(&b.time));
        notes
    }

    pub fn track(&self, key: &PartKey) -> Option<&Track> {
        self.tracks.get(key)
    }

    pub fn tracks(&self) -> impl Iterator<Item = (&PartKey, &Track)> {
        self.tracks.iter()
    }

    /// Difficulties per instrument, hardest first.
    pub fn available_parts(&self) -> BTreeMap<Instrument, Vec<Difficulty>> {
        let mut parts: BTreeMap<Instrument, Vec<Difficulty>> = BTreeMap::new();
        for key in self.tracks.keys() {
            parts.entry(key.instrument).or_default().push(key.difficulty);
        }
        parts
    }
}
