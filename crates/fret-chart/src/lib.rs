// Chart data model: tempo map, text and MIDI front ends, song assembly

mod chart;
mod error;
mod midi;
mod note;
mod part;
mod raw;
mod setlist;
mod song;
pub mod tempo;
mod text;

pub use chart::{Chart, ChartFormat, ChartMetadata, Track};
pub use error::ChartError;
pub use midi::{BOOST_PHRASE_PITCH, MidiChartDecoder};
pub use note::{BoostPhrase, Note, RawNote};
pub use part::{Difficulty, Instrument, PartKey};
pub use raw::{RawChart, RawChartSource, RawPart};
pub use setlist::{Rejected, Setlist, SetlistEntry, SongLibrary};
pub use song::{Song, SongInfo};
pub use tempo::{TempoCheckpoint, TempoEvent, TempoMap};
pub use text::TextChartDecoder;

/// Number of playable lanes per difficulty track.
pub const LANE_COUNT: usize = 5;
