use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::chart::Chart;
use crate::error::ChartError;

/// Display information of a song.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongInfo {
    pub name: String,
    pub artist: String,
    pub album_art: Option<String>,
}

/// A playable song: decoded chart plus the audio stems the host plays.
#[derive(Debug, Clone, PartialEq)]
pub struct Song {
    pub info: SongInfo,
    /// Stem name to location, handed to the host audio layer untouched
    pub audio_stems: BTreeMap<String, String>,
    pub chart: Chart,
}

impl Song {
    /// Combine a decoded chart with its stems. A song without stems has
    /// nothing to play against and is rejected.
    pub fn assemble(
        mut info: SongInfo,
        audio_stems: BTreeMap<String, String>,
        chart: Chart,
    ) -> Result<Self, ChartError> {
        if audio_stems.is_empty() {
            return Err(ChartError::NoAudioStems { name: info.name });
        }
        if info.name.is_empty() {
            info.name = chart.metadata.name.clone().unwrap_or_default();
        }
        if info.artist.is_empty() {
            info.artist = chart.metadata.artist.clone().unwrap_or_default();
        }
        Ok(Self {
            info,
            audio_stems,
            chart,
        })
    }
}
