use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::chart::Chart;
use crate::error::ChartError;
use crate::song::{Song, SongInfo};

/// One song of a setlist file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SetlistEntry {
    pub name: String,
    pub artist: String,
    pub chart_url: String,
    pub audio_urls: BTreeMap<String, String>,
    pub album_art_url: Option<String>,
}

impl SetlistEntry {
    pub fn info(&self) -> SongInfo {
        SongInfo {
            name: self.name.clone(),
            artist: self.artist.clone(),
            album_art: self.album_art_url.clone(),
        }
    }
}

pub struct Setlist;

impl Setlist {
    /// Parse a JSON array of setlist entries.
    pub fn parse(json: &str) -> Result<Vec<SetlistEntry>, ChartError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A setlist entry that could not be turned into a song.
#[derive(Debug)]
pub struct Rejected {
    pub entry: SetlistEntry,
    pub error: anyhow::Error,
}

/// Songs that survived loading, sorted by name, plus the rejected entries.
#[derive(Debug, Default)]
pub struct SongLibrary {
    pub songs: Vec<Song>,
    pub rejected: Vec<Rejected>,
}

impl SongLibrary {
    /// Fetch, decode and assemble every entry.
    ///
    /// A failing entry is logged and excluded; it never aborts the batch.
    pub fn load<F>(entries: Vec<SetlistEntry>, mut fetch: F) -> Self
    where
        F: FnMut(&SetlistEntry) -> anyhow::Result<Vec<u8>>,
    {
        let mut library = Self::default();
        for entry in entries {
            match Self::load_one(&entry, &mut fetch) {
                Ok(song) => library.songs.push(song),
                Err(error) => {
                    log::warn!("Skipping song {:?}: {error:#}", entry.name);
                    library.rejected.push(Rejected { entry, error });
                }
            }
        }
        library.songs.sort_by(|a, b| a.info.name.cmp(&b.info.name));
        log::info!(
            "Loaded {} songs ({} rejected)",
            library.songs.len(),
            library.rejected.len()
        );
        library
    }

    fn load_one<F>(entry: &SetlistEntry, fetch: &mut F) -> anyhow::Result<Song>
    where
        F: FnMut(&SetlistEntry) -> anyhow::Result<Vec<u8>>,
    {
        let bytes = fetch(entry)?;
        let chart = Chart::decode(&bytes)?;
        let song = Song::assemble(entry.info(), entry.audio_urls.clone(), chart)?;
        Ok(song)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_setlist_fields() {
        let json = r#"[
            {
                "name": "Song A",
                "artist": "Artist A",
                "chartUrl": "songs/a/notes.chart",
                "audioUrls": { "song": "songs/a/song.ogg", "guitar": "songs/a/guitar.ogg" },
                "albumArtUrl": "songs/a/album.png"
            },
            { "name": "Song B", "chartUrl": "songs/b/notes.mid" }
        ]"#;
        let entries = Setlist::parse(json).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].chart_url, "songs/a/notes.chart");
        assert_eq!(entries[0].audio_urls.len(), 2);
        assert_eq!(entries[0].album_art_url.as_deref(), Some("songs/a/album.png"));
        assert!(entries[1].audio_urls.is_empty());
        assert_eq!(entries[1].artist, "");
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        assert!(matches!(
            Setlist::parse("{ not json"),
            Err(ChartError::Setlist(_))
        ));
    }
}
