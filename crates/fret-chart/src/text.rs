use std::borrow::Cow;
use std::str::FromStr;

use crate::error::ChartError;
use crate::note::{BoostPhrase, RawNote};
use crate::part::PartKey;
use crate::raw::{RawChart, RawChartSource};
use crate::tempo::{DEFAULT_RESOLUTION, TempoEvent};

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// `S` event kind that marks a boost phrase
const BOOST_PHRASE_KIND: &str = "2";

/// Decoder for the line-oriented `.chart` text format.
pub struct TextChartDecoder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Song,
    SyncTrack,
    Part(PartKey),
    Other,
}

impl Section {
    fn from_header(header: &str) -> Self {
        match header {
            "[Song]" => Self::Song,
            "[SyncTrack]" => Self::SyncTrack,
            _ => PartKey::from_section_header(header)
                .map(Self::Part)
                .unwrap_or(Self::Other),
        }
    }
}

impl TextChartDecoder {
    pub fn decode_str(content: &str) -> Result<RawChart, ChartError> {
        let mut raw = RawChart::new(DEFAULT_RESOLUTION);
        let mut section = Section::None;

        for (idx, line) in content.lines().enumerate() {
            let line_no = idx + 1;
            let line = line.trim();
            if line.is_empty() || line == "{" || line == "}" {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') {
                section = Section::from_header(line);
                if let Section::Part(key) = section {
                    raw.part_mut(key);
                }
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let (key, value) = (key.trim(), value.trim());

            match section {
                Section::Song => Self::read_song_field(&mut raw, key, value, line_no)?,
                Section::SyncTrack => {
                    let mut args = value.split_whitespace();
                    if args.next() == Some("B") {
                        let tick: u64 = parse_field(key, "tick", line_no)?;
                        let milli_bpm: u64 = parse_field(next_arg(&mut args, line_no)?, "bpm", line_no)?;
                        raw.tempo_events
                            .push(TempoEvent::new(tick, milli_bpm as f64 / 1000.0));
                    }
                }
                Section::Part(part_key) => {
                    let mut args = value.split_whitespace();
                    match args.next() {
                        Some("N") => {
                            let tick: u64 = parse_field(key, "tick", line_no)?;
                            let fret: u32 = parse_field(next_arg(&mut args, line_no)?, "fret", line_no)?;
                            let duration_ticks: u64 =
                                parse_field(next_arg(&mut args, line_no)?, "duration", line_no)?;
                            // Frets past the byte range can never be a lane
                            let Ok(lane) = u8::try_from(fret) else {
                                continue;
                            };
                            raw.part_mut(part_key).notes.push(RawNote {
                                tick,
                                lane,
                                duration_ticks,
                            });
                        }
                        Some("S") => {
                            if next_arg(&mut args, line_no)? != BOOST_PHRASE_KIND {
                                continue;
                            }
                            let tick: u64 = parse_field(key, "tick", line_no)?;
                            let duration: u64 =
                                parse_field(next_arg(&mut args, line_no)?, "duration", line_no)?;
                            raw.part_mut(part_key)
                                .phrases
                                .push(BoostPhrase::new(tick, duration));
                        }
                        _ => {}
                    }
                }
                Section::None | Section::Other => {}
            }
        }

        log::debug!(
            "text chart: resolution {}, {} tempo events, {} parts",
            raw.resolution,
            raw.tempo_events.len(),
            raw.parts.len()
        );
        Ok(raw)
    }

    fn read_song_field(
        raw: &mut RawChart,
        key: &str,
        value: &str,
        line_no: usize,
    ) -> Result<(), ChartError> {
        match key {
            "Resolution" => raw.resolution = parse_field(value, "resolution", line_no)?,
            "Name" => raw.metadata.name = non_empty(unquote(value)),
            "Artist" => raw.metadata.artist = non_empty(unquote(value)),
            "Charter" => raw.metadata.charter = non_empty(unquote(value)),
            _ => {}
        }
        Ok(())
    }
}

impl RawChartSource for TextChartDecoder {
    fn read_raw(&self, bytes: &[u8]) -> Result<RawChart, ChartError> {
        Self::decode_str(&decode_text(bytes))
    }
}

/// Decode chart bytes as UTF-8, falling back to Windows-1252.
fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes.strip_prefix(&UTF8_BOM).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => {
            let (text, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            text
        }
    }
}

fn next_arg<'a>(
    args: &mut impl Iterator<Item = &'a str>,
    line_no: usize,
) -> Result<&'a str, ChartError> {
    args.next().ok_or_else(|| ChartError::Malformed {
        line: line_no,
        reason: "missing event argument".to_string(),
    })
}

fn parse_field<T: FromStr>(value: &str, what: &str, line_no: usize) -> Result<T, ChartError> {
    value.parse().map_err(|_| ChartError::Malformed {
        line: line_no,
        reason: format!("invalid {what}: {value:?}"),
    })
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
