use midly::{MetaMessage, MidiMessage, Smf, Timing, Track, TrackEventKind};

use crate::error::ChartError;
use crate::note::{BoostPhrase, RawNote};
use crate::part::{Difficulty, Instrument, PartKey};
use crate::raw::{RawChart, RawChartSource};
use crate::tempo::TempoEvent;

/// Pitch whose note-on/note-off pairs bound a boost phrase
pub const BOOST_PHRASE_PITCH: u8 = 116;

const MICROS_PER_MINUTE: f64 = 60_000_000.0;

/// Decoder for Standard MIDI File charts.
pub struct MidiChartDecoder;

impl MidiChartDecoder {
    fn read_track(raw: &mut RawChart, track: &Track<'_>, index: usize) {
        let name = track.iter().find_map(|event| match event.kind {
            TrackEventKind::Meta(MetaMessage::TrackName(name)) => {
                Some(String::from_utf8_lossy(name).into_owned())
            }
            _ => None,
        });
        let instrument = name.as_deref().and_then(Instrument::from_track_name);
        if index == 0 && instrument.is_none() && raw.metadata.name.is_none() {
            raw.metadata.name = name.clone().filter(|n| !n.trim().is_empty());
        }

        let mut tick: u64 = 0;
        let mut open: [Option<u64>; 128] = [None; 128];
        let mut phrases: Vec<BoostPhrase> = Vec::new();

        for event in track {
            tick += u64::from(event.delta.as_int());
            match event.kind {
                TrackEventKind::Meta(MetaMessage::Tempo(micros)) => {
                    let bpm = MICROS_PER_MINUTE / f64::from(micros.as_int());
                    raw.tempo_events.push(TempoEvent::new(tick, bpm));
                }
                TrackEventKind::Midi { message, .. } => {
                    let Some(instrument) = instrument else {
                        continue;
                    };
                    let (pitch, starts) = match message {
                        MidiMessage::NoteOn { key, vel } => (key.as_int(), vel.as_int() > 0),
                        MidiMessage::NoteOff { key, .. } => (key.as_int(), false),
                        _ => continue,
                    };
                    let slot = &mut open[usize::from(pitch)];
                    if starts {
                        // A retrigger keeps the original start
                        slot.get_or_insert(tick);
                        continue;
                    }
                    let Some(start) = slot.take() else {
                        continue;
                    };
                    let duration_ticks = tick - start;
                    if pitch == BOOST_PHRASE_PITCH {
                        phrases.push(BoostPhrase::new(start, duration_ticks));
                    } else if let Some((difficulty, lane)) = Difficulty::from_midi_pitch(pitch) {
                        raw.part_mut(PartKey::new(instrument, difficulty))
                            .notes
                            .push(RawNote {
                                tick: start,
                                lane,
                                duration_ticks,
                            });
                    }
                }
                _ => {}
            }
        }

        let dangling = open.iter().flatten().count();
        if dangling > 0 {
            log::warn!(
                "track {:?}: dropped {dangling} note-on events without note-off",
                name.as_deref().unwrap_or("")
            );
        }

        if let Some(instrument) = instrument {
            for part in raw
                .parts
                .iter_mut()
                .filter(|p| p.key.instrument == instrument)
            {
                part.phrases.extend_from_slice(&phrases);
            }
        }
    }
}

impl RawChartSource for MidiChartDecoder {
    fn read_raw(&self, bytes: &[u8]) -> Result<RawChart, ChartError> {
        let smf = Smf::parse(bytes)?;
        let resolution = match smf.header.timing {
            Timing::Metrical(ticks) => u32::from(ticks.as_int()),
            Timing::Timecode(fps, subframes) => {
                return Err(ChartError::UnsupportedTiming(format!(
                    "SMPTE {} fps, {subframes} ticks per frame",
                    fps.as_int()
                )));
            }
        };

        let mut raw = RawChart::new(resolution);
        for (index, track) in smf.tracks.iter().enumerate() {
            Self::read_track(&mut raw, track, index);
        }

        log::debug!(
            "midi chart: resolution {}, {} tracks, {} tempo events, {} parts",
            raw.resolution,
            smf.tracks.len(),
            raw.tempo_events.len(),
            raw.parts.len()
        );
        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use midly::num::{u4, u7, u15, u24, u28};
    use midly::{Format, Header, TrackEvent};

    fn meta(delta: u32, message: MetaMessage<'static>) -> TrackEvent<'static> {
        TrackEvent {
            delta: u28::new(delta),
            kind: TrackEventKind::Meta(message),
        }
    }

    fn note(delta: u32, pitch: u8, on: bool) -> TrackEvent<'static> {
        let key = u7::new(pitch);
        let message = if on {
            MidiMessage::NoteOn {
                key,
                vel: u7::new(100),
            }
        } else {
            MidiMessage::NoteOff {
                key,
                vel: u7::new(0),
            }
        };
        TrackEvent {
            delta: u28::new(delta),
            kind: TrackEventKind::Midi {
                channel: u4::new(0),
                message,
            },
        }
    }

    fn write(tracks: Vec<Vec<TrackEvent<'static>>>, resolution: u16) -> Vec<u8> {
        let mut smf = Smf::new(Header::new(
            Format::Parallel,
            Timing::Metrical(u15::new(resolution)),
        ));
        smf.tracks = tracks;
        let mut bytes = Vec::new();
        smf.write_std(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_reads_tempo_notes_and_phrases() {
        let tempo = vec![
            meta(0, MetaMessage::TrackName(b"My Song")),
            meta(0, MetaMessage::Tempo(u24::new(500_000))),
            meta(0, MetaMessage::EndOfTrack),
        ];
        let guitar = vec![
            meta(0, MetaMessage::TrackName(b"PART GUITAR")),
            note(0, BOOST_PHRASE_PITCH, true),
            note(0, 96, true),
            note(0, 60, true),
            note(48, 96, false),
            note(0, 60, false),
            note(144, 100, true),
            note(192, 100, false),
            note(0, BOOST_PHRASE_PITCH, false),
            meta(0, MetaMessage::EndOfTrack),
        ];
        let bytes = write(vec![tempo, guitar], 192);

        let raw = MidiChartDecoder.read_raw(&bytes).unwrap();
        assert_eq!(raw.resolution, 192);
        assert_eq!(raw.metadata.name.as_deref(), Some("My Song"));
        assert_eq!(raw.tempo_events, vec![TempoEvent::new(0, 120.0)]);

        let expert = raw
            .parts
            .iter()
            .find(|p| p.key == PartKey::new(Instrument::Guitar, Difficulty::Expert))
            .unwrap();
        assert_eq!(
            expert.notes,
            vec![
                RawNote {
                    tick: 0,
                    lane: 0,
                    duration_ticks: 48
                },
                RawNote {
                    tick: 192,
                    lane: 4,
                    duration_ticks: 192
                },
            ]
        );
        assert_eq!(expert.phrases, vec![BoostPhrase::new(0, 384)]);

        let easy = raw
            .parts
            .iter()
            .find(|p| p.key == PartKey::new(Instrument::Guitar, Difficulty::Easy))
            .unwrap();
        assert_eq!(easy.notes.len(), 1);
        assert_eq!(easy.phrases.len(), 1);
    }

    #[test]
    fn test_zero_velocity_note_on_ends_note() {
        let bass = vec![
            meta(0, MetaMessage::TrackName(b"PART BASS")),
            note(0, 85, true),
            TrackEvent {
                delta: u28::new(96),
                kind: TrackEventKind::Midi {
                    channel: u4::new(0),
                    message: MidiMessage::NoteOn {
                        key: u7::new(85),
                        vel: u7::new(0),
                    },
                },
            },
            meta(0, MetaMessage::EndOfTrack),
        ];
        let raw = MidiChartDecoder.read_raw(&write(vec![bass], 480)).unwrap();
        assert_eq!(raw.parts.len(), 1);
        assert_eq!(raw.parts[0].key, PartKey::new(Instrument::Bass, Difficulty::Hard));
        assert_eq!(
            raw.parts[0].notes[0],
            RawNote {
                tick: 0,
                lane: 1,
                duration_ticks: 96
            }
        );
    }

    #[test]
    fn test_unnamed_tracks_are_ignored() {
        let drums = vec![
            meta(0, MetaMessage::TrackName(b"PART DRUMS")),
            note(0, 96, true),
            note(10, 96, false),
            meta(0, MetaMessage::EndOfTrack),
        ];
        let raw = MidiChartDecoder.read_raw(&write(vec![drums], 192)).unwrap();
        assert!(raw.parts.is_empty());
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            MidiChartDecoder.read_raw(b"MThd garbage"),
            Err(ChartError::Midi(_))
        ));
    }
}
