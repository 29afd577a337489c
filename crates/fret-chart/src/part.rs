use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Instrument a difficulty track belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Instrument {
    Guitar,
    Bass,
    Rhythm,
    Keys,
}

impl Instrument {
    pub fn all() -> &'static [Instrument] {
        &[
            Instrument::Guitar,
            Instrument::Bass,
            Instrument::Rhythm,
            Instrument::Keys,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Guitar => "Guitar",
            Self::Bass => "Bass",
            Self::Rhythm => "Rhythm",
            Self::Keys => "Keys",
        }
    }

    /// Instrument for a text chart section suffix (`Single`, `DoubleBass`, ...)
    pub fn from_section_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "Single" => Some(Self::Guitar),
            "DoubleBass" | "Bass" => Some(Self::Bass),
            "DoubleRhythm" => Some(Self::Rhythm),
            "Keyboard" => Some(Self::Keys),
            _ => None,
        }
    }

    /// Instrument for a MIDI track name (`PART GUITAR`, ...)
    pub fn from_track_name(name: &str) -> Option<Self> {
        match name.trim() {
            "PART GUITAR" => Some(Self::Guitar),
            "PART BASS" => Some(Self::Bass),
            "PART RHYTHM" => Some(Self::Rhythm),
            "PART KEYS" => Some(Self::Keys),
            _ => None,
        }
    }
}

/// Difficulty level, ordered hardest first (the display order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Difficulty {
    Expert,
    Hard,
    Medium,
    Easy,
}

impl Difficulty {
    pub fn all() -> &'static [Difficulty] {
        &[
            Difficulty::Expert,
            Difficulty::Hard,
            Difficulty::Medium,
            Difficulty::Easy,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Expert => "Expert",
            Self::Hard => "Hard",
            Self::Medium => "Medium",
            Self::Easy => "Easy",
        }
    }

    /// First MIDI pitch of this difficulty's five-lane range.
    pub fn midi_base_pitch(&self) -> u8 {
        match self {
            Self::Easy => 60,
            Self::Medium => 72,
            Self::Hard => 84,
            Self::Expert => 96,
        }
    }

    /// Difficulty and lane for a MIDI pitch, if it falls in a lane range.
    pub fn from_midi_pitch(pitch: u8) -> Option<(Self, u8)> {
        Self::all().iter().find_map(|&d| {
            let base = d.midi_base_pitch();
            (base..base + crate::LANE_COUNT as u8)
                .contains(&pitch)
                .then(|| (d, pitch - base))
        })
    }
}

/// Canonical `"Instrument - Difficulty"` key of a difficulty track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PartKey {
    pub instrument: Instrument,
    pub difficulty: Difficulty,
}

impl PartKey {
    pub fn new(instrument: Instrument, difficulty: Difficulty) -> Self {
        Self {
            instrument,
            difficulty,
        }
    }

    /// Map a text chart section header such as `[ExpertSingle]`.
    ///
    /// Unrecognized headers return `None` and their section is skipped.
    pub fn from_section_header(header: &str) -> Option<Self> {
        let name = header.strip_prefix('[')?.strip_suffix(']')?;
        Difficulty::all().iter().find_map(|&difficulty| {
            let suffix = name.strip_prefix(difficulty.name())?;
            let instrument = Instrument::from_section_suffix(suffix)?;
            Some(Self::new(instrument, difficulty))
        })
    }
}

impl fmt::Display for PartKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.instrument.name(), self.difficulty.name())
    }
}

impl FromStr for PartKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (instrument, difficulty) = s
            .split_once(" - ")
            .ok_or_else(|| format!("expected \"Instrument - Difficulty\", got {s:?}"))?;
        let instrument = Instrument::all()
            .iter()
            .copied()
            .find(|i| i.name().eq_ignore_ascii_case(instrument.trim()))
            .ok_or_else(|| format!("unknown instrument: {instrument}"))?;
        let difficulty = Difficulty::all()
            .iter()
            .copied()
            .find(|d| d.name().eq_ignore_ascii_case(difficulty.trim()))
            .ok_or_else(|| format!("unknown difficulty: {difficulty}"))?;
        Ok(Self::new(instrument, difficulty))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_header_mapping() {
        assert_eq!(
            PartKey::from_section_header("[ExpertSingle]"),
            Some(PartKey::new(Instrument::Guitar, Difficulty::Expert))
        );
        assert_eq!(
            PartKey::from_section_header("[HardBass]"),
            Some(PartKey::new(Instrument::Bass, Difficulty::Hard))
        );
        assert_eq!(
            PartKey::from_section_header("[EasyDoubleBass]"),
            Some(PartKey::new(Instrument::Bass, Difficulty::Easy))
        );
        assert_eq!(
            PartKey::from_section_header("[MediumKeyboard]"),
            Some(PartKey::new(Instrument::Keys, Difficulty::Medium))
        );
        assert_eq!(PartKey::from_section_header("[ExpertDrums]"), None);
        assert_eq!(PartKey::from_section_header("[SyncTrack]"), None);
    }

    #[test]
    fn test_display_and_parse() {
        let key = PartKey::new(Instrument::Guitar, Difficulty::Expert);
        assert_eq!(key.to_string(), "Guitar - Expert");
        assert_eq!("Guitar - Expert".parse::<PartKey>(), Ok(key));
        assert_eq!("bass - hard".parse::<PartKey>().map(|k| k.to_string()).as_deref(), Ok("Bass - Hard"));
        assert!("Guitar Expert".parse::<PartKey>().is_err());
        assert!("Drums - Expert".parse::<PartKey>().is_err());
    }

    #[test]
    fn test_midi_pitch_ranges() {
        assert_eq!(Difficulty::from_midi_pitch(96), Some((Difficulty::Expert, 0)));
        assert_eq!(Difficulty::from_midi_pitch(100), Some((Difficulty::Expert, 4)));
        assert_eq!(Difficulty::from_midi_pitch(101), None);
        assert_eq!(Difficulty::from_midi_pitch(62), Some((Difficulty::Easy, 2)));
        assert_eq!(Difficulty::from_midi_pitch(116), None);
    }
}
