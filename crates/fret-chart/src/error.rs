use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("Failed to parse MIDI chart: {0}")]
    Midi(#[from] midly::Error),

    #[error("Malformed chart line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("Invalid resolution: {0}")]
    InvalidResolution(u64),

    #[error("Invalid tempo at tick {tick}: {bpm} BPM")]
    InvalidTempo { tick: u64, bpm: f64 },

    #[error("Unsupported MIDI timing: {0}")]
    UnsupportedTiming(String),

    #[error("Chart contains no playable tracks")]
    NoPlayableTracks,

    #[error("Song has no audio stems: {name}")]
    NoAudioStems { name: String },

    #[error("Invalid setlist: {0}")]
    Setlist(#[from] serde_json::Error),
}
