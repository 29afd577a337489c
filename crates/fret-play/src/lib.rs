// Playback session: judgment, sustain scoring, clocks and autoplay

mod autoplay;
mod clock;
mod conductor;
pub mod judge;
mod result;
mod session;
mod state;
mod sustain;

pub use autoplay::AutoPlayer;
pub use clock::{ManualClock, PlaybackClock, SystemClock};
pub use conductor::Conductor;
pub use judge::HitJudge;
pub use result::{PlayOutcome, PlaySummary};
pub use session::{InputEvent, InputResponse, PlaybackSession, SessionPhase, VisibleNote};
pub use state::{NoteStatus, PlayState};
pub use sustain::SustainScorer;
