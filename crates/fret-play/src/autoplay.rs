use crate::result::PlaySummary;
use crate::session::{InputEvent, PlaybackSession};

/// Simulated player for autoplay runs and benchmarks.
///
/// Presses every chosen note exactly on time, holds sustains to their end
/// and, when enabled, activates boost as soon as enough charge is stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoPlayer {
    /// Scheduler ticks per second
    pub fps: f64,
    /// Fraction of notes to hit, spread evenly over the track
    pub accuracy: f64,
    pub use_boost: bool,
}

impl Default for AutoPlayer {
    fn default() -> Self {
        Self {
            fps: 60.0,
            accuracy: 1.0,
            use_boost: true,
        }
    }
}

impl AutoPlayer {
    /// Whether the `index`-th note is played at the configured accuracy.
    fn plays(&self, index: usize) -> bool {
        let accuracy = self.accuracy.clamp(0.0, 1.0);
        ((index + 1) as f64 * accuracy).floor() > (index as f64 * accuracy).floor()
    }

    /// Play a `Ready` session to its end and return the summary.
    pub fn run(&self, session: &mut PlaybackSession<'_>) -> PlaySummary {
        let track = session.track();
        let notes = &track.notes;
        let frame = 1.0 / self.fps.max(1.0);
        let deadline = track.end_time() + session.config().hit_window + 1.0;
        let boost_threshold = f64::from(session.config().boost_activation_threshold);

        let mut releases: Vec<(f64, u8)> = Vec::new();
        let mut next_note = 0;
        let mut frame_no: u64 = 0;
        session.start(0.0);

        while !session.phase().is_terminal() {
            frame_no += 1;
            let now = frame_no as f64 * frame;
            if now > deadline {
                session.finish();
                break;
            }

            let mut events: Vec<(f64, InputEvent)> = Vec::new();
            releases.retain(|&(at, lane)| {
                let due = at <= now;
                if due {
                    events.push((at, InputEvent::LaneRelease(lane)));
                }
                !due
            });
            while next_note < notes.len() && notes[next_note].time <= now {
                let note = &notes[next_note];
                if self.plays(next_note) {
                    events.push((note.time, InputEvent::LanePress(note.lane)));
                    if note.duration > session.config().sustain_threshold {
                        releases.push((note.end_time(), note.lane));
                    } else {
                        events.push((note.time, InputEvent::LaneRelease(note.lane)));
                    }
                }
                next_note += 1;
            }
            events.sort_by(|a, b| a.0.total_cmp(&b.0));
            for (at, event) in events {
                session.handle_input(event, at);
            }

            session.tick(now);

            if self.use_boost {
                let snapshot = session.snapshot();
                if !snapshot.boost_active && snapshot.boost_charge >= boost_threshold {
                    session.handle_input(InputEvent::BoostActivate, now);
                }
            }
        }

        log::debug!("Autoplay finished after {frame_no} frames");
        session.summary()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accuracy_spreads_hits_evenly() {
        let player = AutoPlayer {
            accuracy: 0.5,
            ..Default::default()
        };
        let plays: Vec<bool> = (0..6).map(|i| player.plays(i)).collect();
        assert_eq!(plays, vec![false, true, false, true, false, true]);

        let perfect = AutoPlayer::default();
        assert!((0..100).all(|i| perfect.plays(i)));

        let none = AutoPlayer {
            accuracy: 0.0,
            ..Default::default()
        };
        assert!((0..100).all(|i| !none.plays(i)));
    }
}
