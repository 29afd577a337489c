use fret_chart::LANE_COUNT;
use fret_rule::ScoringState;

#[derive(Debug, Clone, Copy, PartialEq)]
struct ActiveSustain {
    note: usize,
    end_time: f64,
}

/// Per-lane continuous scoring of held long notes.
#[derive(Debug, Clone)]
pub struct SustainScorer {
    threshold: f64,
    lanes: [Option<ActiveSustain>; LANE_COUNT],
}

impl SustainScorer {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            lanes: [None; LANE_COUNT],
        }
    }

    /// Start sustaining a just-hit note if it is long enough.
    /// Replaces any sustain already active in that lane.
    pub fn begin(&mut self, lane: u8, note: usize, time: f64, duration: f64) -> bool {
        let Some(slot) = self.lanes.get_mut(usize::from(lane)) else {
            return false;
        };
        if duration <= self.threshold {
            return false;
        }
        *slot = Some(ActiveSustain {
            note,
            end_time: time + duration,
        });
        true
    }

    /// End the lane's sustain. Returns the note it was sustaining.
    pub fn release(&mut self, lane: u8) -> Option<usize> {
        self.lanes
            .get_mut(usize::from(lane))
            .and_then(Option::take)
            .map(|s| s.note)
    }

    /// Award one tick for every lane still held before its note end.
    /// Sustains that were released or ran out are dropped without penalty.
    pub fn tick(&mut self, now: f64, held: &[bool; LANE_COUNT], scoring: &mut ScoringState) -> u64 {
        let mut points = 0;
        for (lane, slot) in self.lanes.iter_mut().enumerate() {
            let Some(active) = *slot else {
                continue;
            };
            if !held[lane] || now >= active.end_time {
                *slot = None;
                continue;
            }
            points += scoring.award_sustain();
        }
        points
    }

    pub fn clear(&mut self) {
        self.lanes = [None; LANE_COUNT];
    }

    pub fn active_note(&self, lane: u8) -> Option<usize> {
        self.lanes
            .get(usize::from(lane))
            .copied()
            .flatten()
            .map(|s| s.note)
    }

    pub fn is_active(&self, lane: u8) -> bool {
        self.active_note(lane).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fret_rule::RuleConfig;

    fn scoring() -> ScoringState {
        ScoringState::new(&RuleConfig::default()).unwrap()
    }

    #[test]
    fn short_notes_do_not_sustain() {
        let mut sustain = SustainScorer::new(0.1);
        assert!(!sustain.begin(0, 0, 1.0, 0.1));
        assert!(!sustain.is_active(0));
        assert!(sustain.begin(0, 0, 1.0, 0.5));
        assert_eq!(sustain.active_note(0), Some(0));
        assert!(!sustain.begin(9, 1, 1.0, 0.5));
    }

    #[test]
    fn awards_while_held_until_end() {
        let mut sustain = SustainScorer::new(0.1);
        let mut scoring = scoring();
        let mut held = [false; LANE_COUNT];
        held[2] = true;
        sustain.begin(2, 4, 1.0, 0.5);

        assert_eq!(sustain.tick(1.1, &held, &mut scoring), 1);
        assert_eq!(sustain.tick(1.4, &held, &mut scoring), 1);
        assert_eq!(sustain.tick(1.5, &held, &mut scoring), 0);
        assert!(!sustain.is_active(2));
        assert_eq!(scoring.score(), 2);
    }

    #[test]
    fn release_ends_without_penalty() {
        let mut sustain = SustainScorer::new(0.1);
        let mut scoring = scoring();
        scoring.on_hit(false);
        let held = [false; LANE_COUNT];
        sustain.begin(1, 0, 0.0, 2.0);

        assert_eq!(sustain.tick(0.5, &held, &mut scoring), 0);
        assert!(!sustain.is_active(1));
        assert_eq!(scoring.combo(), 1);
        assert_eq!(scoring.multiplier(), 1);

        sustain.begin(1, 0, 0.0, 2.0);
        assert_eq!(sustain.release(1), Some(0));
        assert_eq!(sustain.release(1), None);
    }
}
