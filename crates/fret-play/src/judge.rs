use fret_chart::{LANE_COUNT, Note};

use crate::state::PlayState;

/// Symmetric hit window judge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitJudge {
    hit_window: f64,
}

impl HitJudge {
    pub fn new(hit_window: f64) -> Self {
        Self { hit_window }
    }

    pub fn hit_window(&self) -> f64 {
        self.hit_window
    }

    /// `time_diff` is `note.time - now`.
    pub fn is_in_window(&self, time_diff: f64) -> bool {
        time_diff.abs() <= self.hit_window
    }

    pub fn is_missed(&self, time_diff: f64) -> bool {
        time_diff < -self.hit_window
    }

    /// Best open note in one lane for a press at `now`.
    ///
    /// `lane_notes` holds the lane's note indices in time order. The closest
    /// note wins; equal distances go to the earlier note.
    pub fn select(
        &self,
        notes: &[Note],
        lane_notes: &[usize],
        state: &PlayState,
        now: f64,
    ) -> Option<usize> {
        let first = lane_notes.partition_point(|&i| now - notes[i].time > self.hit_window);
        let mut best: Option<(usize, f64)> = None;
        for &i in &lane_notes[first..] {
            let diff = notes[i].time - now;
            if diff > self.hit_window {
                break;
            }
            if !self.is_in_window(diff) || !state.get(i).is_some_and(|s| s.is_open()) {
                continue;
            }
            if best.is_none_or(|(_, d)| diff.abs() < d) {
                best = Some((i, diff.abs()));
            }
        }
        best.map(|(i, _)| i)
    }
}

/// Note indices per lane, each list in time order.
pub fn lane_index(notes: &[Note]) -> [Vec<usize>; LANE_COUNT] {
    let mut lanes: [Vec<usize>; LANE_COUNT] = Default::default();
    for (i, note) in notes.iter().enumerate() {
        if let Some(lane) = lanes.get_mut(usize::from(note.lane)) {
            lane.push(i);
        }
    }
    lanes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(time: f64, lane: u8) -> Note {
        Note {
            time,
            lane,
            duration: 0.0,
            is_boost: false,
        }
    }

    #[test]
    fn window_edges() {
        let judge = HitJudge::new(0.085);
        assert!(judge.is_in_window(0.085));
        assert!(judge.is_in_window(-0.085));
        assert!(!judge.is_in_window(0.0851));
        assert!(judge.is_missed(-0.086));
        assert!(!judge.is_missed(-0.085));
    }

    #[test]
    fn picks_closest_note_in_lane() {
        let notes = vec![note(1.0, 0), note(1.05, 1), note(1.1, 0)];
        let lanes = lane_index(&notes);
        let state = PlayState::new(notes.len());
        let judge = HitJudge::new(0.085);

        assert_eq!(judge.select(&notes, &lanes[0], &state, 1.08), Some(2));
        assert_eq!(judge.select(&notes, &lanes[0], &state, 1.02), Some(0));
        assert_eq!(judge.select(&notes, &lanes[1], &state, 1.2), None);
        assert_eq!(judge.select(&notes, &lanes[2], &state, 1.0), None);
    }

    #[test]
    fn equidistant_goes_to_earlier_note() {
        let notes = vec![note(1.0, 3), note(1.125, 3)];
        let lanes = lane_index(&notes);
        let state = PlayState::new(notes.len());
        let judge = HitJudge::new(0.085);
        assert_eq!(judge.select(&notes, &lanes[3], &state, 1.0625), Some(0));
    }

    #[test]
    fn exact_tie_on_same_time() {
        let notes = vec![note(2.0, 1), note(2.0, 1)];
        let lanes = lane_index(&notes);
        let state = PlayState::new(notes.len());
        let judge = HitJudge::new(0.085);
        assert_eq!(judge.select(&notes, &lanes[1], &state, 2.01), Some(0));
    }

    #[test]
    fn late_edge_agrees_with_window() {
        let judge = HitJudge::new(0.085);
        for time in [0.02, 0.1, 0.3, 1.7, 12.345] {
            let notes = vec![note(time, 0)];
            let lanes = lane_index(&notes);
            let state = PlayState::new(notes.len());
            for now in [time + 0.085, time - 0.085, time + 0.0849, time + 0.0851] {
                assert_eq!(
                    judge.select(&notes, &lanes[0], &state, now).is_some(),
                    judge.is_in_window(time - now),
                    "note at {time}, press at {now}"
                );
            }
        }
    }

    #[test]
    fn resolved_notes_are_skipped() {
        let notes = vec![note(1.0, 0), note(1.05, 0)];
        let lanes = lane_index(&notes);
        let mut state = PlayState::new(notes.len());
        let judge = HitJudge::new(0.085);
        state.set_hit(0);
        assert_eq!(judge.select(&notes, &lanes[0], &state, 1.0), Some(1));
        state.set_missed(1);
        assert_eq!(judge.select(&notes, &lanes[0], &state, 1.0), None);
    }
}
