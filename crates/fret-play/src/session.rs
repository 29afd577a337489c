use fret_chart::{LANE_COUNT, Note, Track};
use fret_rule::{RuleConfig, RuleError, ScoreSnapshot, ScoringState};
use serde::{Deserialize, Serialize};

use crate::judge::{HitJudge, lane_index};
use crate::result::{PlayOutcome, PlaySummary};
use crate::state::{NoteStatus, PlayState};
use crate::sustain::SustainScorer;

/// Lifecycle of one playthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    Ready,
    Playing,
    Paused,
    Finished,
    Failed,
    Cancelled,
}

impl SessionPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Failed | Self::Cancelled)
    }
}

/// Player input, already mapped from the device to lanes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    LanePress(u8),
    LaneRelease(u8),
    BoostActivate,
}

/// What an input event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputResponse {
    Hit { note: usize, points: u64 },
    BoostActivated,
    Ignored,
}

/// A note the host should currently draw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisibleNote {
    pub index: usize,
    pub lane: u8,
    pub time: f64,
    pub duration: f64,
    pub is_boost: bool,
    pub status: NoteStatus,
    /// A hit long note whose lane is still being held
    pub sustaining: bool,
}

/// One playthrough of one difficulty track.
///
/// The track is borrowed read-only; all mutable state (note statuses,
/// scoring, held lanes, sustains) lives here, so a fresh session can be
/// started from the same chart at any time.
pub struct PlaybackSession<'a> {
    track: &'a Track,
    config: RuleConfig,
    judge: HitJudge,
    lanes: [Vec<usize>; LANE_COUNT],
    state: PlayState,
    scoring: ScoringState,
    sustain: SustainScorer,
    held: [bool; LANE_COUNT],
    phase: SessionPhase,
    /// Next note index that has not been spawned yet
    spawn_cursor: usize,
    /// Every note before this index is resolved
    resolved_cursor: usize,
    last_tick: Option<f64>,
    /// Boost activated since the last tick, at this host time
    boost_since: Option<f64>,
    end_time: f64,
}

impl<'a> PlaybackSession<'a> {
    pub fn new(track: &'a Track, config: &RuleConfig) -> Result<Self, RuleError> {
        let scoring = ScoringState::new(config)?;
        Ok(Self {
            track,
            config: config.clone(),
            judge: HitJudge::new(config.hit_window),
            lanes: lane_index(&track.notes),
            state: PlayState::new(track.notes.len()),
            scoring,
            sustain: SustainScorer::new(config.sustain_threshold),
            held: [false; LANE_COUNT],
            phase: SessionPhase::Ready,
            spawn_cursor: 0,
            resolved_cursor: 0,
            last_tick: None,
            boost_since: None,
            end_time: track.end_time(),
        })
    }

    pub fn start(&mut self, now: f64) {
        if self.phase != SessionPhase::Ready {
            return;
        }
        self.phase = SessionPhase::Playing;
        self.last_tick = Some(now);
        log::debug!("Session started: {} notes", self.track.notes.len());
    }

    pub fn pause(&mut self) {
        if self.phase == SessionPhase::Playing {
            self.phase = SessionPhase::Paused;
        }
    }

    /// Continue from `now` without sweeping the paused interval.
    pub fn resume(&mut self, now: f64) {
        if self.phase == SessionPhase::Paused {
            self.phase = SessionPhase::Playing;
            self.last_tick = Some(now);
        }
    }

    /// Abandon the playthrough and drop per-note state.
    pub fn cancel(&mut self) {
        if self.phase.is_terminal() {
            return;
        }
        self.clear_transient();
        self.phase = SessionPhase::Cancelled;
        log::info!("Session cancelled");
    }

    /// Back to `Ready` with fresh scoring, from any phase.
    pub fn restart(&mut self) -> Result<(), RuleError> {
        self.scoring = ScoringState::new(&self.config)?;
        self.clear_transient();
        self.phase = SessionPhase::Ready;
        Ok(())
    }

    /// End the song now, e.g. when the host audio has finished.
    pub fn finish(&mut self) {
        if matches!(self.phase, SessionPhase::Playing | SessionPhase::Paused) {
            self.complete();
        }
    }

    fn clear_transient(&mut self) {
        self.state.reset();
        self.sustain.clear();
        self.held = [false; LANE_COUNT];
        self.spawn_cursor = 0;
        self.resolved_cursor = 0;
        self.last_tick = None;
        self.boost_since = None;
    }

    fn complete(&mut self) {
        self.sustain.clear();
        self.phase = SessionPhase::Finished;
        log::info!(
            "Song complete: score {}, {}/{} notes",
            self.scoring.score(),
            self.scoring.notes_hit(),
            self.track.total_notes
        );
    }

    fn fail(&mut self) {
        self.sustain.clear();
        self.phase = SessionPhase::Failed;
        log::info!("Song failed at score {}", self.scoring.score());
    }

    /// One scheduler step at host time `now`: drain boost, spawn notes,
    /// sweep misses, score sustains, then check for the end of the song.
    pub fn tick(&mut self, now: f64) {
        if self.phase != SessionPhase::Playing {
            return;
        }
        // Boost only drains from the moment it was activated
        let mut drain_from = self.last_tick.unwrap_or(now);
        if let Some(at) = self.boost_since.take() {
            drain_from = drain_from.max(at);
        }
        self.last_tick = Some(now);

        self.scoring.drain_boost((now - drain_from).max(0.0));
        self.spawn(now);
        if self.sweep_misses(now) {
            self.fail();
            return;
        }
        self.sustain.tick(now, &self.held, &mut self.scoring);

        self.advance_resolved();
        if self.resolved_cursor == self.track.notes.len() && now >= self.end_time {
            self.complete();
        }
    }

    fn spawn(&mut self, now: f64) {
        let notes = &self.track.notes;
        while self.spawn_cursor < notes.len()
            && notes[self.spawn_cursor].time - now < self.config.fall_duration
        {
            self.state.set_spawned(self.spawn_cursor);
            self.spawn_cursor += 1;
        }
    }

    /// Returns `true` when a miss failed the playthrough.
    fn sweep_misses(&mut self, now: f64) -> bool {
        let notes = &self.track.notes;
        for i in self.resolved_cursor..self.spawn_cursor {
            let diff = notes[i].time - now;
            if !self.judge.is_missed(diff) {
                break;
            }
            if self.state.get(i) != Some(NoteStatus::Spawned) {
                continue;
            }
            self.state.set_missed(i);
            if self.scoring.on_miss() {
                return true;
            }
        }
        false
    }

    fn advance_resolved(&mut self) {
        while self
            .state
            .get(self.resolved_cursor)
            .is_some_and(|s| !s.is_open())
        {
            self.resolved_cursor += 1;
        }
    }

    /// Apply one input event at host time `now`.
    ///
    /// Outside `Playing` only the held-lane state changes.
    pub fn handle_input(&mut self, event: InputEvent, now: f64) -> InputResponse {
        match event {
            InputEvent::LanePress(lane) => {
                let Some(held) = self.held.get_mut(usize::from(lane)) else {
                    return InputResponse::Ignored;
                };
                *held = true;
                if self.phase != SessionPhase::Playing {
                    return InputResponse::Ignored;
                }
                self.press(lane, now)
            }
            InputEvent::LaneRelease(lane) => {
                if let Some(held) = self.held.get_mut(usize::from(lane)) {
                    *held = false;
                    self.sustain.release(lane);
                }
                InputResponse::Ignored
            }
            InputEvent::BoostActivate => {
                if self.phase == SessionPhase::Playing && self.scoring.activate_boost() {
                    self.boost_since = Some(now);
                    log::debug!("Boost activated at {now:.3}s");
                    InputResponse::BoostActivated
                } else {
                    InputResponse::Ignored
                }
            }
        }
    }

    fn press(&mut self, lane: u8, now: f64) -> InputResponse {
        let notes = &self.track.notes;
        let Some(index) = self
            .judge
            .select(notes, &self.lanes[usize::from(lane)], &self.state, now)
        else {
            return InputResponse::Ignored;
        };
        let note = notes[index];
        self.state.set_hit(index);
        let points = self.scoring.on_hit(note.is_boost);
        self.sustain.begin(lane, index, note.time, note.duration);
        InputResponse::Hit {
            note: index,
            points,
        }
    }

    /// Notes on the highway: spawned and unresolved, plus hit long notes
    /// still being sustained.
    pub fn visible_notes(&self) -> Vec<VisibleNote> {
        let notes = &self.track.notes;
        let first = (0..LANE_COUNT as u8)
            .filter_map(|lane| self.sustain.active_note(lane))
            .fold(self.resolved_cursor, usize::min);
        (first..self.spawn_cursor)
            .filter_map(|i| {
                let status = self.state.get(i)?;
                let note: &Note = &notes[i];
                let sustaining = self.sustain.active_note(note.lane) == Some(i);
                (status == NoteStatus::Spawned || sustaining).then_some(VisibleNote {
                    index: i,
                    lane: note.lane,
                    time: note.time,
                    duration: note.duration,
                    is_boost: note.is_boost,
                    status,
                    sustaining,
                })
            })
            .collect()
    }

    pub fn snapshot(&self) -> ScoreSnapshot {
        self.scoring.snapshot()
    }

    pub fn summary(&self) -> PlaySummary {
        PlaySummary {
            notes_hit: self.scoring.notes_hit(),
            total_notes: self.track.total_notes as u32,
            max_combo: self.scoring.max_combo(),
            score: self.scoring.score(),
            outcome: if self.phase == SessionPhase::Failed {
                PlayOutcome::Failed
            } else {
                PlayOutcome::Completed
            },
        }
    }

    /// `Some` once the song has finished or failed.
    pub fn outcome(&self) -> Option<PlayOutcome> {
        match self.phase {
            SessionPhase::Finished => Some(PlayOutcome::Completed),
            SessionPhase::Failed => Some(PlayOutcome::Failed),
            _ => None,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn note_status(&self, index: usize) -> Option<NoteStatus> {
        self.state.get(index)
    }

    pub fn is_held(&self, lane: u8) -> bool {
        self.held.get(usize::from(lane)).copied().unwrap_or(false)
    }

    pub fn scoring(&self) -> &ScoringState {
        &self.scoring
    }

    pub fn track(&self) -> &'a Track {
        self.track
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }
}
