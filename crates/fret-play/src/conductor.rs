use crate::clock::PlaybackClock;
use crate::session::{InputEvent, InputResponse, PlaybackSession, SessionPhase};

/// Drives a [`PlaybackSession`] from a [`PlaybackClock`].
///
/// Keeps clock and session in lockstep: pausing stops both, and the clock
/// is stopped as soon as the session reaches a terminal phase.
pub struct Conductor<'a, C: PlaybackClock> {
    clock: C,
    session: PlaybackSession<'a>,
}

impl<'a, C: PlaybackClock> Conductor<'a, C> {
    pub fn new(clock: C, session: PlaybackSession<'a>) -> Self {
        Self { clock, session }
    }

    pub fn start(&mut self) {
        self.clock.start();
        self.session.start(self.clock.current_seconds());
    }

    /// Run one scheduler step at the clock's current time.
    pub fn pump(&mut self) -> SessionPhase {
        self.session.tick(self.clock.current_seconds());
        let phase = self.session.phase();
        if phase.is_terminal() && self.clock.is_running() {
            self.clock.stop();
        }
        phase
    }

    pub fn input(&mut self, event: InputEvent) -> InputResponse {
        self.session
            .handle_input(event, self.clock.current_seconds())
    }

    pub fn pause(&mut self) {
        self.clock.pause();
        self.session.pause();
    }

    pub fn resume(&mut self) {
        self.clock.resume();
        self.session.resume(self.clock.current_seconds());
    }

    /// Toggle between playing and paused.
    pub fn toggle_pause(&mut self) {
        match self.session.phase() {
            SessionPhase::Playing => self.pause(),
            SessionPhase::Paused => self.resume(),
            _ => {}
        }
    }

    pub fn cancel(&mut self) {
        self.clock.stop();
        self.session.cancel();
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn session(&self) -> &PlaybackSession<'a> {
        &self.session
    }

    pub fn into_session(self) -> PlaybackSession<'a> {
        self.session
    }
}
