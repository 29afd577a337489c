use std::time::Instant;

/// Abstraction over the host playback clock.
/// Implementations: SystemClock (wall time), ManualClock (testing, simulation).
pub trait PlaybackClock {
    /// Elapsed playback seconds. Frozen while paused or stopped.
    fn current_seconds(&self) -> f64;
    fn start(&mut self);
    fn pause(&mut self);
    fn resume(&mut self);
    fn stop(&mut self);
    fn is_running(&self) -> bool;
}

/// Wall clock playback time using std::time::Instant.
#[derive(Debug, Default)]
pub struct SystemClock {
    /// Seconds accumulated before the current run
    accumulated: f64,
    running_since: Option<Instant>,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PlaybackClock for SystemClock {
    fn current_seconds(&self) -> f64 {
        self.accumulated
            + self
                .running_since
                .map_or(0.0, |since| since.elapsed().as_secs_f64())
    }

    fn start(&mut self) {
        self.accumulated = 0.0;
        self.running_since = Some(Instant::now());
    }

    fn pause(&mut self) {
        if let Some(since) = self.running_since.take() {
            self.accumulated += since.elapsed().as_secs_f64();
        }
    }

    fn resume(&mut self) {
        if self.running_since.is_none() {
            self.running_since = Some(Instant::now());
        }
    }

    fn stop(&mut self) {
        self.pause();
    }

    fn is_running(&self) -> bool {
        self.running_since.is_some()
    }
}

/// Clock advanced explicitly by the caller.
#[derive(Debug, Default)]
pub struct ManualClock {
    seconds: f64,
    running: bool,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_time(&mut self, seconds: f64) {
        self.seconds = seconds;
    }

    /// Advance by `delta` seconds. Ignored unless running.
    pub fn advance(&mut self, delta: f64) {
        if self.running {
            self.seconds += delta;
        }
    }
}

impl PlaybackClock for ManualClock {
    fn current_seconds(&self) -> f64 {
        self.seconds
    }

    fn start(&mut self) {
        self.seconds = 0.0;
        self.running = true;
    }

    fn pause(&mut self) {
        self.running = false;
    }

    fn resume(&mut self) {
        self.running = true;
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn is_running(&self) -> bool {
        self.running
    }
}
