use std::time::{Duration, Instant};

/// Elapsed-time capability used by reporters.
pub trait Timer {
    /// Mark the beginning of the run.
    fn start(&mut self);

    /// Time since `start`.
    fn elapsed(&self) -> Duration;
}

/// Wall-clock timer backed by `Instant`.
#[derive(Debug, Default)]
pub struct Stopwatch {
    started: Option<Instant>,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Timer for Stopwatch {
    fn start(&mut self) {
        self.started = Some(Instant::now());
    }

    /// Zero until `start` has been called.
    fn elapsed(&self) -> Duration {
        self.started
            .map(|started| started.elapsed())
            .unwrap_or_default()
    }
}
