use core::time::Duration;

use web_time::Instant;

use crate::*;

/// Measures the time between the first move of a game and its end.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Stopwatch {
    started_at: Option<Instant>,
    stopped_at: Option<Instant>,
}

impl Stopwatch {
    pub const fn new() -> Self {
        Self {
            started_at: None,
            stopped_at: None,
        }
    }

    /// Starts measuring from now, discarding any previous measurement.
    pub fn start(&mut self) {
        self.started_at = Some(Instant::now());
        self.stopped_at = None;
    }

    pub fn stop(&mut self) -> Result<()> {
        if !self.is_running() {
            return Err(GameError::StopwatchNotRunning);
        }
        self.stopped_at = Some(Instant::now());
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some() && self.stopped_at.is_none()
    }

    /// Time since start while running, the measured span once stopped, zero if never started.
    pub fn elapsed(&self) -> Duration {
        match (self.started_at, self.stopped_at) {
            (Some(started), Some(stopped)) => stopped.duration_since(started),
            (Some(started), None) => started.elapsed(),
            (None, _) => Duration::ZERO,
        }
    }
}
