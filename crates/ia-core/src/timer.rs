//! Start/stop timing windows.

use std::time::Duration;

/// Whether a [`TimedSession`] currently has an open window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running { started_at: Duration },
}

/// One open/closed timing window.
///
/// Readings come from the owner's [`Clock`](crate::Clock) and are passed in,
/// which keeps the session a plain value with no clock of its own.
///
/// ```text
/// Idle --start()--> Running --stop()--> Idle
/// ```
///
/// `start()` while running restarts the window; the earlier start is
/// discarded. `stop()` while idle closes an empty window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedSession {
    name: &'static str,
    state: SessionState,
    elapsed: Duration,
}

impl TimedSession {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            state: SessionState::Idle,
            elapsed: Duration::ZERO,
        }
    }

    pub const fn state(&self) -> SessionState {
        self.state
    }

    pub const fn is_running(&self) -> bool {
        matches!(self.state, SessionState::Running { .. })
    }

    /// Opens a window at `now`, replacing any window already open.
    pub fn start(&mut self, now: Duration) {
        if let SessionState::Running { started_at } = self.state {
            tracing::debug!(
                timer = self.name,
                discarded_secs = now.saturating_sub(started_at).as_secs_f64(),
                "timer restarted while running"
            );
        }
        self.state = SessionState::Running { started_at: now };
    }

    /// Closes the window at `now` and returns its length.
    pub fn stop(&mut self, now: Duration) -> Duration {
        match self.state {
            SessionState::Running { started_at } => {
                self.elapsed = now.saturating_sub(started_at);
                self.state = SessionState::Idle;
            }
            SessionState::Idle => {
                tracing::debug!(timer = self.name, "timer stopped while idle");
                self.elapsed = Duration::ZERO;
            }
        }
        self.elapsed
    }

    /// Length of the most recently closed window.
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Elapsed time as a stopwatch would report it: the open window up to
    /// `now` while running, the last closed window otherwise.
    pub const fn elapsed_at(&self, now: Duration) -> Duration {
        match self.state {
            SessionState::Running { started_at } => now.saturating_sub(started_at),
            SessionState::Idle => self.elapsed,
        }
    }

    /// Returns to idle with no recorded window.
    pub const fn reset(&mut self) {
        self.state = SessionState::Idle;
        self.elapsed = Duration::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: f64) -> Duration {
        Duration::from_secs_f64(s)
    }

    #[test]
    fn start_stop_measures_window() {
        let mut timer = TimedSession::new("gaze");
        timer.start(secs(1.0));
        assert!(timer.is_running());

        let elapsed = timer.stop(secs(3.5));
        assert_eq!(elapsed, secs(2.5));
        assert_eq!(timer.elapsed(), secs(2.5));
        assert_eq!(timer.state(), SessionState::Idle);
    }

    #[test]
    fn restart_discards_earlier_window() {
        let mut timer = TimedSession::new("gaze");
        timer.start(secs(0.0));
        timer.start(secs(4.0));

        assert_eq!(timer.stop(secs(5.0)), secs(1.0));
    }

    #[test]
    fn stop_while_idle_closes_empty_window() {
        let mut timer = TimedSession::new("hold");
        timer.start(secs(0.0));
        timer.stop(secs(2.0));

        assert_eq!(timer.stop(secs(9.0)), Duration::ZERO);
        assert_eq!(timer.elapsed(), Duration::ZERO);
    }

    #[test]
    fn elapsed_at_reads_open_window() {
        let mut timer = TimedSession::new("gaze");
        timer.start(secs(1.0));
        assert_eq!(timer.elapsed_at(secs(1.75)), secs(0.75));

        timer.stop(secs(2.0));
        assert_eq!(timer.elapsed_at(secs(10.0)), secs(1.0));
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut timer = TimedSession::new("hold");
        timer.start(secs(0.0));
        timer.reset();

        assert!(!timer.is_running());
        assert_eq!(timer.elapsed(), Duration::ZERO);
    }
}
