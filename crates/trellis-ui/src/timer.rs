//! One-shot countdown timers driven by the host's frame delta.
//!
//! Widgets with delayed transitions own a [`Timer`] and expose an
//! `update(dt)` method; the host calls it from its event loop.

use std::time::Duration;

/// A cancellable one-shot delay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timer {
    remaining: Option<Duration>,
}

impl Timer {
    pub fn idle() -> Self {
        Self { remaining: None }
    }

    /// Schedule the timer, replacing any pending schedule.
    pub fn start(&mut self, delay: Duration) {
        self.remaining = Some(delay);
    }

    pub fn cancel(&mut self) {
        self.remaining = None;
    }

    pub fn is_running(&self) -> bool {
        self.remaining.is_some()
    }

    /// Advance by `dt`. Returns `true` exactly once, when the delay elapses.
    pub fn advance(&mut self, dt: Duration) -> bool {
        match self.remaining {
            Some(remaining) if dt >= remaining => {
                self.remaining = None;
                true
            }
            Some(remaining) => {
                self.remaining = Some(remaining - dt);
                false
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once() {
        let mut timer = Timer::idle();
        timer.start(Duration::from_millis(200));

        assert!(!timer.advance(Duration::from_millis(150)));
        assert!(timer.advance(Duration::from_millis(50)));
        assert!(!timer.is_running());
        assert!(!timer.advance(Duration::from_millis(500)));
    }

    #[test]
    fn test_restart_replaces_schedule() {
        let mut timer = Timer::idle();
        timer.start(Duration::from_millis(200));
        assert!(!timer.advance(Duration::from_millis(150)));

        timer.start(Duration::from_millis(200));
        assert!(!timer.advance(Duration::from_millis(150)));
        assert!(timer.advance(Duration::from_millis(50)));
    }

    #[test]
    fn test_cancel() {
        let mut timer = Timer::idle();
        timer.start(Duration::from_millis(10));
        timer.cancel();
        assert!(!timer.advance(Duration::from_secs(1)));
    }
}
