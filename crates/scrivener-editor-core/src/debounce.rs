//! Trailing-edge debounce timer.
//!
//! The timer holds the most recent value and a deadline. Scheduling a new
//! value replaces the old one and restarts the delay; there is no
//! leading-edge invocation. Hosts drive it by calling `poll` with the current
//! time from their own event loop or frame callback.

use std::time::Duration;

use web_time::Instant;

#[derive(Clone, Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replace any pending value and restart the timer from `now`.
    pub fn schedule(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    /// Drop the pending value without firing.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    /// Fire immediately regardless of the deadline.
    pub fn flush(&mut self) -> Option<T> {
        self.cancel()
    }

    /// Fire if the deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, deadline)) if now >= *deadline => self.cancel(),
            _ => None,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref().map(|(value, _)| value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(300);

    #[test]
    fn test_fires_after_delay() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(DELAY);
        d.schedule(1, t0);
        assert_eq!(d.poll(t0 + Duration::from_millis(299)), None);
        assert_eq!(d.poll(t0 + DELAY), Some(1));
        assert!(!d.is_pending());
    }

    #[test]
    fn test_reschedule_restarts_timer() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(DELAY);
        d.schedule("a", t0);
        d.schedule("ab", t0 + Duration::from_millis(200));
        assert_eq!(d.poll(t0 + Duration::from_millis(350)), None);
        assert_eq!(d.poll(t0 + Duration::from_millis(500)), Some("ab"));
    }

    #[test]
    fn test_cancel_drops_value() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(DELAY);
        d.schedule(7, t0);
        assert_eq!(d.cancel(), Some(7));
        assert_eq!(d.poll(t0 + DELAY * 2), None);
    }
}
