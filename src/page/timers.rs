//! Millisecond timers for the page effects.
//!
//! The browser's `setTimeout`/`setInterval` are replaced by plain values that
//! are polled with the current time, so every effect can be stepped in tests.

/// Milliseconds on the page clock (`performance.now()` on the web).
pub type Millis = f64;

/// A one-shot timer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Deadline {
    due: Option<Millis>,
}

impl Deadline {
    /// Fires `delay` ms after `now`, replacing any pending deadline.
    pub fn arm(&mut self, now: Millis, delay: Millis) {
        self.due = Some(now + delay);
    }

    pub fn disarm(&mut self) {
        self.due = None;
    }

    pub fn is_armed(&self) -> bool {
        self.due.is_some()
    }

    pub fn due(&self) -> Option<Millis> {
        self.due
    }

    /// Returns the due time once, on the first poll at or after it.
    pub fn fire(&mut self, now: Millis) -> Option<Millis> {
        match self.due {
            Some(due) if now >= due => {
                self.due = None;
                Some(due)
            }
            _ => None,
        }
    }
}

/// A repeating timer with a fixed period.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interval {
    period: Millis,
    next: Option<Millis>,
}

impl Interval {
    pub fn new(period: Millis) -> Self {
        Self { period, next: None }
    }

    /// First period ends `period` ms after `now`.
    pub fn start(&mut self, now: Millis) {
        self.next = Some(now + self.period);
    }

    pub fn stop(&mut self) {
        self.next = None;
    }

    pub fn is_running(&self) -> bool {
        self.next.is_some()
    }

    /// Number of whole periods that ended since the last poll.
    pub fn fire(&mut self, now: Millis) -> u32 {
        let Some(next) = self.next else {
            return 0;
        };
        if self.period <= 0.0 || now < next {
            return 0;
        }
        let fired = ((now - next) / self.period).floor() as u32 + 1;
        self.next = Some(next + fired as Millis * self.period);
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadline_fires_once() {
        let mut d = Deadline::default();
        assert_eq!(d.fire(1e9), None);
        d.arm(100.0, 3000.0);
        assert_eq!(d.fire(3099.0), None);
        assert_eq!(d.fire(3200.0), Some(3100.0));
        assert_eq!(d.fire(3300.0), None);
        assert!(!d.is_armed());
    }

    #[test]
    fn rearming_moves_the_deadline() {
        let mut d = Deadline::default();
        d.arm(0.0, 100.0);
        d.arm(50.0, 100.0);
        assert_eq!(d.fire(120.0), None);
        assert_eq!(d.fire(150.0), Some(150.0));
    }

    #[test]
    fn interval_counts_elapsed_periods() {
        let mut i = Interval::new(40.0);
        assert_eq!(i.fire(1000.0), 0);
        i.start(0.0);
        assert_eq!(i.fire(39.9), 0);
        assert_eq!(i.fire(40.0), 1);
        assert_eq!(i.fire(130.0), 2);
        i.stop();
        assert_eq!(i.fire(1000.0), 0);
    }

    #[test]
    fn long_pause_is_counted_in_one_poll() {
        let mut i = Interval::new(3500.0);
        i.start(0.0);
        // an hour in a background tab
        assert_eq!(i.fire(3_600_000.0), 1028);
        assert_eq!(i.fire(3_601_499.0), 0);
        assert_eq!(i.fire(3_601_500.0), 1);
    }
}
