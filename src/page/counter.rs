//! Animated statistic counters.

use crate::{
    easing::{ease_out_cubic, progress},
    page::{
        reveal::ObserverOptions,
        timers::Millis,
    },
};

pub const COUNTER_SELECTOR: &str = ".stat-number[data-target]";
pub const COUNTER_DURATION_MS: Millis = 2000.0;

pub const COUNTER_OPTIONS: ObserverOptions = ObserverOptions {
    threshold: 0.5,
    root_margin: "0px",
};

/// Reads a `data-target` attribute the lenient way: leading whitespace and
/// an optional sign, then as many digits as there are.
pub fn parse_target(attr: &str) -> Option<i64> {
    let s = attr.trim_start();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

/// `1234567` becomes `"1,234,567"`.
pub fn format_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Halves round towards positive infinity, as the browser's `Math.round`.
fn js_round(x: f64) -> i64 {
    (x + 0.5).floor() as i64
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Counter {
    target: i64,
    duration: Millis,
    started_at: Option<Millis>,
}

impl Counter {
    pub fn new(target: i64) -> Self {
        Self {
            target,
            duration: COUNTER_DURATION_MS,
            started_at: None,
        }
    }

    pub fn target(&self) -> i64 {
        self.target
    }

    /// Starts the animation; later calls keep the first start time.
    pub fn start(&mut self, now: Millis) {
        self.started_at.get_or_insert(now);
    }

    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn value_at(&self, now: Millis) -> i64 {
        let Some(started_at) = self.started_at else {
            return 0;
        };
        let eased = ease_out_cubic(progress(now - started_at, self.duration));
        js_round(self.target as f64 * eased as f64)
    }

    pub fn text_at(&self, now: Millis) -> String {
        format_thousands(self.value_at(now))
    }

    pub fn is_done(&self, now: Millis) -> bool {
        self.started_at
            .is_some_and(|started_at| now - started_at >= self.duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_from_zero_to_target() {
        let mut counter = Counter::new(2500);
        assert_eq!(counter.value_at(0.0), 0);
        counter.start(100.0);
        assert_eq!(counter.value_at(100.0), 0);
        assert_eq!(counter.value_at(2100.0), 2500);
        assert_eq!(counter.value_at(9000.0), 2500);
        assert!(counter.is_done(2100.0));
        assert!(!counter.is_done(2099.0));
    }

    #[test]
    fn value_never_decreases() {
        let mut counter = Counter::new(98);
        counter.start(0.0);
        let mut last = 0;
        for ms in (0..=2000).step_by(16) {
            let v = counter.value_at(ms as f64);
            assert!(v >= last);
            last = v;
        }
        assert_eq!(last, 98);
    }

    #[test]
    fn restart_keeps_first_start() {
        let mut counter = Counter::new(10);
        counter.start(0.0);
        counter.start(1500.0);
        assert_eq!(counter.value_at(2000.0), 10);
    }

    #[test]
    fn halves_round_up_for_negative_targets() {
        assert_eq!(js_round(2.5), 3);
        assert_eq!(js_round(-2.5), -2);
        assert_eq!(js_round(-2.6), -3);
        assert_eq!(js_round(-0.4), 0);

        let mut counter = Counter::new(-5);
        counter.start(0.0);
        // ease_out_cubic(0.5) = 0.875
        assert_eq!(counter.value_at(1000.0), -4);
        assert_eq!(counter.value_at(2000.0), -5);
    }

    #[test]
    fn formats_with_separators() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(1234567), "1,234,567");
        assert_eq!(format_thousands(-4200), "-4,200");
    }

    #[test]
    fn parses_leading_integer() {
        assert_eq!(parse_target("1500"), Some(1500));
        assert_eq!(parse_target(" 98%"), Some(98));
        assert_eq!(parse_target("-3"), Some(-3));
        assert_eq!(parse_target("abc"), None);
        assert_eq!(parse_target(""), None);
    }
}
