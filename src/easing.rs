//! Easing and interpolation helpers.
//!
//! Everything that moves on the page (cursor, follower ring, parallax, counters)
//! is shaped by one of the functions in here.

/// Move `current` a fraction `k` of the way towards `target`.
///
/// Called once per frame with a constant `k` this yields the typical "lagging"
/// motion of the cursor follower.
pub fn lerp(current: f32, target: f32, k: f32) -> f32 {
    current + (target - current) * k
}

/// Cubic ease-out on a progress ratio. The input is clamped to `[0, 1]`.
pub fn ease_out_cubic(progress: f32) -> f32 {
    let p = progress.clamp(0.0, 1.0);
    1.0 - (1.0 - p).powi(3)
}

/// Progress of a bounded animation, `elapsed / duration` clamped to `[0, 1]`.
///
/// A zero duration is treated as already finished.
pub fn progress(elapsed_ms: f64, duration_ms: f64) -> f32 {
    if duration_ms <= 0.0 {
        return 1.0;
    }
    (elapsed_ms / duration_ms).clamp(0.0, 1.0) as f32
}

/// A value that trails its target by a constant smoothing factor each step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Smoothed {
    pub value: f32,
    factor: f32,
}

impl Smoothed {
    pub fn new(value: f32, factor: f32) -> Self {
        Self { value, factor }
    }

    pub fn step(&mut self, target: f32) -> f32 {
        self.value = lerp(self.value, target, self.factor);
        self.value
    }
}

/// Two smoothed axes, used for anything that follows the pointer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Smoothed2 {
    pub x: Smoothed,
    pub y: Smoothed,
}

impl Smoothed2 {
    pub fn new(factor: f32) -> Self {
        Self {
            x: Smoothed::new(0.0, factor),
            y: Smoothed::new(0.0, factor),
        }
    }

    pub fn step(&mut self, target: (f32, f32)) -> (f32, f32) {
        (self.x.step(target.0), self.y.step(target.1))
    }

    pub fn get(&self) -> (f32, f32) {
        (self.x.value, self.y.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_stays_strictly_between_current_and_target() {
        let cases = [
            (0.0, 10.0),
            (10.0, 0.0),
            (-3.5, 2.25),
            (100.0, 100.5),
            (-0.001, -1000.0),
        ];
        for (c, g) in cases {
            for k in [0.01, 0.08, 0.2, 0.5, 0.9, 0.99] {
                let r = lerp(c, g, k);
                let (lo, hi) = if c < g { (c, g) } else { (g, c) };
                assert!(r > lo && r < hi, "lerp({c}, {g}, {k}) = {r}");
            }
        }
    }

    #[test]
    fn lerp_is_fixed_at_target() {
        assert_eq!(lerp(4.0, 4.0, 0.2), 4.0);
        assert_eq!(lerp(-1.5, -1.5, 0.08), -1.5);
    }

    #[test]
    fn ease_out_cubic_hits_endpoints_and_clamps() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert_eq!(ease_out_cubic(-2.0), 0.0);
        assert_eq!(ease_out_cubic(7.0), 1.0);
        assert!((ease_out_cubic(0.5) - 0.875).abs() < 1e-6);
    }

    #[test]
    fn ease_out_cubic_is_monotone() {
        let mut last = 0.0;
        for i in 0..=1000 {
            let e = ease_out_cubic(i as f32 / 1000.0);
            assert!(e >= last);
            last = e;
        }
    }

    #[test]
    fn progress_handles_zero_duration() {
        assert_eq!(progress(10.0, 0.0), 1.0);
        assert_eq!(progress(500.0, 2000.0), 0.25);
        assert_eq!(progress(5000.0, 2000.0), 1.0);
    }

    #[test]
    fn smoothed_converges_towards_target() {
        let mut s = Smoothed2::new(0.08);
        for _ in 0..200 {
            s.step((300.0, -120.0));
        }
        let (x, y) = s.get();
        assert!((x - 300.0).abs() < 0.1);
        assert!((y + 120.0).abs() < 0.1);
    }
}
