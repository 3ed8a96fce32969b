//! The frame scheduler.
//!
//! A surface starts out `Idle` and moves to `Running` once its scene has been
//! assembled. While running, every display refresh yields exactly one
//! [`FrameTick`]; the host loop then updates the scene, redraws and asks for
//! the next refresh. Tests drive [`FrameScheduler::step`] with synthetic
//! instants instead of waiting for the host.

use instant::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameTick {
    /// Time since the scheduler started.
    pub elapsed: Duration,
    /// Time since the previous tick, zero on the first one.
    pub dt: Duration,
    /// Zero-based frame number.
    pub frame: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FrameScheduler {
    #[default]
    Idle,
    Running {
        started_at: Instant,
        last: Instant,
        frames: u64,
    },
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::Idle
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running { .. })
    }

    /// Moves from `Idle` to `Running`. Calling it again while running keeps
    /// the original start time.
    pub fn start(&mut self, now: Instant) {
        if let Self::Idle = self {
            log::debug!("frame scheduler started");
            *self = Self::Running {
                started_at: now,
                last: now,
                frames: 0,
            };
        }
    }

    pub fn stop(&mut self) {
        if self.is_running() {
            log::debug!("frame scheduler stopped");
        }
        *self = Self::Idle;
    }

    /// Advances one frame. `None` while idle.
    ///
    /// A `now` earlier than the previous step is clamped to it so `elapsed`
    /// never runs backwards.
    pub fn step(&mut self, now: Instant) -> Option<FrameTick> {
        match self {
            Self::Idle => None,
            Self::Running {
                started_at,
                last,
                frames,
            } => {
                let now = now.max(*last);
                let tick = FrameTick {
                    elapsed: now.duration_since(*started_at),
                    dt: now.duration_since(*last),
                    frame: *frames,
                };
                *last = now;
                *frames += 1;
                Some(tick)
            }
        }
    }
}
