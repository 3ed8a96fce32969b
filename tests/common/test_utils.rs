use std::time::Duration;

use apex_backdrop::{
    input::{FrameInput, InputState},
    page::timers::Millis,
    scheduler::FrameScheduler,
};
use instant::Instant;

/// Steps a [`FrameScheduler`] like a display with a fixed refresh rate,
/// without waiting for one.
pub(crate) struct FrameDriver {
    scheduler: FrameScheduler,
    now: Instant,
    period: Duration,
    pub input: InputState,
}

impl FrameDriver {
    pub fn new(fps: u32) -> Self {
        let mut input = InputState::default();
        input.window_resized(1280.0, 720.0);
        Self {
            scheduler: FrameScheduler::new(),
            now: Instant::now(),
            period: Duration::from_secs(1) / fps,
            input,
        }
    }

    pub fn start(&mut self) {
        self.scheduler.start(self.now);
    }

    pub fn stop(&mut self) {
        self.scheduler.stop();
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Advances the clock by one refresh and takes the frame's snapshot.
    pub fn next_frame(&mut self) -> Option<FrameInput> {
        self.now += self.period;
        let tick = self.scheduler.step(self.now)?;
        Some(self.input.snapshot(&tick))
    }
}

/// Calls `tick` every `step` ms from `from` up to and including `to`.
pub(crate) fn poll_every(from: Millis, to: Millis, step: Millis, mut tick: impl FnMut(Millis)) {
    let mut now = from;
    while now <= to {
        tick(now);
        now += step;
    }
}

/// 60 Hz, the refresh rate the page effects are polled at.
pub(crate) const REFRESH_MS: Millis = 1000.0 / 60.0;
