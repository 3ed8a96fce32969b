//! The loading overlay and its RPM gauge.
//!
//! While the page loads the needle climbs by a fixed step per tick. Once the
//! page reports it is loaded the gauge is held a little longer, snapped to
//! the red line and the overlay fades out.

use crate::page::timers::{Deadline, Interval, Millis};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoaderConfig {
    pub step: u32,
    pub period_ms: Millis,
    pub max: u32,
    /// Length of the gauge arc, the stroke dash offset of an empty gauge.
    pub circumference: f32,
    /// Delay between the load signal and the snap to full.
    pub settle_ms: Millis,
    /// Delay between the snap and hiding the overlay.
    pub hide_ms: Millis,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            step: 120,
            period_ms: 40.0,
            max: 8000,
            circumference: 565.0,
            settle_ms: 1800.0,
            hide_ms: 400.0,
        }
    }
}

/// What the overlay shows.
#[derive(Clone, Debug, PartialEq)]
pub struct LoaderView {
    pub dash_offset: f32,
    pub readout: String,
    pub hidden: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Loader {
    config: LoaderConfig,
    value: u32,
    interval: Interval,
    settle: Deadline,
    hide: Deadline,
    hidden: bool,
}

impl Loader {
    /// Starts the gauge at zero.
    pub fn start(config: LoaderConfig, now: Millis) -> Self {
        let mut interval = Interval::new(config.period_ms);
        interval.start(now);
        Self {
            config,
            value: 0,
            interval,
            settle: Deadline::default(),
            hide: Deadline::default(),
            hidden: false,
        }
    }

    /// The page finished loading.
    pub fn on_load(&mut self, now: Millis) {
        if !self.settle.is_armed() && !self.hide.is_armed() && !self.hidden {
            self.settle.arm(now, self.config.settle_ms);
        }
    }

    /// Advances all timers to `now`. Returns `true` when the view changed.
    pub fn tick(&mut self, now: Millis) -> bool {
        let before = self.view();

        let steps = self.interval.fire(now);
        self.value = self
            .value
            .saturating_add(steps.saturating_mul(self.config.step))
            .min(self.config.max);

        if let Some(settled_at) = self.settle.fire(now) {
            self.interval.stop();
            self.value = self.config.max;
            self.hide.arm(settled_at, self.config.hide_ms);
        }
        if self.hide.fire(now).is_some() {
            self.hidden = true;
        }

        self.view() != before
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn is_running(&self) -> bool {
        self.interval.is_running()
    }

    pub fn dash_offset(&self) -> f32 {
        let c = self.config.circumference;
        c - c * self.value as f32 / self.config.max as f32
    }

    pub fn readout(&self) -> String {
        format!("{}", (self.value as f64 / 1000.0).round())
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn view(&self) -> LoaderView {
        LoaderView {
            dash_offset: self.dash_offset(),
            readout: self.readout(),
            hidden: self.hidden,
        }
    }
}
