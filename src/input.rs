//! Pointer and scroll state.
//!
//! Each field has exactly one writer (the pointer-move and scroll listeners).
//! Frame updates never read the shared state directly: they receive a
//! [`FrameInput`] copied at the start of the frame.

use std::{cell::RefCell, rc::Rc};

use instant::Duration;

use crate::scheduler::FrameTick;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
    pub x: f32,
    pub y: f32,
    /// Horizontal position in [-1, 1], left to right.
    pub nx: f32,
    /// Vertical position in [-1, 1], bottom to top.
    pub ny: f32,
}

impl PointerState {
    pub fn from_pixels(x: f32, y: f32, width: f32, height: f32) -> Self {
        let (nx, ny) = if width > 0.0 && height > 0.0 {
            (x / width * 2.0 - 1.0, -(y / height) * 2.0 + 1.0)
        } else {
            (0.0, 0.0)
        };
        Self { x, y, nx, ny }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollState {
    scroll_y: f32,
}

impl ScrollState {
    pub fn set(&mut self, scroll_y: f32) {
        self.scroll_y = scroll_y.max(0.0);
    }

    pub fn get(&self) -> f32 {
        self.scroll_y
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputState {
    pub pointer: PointerState,
    pub scroll: ScrollState,
    /// Window size in CSS pixels, used to normalise the pointer.
    pub window: (f32, f32),
}

impl InputState {
    /// Pointer position normalised against the page's window size.
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.pointer_moved_within(x, y, self.window);
    }

    /// Pointer position normalised against the surface it was reported on.
    pub fn pointer_moved_within(&mut self, x: f32, y: f32, size: (f32, f32)) {
        self.pointer = PointerState::from_pixels(x, y, size.0, size.1);
    }

    pub fn scrolled(&mut self, scroll_y: f32) {
        self.scroll.set(scroll_y);
    }

    pub fn window_resized(&mut self, width: f32, height: f32) {
        self.window = (width, height);
    }

    pub fn snapshot(&self, tick: &FrameTick) -> FrameInput {
        FrameInput {
            elapsed: tick.elapsed,
            dt: tick.dt,
            frame: tick.frame,
            pointer: self.pointer,
            scroll_y: self.scroll.get(),
        }
    }
}

pub type SharedInput = Rc<RefCell<InputState>>;

pub fn shared() -> SharedInput {
    Rc::new(RefCell::new(InputState::default()))
}

/// Everything a frame update may depend on, frozen for the duration of the frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    pub elapsed: Duration,
    pub dt: Duration,
    pub frame: u64,
    pub pointer: PointerState,
    pub scroll_y: f32,
}

impl FrameInput {
    /// Elapsed seconds, the `t` of every animation curve.
    pub fn t(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }
}
