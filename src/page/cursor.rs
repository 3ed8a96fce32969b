//! The custom cursor: a small dot and a larger ring trailing the pointer.

use crate::easing::Smoothed2;

/// Elements that enlarge the ring while hovered.
pub const INTERACTIVE_SELECTOR: &str = "a, button, .service-card, .gallery-card, .why-card";

const DOT_FACTOR: f32 = 0.2;
const RING_FACTOR: f32 = 0.08;
// half the rendered size, so the shapes are centred on the pointer
const DOT_OFFSET: f32 = 4.0;
const RING_OFFSET: f32 = 18.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RingStyle {
    pub size_px: u32,
    pub border_colour: &'static str,
}

pub const RING_IDLE: RingStyle = RingStyle {
    size_px: 36,
    border_colour: "rgba(230,57,70,.5)",
};

pub const RING_HOVER: RingStyle = RingStyle {
    size_px: 56,
    border_colour: "rgba(230,57,70,.8)",
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cursor {
    dot: Smoothed2,
    ring: Smoothed2,
    hovering: bool,
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            dot: Smoothed2::new(DOT_FACTOR),
            ring: Smoothed2::new(RING_FACTOR),
            hovering: false,
        }
    }
}

impl Cursor {
    /// Moves both shapes one step towards the pointer.
    pub fn step(&mut self, pointer: (f32, f32)) {
        self.dot.step(pointer);
        self.ring.step(pointer);
    }

    pub fn dot(&self) -> (f32, f32) {
        self.dot.get()
    }

    pub fn ring(&self) -> (f32, f32) {
        self.ring.get()
    }

    pub fn dot_transform(&self) -> String {
        let (x, y) = self.dot.get();
        format!("translate({}px, {}px)", x - DOT_OFFSET, y - DOT_OFFSET)
    }

    pub fn ring_transform(&self) -> String {
        let (x, y) = self.ring.get();
        format!("translate({}px, {}px)", x - RING_OFFSET, y - RING_OFFSET)
    }

    pub fn set_hovering(&mut self, hovering: bool) -> RingStyle {
        self.hovering = hovering;
        self.ring_style()
    }

    pub fn ring_style(&self) -> RingStyle {
        if self.hovering {
            RING_HOVER
        } else {
            RING_IDLE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_catches_up_faster_than_ring() {
        let mut cursor = Cursor::default();
        cursor.step((100.0, 50.0));
        assert_eq!(cursor.dot(), (20.0, 10.0));
        assert_eq!(cursor.ring(), (8.0, 4.0));
        for _ in 0..10 {
            cursor.step((100.0, 50.0));
        }
        assert!(cursor.dot().0 > cursor.ring().0);
        assert!(cursor.dot().0 < 100.0);
    }

    #[test]
    fn transforms_centre_the_shapes() {
        let mut cursor = Cursor::default();
        cursor.step((100.0, 50.0));
        assert_eq!(cursor.dot_transform(), "translate(16px, 6px)");
        assert_eq!(cursor.ring_transform(), "translate(-10px, -14px)");
    }

    #[test]
    fn hover_enlarges_the_ring() {
        let mut cursor = Cursor::default();
        assert_eq!(cursor.ring_style(), RING_IDLE);
        assert_eq!(cursor.set_hovering(true).size_px, 56);
        assert_eq!(cursor.ring_style().border_colour, "rgba(230,57,70,.8)");
        assert_eq!(cursor.set_hovering(false), RING_IDLE);
    }
}
