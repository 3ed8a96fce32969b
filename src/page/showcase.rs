//! The rotating hero image carousel.

use crate::page::timers::{Deadline, Interval, Millis};

pub const ROTATE_MS: Millis = 3500.0;
/// How long the previous image keeps its exit animation class.
pub const EXIT_MS: Millis = 1200.0;

pub const ACTIVE_CLASS: &str = "active";
pub const EXITING_CLASS: &str = "exiting";

/// A class change the DOM layer has to apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShowcaseChange {
    /// `previous` loses `active` and gains `exiting`, `current` gains `active`.
    Advanced { previous: usize, current: usize },
    /// The image loses `exiting`.
    ExitDone(usize),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Showcase {
    current: usize,
    rotate: Interval,
    exiting: Vec<Deadline>,
}

impl Showcase {
    /// `None` when there are no images to rotate.
    pub fn start(count: usize, now: Millis) -> Option<Self> {
        if count == 0 {
            return None;
        }
        let mut rotate = Interval::new(ROTATE_MS);
        rotate.start(now);
        Some(Self {
            current: 0,
            rotate,
            exiting: vec![Deadline::default(); count],
        })
    }

    pub fn len(&self) -> usize {
        self.exiting.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exiting.is_empty()
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn is_active(&self, index: usize) -> bool {
        index == self.current
    }

    pub fn is_exiting(&self, index: usize) -> bool {
        self.exiting.get(index).is_some_and(Deadline::is_armed)
    }

    pub fn tick(&mut self, now: Millis) -> Vec<ShowcaseChange> {
        let mut changes = Vec::new();
        // exits that ended before this poll go first
        for (i, exit) in self.exiting.iter_mut().enumerate() {
            if exit.fire(now).is_some() {
                changes.push(ShowcaseChange::ExitDone(i));
            }
        }
        // periods missed while the page was hidden collapse into one advance
        let steps = self.rotate.fire(now) as usize % self.exiting.len();
        if steps > 0 {
            let previous = self.current;
            self.current = (self.current + steps) % self.exiting.len();
            self.exiting[previous].arm(now, EXIT_MS);
            changes.push(ShowcaseChange::Advanced {
                previous,
                current: self.current,
            });
        }
        changes
    }
}

/// Transform of the active image for a pointer at `(x, y)` in a `w` x `h`
/// window.
pub fn parallax(x: f32, y: f32, width: f32, height: f32) -> String {
    if width <= 0.0 || height <= 0.0 {
        return "translateX(0px) translateY(0px) scale(1)".to_string();
    }
    let mx = (x / width - 0.5) * 20.0;
    let my = (y / height - 0.5) * 10.0;
    format!("translateX({}px) translateY({}px) scale(1)", mx, my)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_and_wraps() {
        let mut showcase = Showcase::start(3, 0.0).unwrap();
        assert_eq!(showcase.current(), 0);
        assert!(showcase.tick(3499.0).is_empty());
        assert_eq!(
            showcase.tick(3500.0),
            vec![ShowcaseChange::Advanced {
                previous: 0,
                current: 1
            }]
        );
        assert!(showcase.is_exiting(0));
        showcase.tick(7000.0);
        showcase.tick(10_500.0);
        assert_eq!(showcase.current(), 0);
        assert_eq!((0..3).filter(|&i| showcase.is_active(i)).count(), 1);
    }

    #[test]
    fn exit_class_clears_after_delay() {
        let mut showcase = Showcase::start(2, 0.0).unwrap();
        showcase.tick(3500.0);
        assert!(showcase.tick(4699.0).is_empty());
        assert_eq!(showcase.tick(4700.0), vec![ShowcaseChange::ExitDone(0)]);
        assert!(!showcase.is_exiting(0));
    }

    #[test]
    fn catch_up_after_a_pause_is_one_change() {
        let mut showcase = Showcase::start(4, 0.0).unwrap();
        // 10 periods: lands on image 2 in a single class swap
        let changes = showcase.tick(35_000.0);
        assert_eq!(
            changes,
            vec![ShowcaseChange::Advanced {
                previous: 0,
                current: 2
            }]
        );
        assert_eq!((0..4).filter(|&i| showcase.is_exiting(i)).count(), 1);

        // a whole number of laps leaves the active image where it was
        let changes = showcase.tick(35_000.0 + 4.0 * ROTATE_MS);
        assert_eq!(changes, vec![ShowcaseChange::ExitDone(0)]);
        assert_eq!(showcase.current(), 2);
    }

    #[test]
    fn no_images_no_carousel() {
        assert!(Showcase::start(0, 0.0).is_none());
    }

    #[test]
    fn parallax_is_centred() {
        assert_eq!(
            parallax(500.0, 250.0, 1000.0, 500.0),
            "translateX(0px) translateY(0px) scale(1)"
        );
        assert_eq!(
            parallax(1000.0, 0.0, 1000.0, 500.0),
            "translateX(10px) translateY(-5px) scale(1)"
        );
    }
}
