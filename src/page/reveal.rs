//! Scroll reveal of marked elements.

pub const REVEAL_SELECTOR: &str = ".reveal-up, .reveal-left, .reveal-right";
pub const REVEALED_CLASS: &str = "revealed";

/// Options of an intersection observer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObserverOptions {
    pub threshold: f64,
    pub root_margin: &'static str,
}

pub const REVEAL_OPTIONS: ObserverOptions = ObserverOptions {
    threshold: 0.1,
    // reveal a little after the element enters from the bottom
    root_margin: "0px 0px -40px 0px",
};

/// Which of the observed elements have been revealed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reveal {
    revealed: Vec<bool>,
}

impl Reveal {
    pub fn new(count: usize) -> Self {
        Self {
            revealed: vec![false; count],
        }
    }

    /// Returns `true` exactly once per element, on its first intersection.
    /// The caller then marks the element and stops observing it.
    pub fn on_intersect(&mut self, index: usize, is_intersecting: bool) -> bool {
        match self.revealed.get_mut(index) {
            Some(revealed) if is_intersecting && !*revealed => {
                *revealed = true;
                true
            }
            _ => false,
        }
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        self.revealed.get(index).copied().unwrap_or(false)
    }

    /// Elements still waiting to be revealed.
    pub fn pending(&self) -> usize {
        self.revealed.iter().filter(|r| !**r).count()
    }
}
