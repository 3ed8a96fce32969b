//! The contact form's fake acknowledgement.
//!
//! Nothing is sent anywhere: submitting flips the button into a confirmation
//! state for a few seconds, then the form is cleared. The reset is counted
//! from the first submit; submitting again while confirmed does not extend it.

use crate::page::timers::{Deadline, Millis};

pub const IDLE_LABEL: &str = "Send Request";
pub const SENT_LABEL: &str = "SENT ✓";
pub const SENT_BACKGROUND: &str = "#22c55e";
pub const RESET_MS: Millis = 3000.0;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ButtonView {
    pub label: &'static str,
    /// Inline background; empty means the stylesheet's.
    pub background: &'static str,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ContactForm {
    reset: Deadline,
}

impl ContactForm {
    pub fn submit(&mut self, now: Millis) -> ButtonView {
        if !self.reset.is_armed() {
            self.reset.arm(now, RESET_MS);
        }
        self.button()
    }

    /// Returns `true` when the form has to be reset now.
    pub fn tick(&mut self, now: Millis) -> bool {
        self.reset.fire(now).is_some()
    }

    pub fn is_sent(&self) -> bool {
        self.reset.is_armed()
    }

    pub fn button(&self) -> ButtonView {
        if self.is_sent() {
            ButtonView {
                label: SENT_LABEL,
                background: SENT_BACKGROUND,
            }
        } else {
            ButtonView {
                label: IDLE_LABEL,
                background: "",
            }
        }
    }
}
