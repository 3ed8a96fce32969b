//! The navigation bar and the mobile menu.

/// Scroll offset in px past which the bar switches to its compact look.
pub const SCROLLED_AFTER: f32 = 80.0;

pub const SCROLLED_CLASS: &str = "scrolled";
/// Set on the toggle button while the menu is open.
pub const ACTIVE_CLASS: &str = "active";
/// Set on the link list while the menu is open.
pub const OPEN_CLASS: &str = "open";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Nav {
    scrolled: bool,
    menu_open: bool,
}

impl Nav {
    /// Returns `true` when the scrolled state flipped.
    pub fn on_scroll(&mut self, scroll_y: f32) -> bool {
        let scrolled = scroll_y > SCROLLED_AFTER;
        let changed = scrolled != self.scrolled;
        self.scrolled = scrolled;
        changed
    }

    pub fn toggle_menu(&mut self) -> bool {
        self.menu_open = !self.menu_open;
        self.menu_open
    }

    /// A link in the menu was followed.
    pub fn close_menu(&mut self) {
        self.menu_open = false;
    }

    pub fn is_scrolled(&self) -> bool {
        self.scrolled
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_exclusive() {
        let mut nav = Nav::default();
        assert!(!nav.on_scroll(80.0));
        assert!(!nav.is_scrolled());
        assert!(nav.on_scroll(80.5));
        assert!(nav.is_scrolled());
        assert!(!nav.on_scroll(400.0));
    }

    #[test]
    fn link_click_closes_the_menu() {
        let mut nav = Nav::default();
        assert!(nav.toggle_menu());
        nav.close_menu();
        assert!(!nav.is_menu_open());
        nav.close_menu();
        assert!(!nav.is_menu_open());
        assert!(nav.toggle_menu());
        assert!(!nav.toggle_menu());
    }
}
