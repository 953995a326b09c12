//! Input debouncing
//!
//! Keyboard, mouse and touch all collapse into one "activation" signal. A held
//! key or pointer produces exactly one activation until it is released.

/// Key that activates (matches `KeyboardEvent.code`)
pub const ACTIVATION_KEY: &str = "Space";

/// Tracks which sources are currently held
#[derive(Debug, Clone, Default)]
pub struct ActivationFilter {
    key_held: bool,
    pointer_held: bool,
    touches_held: u32,
    pending: bool,
}

impl ActivationFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the key press counts as an activation
    pub fn key_down(&mut self, code: &str, repeat: bool) -> bool {
        if code != ACTIVATION_KEY || repeat || self.key_held {
            return false;
        }
        self.key_held = true;
        self.fire()
    }

    pub fn key_up(&mut self, code: &str) {
        if code == ACTIVATION_KEY {
            self.key_held = false;
        }
    }

    pub fn pointer_down(&mut self) -> bool {
        if self.pointer_held {
            return false;
        }
        self.pointer_held = true;
        self.fire()
    }

    pub fn pointer_up(&mut self) {
        self.pointer_held = false;
    }

    /// `active_touches` is the number of touches on the surface after the event
    pub fn touch_start(&mut self, active_touches: u32) -> bool {
        let first = self.touches_held == 0;
        self.touches_held = active_touches;
        if first { self.fire() } else { false }
    }

    pub fn touch_end(&mut self, active_touches: u32) {
        self.touches_held = active_touches;
    }

    /// Forget held state (e.g. the page lost focus and releases were missed)
    pub fn release_all(&mut self) {
        self.key_held = false;
        self.pointer_held = false;
        self.touches_held = 0;
    }

    /// Consume the pending activation, if any
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    fn fire(&mut self) -> bool {
        self.pending = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_held_key_fires_once() {
        let mut filter = ActivationFilter::new();
        assert!(filter.key_down("Space", false));
        assert!(!filter.key_down("Space", true));
        assert!(!filter.key_down("Space", false));
        filter.key_up("Space");
        assert!(filter.key_down("Space", false));
    }

    #[test]
    fn test_other_keys_ignored() {
        let mut filter = ActivationFilter::new();
        assert!(!filter.key_down("KeyA", false));
        assert!(!filter.take());
    }

    #[test]
    fn test_pointer_and_touch() {
        let mut filter = ActivationFilter::new();
        assert!(filter.pointer_down());
        assert!(!filter.pointer_down());
        filter.pointer_up();
        assert!(filter.pointer_down());

        assert!(filter.touch_start(1));
        assert!(!filter.touch_start(2));
        filter.touch_end(1);
        assert!(!filter.touch_start(2));
        filter.touch_end(0);
        assert!(filter.touch_start(1));
    }

    #[test]
    fn test_take_collapses_gestures() {
        let mut filter = ActivationFilter::new();
        assert!(!filter.take());
        filter.key_down("Space", false);
        filter.pointer_down();
        assert!(filter.take());
        assert!(!filter.take());
    }

    #[test]
    fn test_release_all_unsticks() {
        let mut filter = ActivationFilter::new();
        filter.key_down("Space", false);
        filter.release_all();
        assert!(filter.key_down("Space", false));
    }
}
