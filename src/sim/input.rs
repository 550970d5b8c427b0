//! Per-tick input snapshot
//!
//! The core only ever sees [`Actions`]. Key codes are mapped once, at the
//! adapter boundary, by [`Actions::from_key_code`].

use bitflags::bitflags;

bitflags! {
    /// A set of player actions
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Actions: u8 {
        const MOVE_LEFT  = 1 << 0;
        const MOVE_RIGHT = 1 << 1;
        const JUMP       = 1 << 2;
        const DASH       = 1 << 3;
    }
}

impl Actions {
    /// Map a DOM-style key code to its action. Unknown keys map to nothing.
    pub fn from_key_code(code: &str) -> Option<Actions> {
        match code {
            "ArrowLeft" | "KeyA" => Some(Actions::MOVE_LEFT),
            "ArrowRight" | "KeyD" => Some(Actions::MOVE_RIGHT),
            "Space" | "KeyW" => Some(Actions::JUMP),
            "KeyQ" | "ShiftLeft" => Some(Actions::DASH),
            _ => None,
        }
    }

    /// Parse a name as used in replay scripts (`left`, `right`, `jump`, `dash`)
    pub fn from_script_name(name: &str) -> Option<Actions> {
        match name.to_lowercase().as_str() {
            "left" => Some(Actions::MOVE_LEFT),
            "right" => Some(Actions::MOVE_RIGHT),
            "jump" => Some(Actions::JUMP),
            "dash" => Some(Actions::DASH),
            _ => None,
        }
    }
}

/// Input for one tick: what is held, and what went down this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub held: Actions,
    pub just_pressed: Actions,
}

impl InputSnapshot {
    /// Snapshot with `held` down, none of it newly pressed
    pub fn holding(held: Actions) -> Self {
        Self {
            held,
            just_pressed: Actions::empty(),
        }
    }

    /// Snapshot where `pressed` went down this tick (and is therefore held)
    pub fn pressing(pressed: Actions) -> Self {
        Self {
            held: pressed,
            just_pressed: pressed,
        }
    }

    #[inline]
    pub fn is_held(&self, action: Actions) -> bool {
        self.held.contains(action)
    }

    #[inline]
    pub fn was_pressed(&self, action: Actions) -> bool {
        self.just_pressed.contains(action)
    }

    /// Horizontal intent: -1 left, 1 right, 0 neither. Left wins when both
    /// are held.
    pub fn horizontal(&self) -> i8 {
        if self.is_held(Actions::MOVE_LEFT) {
            -1
        } else if self.is_held(Actions::MOVE_RIGHT) {
            1
        } else {
            0
        }
    }

    /// Apply a key-down event. Repeats of an already-held key are not edges.
    pub fn key_down(&mut self, code: &str) {
        if let Some(action) = Actions::from_key_code(code) {
            if !self.held.contains(action) {
                self.just_pressed.insert(action);
            }
            self.held.insert(action);
        }
    }

    /// Apply a key-up event
    pub fn key_up(&mut self, code: &str) {
        if let Some(action) = Actions::from_key_code(code) {
            self.held.remove(action);
        }
    }

    /// Forget this tick's edges. The caller does this after every tick.
    pub fn clear_just_pressed(&mut self) {
        self.just_pressed = Actions::empty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_codes_map_to_actions() {
        assert_eq!(Actions::from_key_code("KeyA"), Some(Actions::MOVE_LEFT));
        assert_eq!(Actions::from_key_code("ArrowRight"), Some(Actions::MOVE_RIGHT));
        assert_eq!(Actions::from_key_code("Space"), Some(Actions::JUMP));
        assert_eq!(Actions::from_key_code("ShiftLeft"), Some(Actions::DASH));
        assert_eq!(Actions::from_key_code("KeyZ"), None);
    }

    #[test]
    fn test_key_down_edge_only_once() {
        let mut input = InputSnapshot::default();
        input.key_down("Space");
        assert!(input.was_pressed(Actions::JUMP));
        input.clear_just_pressed();

        // Auto-repeat while held is not a new press
        input.key_down("Space");
        assert!(!input.was_pressed(Actions::JUMP));
        assert!(input.is_held(Actions::JUMP));

        input.key_up("Space");
        input.key_down("KeyW");
        assert!(input.was_pressed(Actions::JUMP));
    }

    #[test]
    fn test_script_names() {
        assert_eq!(Actions::from_script_name("left"), Some(Actions::MOVE_LEFT));
        assert_eq!(Actions::from_script_name("Dash"), Some(Actions::DASH));
        assert_eq!(Actions::from_script_name("MOVE_LEFT"), None);
        // Flag names still go through the bitflags parser
        assert_eq!(Actions::from_name("MOVE_LEFT"), Some(Actions::MOVE_LEFT));
        assert_eq!(Actions::from_name("left"), None);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let mut input = InputSnapshot::default();
        input.key_down("F13");
        input.key_up("Escape");
        assert_eq!(input, InputSnapshot::default());
    }

    #[test]
    fn test_horizontal_prefers_left() {
        assert_eq!(InputSnapshot::holding(Actions::MOVE_LEFT | Actions::MOVE_RIGHT).horizontal(), -1);
        assert_eq!(InputSnapshot::holding(Actions::MOVE_RIGHT).horizontal(), 1);
        assert_eq!(InputSnapshot::default().horizontal(), 0);
    }
}
