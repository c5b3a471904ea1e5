//! Keyboard and mouse state, fed by window events.
//!
//! Each [`Input`] keeps the set of held buttons plus the edges seen since
//! the last frame. Edges are cleared by the frame loop after the frame has
//! been drawn, so every system in a frame (update, fixed, draw, UI) sees the
//! same edges.

use std::collections::HashSet;
use std::hash::Hash;

pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;

use crate::math::Vec2;

/// Held state and per-frame edges for one kind of button.
#[derive(Debug, Clone)]
pub struct Input<T: Eq + Hash + Copy> {
    held: HashSet<T>,
    went_down: HashSet<T>,
    went_up: HashSet<T>,
}

impl<T: Eq + Hash + Copy> Input<T> {
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
            went_down: HashSet::new(),
            went_up: HashSet::new(),
        }
    }

    pub fn pressed(&self, button: T) -> bool {
        self.held.contains(&button)
    }

    /// Went down during this frame.
    pub fn just_pressed(&self, button: T) -> bool {
        self.went_down.contains(&button)
    }

    /// Went up during this frame.
    pub fn just_released(&self, button: T) -> bool {
        self.went_up.contains(&button)
    }

    /// Record a press. OS key repeats arrive as presses of a held button and
    /// produce no edge.
    pub fn press(&mut self, button: T) {
        if self.held.insert(button) {
            self.went_down.insert(button);
        }
    }

    pub fn release(&mut self, button: T) {
        if self.held.remove(&button) {
            self.went_up.insert(button);
        }
    }

    /// Forget this frame's edges. Held buttons stay held.
    pub fn clear_just(&mut self) {
        self.went_down.clear();
        self.went_up.clear();
    }
}

impl<T: Eq + Hash + Copy> Default for Input<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Mouse cursor position in window coordinates (origin top-left, y down).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CursorPosition {
    pub x: f32,
    pub y: f32,
}

impl CursorPosition {
    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

// ── InputState ──────────────────────────────────────────────────────────

/// Keyboard and mouse together. The plain `pressed`/`just_*` methods ask
/// about keys; the `mouse_*` ones about buttons.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub keys: Input<KeyCode>,
    pub mouse: Input<MouseButton>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pressed(&self, key: KeyCode) -> bool {
        self.keys.pressed(key)
    }

    pub fn just_pressed(&self, key: KeyCode) -> bool {
        self.keys.just_pressed(key)
    }

    pub fn just_released(&self, key: KeyCode) -> bool {
        self.keys.just_released(key)
    }

    pub fn mouse_pressed(&self, button: MouseButton) -> bool {
        self.mouse.pressed(button)
    }

    pub fn mouse_just_pressed(&self, button: MouseButton) -> bool {
        self.mouse.just_pressed(button)
    }

    pub fn mouse_just_released(&self, button: MouseButton) -> bool {
        self.mouse.just_released(button)
    }

    pub(crate) fn clear_just(&mut self) {
        self.keys.clear_just();
        self.mouse.clear_just();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_release_cycle() {
        let mut keys = Input::new();
        keys.press(KeyCode::Space);
        assert!(keys.pressed(KeyCode::Space));
        assert!(keys.just_pressed(KeyCode::Space));

        keys.clear_just();
        keys.press(KeyCode::Space);
        assert!(keys.pressed(KeyCode::Space));
        assert!(!keys.just_pressed(KeyCode::Space));

        keys.release(KeyCode::Space);
        assert!(!keys.pressed(KeyCode::Space));
        assert!(keys.just_released(KeyCode::Space));
        keys.clear_just();
        assert!(!keys.just_released(KeyCode::Space));
    }

    #[test]
    fn releasing_an_unpressed_input_is_ignored() {
        let mut mouse = Input::new();
        mouse.release(MouseButton::Left);
        assert!(!mouse.just_released(MouseButton::Left));
    }
}
