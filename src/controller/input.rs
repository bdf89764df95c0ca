//! Platform-agnostic input handling
use std::collections::HashSet;

use glam::Vec2;

/// Platform-independent input events
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    KeyDown(String),
    KeyUp(String),

    /// Absolute pointer position plus the button held while moving, if any.
    PointerMoved { button: Option<MouseButton>, position: Vec2 },

    FocusLost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Held keys and drag tracking for the free-fly camera.
#[derive(Debug, Default)]
pub struct InputState {
    pub pressed_keys: HashSet<String>,
    pub dragging: bool,
    pub last_pointer: Vec2,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event. Returns the pointer movement in pixels when a drag
    /// with `rotate_button` produced one.
    pub fn process_event(&mut self, event: &InputEvent, rotate_button: MouseButton) -> Option<Vec2> {
        match event {
            InputEvent::KeyDown(key) => {
                self.key_down(key);
                None
            }
            InputEvent::KeyUp(key) => {
                self.key_up(key);
                None
            }
            InputEvent::PointerMoved { button, position } => {
                if *button == Some(rotate_button) {
                    self.drag_to(*position)
                } else {
                    self.dragging = false;
                    None
                }
            }
            InputEvent::FocusLost => {
                self.clear_keys();
                self.dragging = false;
                None
            }
        }
    }

    pub fn key_down(&mut self, key: &str) {
        self.pressed_keys.insert(key.to_ascii_lowercase());
    }

    /// Releasing any key stops all movement: the whole set is dropped, not
    /// just `_key`.
    pub fn key_up(&mut self, _key: &str) {
        self.clear_keys();
    }

    /// First sample of a drag only records the reference point.
    fn drag_to(&mut self, position: Vec2) -> Option<Vec2> {
        let delta = if self.dragging {
            Some(position - self.last_pointer)
        } else {
            self.dragging = true;
            None
        };
        self.last_pointer = position;
        delta
    }

    pub fn is_key_pressed(&self, key: &str) -> bool {
        self.pressed_keys.contains(&key.to_ascii_lowercase())
    }

    pub fn clear_keys(&mut self) {
        self.pressed_keys.clear();
    }
}

/// Key mapping configuration
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub forward: String,
    pub backward: String,
    pub left: String,
    pub right: String,
    pub rotate: MouseButton,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: "w".to_string(),
            backward: "s".to_string(),
            left: "a".to_string(),
            right: "d".to_string(),
            rotate: MouseButton::Middle,
        }
    }
}

impl KeyBindings {
    pub fn is_moving_forward(&self, input: &InputState) -> bool {
        input.is_key_pressed(&self.forward)
    }

    pub fn is_moving_backward(&self, input: &InputState) -> bool {
        input.is_key_pressed(&self.backward)
    }

    pub fn is_moving_left(&self, input: &InputState) -> bool {
        input.is_key_pressed(&self.left)
    }

    pub fn is_moving_right(&self, input: &InputState) -> bool {
        input.is_key_pressed(&self.right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drag(input: &mut InputState, x: f32, y: f32) -> Option<Vec2> {
        input.process_event(
            &InputEvent::PointerMoved {
                button: Some(MouseButton::Middle),
                position: Vec2::new(x, y),
            },
            MouseButton::Middle,
        )
    }

    fn hover(input: &mut InputState, x: f32, y: f32) -> Option<Vec2> {
        input.process_event(
            &InputEvent::PointerMoved {
                button: None,
                position: Vec2::new(x, y),
            },
            MouseButton::Middle,
        )
    }

    #[test]
    fn key_down_is_idempotent() {
        let mut input = InputState::new();
        input.key_down("W");
        input.key_down("w");
        input.key_down("W");
        assert_eq!(input.pressed_keys.len(), 1);
        assert!(input.is_key_pressed("w"));
    }

    #[test]
    fn any_key_up_clears_everything() {
        let sequences: [&[&str]; 4] = [&["w"], &["w", "d"], &["a", "s", "d", "w"], &["shift", "w", "q"]];
        for keys in sequences {
            for released in ["w", "q", "escape"] {
                let mut input = InputState::new();
                for key in keys {
                    input.process_event(&InputEvent::KeyDown(key.to_string()), MouseButton::Middle);
                }
                input.process_event(&InputEvent::KeyUp(released.to_string()), MouseButton::Middle);
                assert!(input.pressed_keys.is_empty(), "{keys:?} then release {released}");
            }
        }
    }

    #[test]
    fn first_drag_sample_only_sets_reference() {
        let mut input = InputState::new();
        assert_eq!(drag(&mut input, 100.0, 50.0), None);
        assert!(input.dragging);
        assert_eq!(input.last_pointer, Vec2::new(100.0, 50.0));
        assert_eq!(drag(&mut input, 130.0, 40.0), Some(Vec2::new(30.0, -10.0)));
        assert_eq!(drag(&mut input, 130.0, 40.0), Some(Vec2::ZERO));
    }

    #[test]
    fn release_between_drags_resets_reference() {
        let mut input = InputState::new();
        drag(&mut input, 0.0, 0.0);
        drag(&mut input, 10.0, 0.0);
        assert_eq!(hover(&mut input, 500.0, 500.0), None);
        assert!(!input.dragging);
        // no jump from (10, 0) to (600, 600)
        assert_eq!(drag(&mut input, 600.0, 600.0), None);
        assert_eq!(drag(&mut input, 605.0, 600.0), Some(Vec2::new(5.0, 0.0)));
    }

    #[test]
    fn other_buttons_do_not_rotate() {
        let mut input = InputState::new();
        let left = InputEvent::PointerMoved {
            button: Some(MouseButton::Left),
            position: Vec2::new(1.0, 1.0),
        };
        assert_eq!(input.process_event(&left, MouseButton::Middle), None);
        assert_eq!(input.process_event(&left, MouseButton::Middle), None);
        assert!(!input.dragging);
    }

    #[test]
    fn focus_loss_drops_keys_and_drag() {
        let mut input = InputState::new();
        input.key_down("a");
        drag(&mut input, 3.0, 4.0);
        input.process_event(&InputEvent::FocusLost, MouseButton::Middle);
        assert!(input.pressed_keys.is_empty());
        assert!(!input.dragging);
    }

    #[test]
    fn bindings_match_case_insensitively() {
        let bindings = KeyBindings::default();
        let mut input = InputState::new();
        input.key_down("D");
        assert!(bindings.is_moving_right(&input));
        assert!(!bindings.is_moving_left(&input));
    }
}
