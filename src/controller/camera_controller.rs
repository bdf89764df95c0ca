use glam::{Vec2, Vec3};

use crate::config::EditorConfig;
use crate::controller::input::{InputState, KeyBindings};
use crate::model::{Camera, Orientation};

/// Handles camera movement and orientation
#[derive(Debug, Clone)]
pub struct CameraController {
    /// World units per tick per held key. There is no delta time: speed is
    /// tied to the tick cadence.
    pub move_step: f32,
    /// Pixels of drag per radian.
    pub drag_sensitivity: f32,
    pub bindings: KeyBindings,
}

impl CameraController {
    pub fn new(move_step: f32, drag_sensitivity: f32) -> Self {
        Self {
            move_step,
            drag_sensitivity,
            bindings: KeyBindings::default(),
        }
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(config.move_step, config.drag_sensitivity)
    }

    /// Apply a drag of `delta` pixels: right turns right, up looks up.
    pub fn apply_drag(&self, camera: &mut Camera, delta: Vec2) {
        camera.angle += Vec2::new(delta.x, -delta.y) / self.drag_sensitivity;
    }

    /// Sum of the basis vectors of every held movement key, unscaled.
    ///
    /// Not normalised: forward + right is sqrt(2) times longer than forward.
    pub fn movement_delta(&self, orientation: &Orientation, input: &InputState) -> Vec3 {
        let mut delta = Vec3::ZERO;
        if self.bindings.is_moving_forward(input) {
            delta += orientation.forward;
        }
        if self.bindings.is_moving_backward(input) {
            delta += orientation.backward;
        }
        if self.bindings.is_moving_left(input) {
            delta += orientation.left;
        }
        if self.bindings.is_moving_right(input) {
            delta += orientation.right;
        }
        delta
    }

    /// Move the camera by one step of held input.
    pub fn tick(&self, camera: &mut Camera, input: &InputState) {
        let delta = self.movement_delta(&camera.orientation, input);
        camera.position += delta * self.move_step;
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::from_config(&EditorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::SQRT_2;

    fn held(keys: &[&str]) -> InputState {
        let mut input = InputState::new();
        for key in keys {
            input.key_down(key);
        }
        input
    }

    #[test]
    fn delta_is_unnormalised_sum_for_every_combination() {
        let controller = CameraController::default();
        let o = Orientation::from_angle(Vec2::new(0.4, -0.25));
        let keys = ["w", "s", "a", "d"];
        let basis = [o.forward, o.backward, o.left, o.right];

        for mask in 0u8..16 {
            let chosen: Vec<&str> = (0..4).filter(|i| mask & (1 << i) != 0).map(|i| keys[i]).collect();
            let expected = (0..4)
                .filter(|i| mask & (1 << i) != 0)
                .fold(Vec3::ZERO, |acc, i| acc + basis[i]);
            let delta = controller.movement_delta(&o, &held(&chosen));
            assert!(delta.abs_diff_eq(expected, 1e-6), "{chosen:?}: {delta:?} != {expected:?}");
        }
    }

    #[test]
    fn diagonal_is_faster() {
        let controller = CameraController::default();
        let o = Orientation::default();
        let single = controller.movement_delta(&o, &held(&["w"])).length();
        let diagonal = controller.movement_delta(&o, &held(&["w", "d"])).length();
        assert!((single - 1.0).abs() < 1e-6);
        assert!((diagonal - SQRT_2).abs() < 1e-6);
    }

    #[test]
    fn opposite_keys_cancel() {
        let controller = CameraController::default();
        let o = Orientation::from_angle(Vec2::new(1.0, 0.3));
        let delta = controller.movement_delta(&o, &held(&["w", "s"]));
        assert!(delta.abs_diff_eq(Vec3::ZERO, 1e-6));
    }

    #[test]
    fn tick_scales_by_step() {
        let controller = CameraController::default();
        let mut camera = Camera::default();
        camera.update_orientation();
        controller.tick(&mut camera, &held(&["d"]));
        assert!(camera.position.abs_diff_eq(Vec3::new(0.2, 0.0, 10.0), 1e-6));
    }

    #[test]
    fn no_keys_no_motion() {
        let controller = CameraController::default();
        let mut camera = Camera::default();
        camera.update_orientation();
        let before = camera.position;
        controller.tick(&mut camera, &InputState::new());
        assert_eq!(camera.position, before);
    }

    #[test]
    fn drag_maps_pixels_to_radians() {
        let controller = CameraController::default();
        let mut camera = Camera::default();
        controller.apply_drag(&mut camera, Vec2::new(40.0, 20.0));
        assert!(camera.angle.abs_diff_eq(Vec2::new(0.2, -0.1), 1e-6));
        controller.apply_drag(&mut camera, Vec2::ZERO);
        assert!(camera.angle.abs_diff_eq(Vec2::new(0.2, -0.1), 1e-6));
    }
}
