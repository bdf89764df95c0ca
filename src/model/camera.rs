use glam::{Mat4, Vec2, Vec3};

use crate::config::CameraConfig;

/// Unit direction vectors derived from the camera angle.
///
/// Left-handed: at zero angle forward is +Z, right is +X and up is +Y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    pub forward: Vec3,
    pub backward: Vec3,
    pub left: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

impl Orientation {
    /// `angle.x` is yaw about +Y (positive turns right), `angle.y` is pitch
    /// (positive looks up).
    pub fn from_angle(angle: Vec2) -> Self {
        let (sy, cy) = angle.x.sin_cos();
        let (sp, cp) = angle.y.sin_cos();

        let forward = Vec3::new(sy * cp, sp, cy * cp);
        // kept horizontal so strafing never changes height
        let right = Vec3::new(cy, 0.0, -sy);
        let up = forward.cross(right);

        Self {
            forward,
            backward: -forward,
            left: -right,
            right,
            up,
        }
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Self::from_angle(Vec2::ZERO)
    }
}

#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub angle: Vec2,
    pub orientation: Orientation,
    pub view: Mat4,
    pub projection: Mat4,
    pub fov_y: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Camera {
    /// Matrices start derived for a 1x1 viewport; the first tick applies the
    /// real client size.
    pub fn new(config: &CameraConfig) -> Self {
        let mut camera = Self {
            position: config.start_position,
            angle: Vec2::ZERO,
            orientation: Orientation::default(),
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            fov_y: config.fov_y_degrees.to_radians(),
            z_near: config.z_near,
            z_far: config.z_far,
        };
        camera.update_orientation();
        camera.update_view_projection(1, 1);
        camera
    }

    pub fn update_orientation(&mut self) {
        self.orientation = Orientation::from_angle(self.angle);
    }

    /// Rebuild view and projection for a `width` x `height` viewport.
    ///
    /// A zero dimension is treated as 1 so a minimised window never yields a
    /// NaN aspect ratio.
    pub fn update_view_projection(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            tracing::debug!(width, height, "degenerate viewport, clamping to 1x1 minimum");
        }
        let aspect = width.max(1) as f32 / height.max(1) as f32;
        self.projection = Mat4::perspective_lh(self.fov_y, aspect, self.z_near, self.z_far);
        self.view = Mat4::look_to_lh(self.position, self.orientation.forward, self.orientation.up);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(&CameraConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn zero_angle_basis_is_left_handed_axes() {
        let o = Orientation::from_angle(Vec2::ZERO);
        assert!(o.forward.abs_diff_eq(Vec3::Z, 1e-6));
        assert!(o.backward.abs_diff_eq(-Vec3::Z, 1e-6));
        assert!(o.right.abs_diff_eq(Vec3::X, 1e-6));
        assert!(o.left.abs_diff_eq(-Vec3::X, 1e-6));
        assert!(o.up.abs_diff_eq(Vec3::Y, 1e-6));
    }

    #[test]
    fn basis_vectors_are_unit_and_orthogonal() {
        for angle in [Vec2::new(0.3, 0.2), Vec2::new(-2.0, 1.1), Vec2::new(4.0, -0.7)] {
            let o = Orientation::from_angle(angle);
            for v in [o.forward, o.backward, o.left, o.right, o.up] {
                assert!((v.length() - 1.0).abs() < 1e-5, "{v:?} is not unit length");
            }
            assert!(o.forward.dot(o.right).abs() < 1e-5);
            assert!(o.up.dot(o.right).abs() < 1e-5);
        }
    }

    #[test]
    fn positive_yaw_turns_right() {
        let o = Orientation::from_angle(Vec2::new(FRAC_PI_2, 0.0));
        assert!(o.forward.abs_diff_eq(Vec3::X, 1e-6));
        assert!(o.right.abs_diff_eq(-Vec3::Z, 1e-6));
    }

    #[test]
    fn positive_pitch_looks_up() {
        let o = Orientation::from_angle(Vec2::new(0.0, 0.5));
        assert!(o.forward.y > 0.0);
        assert!(o.up.z < 0.0);
    }

    #[test]
    fn straight_up_does_not_degenerate() {
        let mut cam = Camera::default();
        cam.angle = Vec2::new(0.0, FRAC_PI_2);
        cam.update_orientation();
        cam.update_view_projection(800, 600);
        assert!(cam.view.is_finite());
        assert!(cam.projection.is_finite());
    }

    #[test]
    fn view_projection_is_deterministic() {
        let mut a = Camera::default();
        a.position = Vec3::new(1.5, -2.0, 7.25);
        a.angle = Vec2::new(0.7, -0.3);
        a.update_orientation();
        a.update_view_projection(1920, 1080);
        let (view, projection) = (a.view, a.projection);

        a.update_orientation();
        a.update_view_projection(1920, 1080);
        assert_eq!(view.to_cols_array(), a.view.to_cols_array());
        assert_eq!(projection.to_cols_array(), a.projection.to_cols_array());

        let mut b = Camera::default();
        b.position = a.position;
        b.angle = a.angle;
        b.update_orientation();
        b.update_view_projection(1920, 1080);
        assert_eq!(a.view.to_cols_array(), b.view.to_cols_array());
        assert_eq!(a.projection.to_cols_array(), b.projection.to_cols_array());
    }

    #[test]
    fn zero_viewport_is_clamped() {
        let mut cam = Camera::default();
        cam.update_orientation();
        cam.update_view_projection(0, 0);
        assert!(cam.projection.is_finite());

        let mut square = Camera::default();
        square.update_orientation();
        square.update_view_projection(1, 1);
        assert_eq!(cam.projection, square.projection);
    }

    #[test]
    fn view_maps_target_onto_positive_depth() {
        let mut cam = Camera::default();
        cam.update_orientation();
        cam.update_view_projection(640, 480);
        let target = cam.position + cam.orientation.forward;
        let p = cam.view.transform_point3(target);
        assert!(p.abs_diff_eq(Vec3::new(0.0, 0.0, 1.0), 1e-5));
    }

    #[test]
    fn new_camera_has_derived_matrices() {
        let cam = Camera::default();
        let expected_view = Mat4::look_to_lh(Vec3::new(0.0, 0.0, 10.0), Vec3::Z, Vec3::Y);
        assert!(cam.view.abs_diff_eq(expected_view, 1e-6));
        assert_ne!(cam.projection, Mat4::IDENTITY);

        let mut square = Camera::default();
        square.update_view_projection(1, 1);
        assert_eq!(cam.projection, square.projection);
    }
}
