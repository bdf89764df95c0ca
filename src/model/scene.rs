use std::time::Instant;

use glam::{Mat4, Quat, Vec3};

use crate::config::{MaterialPaths, SceneManifest};
use crate::resources::{ModelHandle, ResourceError, ResourceManager, TextureHandle};

/// The four PBR maps bound to one draw.
#[derive(Debug, Clone)]
pub struct MaterialSet {
    pub diffuse: TextureHandle,
    pub normal: TextureHandle,
    pub metallic: TextureHandle,
    pub roughness: TextureHandle,
}

impl MaterialSet {
    pub fn load(paths: &MaterialPaths, resources: &mut ResourceManager) -> Result<Self, ResourceError> {
        Ok(Self {
            diffuse: resources.load(&paths.diffuse)?,
            normal: resources.load(&paths.normal)?,
            metallic: resources.load(&paths.metallic)?,
            roughness: resources.load(&paths.roughness)?,
        })
    }
}

/// Monotonic clock for the spin animation.
#[derive(Debug, Clone, Copy)]
pub struct Timebase {
    start: Instant,
}

impl Timebase {
    pub fn start() -> Self {
        Self { start: Instant::now() }
    }

    pub fn elapsed_secs(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }
}

impl Default for Timebase {
    fn default() -> Self {
        Self::start()
    }
}

/// One object to draw this frame.
#[derive(Debug)]
pub struct DrawItem<'a> {
    pub model: &'a ModelHandle,
    pub world: Mat4,
    pub material: &'a MaterialSet,
}

/// Spinning foreground instances of one model on top of a ground plane.
#[derive(Debug)]
pub struct Scene {
    pub model: ModelHandle,
    /// One instance per material set, in submission order.
    pub instances: Vec<MaterialSet>,
    pub first_instance_x: f32,
    pub instance_spacing: f32,
    /// Radians per second about +Y.
    pub spin_rate: f32,
    pub ground: ModelHandle,
    pub ground_material: MaterialSet,
    pub ground_transform: Mat4,
    pub environment_map: TextureHandle,
}

impl Scene {
    pub fn load(
        manifest: &SceneManifest,
        spin_rate: f32,
        resources: &mut ResourceManager,
    ) -> Result<Self, ResourceError> {
        let model = resources.load(&manifest.model)?;
        let ground = resources.load(&manifest.ground_model)?;

        let instances = manifest
            .instance_materials
            .iter()
            .map(|paths| MaterialSet::load(paths, resources))
            .collect::<Result<Vec<_>, _>>()?;
        let ground_material = MaterialSet::load(&manifest.ground_material, resources)?;
        let environment_map = resources.load(&manifest.environment_map)?;

        tracing::info!(
            model = %manifest.model,
            instances = instances.len(),
            ground = %manifest.ground_model,
            cached = resources.cached(),
            "scene loaded"
        );

        Ok(Self {
            model,
            instances,
            first_instance_x: manifest.first_instance_x,
            instance_spacing: manifest.instance_spacing,
            spin_rate,
            ground,
            ground_material,
            ground_transform: Self::ground_transform(manifest.ground_scale, manifest.ground_offset),
            environment_map,
        })
    }

    /// Uniform scale, then offset.
    pub fn ground_transform(scale: f32, offset: Vec3) -> Mat4 {
        Mat4::from_scale_rotation_translation(Vec3::splat(scale), Quat::IDENTITY, offset)
    }

    /// Spin about +Y in place, then move out to the instance's slot.
    pub fn instance_transform(&self, index: usize, elapsed_secs: f32) -> Mat4 {
        let x = self.first_instance_x + index as f32 * self.instance_spacing;
        Mat4::from_translation(Vec3::new(x, 0.0, 0.0))
            * Mat4::from_rotation_y(elapsed_secs * self.spin_rate)
    }

    /// All foreground instances first, then the ground.
    pub fn draw_list(&self, elapsed_secs: f32) -> impl Iterator<Item = DrawItem<'_>> + '_ {
        let foreground = self.instances.iter().enumerate().map(move |(i, material)| DrawItem {
            model: &self.model,
            world: self.instance_transform(i, elapsed_secs),
            material,
        });
        let ground = std::iter::once(DrawItem {
            model: &self.ground,
            world: self.ground_transform,
            material: &self.ground_material,
        });
        foreground.chain(ground)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instances_spread_along_x_at_time_zero() {
        let scene = fixtures::scene();
        let xs: Vec<f32> = scene
            .draw_list(0.0)
            .take(3)
            .map(|item| item.world.transform_point3(Vec3::ZERO).x)
            .collect();
        assert_eq!(xs, vec![-3.0, 0.0, 3.0]);
    }

    #[test]
    fn instances_spin_in_place() {
        let scene = fixtures::scene();
        // 0.2 rad/s for 5 s -> one radian
        let world = scene.instance_transform(2, 5.0);
        assert!(world.transform_point3(Vec3::ZERO).abs_diff_eq(Vec3::new(3.0, 0.0, 0.0), 1e-5));

        let tip = world.transform_point3(Vec3::Z);
        let expected = Vec3::new(3.0 + 1f32.sin(), 0.0, 1f32.cos());
        assert!(tip.abs_diff_eq(expected, 1e-5), "{tip:?} != {expected:?}");
    }

    #[test]
    fn ground_is_scaled_then_lowered() {
        let scene = fixtures::scene();
        let corner = scene.ground_transform.transform_point3(Vec3::new(1.0, 0.0, 1.0));
        assert!(corner.abs_diff_eq(Vec3::new(10.0, -1.7, 10.0), 1e-5));
    }

    #[test]
    fn ground_comes_last() {
        let scene = fixtures::scene();
        let names: Vec<&str> = scene.draw_list(1.0).map(|item| item.material.diffuse.name()).collect();
        assert_eq!(names, vec!["t0_c", "t1_c", "t2_c", "floor_c"]);
        let last = scene.draw_list(1.0).last().unwrap();
        assert!(last.model.ptr_eq(&scene.ground));
    }

    #[test]
    fn timebase_is_monotonic() {
        let clock = Timebase::start();
        let a = clock.elapsed_secs();
        let b = clock.elapsed_secs();
        assert!(b >= a);
    }
}
