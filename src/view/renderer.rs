use glam::{Mat4, Vec3};

use crate::model::MaterialSet;
use crate::resources::{ModelHandle, TextureHandle};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("draw of `{model}` rejected: {reason}")]
    Submission { model: String, reason: String },
}

/// Everything the renderer needs for one draw call.
#[derive(Debug, Clone)]
pub struct DrawCallParams {
    pub world: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    pub camera_position: Vec3,
    pub material: MaterialSet,
    pub environment_map: TextureHandle,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawUniforms {
    pub world: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    /// xyz = camera position, w = 1
    pub camera_position: [f32; 4],
}

impl DrawCallParams {
    pub fn uniforms(&self) -> DrawUniforms {
        DrawUniforms {
            world: self.world.to_cols_array_2d(),
            view: self.view.to_cols_array_2d(),
            projection: self.projection.to_cols_array_2d(),
            camera_position: self.camera_position.extend(1.0).to_array(),
        }
    }
}

/// Backend that turns draw calls into pixels.
pub trait Renderer {
    fn draw_model(&mut self, model: &ModelHandle, params: &DrawCallParams) -> Result<(), RenderError>;
}

/// Logs every submission instead of drawing it.
#[derive(Debug, Default)]
pub struct TracingRenderer {
    pub submitted: u64,
}

impl Renderer for TracingRenderer {
    fn draw_model(&mut self, model: &ModelHandle, params: &DrawCallParams) -> Result<(), RenderError> {
        self.submitted += 1;
        let origin = params.world.transform_point3(Vec3::ZERO);
        tracing::trace!(
            model = model.name(),
            diffuse = params.material.diffuse.name(),
            environment = params.environment_map.name(),
            x = origin.x,
            y = origin.y,
            z = origin.z,
            uniform_bytes = bytemuck::bytes_of(&params.uniforms()).len(),
            "draw_model"
        );
        Ok(())
    }
}
