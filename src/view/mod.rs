// VIEW: draw-call submission
pub mod renderer;

pub use renderer::{DrawCallParams, DrawUniforms, RenderError, Renderer, TracingRenderer};
