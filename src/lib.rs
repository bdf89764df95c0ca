// Re-export all public modules so they can be used from main.rs
pub mod config;
pub mod logging;
pub mod resources;

// MVC Architecture
pub mod model;
pub mod view;
pub mod controller;

pub use config::{ConfigError, EditorConfig};
pub use controller::{EditorSession, FrameDispatcher, InputEvent, MouseButton, ViewportSurface};
pub use resources::ResourceError;
pub use view::{DrawCallParams, RenderError, Renderer};

/// Anything that can stop the viewer.
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Resource(#[from] ResourceError),
    #[error(transparent)]
    Render(#[from] RenderError),
}
