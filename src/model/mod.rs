// MODEL: camera and scene state
pub mod camera;
pub mod scene;

pub use camera::{Camera, Orientation};
pub use scene::{DrawItem, MaterialSet, Scene, Timebase};
