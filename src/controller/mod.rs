// CONTROLLER: Input, camera update and frame loop
pub mod input;
pub mod camera_controller;
pub mod frame_loop;

pub use input::{InputEvent, InputState, KeyBindings, MouseButton};
pub use camera_controller::CameraController;
pub use frame_loop::{EditorSession, FrameDispatcher, ViewportSurface};
