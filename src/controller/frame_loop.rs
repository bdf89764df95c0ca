use crate::config::EditorConfig;
use crate::controller::camera_controller::CameraController;
use crate::controller::input::{InputEvent, InputState};
use crate::model::{Camera, Scene, Timebase};
use crate::resources::{FileResolver, ResourceManager};
use crate::view::{DrawCallParams, RenderError, Renderer};
use crate::ViewerError;

/// The window area the camera renders into.
pub trait ViewportSurface {
    /// Client area in physical pixels.
    fn client_size(&self) -> (u32, u32);

    /// Schedule a render; the shell answers with `FrameDispatcher::on_render`.
    fn request_redraw(&self);
}

/// All mutable state of one viewer session, owned by the application.
#[derive(Debug)]
pub struct EditorSession {
    pub camera: Camera,
    pub input: InputState,
    pub scene: Scene,
    pub timebase: Timebase,
}

impl EditorSession {
    pub fn new(config: &EditorConfig, scene: Scene) -> Self {
        Self {
            camera: Camera::new(&config.camera),
            input: InputState::new(),
            scene,
            timebase: Timebase::start(),
        }
    }

    /// Load every resource the scene needs from the content root.
    ///
    /// Any missing or unreadable resource aborts startup.
    pub fn open(config: &EditorConfig) -> Result<Self, ViewerError> {
        config.validate()?;
        let mut resources =
            ResourceManager::with_default_loaders(FileResolver::new(&config.content_root));
        let scene = Scene::load(&config.scene, config.spin_rate, &mut resources)?;
        tracing::info!(content_root = %config.content_root.display(), "editor session opened");
        Ok(Self::new(config, scene))
    }
}

/// Main loop: input routing, fixed-step camera update and draw submission.
#[derive(Debug, Clone, Default)]
pub struct FrameDispatcher {
    pub camera_controller: CameraController,
    pub ticks: u64,
    pub frames: u64,
}

impl FrameDispatcher {
    pub fn new(camera_controller: CameraController) -> Self {
        Self {
            camera_controller,
            ticks: 0,
            frames: 0,
        }
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(CameraController::from_config(config))
    }

    /// Route one input event; drags rotate the camera immediately.
    pub fn handle_input(&self, session: &mut EditorSession, event: &InputEvent) {
        let rotate = self.camera_controller.bindings.rotate;
        if let Some(delta) = session.input.process_event(event, rotate) {
            self.camera_controller.apply_drag(&mut session.camera, delta);
        }
    }

    /// One timer tick: orientation, movement, matrices, then a redraw request.
    pub fn on_timer_tick<S: ViewportSurface + ?Sized>(&mut self, session: &mut EditorSession, surface: &S) {
        self.ticks += 1;
        let camera = &mut session.camera;
        camera.update_orientation();
        self.camera_controller.tick(camera, &session.input);

        let (width, height) = surface.client_size();
        camera.update_view_projection(width, height);
        surface.request_redraw();
    }

    /// Submit the scene at the session's current time.
    pub fn on_render<R: Renderer + ?Sized>(
        &mut self,
        session: &EditorSession,
        renderer: &mut R,
    ) -> Result<usize, RenderError> {
        let elapsed = session.timebase.elapsed_secs();
        self.render_at(session, renderer, elapsed)
    }

    /// Submit every draw of the frame, foreground then ground.
    ///
    /// The first rejected draw abandons the rest of the frame; the next frame
    /// starts over. Returns the number of draws submitted.
    pub fn render_at<R: Renderer + ?Sized>(
        &mut self,
        session: &EditorSession,
        renderer: &mut R,
        elapsed_secs: f32,
    ) -> Result<usize, RenderError> {
        let camera = &session.camera;
        let scene = &session.scene;

        let mut submitted = 0;
        for item in scene.draw_list(elapsed_secs) {
            let params = DrawCallParams {
                world: item.world,
                view: camera.view,
                projection: camera.projection,
                camera_position: camera.position,
                material: item.material.clone(),
                environment_map: scene.environment_map.clone(),
            };
            if let Err(err) = renderer.draw_model(item.model, &params) {
                tracing::warn!(frame = self.frames, submitted, error = %err, "frame skipped");
                return Err(err);
            }
            submitted += 1;
        }
        self.frames += 1;
        Ok(submitted)
    }
}
