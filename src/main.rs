use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use glam::Vec2;
use winit::{
    event::*,
    event_loop::{ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

// Import from the library crate
use meshview::{
    logging,
    config::EditorConfig,
    controller::{EditorSession, FrameDispatcher, InputEvent, MouseButton, ViewportSurface},
    view::TracingRenderer,
};

struct WindowSurface(Arc<Window>);

impl ViewportSurface for WindowSurface {
    fn client_size(&self) -> (u32, u32) {
        let size = self.0.inner_size();
        (size.width, size.height)
    }

    fn request_redraw(&self) {
        self.0.request_redraw();
    }
}

struct App {
    surface: WindowSurface,
    session: EditorSession,
    dispatcher: FrameDispatcher,
    renderer: TracingRenderer,
    tick_interval: Duration,
    next_tick: Instant,

    // Mouse buttons currently down
    left_down: bool,
    middle_down: bool,
    right_down: bool,
}

impl App {
    /// The button reported with pointer moves; chords report none.
    fn held_button(&self) -> Option<MouseButton> {
        match (self.left_down, self.middle_down, self.right_down) {
            (true, false, false) => Some(MouseButton::Left),
            (false, true, false) => Some(MouseButton::Middle),
            (false, false, true) => Some(MouseButton::Right),
            _ => None,
        }
    }

    fn input(&mut self, event: &WindowEvent) -> bool {
        let input = match event {
            WindowEvent::KeyboardInput { event: KeyEvent { state, physical_key, .. }, .. } => {
                let PhysicalKey::Code(code) = physical_key else {
                    return true;
                };
                match state {
                    ElementState::Pressed => InputEvent::KeyDown(key_name(*code)),
                    ElementState::Released => InputEvent::KeyUp(key_name(*code)),
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let down = *state == ElementState::Pressed;
                match button {
                    winit::event::MouseButton::Left => self.left_down = down,
                    winit::event::MouseButton::Middle => self.middle_down = down,
                    winit::event::MouseButton::Right => self.right_down = down,
                    _ => {}
                }
                return true;
            }
            WindowEvent::CursorMoved { position, .. } => InputEvent::PointerMoved {
                button: self.held_button(),
                position: Vec2::new(position.x as f32, position.y as f32),
            },
            WindowEvent::Focused(false) => {
                self.left_down = false;
                self.middle_down = false;
                self.right_down = false;
                InputEvent::FocusLost
            }
            _ => return false,
        };
        self.dispatcher.handle_input(&mut self.session, &input);
        true
    }

    fn tick(&mut self) {
        self.dispatcher.on_timer_tick(&mut self.session, &self.surface);
        // no catch-up: a slow frame pushes the next tick back
        self.next_tick = Instant::now() + self.tick_interval;
    }

    fn render(&mut self) {
        // failures are logged by the dispatcher; the next tick renders again
        let _ = self.dispatcher.on_render(&self.session, &mut self.renderer);
    }
}

/// Letters become lowercase ("w"), everything else keeps its code name.
fn key_name(code: KeyCode) -> String {
    let name = format!("{code:?}");
    match name.strip_prefix("Key") {
        Some(letter) => letter.to_ascii_lowercase(),
        None => name,
    }
}

fn run(config: EditorConfig) -> anyhow::Result<()> {
    let session = EditorSession::open(&config).context("failed to load scene")?;
    let dispatcher = FrameDispatcher::from_config(&config);

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    let window_attributes = Window::default_attributes()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(config.window.width, config.window.height));
    let window = event_loop
        .create_window(window_attributes)
        .context("failed to create window")?;
    let window = Arc::new(window);
    if config.window.borderless_maximized {
        window.set_decorations(false);
        window.set_maximized(true);
    }

    let tick_interval = config.tick_interval();
    let mut app = App {
        surface: WindowSurface(window.clone()),
        session,
        dispatcher,
        renderer: TracingRenderer::default(),
        tick_interval,
        next_tick: Instant::now() + tick_interval,
        left_down: false,
        middle_down: false,
        right_down: false,
    };
    // the first redraw can arrive before the first tick
    let (width, height) = app.surface.client_size();
    app.session.camera.update_view_projection(width, height);
    tracing::info!(interval_ms = config.tick_interval_ms, "viewer started");

    event_loop.run(move |event, elwt| {
        match event {
            Event::NewEvents(StartCause::ResumeTimeReached { .. }) => {
                app.tick();
                elwt.set_control_flow(ControlFlow::WaitUntil(app.next_tick));
            }
            Event::NewEvents(StartCause::Init) => {
                elwt.set_control_flow(ControlFlow::WaitUntil(app.next_tick));
            }
            Event::WindowEvent {
                ref event,
                window_id,
            } if window_id == app.surface.0.id() => {
                if !app.input(event) {
                    match event {
                        WindowEvent::CloseRequested => {
                            tracing::info!(
                                ticks = app.dispatcher.ticks,
                                frames = app.dispatcher.frames,
                                draws = app.renderer.submitted,
                                "viewer closing"
                            );
                            elwt.exit();
                        }
                        WindowEvent::RedrawRequested => app.render(),
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    })?;
    Ok(())
}

fn main() -> ExitCode {
    let config = EditorConfig::load();
    let log_config = config.as_ref().map(|c| c.log.clone()).unwrap_or_default();
    logging::init(&log_config);

    let result = config.map_err(anyhow::Error::from).and_then(run);
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
