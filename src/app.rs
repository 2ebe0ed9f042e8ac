//! Window host: runs a [`SceneGraph`] inside a winit event loop.

use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::{
    config::AppConfig,
    error::{Result, SceneError},
    gfx::{
        camera::{OrbitControls, PerspectiveCamera},
        render_loop::{FrameScheduler, RenderContext, RenderLoop},
        rendering::RenderEngine,
        scene::SceneGraph,
    },
};

/// Schedules frames through the window's redraw requests
struct RedrawScheduler<'a>(&'a Window);

impl FrameScheduler for RedrawScheduler<'_> {
    fn schedule_next_frame(&mut self) {
        self.0.request_redraw();
    }
}

/// Opens a window and draws a scene until the window is closed
///
/// ```no_run
/// use vignette::{config::AppConfig, gfx::scene::SceneGraph, App};
///
/// App::new(AppConfig::default(), SceneGraph::new()).run().unwrap();
/// ```
pub struct App {
    config: AppConfig,
    scene: SceneGraph,
}

impl App {
    pub fn new(config: AppConfig, scene: SceneGraph) -> Self {
        Self { config, scene }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut SceneGraph {
        &mut self.scene
    }

    /// Runs the event loop (consumes self)
    ///
    /// Returns the error that stopped the loop, if any: a window or renderer
    /// that could not be created, or a fatal frame error.
    pub fn run(self) -> Result<()> {
        let stats = self.scene.statistics();
        log::info!(
            "Starting with {} objects, {} lights, {} triangles",
            stats.object_count,
            stats.light_count,
            stats.total_triangles
        );

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut state = AppState {
            config: self.config,
            scene: Some(self.scene),
            window: None,
            context: None,
            render_loop: RenderLoop::new(),
            error: None,
        };
        event_loop.run_app(&mut state)?;

        log::info!("Event loop finished after {} frames", state.render_loop.frames());
        match state.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

struct AppState {
    config: AppConfig,
    /// Handed to the render context once the window exists
    scene: Option<SceneGraph>,
    window: Option<Arc<Window>>,
    context: Option<RenderContext<RenderEngine>>,
    render_loop: RenderLoop,
    error: Option<SceneError>,
}

impl AppState {
    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let settings = &self.config.window;
        let window = Arc::new(
            event_loop.create_window(
                Window::default_attributes()
                    .with_title(settings.title.clone())
                    .with_inner_size(LogicalSize::new(settings.width, settings.height)),
            )?,
        );

        let PhysicalSize { width, height } = window.inner_size();
        let renderer = pollster::block_on(RenderEngine::new(
            window.clone(),
            width,
            height,
            &self.config.renderer,
        ))?;

        let aspect = width.max(1) as f32 / height.max(1) as f32;
        let camera = PerspectiveCamera::from_config(&self.config.camera, aspect);
        let controls = self
            .config
            .controls
            .enabled
            .then(|| OrbitControls::new(&camera, &self.config.controls));

        let scene = self.scene.take().unwrap_or_default();
        let mut context = RenderContext::new(scene, camera, renderer);
        if let Some(controls) = controls {
            context = context.with_controls(controls);
        }

        self.render_loop.start(&mut RedrawScheduler(&window));
        self.context = Some(context);
        self.window = Some(window);
        Ok(())
    }

    /// Keeps going on recoverable errors, otherwise records the error and exits
    fn handle_result(&mut self, result: Result<bool>, event_loop: &ActiveEventLoop) {
        match result {
            Ok(_) => {}
            Err(err) if err.is_recoverable() => {
                log::debug!("Recovered from: {}", err);
            }
            Err(err) => {
                log::error!("Stopping: {}", err);
                self.error = Some(err);
                event_loop.exit();
            }
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(err) = self.start(event_loop) {
            log::error!("Startup failed: {}", err);
            self.error = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let (Some(window), Some(context)) = (self.window.as_ref(), self.context.as_mut()) else {
            return;
        };
        if window.id() != window_id {
            return;
        }

        let result = match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                log::info!("Exit requested");
                event_loop.exit();
                return;
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                context.on_resize(width, height)
            }
            WindowEvent::RedrawRequested => self
                .render_loop
                .tick(context, &mut RedrawScheduler(window)),
            other => {
                if let Some(controls) = context.controls.as_mut() {
                    controls.process_window_event(&other);
                }
                return;
            }
        };

        self.handle_result(result, event_loop);
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let Some(controls) = self
            .context
            .as_mut()
            .and_then(|context| context.controls.as_mut())
        {
            controls.process_device_event(&event);
        }
    }
}
