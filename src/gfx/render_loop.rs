//! # Frame Loop
//!
//! [`RenderLoop`] decides *when* a frame is drawn and [`RenderContext`]
//! decides *what* is drawn. Neither knows about windows or GPUs: the host
//! supplies a [`FrameScheduler`] (a window's redraw request) and a
//! [`Renderer`] (the wgpu engine), which keeps the loop testable.
//!
//! ```
//! use vignette::error::Result;
//! use vignette::gfx::camera::PerspectiveCamera;
//! use vignette::gfx::render_loop::{FrameScheduler, RenderContext, RenderLoop, Renderer};
//! use vignette::gfx::scene::SceneGraph;
//!
//! #[derive(Default)]
//! struct CountingRenderer(u32);
//!
//! impl Renderer for CountingRenderer {
//!     fn set_viewport_size(&mut self, _width: u32, _height: u32) {}
//!     fn prepare(&mut self, _scene: &mut SceneGraph) -> Result<()> { Ok(()) }
//!     fn draw(&mut self, _scene: &SceneGraph, _camera: &PerspectiveCamera) -> Result<()> {
//!         self.0 += 1;
//!         Ok(())
//!     }
//! }
//!
//! struct Immediate;
//! impl FrameScheduler for Immediate {
//!     fn schedule_next_frame(&mut self) {}
//! }
//!
//! let camera = PerspectiveCamera::new(75.0, 1.0, 0.1, 5.0);
//! let mut context = RenderContext::new(SceneGraph::new(), camera, CountingRenderer::default());
//! let mut render_loop = RenderLoop::new();
//!
//! render_loop.start(&mut Immediate);
//! render_loop.tick(&mut context, &mut Immediate).unwrap();
//! assert_eq!(context.renderer().0, 1);
//! ```

use crate::{
    error::Result,
    gfx::{
        camera::{OrbitControls, PerspectiveCamera},
        scene::SceneGraph,
    },
};

/// Draws a scene through a camera
pub trait Renderer {
    /// Adapts render targets to a new viewport size in physical pixels
    fn set_viewport_size(&mut self, width: u32, height: u32);

    /// Creates GPU resources for objects that do not have them yet
    fn prepare(&mut self, scene: &mut SceneGraph) -> Result<()>;

    /// Renders one frame
    fn draw(&mut self, scene: &SceneGraph, camera: &PerspectiveCamera) -> Result<()>;
}

/// Arranges for [`RenderLoop::tick`] to be called once more
pub trait FrameScheduler {
    fn schedule_next_frame(&mut self);
}

/// Everything needed to draw a frame
pub struct RenderContext<R: Renderer> {
    pub scene: SceneGraph,
    pub camera: PerspectiveCamera,
    pub controls: Option<OrbitControls>,
    renderer: R,
    viewport: Option<(u32, u32)>,
}

impl<R: Renderer> RenderContext<R> {
    pub fn new(scene: SceneGraph, camera: PerspectiveCamera, renderer: R) -> Self {
        Self {
            scene,
            camera,
            controls: None,
            renderer,
            viewport: None,
        }
    }

    /// Builder pattern: Attach orbit controls
    pub fn with_controls(mut self, controls: OrbitControls) -> Self {
        self.controls = Some(controls);
        self
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn viewport(&self) -> Option<(u32, u32)> {
        self.viewport
    }

    /// Handles a viewport change: renderer first, then camera, then one draw.
    ///
    /// Returns `Ok(false)` without drawing for zero-sized or unchanged sizes.
    pub fn on_resize(&mut self, width: u32, height: u32) -> Result<bool> {
        if width == 0 || height == 0 {
            log::debug!("Viewport minimised, skipping resize");
            return Ok(false);
        }
        if self.viewport == Some((width, height)) {
            return Ok(false);
        }

        log::info!("Viewport resized to {}x{}", width, height);
        self.viewport = Some((width, height));
        self.renderer.set_viewport_size(width, height);
        self.camera.on_resize(width, height);
        self.on_frame()?;
        Ok(true)
    }

    /// Applies pending input, refreshes the projection and draws
    pub fn on_frame(&mut self) -> Result<()> {
        if let Some(controls) = &mut self.controls {
            controls.apply(&mut self.camera);
        }
        self.camera.update_projection();
        self.renderer.prepare(&mut self.scene)?;
        self.renderer.draw(&self.scene, &self.camera)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
}

/// Frame pacing: at most one scheduled tick at a time
#[derive(Debug)]
pub struct RenderLoop {
    state: LoopState,
    pending: bool,
    frames: u64,
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderLoop {
    pub fn new() -> Self {
        Self {
            state: LoopState::Idle,
            pending: false,
            frames: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Number of frames drawn successfully
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn is_tick_pending(&self) -> bool {
        self.pending
    }

    /// Moves to `Running` and schedules the first tick; no-op if already running
    pub fn start(&mut self, scheduler: &mut dyn FrameScheduler) -> bool {
        if self.state == LoopState::Running {
            log::debug!("Render loop already running");
            return false;
        }
        log::info!("Render loop started");
        self.state = LoopState::Running;
        self.schedule(scheduler);
        true
    }

    fn schedule(&mut self, scheduler: &mut dyn FrameScheduler) {
        self.pending = true;
        scheduler.schedule_next_frame();
    }

    /// Draws one frame and schedules the next.
    ///
    /// Returns `Ok(false)` when the tick was not expected (loop idle or no
    /// tick pending). Draw errors are returned; the next tick is still
    /// scheduled if the error is recoverable.
    pub fn tick<R: Renderer>(
        &mut self,
        context: &mut RenderContext<R>,
        scheduler: &mut dyn FrameScheduler,
    ) -> Result<bool> {
        if self.state != LoopState::Running || !self.pending {
            log::trace!("Ignoring unscheduled tick");
            return Ok(false);
        }
        self.pending = false;

        match context.on_frame() {
            Ok(()) => {
                self.frames += 1;
                self.schedule(scheduler);
                Ok(true)
            }
            Err(err) if err.is_recoverable() => {
                log::warn!("Frame skipped: {}", err);
                self.schedule(scheduler);
                Err(err)
            }
            Err(err) => {
                log::error!("Render loop halted: {}", err);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::SceneError,
        gfx::{
            geometry::ShapeDescriptor,
            resources::material::MaterialDescriptor,
            scene::{shadow, ObjectFactory, Transform},
        },
    };
    use approx::assert_relative_eq;

    #[derive(Debug, Clone, PartialEq)]
    struct DrawRecord {
        objects: usize,
        aspect: f32,
        viewport: Option<(u32, u32)>,
    }

    #[derive(Default)]
    struct RecordingRenderer {
        draws: Vec<DrawRecord>,
        viewport: Option<(u32, u32)>,
        prepared: usize,
        fail_with: Option<fn() -> SceneError>,
    }

    impl Renderer for RecordingRenderer {
        fn set_viewport_size(&mut self, width: u32, height: u32) {
            self.viewport = Some((width, height));
        }

        fn prepare(&mut self, scene: &mut SceneGraph) -> Result<()> {
            self.prepared = scene.object_count();
            Ok(())
        }

        fn draw(&mut self, scene: &SceneGraph, camera: &PerspectiveCamera) -> Result<()> {
            if let Some(fail) = self.fail_with {
                return Err(fail());
            }
            self.draws.push(DrawRecord {
                objects: scene.iter().count(),
                aspect: camera.aspect(),
                viewport: self.viewport,
            });
            Ok(())
        }
    }

    #[derive(Default)]
    struct CountingScheduler {
        requests: usize,
    }

    impl FrameScheduler for CountingScheduler {
        fn schedule_next_frame(&mut self) {
            self.requests += 1;
        }
    }

    fn context() -> RenderContext<RecordingRenderer> {
        let mut factory = ObjectFactory::new();
        let mut scene = SceneGraph::new();
        let cube = factory
            .build(
                ShapeDescriptor::cuboid(1.0, 1.0, 1.0),
                MaterialDescriptor::unlit(0xff0000),
                Transform::default(),
            )
            .unwrap();
        shadow::attach(cube, false, false, &mut scene);

        let camera = PerspectiveCamera::new(75.0, 2.0, 0.1, 5.0);
        RenderContext::new(scene, camera, RecordingRenderer::default())
    }

    #[test]
    fn test_three_ticks_three_draws() {
        let mut context = context();
        let mut scheduler = CountingScheduler::default();
        let mut render_loop = RenderLoop::new();

        render_loop.start(&mut scheduler);
        for _ in 0..3 {
            assert!(render_loop.tick(&mut context, &mut scheduler).unwrap());
        }

        assert_eq!(context.renderer().draws.len(), 3);
        assert!(context.renderer().draws.iter().all(|d| d.objects == 1));
        assert_eq!(context.scene.object_count(), 1);
        assert_eq!(render_loop.frames(), 3);
        // the initial request plus one after each draw
        assert_eq!(scheduler.requests, 4);
    }

    #[test]
    fn test_ticks_ignored_while_idle() {
        let mut context = context();
        let mut scheduler = CountingScheduler::default();
        let mut render_loop = RenderLoop::new();

        assert!(!render_loop.tick(&mut context, &mut scheduler).unwrap());
        assert!(context.renderer().draws.is_empty());
        assert_eq!(scheduler.requests, 0);
        assert_eq!(render_loop.state(), LoopState::Idle);
    }

    #[test]
    fn test_start_twice_is_noop() {
        let mut scheduler = CountingScheduler::default();
        let mut render_loop = RenderLoop::new();

        assert!(render_loop.start(&mut scheduler));
        assert!(!render_loop.start(&mut scheduler));
        assert_eq!(scheduler.requests, 1);
        assert_eq!(render_loop.state(), LoopState::Running);
    }

    #[test]
    fn test_recoverable_error_keeps_scheduling() {
        let mut context = context();
        let mut scheduler = CountingScheduler::default();
        let mut render_loop = RenderLoop::new();
        render_loop.start(&mut scheduler);

        context.renderer_mut().fail_with = Some(|| SceneError::SurfaceLost);
        assert!(matches!(
            render_loop.tick(&mut context, &mut scheduler),
            Err(SceneError::SurfaceLost)
        ));
        assert!(render_loop.is_tick_pending());

        context.renderer_mut().fail_with = None;
        assert!(render_loop.tick(&mut context, &mut scheduler).unwrap());
        assert_eq!(context.renderer().draws.len(), 1);
    }

    #[test]
    fn test_fatal_error_stops_scheduling() {
        let mut context = context();
        let mut scheduler = CountingScheduler::default();
        let mut render_loop = RenderLoop::new();
        render_loop.start(&mut scheduler);

        context.renderer_mut().fail_with =
            Some(|| SceneError::RendererUnavailable("device lost".into()));
        assert!(render_loop.tick(&mut context, &mut scheduler).is_err());
        assert!(!render_loop.is_tick_pending());
        assert_eq!(scheduler.requests, 1);

        // a stray tick after the failure is ignored
        context.renderer_mut().fail_with = None;
        assert!(!render_loop.tick(&mut context, &mut scheduler).unwrap());
        assert!(context.renderer().draws.is_empty());
    }

    #[test]
    fn test_resize_updates_before_drawing() {
        let mut context = context();

        assert!(context.on_resize(800, 600).unwrap());
        assert!(context.on_resize(400, 300).unwrap());

        assert_relative_eq!(context.camera.aspect(), 4.0 / 3.0);
        let draws = &context.renderer().draws;
        assert_eq!(draws.len(), 2);
        for draw in draws {
            assert_relative_eq!(draw.aspect, 4.0 / 3.0);
        }
        assert_eq!(draws[1].viewport, Some((400, 300)));
    }

    #[test]
    fn test_repeated_resize_is_noop() {
        let mut context = context();

        assert!(context.on_resize(800, 600).unwrap());
        assert!(!context.on_resize(800, 600).unwrap());

        assert_eq!(context.renderer().draws.len(), 1);
        assert_eq!(context.camera.projection_updates(), 1);
        assert_relative_eq!(context.camera.aspect(), 4.0 / 3.0);
    }

    #[test]
    fn test_minimised_window_is_ignored() {
        let mut context = context();
        assert!(!context.on_resize(0, 0).unwrap());
        assert!(context.renderer().draws.is_empty());
        assert_eq!(context.viewport(), None);
    }

    #[test]
    fn test_prepare_sees_every_object() {
        let mut context = context();
        context.on_frame().unwrap();
        assert_eq!(context.renderer().prepared, 1);
    }
}
