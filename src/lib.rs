//! # vignette
//!
//! Small 3D scenes on wgpu and winit: describe shapes, materials and lights,
//! attach them to a [`SceneGraph`](gfx::scene::SceneGraph) and hand the graph
//! to an [`App`], which opens a window and runs the frame loop.
//!
//! ```no_run
//! use vignette::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::default();
//!     vignette::init_logging(&config.log_filter);
//!
//!     let mut factory = ObjectFactory::new();
//!     let mut scene = SceneGraph::new();
//!     let cube = factory.build(
//!         ShapeDescriptor::cuboid(1.0, 1.0, 1.0),
//!         MaterialDescriptor::unlit(0xff0000),
//!         Transform::from_position(0.0, 0.5, 0.0),
//!     )?;
//!     shadow::attach(cube, false, false, &mut scene);
//!
//!     App::new(config, scene).run()?;
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod prelude;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::App;
pub use error::{Result, SceneError};

/// Initialises `env_logger`, using `filter` unless `RUST_LOG` is set
///
/// Calling it more than once is harmless.
pub fn init_logging(filter: &str) {
    let env = env_logger::Env::default().default_filter_or(filter);
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::debug!("Logger already initialised");
    }
}
