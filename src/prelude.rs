//! # Prelude
//!
//! Everything a typical scene program needs:
//!
//! ```rust
//! use vignette::prelude::*;
//!
//! let sphere = ShapeDescriptor::sphere(0.5);
//! let material = MaterialDescriptor::standard(0x3366ff).with_roughness(0.4);
//! assert!(sphere.validate().is_ok() && material.validate().is_ok());
//! ```

// Application and configuration
pub use crate::app::App;
pub use crate::config::{AppConfig, CameraConfig, ControlsConfig, RendererConfig, WindowConfig};
pub use crate::error::SceneError;

// Scene description
pub use crate::gfx::camera::{OrbitControls, PerspectiveCamera};
pub use crate::gfx::geometry::{ExtrudeOptions, GeometryData, Polygon2D, ShapeDescriptor};
pub use crate::gfx::resources::material::{FaceCulling, MaterialDescriptor, ShadingModel};
pub use crate::gfx::scene::{shadow, Light, ObjectFactory, ObjectId, SceneGraph, Transform};

// Frame loop
pub use crate::gfx::render_loop::{FrameScheduler, RenderContext, RenderLoop, Renderer};

// Common external dependencies
pub use cgmath::{Point3, Vector3};
