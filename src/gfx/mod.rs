//! # Graphics Module
//!
//! Everything between scene descriptors and pixels.
//!
//! ## Architecture Overview
//!
//! - **Geometry** ([`geometry`]) - Shape descriptors and procedural meshes
//! - **Scene Management** ([`scene`]) - Objects, lights, transforms and the scene graph
//! - **Camera System** ([`camera`]) - Perspective camera and orbit controls
//! - **Frame Loop** ([`render_loop`]) - Renderer and scheduler traits, render context
//! - **Rendering Pipeline** ([`rendering`]) - wgpu engine with shadow mapping
//! - **Resource Management** ([`resources`]) - Materials, global uniforms and depth textures
//!
//! Only [`rendering`] and the GPU halves of [`scene`] and [`resources`] need a
//! device. Scenes can be built, inspected and driven through the frame loop
//! without one.

pub mod camera;
pub mod geometry;
pub mod render_loop;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::{OrbitControls, PerspectiveCamera};
pub use render_loop::{FrameScheduler, RenderContext, RenderLoop, Renderer};
pub use rendering::RenderEngine;
