//! # Scene Management Module
//!
//! Objects, lights and the graph that holds them.
//!
//! ## Key Components
//!
//! - [`ObjectFactory`] - Turns shape/material/transform descriptors into [`SceneObject`]s
//! - [`SceneGraph`] - Insertion-ordered, append-only container of objects and lights
//! - [`shadow::attach`] - Sets shadow flags and adds an object to the graph
//! - [`Light`] - Ambient, directional and point lights
//! - [`Vertex3D`] - GPU vertex layout
//!
//! ## Usage
//!
//! ```
//! use vignette::gfx::geometry::ShapeDescriptor;
//! use vignette::gfx::resources::material::MaterialDescriptor;
//! use vignette::gfx::scene::{shadow, ObjectFactory, SceneGraph, Transform};
//!
//! let mut factory = ObjectFactory::new();
//! let mut graph = SceneGraph::new();
//!
//! let cube = factory
//!     .build(
//!         ShapeDescriptor::cuboid(1.0, 1.0, 1.0),
//!         MaterialDescriptor::unlit(0xff0000),
//!         Transform::from_position(0.0, 0.5, 0.0),
//!     )
//!     .unwrap();
//! let id = shadow::attach(cube, true, false, &mut graph);
//! assert!(graph.contains(id));
//! ```

pub mod light;
pub mod object;
pub mod scene;
pub mod shadow;
pub mod transform;
pub mod vertex;

// Re-export main types
pub use light::{Light, MAX_LIGHTS};
pub use object::{
    DrawObject, ObjectFactory, ObjectGpuResources, ObjectId, ObjectUniform, SceneObject,
};
pub use scene::{SceneGraph, SceneStatistics};
pub use transform::Transform;
pub use vertex::Vertex3D;
