//! # Procedural Geometry Generation
//!
//! This module turns [`ShapeDescriptor`]s into triangle meshes so that scenes
//! can be assembled without external model files.
//!
//! ## Supported Shapes
//!
//! - **Box**, **Sphere**, **Capsule**, **Cylinder** (and cones), **Plane**
//! - **Torus** and **TorusKnot**
//! - **CustomPolygon**: a flat, triangulated 2D outline
//! - **Extrusion**: a 2D outline swept along +Z with an optional bevel
//!
//! All shapes are Y-up, centred on the origin (extrusions start at z = 0) and
//! wound counter-clockwise when seen from outside.
//!
//! ## Usage
//!
//! ```rust
//! use vignette::gfx::geometry::ShapeDescriptor;
//!
//! let cube = ShapeDescriptor::cuboid(1.0, 1.0, 1.0).generate().unwrap();
//! assert_eq!(cube.triangle_count(), 12);
//! ```

pub mod extrude;
pub mod polygon;
pub mod primitives;
pub mod shape;

pub use extrude::{generate_extrusion, ExtrudeOptions};
pub use polygon::{generate_polygon, Polygon2D};
pub use primitives::*;
pub use shape::ShapeDescriptor;

use cgmath::{Matrix4, Point3, Transform as _};

/// Represents generated geometry data ready for GPU upload
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Texture coordinates (u, v)
    pub tex_coords: Vec<[f32; 2]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    /// Create a new empty geometry data structure
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            tex_coords: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in this geometry
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Appends one vertex and returns its index
    pub fn push_vertex(&mut self, position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> u32 {
        debug_assert!(self.vertices.len() < u32::MAX as usize, "vertex index overflow");
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        self.normals.push(normal);
        self.tex_coords.push(uv);
        index
    }

    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Interleaves positions and normals into the vertex format used by the renderer
    pub fn to_vertices(&self) -> Vec<crate::gfx::scene::vertex::Vertex3D> {
        use crate::gfx::scene::vertex::Vertex3D;

        self.vertices
            .iter()
            .enumerate()
            .map(|(i, position)| Vertex3D {
                position: *position,
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
            })
            .collect()
    }

    /// Local-space bounds, `None` for empty geometry
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.vertices.iter().copied())
    }

    /// Bounds after applying `matrix` to every vertex
    pub fn transformed_bounds(&self, matrix: &Matrix4<f32>) -> Option<Aabb> {
        Aabb::from_points(self.vertices.iter().map(|v| {
            let p = matrix.transform_point(Point3::new(v[0], v[1], v[2]));
            [p.x, p.y, p.z]
        }))
    }
}

impl Default for GeometryData {
    fn default() -> Self {
        Self::new()
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl Aabb {
    pub fn from_points(points: impl IntoIterator<Item = [f32; 3]>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut aabb = Aabb {
            min: first,
            max: first,
        };
        for p in points {
            for axis in 0..3 {
                aabb.min[axis] = aabb.min[axis].min(p[axis]);
                aabb.max[axis] = aabb.max[axis].max(p[axis]);
            }
        }
        Some(aabb)
    }

    pub fn size(&self) -> [f32; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    pub fn center(&self) -> [f32; 3] {
        [
            (self.min[0] + self.max[0]) * 0.5,
            (self.min[1] + self.max[1]) * 0.5,
            (self.min[2] + self.max[2]) * 0.5,
        ]
    }
}
