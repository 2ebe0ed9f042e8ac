//! Extrusion of 2D outlines into solids

use std::f32::consts::FRAC_PI_2;

use super::{
    polygon::Polygon2D,
    primitives::{cross, normalize},
    GeometryData,
};
use crate::error::{Result, SceneError};

/// Parameters for sweeping an outline along +Z
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtrudeOptions {
    /// Length of the straight section
    pub depth: f32,
    pub bevel_enabled: bool,
    /// How far the bevel extends beyond each end of the straight section
    pub bevel_thickness: f32,
    /// How far the bevel grows the outline outward
    pub bevel_size: f32,
    pub bevel_segments: u32,
}

impl Default for ExtrudeOptions {
    fn default() -> Self {
        Self {
            depth: 1.0,
            bevel_enabled: true,
            bevel_thickness: 0.2,
            bevel_size: 0.1,
            bevel_segments: 3,
        }
    }
}

impl ExtrudeOptions {
    pub fn with_depth(depth: f32) -> Self {
        Self {
            depth,
            ..Default::default()
        }
    }

    pub fn without_bevel(mut self) -> Self {
        self.bevel_enabled = false;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.depth.is_finite() && self.depth > 0.0) {
            return Err(SceneError::invalid(
                "extrusion",
                format!("depth must be positive, got {}", self.depth),
            ));
        }
        if self.bevel_enabled {
            if !(self.bevel_thickness.is_finite() && self.bevel_thickness >= 0.0) {
                return Err(SceneError::invalid(
                    "extrusion",
                    format!("bevel thickness must be >= 0, got {}", self.bevel_thickness),
                ));
            }
            if !(self.bevel_size.is_finite() && self.bevel_size >= 0.0) {
                return Err(SceneError::invalid(
                    "extrusion",
                    format!("bevel size must be >= 0, got {}", self.bevel_size),
                ));
            }
            if self.bevel_segments == 0 {
                return Err(SceneError::invalid("extrusion", "bevel needs at least one segment"));
            }
        }
        Ok(())
    }

    /// `(z, outward offset)` of every outline copy, back to front
    fn layers(&self) -> Vec<(f32, f32)> {
        if !self.bevel_enabled {
            return vec![(0.0, 0.0), (self.depth, 0.0)];
        }

        let segments = self.bevel_segments;
        let bevel = |b: u32| {
            let t = b as f32 / segments as f32 * FRAC_PI_2;
            (self.bevel_thickness * t.cos(), self.bevel_size * t.sin())
        };

        let mut layers = Vec::with_capacity(2 * segments as usize + 2);
        for b in 0..segments {
            let (z, offset) = bevel(b);
            layers.push((-z, offset));
        }
        layers.push((0.0, self.bevel_size));
        layers.push((self.depth, self.bevel_size));
        for b in (0..segments).rev() {
            let (z, offset) = bevel(b);
            layers.push((self.depth + z, offset));
        }
        layers
    }
}

/// Outward miter direction at every outline point (indexed like the outline)
fn bevel_directions(outline: &Polygon2D, ccw: &[usize]) -> Vec<[f32; 2]> {
    let pts = outline.points();
    let n = ccw.len();
    let mut directions = vec![[0.0, 0.0]; n];

    let edge_normal = |from: [f32; 2], to: [f32; 2]| {
        let (dx, dy) = (to[0] - from[0], to[1] - from[1]);
        let len = (dx * dx + dy * dy).sqrt();
        [dy / len, -dx / len]
    };

    for k in 0..n {
        let prev = pts[ccw[(k + n - 1) % n]];
        let cur = pts[ccw[k]];
        let next = pts[ccw[(k + 1) % n]];

        let n1 = edge_normal(prev, cur);
        let n2 = edge_normal(cur, next);
        let sum = [n1[0] + n2[0], n1[1] + n2[1]];
        let len = (sum[0] * sum[0] + sum[1] * sum[1]).sqrt();

        directions[ccw[k]] = if len <= f32::EPSILON {
            // hairpin turn; push straight out along the incoming edge normal
            n1
        } else {
            let bisector = [sum[0] / len, sum[1] / len];
            // stretch so that both adjacent edges move by the full offset,
            // capped to keep sharp corners from spiking
            let cos_half = (bisector[0] * n1[0] + bisector[1] * n1[1]).max(0.5);
            [bisector[0] / cos_half, bisector[1] / cos_half]
        };
    }

    directions
}

/// Sweep `outline` along +Z.
///
/// The solid spans `z ∈ [-bevel_thickness, depth + bevel_thickness]` (no
/// bevel: `[0, depth]`). The first `outline.len()` vertices are the front
/// cap, one per outline point and in outline order, followed by the back cap
/// in the same order and then the side walls.
pub fn generate_extrusion(outline: &Polygon2D, options: &ExtrudeOptions) -> Result<GeometryData> {
    options.validate()?;
    let triangles = outline.triangulate()?;

    let pts = outline.points();
    let ccw = outline.ccw_order();
    let directions = bevel_directions(outline, &ccw);
    let layers = options.layers();
    let (back_z, _) = layers[0];
    let (front_z, _) = layers[layers.len() - 1];

    let mut data = GeometryData::new();

    // Front cap
    for p in pts {
        data.push_vertex([p[0], p[1], front_z], [0.0, 0.0, 1.0], *p);
    }
    for [a, b, c] in &triangles {
        data.push_triangle(*a as u32, *b as u32, *c as u32);
    }

    // Back cap
    let back = data.vertex_count() as u32;
    for p in pts {
        data.push_vertex([p[0], p[1], back_z], [0.0, 0.0, -1.0], *p);
    }
    for [a, b, c] in &triangles {
        data.push_triangle(back + *a as u32, back + *c as u32, back + *b as u32);
    }

    // Side walls, one flat quad per outline edge per layer step
    let at = |index: usize, (z, offset): (f32, f32)| {
        let p = pts[index];
        let d = directions[index];
        [p[0] + d[0] * offset, p[1] + d[1] * offset, z]
    };

    let n = ccw.len();
    let mut v_along = 0.0;
    for step in layers.windows(2) {
        let (lower, upper) = (step[0], step[1]);
        let v_next = v_along + (upper.0 - lower.0).abs() + (upper.1 - lower.1).abs();

        let mut u_along = 0.0;
        for k in 0..n {
            let (i, j) = (ccw[k], ccw[(k + 1) % n]);
            let a = at(i, lower);
            let b = at(j, lower);
            let c = at(j, upper);
            let d = at(i, upper);

            let edge = ((b[0] - a[0]).powi(2) + (b[1] - a[1]).powi(2)).sqrt();
            let normal = normalize(cross(
                [c[0] - a[0], c[1] - a[1], c[2] - a[2]],
                [d[0] - b[0], d[1] - b[1], d[2] - b[2]],
            ));

            let base = data.push_vertex(a, normal, [u_along, v_along]);
            data.push_vertex(b, normal, [u_along + edge, v_along]);
            data.push_vertex(c, normal, [u_along + edge, v_next]);
            data.push_vertex(d, normal, [u_along, v_next]);
            data.push_triangle(base, base + 1, base + 2);
            data.push_triangle(base, base + 2, base + 3);

            u_along += edge;
        }
        v_along = v_next;
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn star(points: usize) -> Polygon2D {
        let outline: Vec<[f32; 2]> = (0..points * 2)
            .map(|i| {
                let angle = i as f32 / (points * 2) as f32 * std::f32::consts::TAU;
                let r = if i % 2 == 0 { 1.0 } else { 0.45 };
                [r * angle.cos(), r * angle.sin()]
            })
            .collect();
        Polygon2D::new(outline)
    }

    #[test]
    fn test_front_face_reproduces_outline() {
        let outline = star(5);
        let depth = 0.75;
        let data = generate_extrusion(&outline, &ExtrudeOptions::with_depth(depth)).unwrap();

        let front = &data.vertices[..outline.len()];
        for (v, p) in front.iter().zip(outline.points()) {
            assert_eq!([v[0], v[1]], *p);
            assert_relative_eq!(v[2], depth + 0.2);
        }
    }

    #[test]
    fn test_front_face_round_trip_for_clockwise_outline() {
        let mut points = star(4).points().to_vec();
        points.reverse();
        let outline = Polygon2D::new(points);
        let data =
            generate_extrusion(&outline, &ExtrudeOptions::with_depth(2.0).without_bevel()).unwrap();

        let projected: Vec<[f32; 2]> = data.vertices[..outline.len()]
            .iter()
            .map(|v| [v[0], v[1]])
            .collect();
        assert_eq!(projected, outline.points());
        assert!(data.vertices[..outline.len()].iter().all(|v| v[2] == 2.0));
    }

    #[test]
    fn test_extent_without_bevel() {
        let square = Polygon2D::new(vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
        let data =
            generate_extrusion(&square, &ExtrudeOptions::with_depth(3.0).without_bevel()).unwrap();
        let bounds = data.bounds().unwrap();
        assert_eq!(bounds.min, [0.0, 0.0, 0.0]);
        assert_eq!(bounds.max, [1.0, 1.0, 3.0]);
        // 2 caps * 2 triangles + 4 walls * 2 triangles
        assert_eq!(data.triangle_count(), 12);
    }

    #[test]
    fn test_bevel_grows_outline() {
        let square = Polygon2D::new(vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
        let options = ExtrudeOptions {
            depth: 1.0,
            bevel_enabled: true,
            bevel_thickness: 0.25,
            bevel_size: 0.1,
            bevel_segments: 2,
        };
        let data = generate_extrusion(&square, &options).unwrap();
        let bounds = data.bounds().unwrap();
        assert_relative_eq!(bounds.min[0], -0.1, epsilon = 1e-5);
        assert_relative_eq!(bounds.max[1], 1.1, epsilon = 1e-5);
        assert_relative_eq!(bounds.min[2], -0.25, epsilon = 1e-6);
        assert_relative_eq!(bounds.max[2], 1.25, epsilon = 1e-6);
    }

    #[test]
    fn test_side_walls_face_outward() {
        let square = Polygon2D::new(vec![[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0]]);
        let data = generate_extrusion(&square, &ExtrudeOptions::default()).unwrap();
        let walls_start = 2 * square.len();
        for (v, n) in data.vertices[walls_start..]
            .iter()
            .zip(&data.normals[walls_start..])
        {
            let radial = v[0] * n[0] + v[1] * n[1];
            assert!(radial >= 0.0, "wall normal {:?} at {:?} points inward", n, v);
        }
    }

    #[test]
    fn test_invalid_options_rejected() {
        let square = Polygon2D::new(vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
        for options in [
            ExtrudeOptions::with_depth(0.0),
            ExtrudeOptions::with_depth(-1.0),
            ExtrudeOptions {
                bevel_segments: 0,
                ..Default::default()
            },
            ExtrudeOptions {
                bevel_size: -0.1,
                ..Default::default()
            },
        ] {
            assert!(matches!(
                generate_extrusion(&square, &options),
                Err(SceneError::InvalidGeometryParameters { .. })
            ));
        }
    }
}
