//! # Primitive Shape Generation
//!
//! This module contains functions to generate common 3D primitive shapes.
//! All shapes are generated with proper normals and texture coordinates.
//! Segment counts below the minimum for a shape are raised to it.

use super::GeometryData;
use std::f32::consts::{FRAC_PI_2, PI, TAU};

/// Generate a box centred at the origin
///
/// Each face has its own four vertices so normals stay flat, with UV
/// coordinates from 0 to 1 per face.
pub fn generate_box(width: f32, height: f32, depth: f32) -> GeometryData {
    let mut data = GeometryData::new();
    let (hx, hy, hz) = (width * 0.5, height * 0.5, depth * 0.5);

    // (normal, u axis, v axis) per face; u x v = normal keeps the winding CCW
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ];

    for (normal, u_axis, v_axis) in faces {
        let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];
        let base = data.vertices.len() as u32;
        for (su, sv) in corners {
            let mut position = [0.0; 3];
            for axis in 0..3 {
                let along = normal[axis] + su * u_axis[axis] + sv * v_axis[axis];
                let half = [hx, hy, hz][axis];
                position[axis] = along * half;
            }
            data.push_vertex(position, normal, [(su + 1.0) * 0.5, (sv + 1.0) * 0.5]);
        }
        data.push_triangle(base, base + 1, base + 2);
        data.push_triangle(base + 2, base + 3, base);
    }

    data
}

/// One point of a lathe profile: ring radius, height and the 2D normal
/// (radial, vertical) at that point.
#[derive(Debug, Clone, Copy)]
struct ProfilePoint {
    radius: f32,
    y: f32,
    normal: [f32; 2],
}

/// Revolves a bottom-to-top profile around the Y axis.
///
/// Rings of zero radius collapse to a pole; the triangles that would be
/// degenerate there are skipped.
fn lathe(data: &mut GeometryData, profile: &[ProfilePoint], segments: u32) {
    let base = data.vertices.len() as u32;
    let ring = segments + 1;
    let last = (profile.len() - 1).max(1) as f32;

    for (k, p) in profile.iter().enumerate() {
        for i in 0..=segments {
            let theta = i as f32 / segments as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            data.push_vertex(
                [p.radius * sin, p.y, p.radius * cos],
                [p.normal[0] * sin, p.normal[1], p.normal[0] * cos],
                [i as f32 / segments as f32, k as f32 / last],
            );
        }
    }

    for k in 0..profile.len().saturating_sub(1) {
        let low = base + k as u32 * ring;
        let up = low + ring;
        for i in 0..segments {
            if profile[k].radius > 0.0 {
                data.push_triangle(low + i, low + i + 1, up + i);
            }
            if profile[k + 1].radius > 0.0 {
                data.push_triangle(low + i + 1, up + i + 1, up + i);
            }
        }
    }
}

/// Generate a UV sphere with specified resolution
///
/// # Arguments
/// * `radius` - Sphere radius
/// * `width_segments` - Number of segments around the Y axis (min 3)
/// * `height_segments` - Number of segments from pole to pole (min 2)
pub fn generate_sphere(radius: f32, width_segments: u32, height_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();
    let width_segments = width_segments.max(3);
    let height_segments = height_segments.max(2);

    let profile: Vec<ProfilePoint> = (0..=height_segments)
        .map(|k| {
            // -PI/2 at the bottom pole to PI/2 at the top pole
            let phi = -FRAC_PI_2 + k as f32 / height_segments as f32 * PI;
            let (sin, cos) = phi.sin_cos();
            let cos = if k == 0 || k == height_segments { 0.0 } else { cos };
            ProfilePoint {
                radius: radius * cos,
                y: radius * sin,
                normal: [cos, sin],
            }
        })
        .collect();

    lathe(&mut data, &profile, width_segments);
    data
}

/// Generate a capsule: a cylinder of `length` capped by two hemispheres
///
/// # Arguments
/// * `radius` - Radius of the body and caps
/// * `length` - Length of the cylindrical middle section (total height is
///   `length + 2 * radius`)
/// * `cap_segments` - Latitude segments per hemisphere (min 1)
/// * `radial_segments` - Segments around the Y axis (min 3)
pub fn generate_capsule(
    radius: f32,
    length: f32,
    cap_segments: u32,
    radial_segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new();
    let cap_segments = cap_segments.max(1);
    let radial_segments = radial_segments.max(3);
    let half = length * 0.5;

    let mut profile = Vec::with_capacity(2 * (cap_segments as usize + 1));
    // bottom hemisphere, pole to equator
    for s in 0..=cap_segments {
        let a = -FRAC_PI_2 + s as f32 / cap_segments as f32 * FRAC_PI_2;
        let (sin, cos) = a.sin_cos();
        let cos = if s == 0 { 0.0 } else { cos };
        profile.push(ProfilePoint {
            radius: radius * cos,
            y: -half + radius * sin,
            normal: [cos, sin],
        });
    }
    // top hemisphere, equator to pole
    for s in 0..=cap_segments {
        let a = s as f32 / cap_segments as f32 * FRAC_PI_2;
        let (sin, cos) = a.sin_cos();
        let cos = if s == cap_segments { 0.0 } else { cos };
        profile.push(ProfilePoint {
            radius: radius * cos,
            y: half + radius * sin,
            normal: [cos, sin],
        });
    }

    lathe(&mut data, &profile, radial_segments);
    data
}

/// Generate a cylinder (or cone) along the Y axis
///
/// # Arguments
/// * `radius_top` - Radius at `+height / 2`; zero gives a cone tip
/// * `radius_bottom` - Radius at `-height / 2`
/// * `height` - Total height
/// * `radial_segments` - Number of circular segments (min 3)
///
/// Caps are only generated for non-zero radii.
pub fn generate_cylinder(
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    radial_segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new();
    let segs = radial_segments.max(3);
    let half_height = height * 0.5;

    // Side normals tilt with the slope for cones
    let slope = (radius_bottom - radius_top) / height;
    let len = (1.0 + slope * slope).sqrt();
    let side_normal = [1.0 / len, slope / len];

    lathe(
        &mut data,
        &[
            ProfilePoint {
                radius: radius_bottom,
                y: -half_height,
                normal: side_normal,
            },
            ProfilePoint {
                radius: radius_top,
                y: half_height,
                normal: side_normal,
            },
        ],
        segs,
    );

    if radius_top > 0.0 {
        generate_cap(&mut data, radius_top, half_height, segs, true);
    }
    if radius_bottom > 0.0 {
        generate_cap(&mut data, radius_bottom, -half_height, segs, false);
    }

    data
}

fn generate_cap(data: &mut GeometryData, radius: f32, y: f32, segments: u32, top: bool) {
    let sign = if top { 1.0 } else { -1.0 };
    let normal = [0.0, sign, 0.0];
    let center = data.push_vertex([0.0, y, 0.0], normal, [0.5, 0.5]);

    for i in 0..=segments {
        let theta = i as f32 / segments as f32 * TAU;
        let (sin, cos) = theta.sin_cos();
        data.push_vertex(
            [radius * sin, y, radius * cos],
            normal,
            [sin * 0.5 + 0.5, cos * 0.5 * sign + 0.5],
        );
    }

    for i in 0..segments {
        let current = center + 1 + i;
        let next = current + 1;
        if top {
            data.push_triangle(center, current, next);
        } else {
            data.push_triangle(center, next, current);
        }
    }
}

/// Generate a plane in the XY plane facing +Z
///
/// # Arguments
/// * `width` - Width of the plane (X direction)
/// * `height` - Height of the plane (Y direction)
/// * `width_segments` - Number of subdivisions along width
/// * `height_segments` - Number of subdivisions along height
///
/// Rotate by -90 degrees around X to use it as a floor.
pub fn generate_plane(
    width: f32,
    height: f32,
    width_segments: u32,
    height_segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let w_segs = width_segments.max(1);
    let h_segs = height_segments.max(1);

    for y in 0..=h_segs {
        let v = y as f32 / h_segs as f32;
        let pos_y = (v - 0.5) * height;

        for x in 0..=w_segs {
            let u = x as f32 / w_segs as f32;
            let pos_x = (u - 0.5) * width;

            data.push_vertex([pos_x, pos_y, 0.0], [0.0, 0.0, 1.0], [u, v]);
        }
    }

    // Counter-clockwise when viewed from +Z
    for y in 0..h_segs {
        for x in 0..w_segs {
            let i = y * (w_segs + 1) + x;
            let next_row = i + w_segs + 1;

            data.push_triangle(i, i + 1, next_row + 1);
            data.push_triangle(i, next_row + 1, next_row);
        }
    }

    data
}

/// Generate a torus lying in the XY plane
///
/// # Arguments
/// * `radius` - Distance from the torus centre to the tube centre
/// * `tube` - Tube radius
/// * `radial_segments` - Segments around the tube (min 3)
/// * `tubular_segments` - Segments around the ring (min 3)
pub fn generate_torus(
    radius: f32,
    tube: f32,
    radial_segments: u32,
    tubular_segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new();
    let radial = radial_segments.max(3);
    let tubular = tubular_segments.max(3);

    for j in 0..=radial {
        let v = j as f32 / radial as f32 * TAU;
        for i in 0..=tubular {
            let u = i as f32 / tubular as f32 * TAU;

            let x = (radius + tube * v.cos()) * u.cos();
            let y = (radius + tube * v.cos()) * u.sin();
            let z = tube * v.sin();

            let center = [radius * u.cos(), radius * u.sin(), 0.0];
            let normal = normalize([x - center[0], y - center[1], z - center[2]]);

            data.push_vertex(
                [x, y, z],
                normal,
                [i as f32 / tubular as f32, j as f32 / radial as f32],
            );
        }
    }

    push_tube_indices(&mut data, radial, tubular);
    data
}

/// Generate a (p, q) torus knot
///
/// # Arguments
/// * `radius` - Overall knot radius
/// * `tube` - Tube radius
/// * `tubular_segments` - Segments along the knot curve (min 3)
/// * `radial_segments` - Segments around the tube (min 3)
/// * `p` - Windings around the axis of rotational symmetry
/// * `q` - Windings around the interior circle of the torus
pub fn generate_torus_knot(
    radius: f32,
    tube: f32,
    tubular_segments: u32,
    radial_segments: u32,
    p: u32,
    q: u32,
) -> GeometryData {
    let mut data = GeometryData::new();
    let tubular = tubular_segments.max(3);
    let radial = radial_segments.max(3);
    let (p, q) = (p.max(1) as f32, q.max(1) as f32);

    let curve = |u: f32| -> [f32; 3] {
        let qu_over_p = q / p * u;
        let cs = qu_over_p.cos();
        [
            radius * (2.0 + cs) * 0.5 * u.cos(),
            radius * (2.0 + cs) * 0.5 * u.sin(),
            radius * qu_over_p.sin() * 0.5,
        ]
    };

    for i in 0..=tubular {
        let u = i as f32 / tubular as f32 * p * TAU;
        let p1 = curve(u);
        let p2 = curve(u + 0.01);

        // Frenet-like frame along the curve
        let t = sub(p2, p1);
        let n = add(p2, p1);
        let b = normalize(cross(t, n));
        let n = normalize(cross(b, t));

        for j in 0..=radial {
            let v = j as f32 / radial as f32 * TAU;
            let cx = -tube * v.cos();
            let cy = tube * v.sin();

            let position = [
                p1[0] + cx * n[0] + cy * b[0],
                p1[1] + cx * n[1] + cy * b[1],
                p1[2] + cx * n[2] + cy * b[2],
            ];
            let normal = normalize(sub(position, p1));
            data.push_vertex(
                position,
                normal,
                [i as f32 / tubular as f32, j as f32 / radial as f32],
            );
        }
    }

    for j in 1..=tubular {
        for i in 1..=radial {
            let a = (radial + 1) * (j - 1) + (i - 1);
            let b = (radial + 1) * j + (i - 1);
            let c = (radial + 1) * j + i;
            let d = (radial + 1) * (j - 1) + i;
            data.push_triangle(a, b, d);
            data.push_triangle(b, c, d);
        }
    }

    data
}

/// Indices for a `(rows + 1) x (columns + 1)` vertex grid wrapped into a tube
fn push_tube_indices(data: &mut GeometryData, rows: u32, columns: u32) {
    for j in 1..=rows {
        for i in 1..=columns {
            let a = (columns + 1) * j + i - 1;
            let b = (columns + 1) * (j - 1) + i - 1;
            let c = (columns + 1) * (j - 1) + i;
            let d = (columns + 1) * j + i;
            data.push_triangle(a, b, d);
            data.push_triangle(b, c, d);
        }
    }
}

fn add(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

pub(crate) fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

pub(crate) fn normalize(v: [f32; 3]) -> [f32; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if len > 0.0 {
        [v[0] / len, v[1] / len, v[2] / len]
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    /// Every non-degenerate triangle's geometric normal must agree with the
    /// direction from `center_of` (evaluated at the triangle centroid).
    fn assert_outward(data: &GeometryData, center_of: impl Fn([f32; 3]) -> [f32; 3]) {
        for tri in data.indices.chunks(3) {
            let [a, b, c] = [0, 1, 2].map(|k| data.vertices[tri[k] as usize]);
            let n = cross(sub(b, a), sub(c, a));
            let area2 = dot(n, n).sqrt();
            if area2 < 1e-6 {
                continue;
            }
            let centroid = [
                (a[0] + b[0] + c[0]) / 3.0,
                (a[1] + b[1] + c[1]) / 3.0,
                (a[2] + b[2] + c[2]) / 3.0,
            ];
            let outward = sub(centroid, center_of(centroid));
            assert!(
                dot(n, outward) > 0.0,
                "triangle {:?} is wound inward",
                tri
            );
        }
    }

    fn assert_indices_in_range(data: &GeometryData) {
        let count = data.vertex_count() as u32;
        assert!(data.indices.iter().all(|&i| i < count));
        assert_eq!(data.indices.len() % 3, 0);
        assert_eq!(data.vertices.len(), data.normals.len());
        assert_eq!(data.vertices.len(), data.tex_coords.len());
    }

    #[test]
    fn test_box_generation() {
        let cube = generate_box(2.0, 4.0, 6.0);
        assert_eq!(cube.vertex_count(), 24); // 6 faces * 4 vertices
        assert_eq!(cube.triangle_count(), 12); // 6 faces * 2 triangles
        let bounds = cube.bounds().unwrap();
        assert_eq!(bounds.min, [-1.0, -2.0, -3.0]);
        assert_eq!(bounds.max, [1.0, 2.0, 3.0]);
        assert_indices_in_range(&cube);
        assert_outward(&cube, |_| [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_sphere_generation() {
        let sphere = generate_sphere(2.0, 8, 6);
        assert_indices_in_range(&sphere);
        for v in &sphere.vertices {
            assert_relative_eq!(dot(*v, *v).sqrt(), 2.0, epsilon = 1e-5);
        }
        // pole rows contribute one triangle per segment instead of two
        assert_eq!(sphere.triangle_count(), 8 * 6 * 2 - 2 * 8);
        assert_outward(&sphere, |_| [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_segment_minimums() {
        let sphere = generate_sphere(1.0, 0, 0);
        assert_eq!(sphere.vertex_count(), 4 * 3); // 3 segments + seam, 3 rings
    }

    #[test]
    fn test_capsule_generation() {
        let capsule = generate_capsule(0.5, 2.0, 4, 8);
        assert_indices_in_range(&capsule);
        let bounds = capsule.bounds().unwrap();
        assert_relative_eq!(bounds.min[1], -1.5, epsilon = 1e-6);
        assert_relative_eq!(bounds.max[1], 1.5, epsilon = 1e-6);
        assert_relative_eq!(bounds.max[0], 0.5, epsilon = 1e-6);
        // outward from the nearest point on the inner segment
        assert_outward(&capsule, |c| [0.0, c[1].clamp(-1.0, 1.0), 0.0]);
    }

    #[test]
    fn test_cylinder_generation() {
        let cylinder = generate_cylinder(1.0, 1.0, 2.0, 16);
        assert_indices_in_range(&cylinder);
        let bounds = cylinder.bounds().unwrap();
        assert_relative_eq!(bounds.min[1], -1.0);
        assert_relative_eq!(bounds.max[1], 1.0);
        assert_outward(&cylinder, |_| [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_cone_has_single_cap() {
        let cone = generate_cylinder(0.0, 1.0, 2.0, 8);
        let cylinder = generate_cylinder(1.0, 1.0, 2.0, 8);
        assert!(cone.triangle_count() < cylinder.triangle_count());
        let top_cap_normals = cone.normals.iter().filter(|n| **n == [0.0, 1.0, 0.0]).count();
        assert_eq!(top_cap_normals, 0);
        assert_outward(&cone, |_| [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_plane_generation() {
        let plane = generate_plane(2.0, 2.0, 2, 2);
        assert_eq!(plane.vertices.len(), 9); // 3x3 grid
        assert_eq!(plane.indices.len(), 24); // 4 quads * 2 triangles * 3 indices
        assert_outward(&plane, |c| [c[0], c[1], -1.0]);
    }

    #[test]
    fn test_torus_generation() {
        let torus = generate_torus(2.0, 0.5, 8, 16);
        assert_indices_in_range(&torus);
        let bounds = torus.bounds().unwrap();
        assert_relative_eq!(bounds.max[0], 2.5, epsilon = 1e-5);
        assert_relative_eq!(bounds.max[2], 0.5, epsilon = 1e-2);
        assert_outward(&torus, |c| {
            let len = (c[0] * c[0] + c[1] * c[1]).sqrt();
            [c[0] / len * 2.0, c[1] / len * 2.0, 0.0]
        });
    }

    #[test]
    fn test_torus_knot_generation() {
        let knot = generate_torus_knot(1.0, 0.3, 64, 8, 2, 3);
        assert_indices_in_range(&knot);
        assert_eq!(knot.vertex_count(), 65 * 9);
        assert_eq!(knot.triangle_count(), 64 * 8 * 2);
        for n in &knot.normals {
            assert_relative_eq!(dot(*n, *n), 1.0, epsilon = 1e-4);
        }
    }
}
