use super::{
    extrude::{generate_extrusion, ExtrudeOptions},
    polygon::{generate_polygon, Polygon2D},
    primitives, GeometryData,
};
use crate::error::{Result, SceneError};

/// Largest vertex count a single generated mesh may have.
///
/// Keeps every index inside `u32` with room for the `+ 1` seam arithmetic of
/// the generators.
pub const MAX_VERTICES: u64 = 1 << 24;

/// Description of a mesh to generate
///
/// Descriptors are plain data; nothing is generated until
/// [`generate`](Self::generate) is called (normally by the object factory).
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeDescriptor {
    Box {
        width: f32,
        height: f32,
        depth: f32,
    },
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
    /// Cylinder of `length` with hemispherical ends
    Capsule {
        radius: f32,
        length: f32,
        cap_segments: u32,
        radial_segments: u32,
    },
    /// A zero `radius_top` gives a cone
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
    },
    Torus {
        radius: f32,
        tube: f32,
        radial_segments: u32,
        tubular_segments: u32,
    },
    TorusKnot {
        radius: f32,
        tube: f32,
        tubular_segments: u32,
        radial_segments: u32,
        p: u32,
        q: u32,
    },
    /// Flat rectangle in the XY plane facing +Z
    Plane { width: f32, height: f32 },
    CustomPolygon(Polygon2D),
    Extrusion {
        outline: Polygon2D,
        options: ExtrudeOptions,
    },
}

impl ShapeDescriptor {
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        Self::Box {
            width,
            height,
            depth,
        }
    }

    pub fn sphere(radius: f32) -> Self {
        Self::Sphere {
            radius,
            width_segments: 32,
            height_segments: 16,
        }
    }

    pub fn capsule(radius: f32, length: f32) -> Self {
        Self::Capsule {
            radius,
            length,
            cap_segments: 4,
            radial_segments: 8,
        }
    }

    pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32) -> Self {
        Self::Cylinder {
            radius_top,
            radius_bottom,
            height,
            radial_segments: 32,
        }
    }

    pub fn cone(radius: f32, height: f32) -> Self {
        Self::cylinder(0.0, radius, height)
    }

    pub fn torus(radius: f32, tube: f32) -> Self {
        Self::Torus {
            radius,
            tube,
            radial_segments: 12,
            tubular_segments: 48,
        }
    }

    pub fn torus_knot(radius: f32, tube: f32) -> Self {
        Self::TorusKnot {
            radius,
            tube,
            tubular_segments: 64,
            radial_segments: 8,
            p: 2,
            q: 3,
        }
    }

    pub fn plane(width: f32, height: f32) -> Self {
        Self::Plane { width, height }
    }

    pub fn polygon(points: impl Into<Vec<[f32; 2]>>) -> Self {
        Self::CustomPolygon(Polygon2D::new(points))
    }

    pub fn extrusion(outline: impl Into<Vec<[f32; 2]>>, options: ExtrudeOptions) -> Self {
        Self::Extrusion {
            outline: Polygon2D::new(outline),
            options,
        }
    }

    /// Short name used in logs and error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Box { .. } => "box",
            Self::Sphere { .. } => "sphere",
            Self::Capsule { .. } => "capsule",
            Self::Cylinder { .. } => "cylinder",
            Self::Torus { .. } => "torus",
            Self::TorusKnot { .. } => "torus knot",
            Self::Plane { .. } => "plane",
            Self::CustomPolygon(_) => "polygon",
            Self::Extrusion { .. } => "extrusion",
        }
    }

    /// Checks dimensions and segment counts without generating anything
    pub fn validate(&self) -> Result<()> {
        self.validate_parameters()?;
        match self.vertex_count() {
            Some(count) if count <= MAX_VERTICES => Ok(()),
            Some(count) => Err(SceneError::invalid(
                self.kind_name(),
                format!("needs {} vertices, limit is {}", count, MAX_VERTICES),
            )),
            None => Err(SceneError::invalid(
                self.kind_name(),
                format!("vertex count exceeds the limit of {}", MAX_VERTICES),
            )),
        }
    }

    /// Number of vertices [`generate`](Self::generate) will emit, `None` on overflow
    pub fn vertex_count(&self) -> Option<u64> {
        // (segments + 1) vertices per ring
        let ring = |segments: u32| u64::from(segments) + 1;
        match self {
            Self::Box { .. } => Some(24),
            Self::Sphere {
                width_segments,
                height_segments,
                ..
            } => ring(*width_segments).checked_mul(ring(*height_segments)),
            Self::Capsule {
                cap_segments,
                radial_segments,
                ..
            } => ring(*radial_segments).checked_mul(ring(*cap_segments).checked_mul(2)?),
            Self::Cylinder {
                radius_top,
                radius_bottom,
                radial_segments,
                ..
            } => {
                // side wall of two rings, then a centre plus one ring per cap
                let caps = u64::from(*radius_top > 0.0) + u64::from(*radius_bottom > 0.0);
                let side = ring(*radial_segments).checked_mul(2)?;
                side.checked_add(ring(*radial_segments).checked_add(1)?.checked_mul(caps)?)
            }
            Self::Torus {
                radial_segments,
                tubular_segments,
                ..
            }
            | Self::TorusKnot {
                radial_segments,
                tubular_segments,
                ..
            } => ring(*radial_segments).checked_mul(ring(*tubular_segments)),
            Self::Plane { .. } => Some(4),
            Self::CustomPolygon(polygon) => u64::try_from(polygon.len()).ok(),
            Self::Extrusion { outline, options } => {
                let n = u64::try_from(outline.len()).ok()?;
                let steps = if options.bevel_enabled {
                    u64::from(options.bevel_segments).checked_mul(2)?.checked_add(1)?
                } else {
                    1
                };
                // two caps, then four vertices per edge per step
                n.checked_mul(steps.checked_mul(4)?.checked_add(2)?)
            }
        }
    }

    fn validate_parameters(&self) -> Result<()> {
        let kind = self.kind_name();
        match self {
            Self::Box {
                width,
                height,
                depth,
            } => {
                positive(kind, "width", *width)?;
                positive(kind, "height", *height)?;
                positive(kind, "depth", *depth)
            }
            Self::Sphere {
                radius,
                width_segments,
                height_segments,
            } => {
                positive(kind, "radius", *radius)?;
                at_least(kind, "width_segments", *width_segments, 3)?;
                at_least(kind, "height_segments", *height_segments, 2)
            }
            Self::Capsule {
                radius,
                length,
                cap_segments,
                radial_segments,
            } => {
                positive(kind, "radius", *radius)?;
                non_negative(kind, "length", *length)?;
                at_least(kind, "cap_segments", *cap_segments, 1)?;
                at_least(kind, "radial_segments", *radial_segments, 3)
            }
            Self::Cylinder {
                radius_top,
                radius_bottom,
                height,
                radial_segments,
            } => {
                non_negative(kind, "radius_top", *radius_top)?;
                non_negative(kind, "radius_bottom", *radius_bottom)?;
                if *radius_top == 0.0 && *radius_bottom == 0.0 {
                    return Err(SceneError::invalid(kind, "both radii are zero"));
                }
                positive(kind, "height", *height)?;
                at_least(kind, "radial_segments", *radial_segments, 3)
            }
            Self::Torus {
                radius,
                tube,
                radial_segments,
                tubular_segments,
            } => {
                positive(kind, "radius", *radius)?;
                positive(kind, "tube", *tube)?;
                at_least(kind, "radial_segments", *radial_segments, 3)?;
                at_least(kind, "tubular_segments", *tubular_segments, 3)
            }
            Self::TorusKnot {
                radius,
                tube,
                tubular_segments,
                radial_segments,
                p,
                q,
            } => {
                positive(kind, "radius", *radius)?;
                positive(kind, "tube", *tube)?;
                at_least(kind, "tubular_segments", *tubular_segments, 3)?;
                at_least(kind, "radial_segments", *radial_segments, 3)?;
                at_least(kind, "p", *p, 1)?;
                at_least(kind, "q", *q, 1)
            }
            Self::Plane { width, height } => {
                positive(kind, "width", *width)?;
                positive(kind, "height", *height)
            }
            Self::CustomPolygon(polygon) => polygon.validate(),
            Self::Extrusion { outline, options } => {
                outline.validate()?;
                options.validate()
            }
        }
    }

    /// Validates and generates the mesh
    pub fn generate(&self) -> Result<GeometryData> {
        self.validate()?;
        let data = match self {
            Self::Box {
                width,
                height,
                depth,
            } => primitives::generate_box(*width, *height, *depth),
            Self::Sphere {
                radius,
                width_segments,
                height_segments,
            } => primitives::generate_sphere(*radius, *width_segments, *height_segments),
            Self::Capsule {
                radius,
                length,
                cap_segments,
                radial_segments,
            } => primitives::generate_capsule(*radius, *length, *cap_segments, *radial_segments),
            Self::Cylinder {
                radius_top,
                radius_bottom,
                height,
                radial_segments,
            } => primitives::generate_cylinder(
                *radius_top,
                *radius_bottom,
                *height,
                *radial_segments,
            ),
            Self::Torus {
                radius,
                tube,
                radial_segments,
                tubular_segments,
            } => primitives::generate_torus(*radius, *tube, *radial_segments, *tubular_segments),
            Self::TorusKnot {
                radius,
                tube,
                tubular_segments,
                radial_segments,
                p,
                q,
            } => primitives::generate_torus_knot(
                *radius,
                *tube,
                *tubular_segments,
                *radial_segments,
                *p,
                *q,
            ),
            Self::Plane { width, height } => primitives::generate_plane(*width, *height, 1, 1),
            Self::CustomPolygon(polygon) => generate_polygon(polygon)?,
            Self::Extrusion { outline, options } => generate_extrusion(outline, options)?,
        };
        Ok(data)
    }
}

fn positive(kind: &'static str, field: &str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SceneError::invalid(
            kind,
            format!("{} must be positive and finite, got {}", field, value),
        ))
    }
}

fn non_negative(kind: &'static str, field: &str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SceneError::invalid(
            kind,
            format!("{} must be non-negative and finite, got {}", field, value),
        ))
    }
}

fn at_least(kind: &'static str, field: &str, value: u32, min: u32) -> Result<()> {
    if value >= min {
        Ok(())
    } else {
        Err(SceneError::invalid(
            kind,
            format!("{} must be at least {}, got {}", field, min, value),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn every_kind() -> Vec<ShapeDescriptor> {
        vec![
            ShapeDescriptor::cuboid(1.0, 2.0, 3.0),
            ShapeDescriptor::sphere(0.5),
            ShapeDescriptor::capsule(0.5, 1.0),
            ShapeDescriptor::cylinder(0.5, 0.5, 1.0),
            ShapeDescriptor::cone(0.5, 1.0),
            ShapeDescriptor::torus(1.0, 0.3),
            ShapeDescriptor::torus_knot(1.0, 0.3),
            ShapeDescriptor::plane(4.0, 4.0),
            ShapeDescriptor::polygon(vec![[0.0, 0.0], [1.0, 0.0], [0.5, 1.0]]),
            ShapeDescriptor::extrusion(
                vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
                ExtrudeOptions::default(),
            ),
        ]
    }

    #[test]
    fn test_every_kind_generates_indexed_triangles() {
        for shape in every_kind() {
            let data = shape.generate().unwrap();
            assert!(data.triangle_count() > 0, "{} produced no triangles", shape.kind_name());
            assert_eq!(data.indices.len() % 3, 0);
            assert_eq!(data.normals.len(), data.vertex_count());
            assert_eq!(data.tex_coords.len(), data.vertex_count());
            assert!(data
                .indices
                .iter()
                .all(|&i| (i as usize) < data.vertex_count()));
        }
    }

    #[test]
    fn test_constructor_defaults() {
        assert_eq!(
            ShapeDescriptor::sphere(1.0),
            ShapeDescriptor::Sphere {
                radius: 1.0,
                width_segments: 32,
                height_segments: 16
            }
        );
        assert!(matches!(
            ShapeDescriptor::torus_knot(1.0, 0.2),
            ShapeDescriptor::TorusKnot {
                tubular_segments: 64,
                radial_segments: 8,
                p: 2,
                q: 3,
                ..
            }
        ));
        assert!(matches!(
            ShapeDescriptor::capsule(1.0, 1.0),
            ShapeDescriptor::Capsule {
                cap_segments: 4,
                radial_segments: 8,
                ..
            }
        ));
    }

    #[test]
    fn test_box_dimensions() {
        let bounds = ShapeDescriptor::cuboid(1.0, 2.0, 3.0)
            .generate()
            .unwrap()
            .bounds()
            .unwrap();
        assert_eq!(bounds.size(), [1.0, 2.0, 3.0]);
        assert_eq!(bounds.center(), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_capsule_total_height() {
        let bounds = ShapeDescriptor::capsule(0.5, 2.0)
            .generate()
            .unwrap()
            .bounds()
            .unwrap();
        assert_relative_eq!(bounds.size()[1], 3.0, epsilon = 1e-5);
    }

    #[test]
    fn test_malformed_parameters_rejected() {
        let bad = [
            ShapeDescriptor::cuboid(0.0, 1.0, 1.0),
            ShapeDescriptor::cuboid(1.0, -1.0, 1.0),
            ShapeDescriptor::cuboid(f32::NAN, 1.0, 1.0),
            ShapeDescriptor::sphere(f32::INFINITY),
            ShapeDescriptor::Sphere {
                radius: 1.0,
                width_segments: 2,
                height_segments: 16,
            },
            ShapeDescriptor::cylinder(0.0, 0.0, 1.0),
            ShapeDescriptor::torus(1.0, 0.0),
            ShapeDescriptor::plane(1.0, 0.0),
            ShapeDescriptor::polygon(vec![[0.0, 0.0], [1.0, 1.0]]),
            ShapeDescriptor::extrusion(
                vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]],
                ExtrudeOptions::with_depth(0.0),
            ),
        ];

        for shape in bad {
            match shape.generate() {
                Err(SceneError::InvalidGeometryParameters { descriptor, .. }) => {
                    assert_eq!(descriptor, shape.kind_name());
                }
                other => panic!("{:?} was accepted: {:?}", shape, other.map(|d| d.vertex_count())),
            }
        }
    }

    #[test]
    fn test_small_polygon_accepted_like_small_box() {
        let s = 1e-4;
        assert!(ShapeDescriptor::cuboid(s, s, s).generate().is_ok());
        let square = ShapeDescriptor::polygon(vec![[0.0, 0.0], [s, 0.0], [s, s], [0.0, s]])
            .generate()
            .unwrap();
        assert_eq!(square.triangle_count(), 2);
    }

    #[test]
    fn test_vertex_count_matches_generated_mesh() {
        for shape in every_kind() {
            let data = shape.generate().unwrap();
            assert_eq!(
                shape.vertex_count(),
                Some(data.vertex_count() as u64),
                "{}",
                shape.kind_name()
            );
        }
    }

    #[test]
    fn test_oversized_segment_counts_rejected() {
        let huge = [
            ShapeDescriptor::Sphere {
                radius: 1.0,
                width_segments: u32::MAX,
                height_segments: 2,
            },
            ShapeDescriptor::Sphere {
                radius: 1.0,
                width_segments: u32::MAX,
                height_segments: u32::MAX,
            },
            ShapeDescriptor::Capsule {
                radius: 1.0,
                length: 1.0,
                cap_segments: u32::MAX,
                radial_segments: 8,
            },
            ShapeDescriptor::Cylinder {
                radius_top: 1.0,
                radius_bottom: 1.0,
                height: 1.0,
                radial_segments: u32::MAX,
            },
            ShapeDescriptor::Torus {
                radius: 1.0,
                tube: 0.2,
                radial_segments: 5000,
                tubular_segments: 5000,
            },
            ShapeDescriptor::TorusKnot {
                radius: 1.0,
                tube: 0.2,
                tubular_segments: u32::MAX,
                radial_segments: 8,
                p: 2,
                q: 3,
            },
            ShapeDescriptor::extrusion(
                vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]],
                ExtrudeOptions {
                    bevel_segments: u32::MAX,
                    ..Default::default()
                },
            ),
        ];

        for shape in huge {
            assert!(
                matches!(
                    shape.validate(),
                    Err(SceneError::InvalidGeometryParameters { .. })
                ),
                "{:?} passed validation",
                shape
            );
            assert!(shape.generate().is_err());
        }
    }

    #[test]
    fn test_large_mesh_within_limit_accepted() {
        let sphere = ShapeDescriptor::Sphere {
            radius: 1.0,
            width_segments: 1023,
            height_segments: 1023,
        };
        assert_eq!(sphere.vertex_count(), Some(1 << 20));
        assert!(sphere.validate().is_ok());
    }
}
