//! Flat 2D outlines and their triangulation

use super::GeometryData;
use crate::error::{Result, SceneError};

/// An ordered outline of 2D points, implicitly closed
///
/// Either winding is accepted. Holes are not supported.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon2D {
    points: Vec<[f32; 2]>,
}

impl Polygon2D {
    pub fn new(points: impl Into<Vec<[f32; 2]>>) -> Self {
        Self {
            points: points.into(),
        }
    }

    pub fn points(&self) -> &[[f32; 2]] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Shoelace area, positive for counter-clockwise outlines
    pub fn signed_area(&self) -> f32 {
        let n = self.points.len();
        (0..n)
            .map(|i| {
                let a = self.points[i];
                let b = self.points[(i + 1) % n];
                a[0] * b[1] - b[0] * a[1]
            })
            .sum::<f32>()
            * 0.5
    }

    /// Largest side of the bounding box
    pub fn extent(&self) -> f32 {
        let mut min = [f32::INFINITY; 2];
        let mut max = [f32::NEG_INFINITY; 2];
        for p in &self.points {
            for axis in 0..2 {
                min[axis] = min[axis].min(p[axis]);
                max[axis] = max[axis].max(p[axis]);
            }
        }
        (max[0] - min[0]).max(max[1] - min[1]).max(0.0)
    }

    /// Areas at or below this count as zero, scaled to the outline's size
    fn area_tolerance(&self) -> f32 {
        let extent = self.extent();
        f32::EPSILON * extent * extent
    }

    pub fn is_clockwise(&self) -> bool {
        self.signed_area() < 0.0
    }

    /// Point indices in counter-clockwise order
    pub(crate) fn ccw_order(&self) -> Vec<usize> {
        if self.is_clockwise() {
            (0..self.points.len()).rev().collect()
        } else {
            (0..self.points.len()).collect()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.points.len() < 3 {
            return Err(SceneError::invalid(
                "polygon",
                format!("needs at least 3 points, got {}", self.points.len()),
            ));
        }
        if self.points.iter().flatten().any(|c| !c.is_finite()) {
            return Err(SceneError::invalid("polygon", "contains non-finite coordinates"));
        }
        let n = self.points.len();
        if let Some(i) = (0..n).find(|&i| self.points[i] == self.points[(i + 1) % n]) {
            return Err(SceneError::invalid(
                "polygon",
                format!("points {} and {} coincide", i, (i + 1) % n),
            ));
        }
        if self.signed_area().abs() <= self.area_tolerance() {
            return Err(SceneError::invalid("polygon", "outline has zero area"));
        }
        Ok(())
    }

    /// Ear-clipping triangulation.
    ///
    /// Returns triangles as indices into [`points`](Self::points), each wound
    /// counter-clockwise regardless of the outline's own winding.
    pub fn triangulate(&self) -> Result<Vec<[usize; 3]>> {
        self.validate()?;

        let pts = &self.points;
        let tolerance = self.area_tolerance();
        let mut remaining = self.ccw_order();
        let mut triangles = Vec::with_capacity(pts.len() - 2);

        while remaining.len() > 3 {
            let m = remaining.len();
            let ear = (0..m).find(|&k| {
                let (a, b, c) = (remaining[(k + m - 1) % m], remaining[k], remaining[(k + 1) % m]);
                if orient(pts[a], pts[b], pts[c]) <= 0.0 {
                    return false;
                }
                !remaining.iter().any(|&p| {
                    p != a
                        && p != b
                        && p != c
                        && pts[p] != pts[a]
                        && pts[p] != pts[b]
                        && pts[p] != pts[c]
                        && point_in_triangle(pts[p], pts[a], pts[b], pts[c])
                })
            });

            match ear {
                Some(k) => {
                    let a = remaining[(k + m - 1) % m];
                    let c = remaining[(k + 1) % m];
                    triangles.push([a, remaining[k], c]);
                    remaining.remove(k);
                }
                None => {
                    // Only collinear vertices can be dropped without emitting a triangle
                    let collinear = (0..m).find(|&k| {
                        let (a, b, c) =
                            (remaining[(k + m - 1) % m], remaining[k], remaining[(k + 1) % m]);
                        orient(pts[a], pts[b], pts[c]).abs() <= tolerance
                    });
                    match collinear {
                        Some(k) => {
                            remaining.remove(k);
                        }
                        None => {
                            return Err(SceneError::invalid(
                                "polygon",
                                "outline is self-intersecting",
                            ))
                        }
                    }
                }
            }
        }

        if orient(pts[remaining[0]], pts[remaining[1]], pts[remaining[2]]) > 0.0 {
            triangles.push([remaining[0], remaining[1], remaining[2]]);
        }
        Ok(triangles)
    }
}

impl From<Vec<[f32; 2]>> for Polygon2D {
    fn from(points: Vec<[f32; 2]>) -> Self {
        Self::new(points)
    }
}

/// Twice the signed area of triangle abc
pub(crate) fn orient(a: [f32; 2], b: [f32; 2], c: [f32; 2]) -> f32 {
    (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
}

fn point_in_triangle(p: [f32; 2], a: [f32; 2], b: [f32; 2], c: [f32; 2]) -> bool {
    orient(a, b, p) >= 0.0 && orient(b, c, p) >= 0.0 && orient(c, a, p) >= 0.0
}

/// Generate a flat polygon in the XY plane facing +Z
///
/// Vertex `i` is outline point `i`, so the outline can be read back from the
/// geometry in its original order.
pub fn generate_polygon(polygon: &Polygon2D) -> Result<GeometryData> {
    let triangles = polygon.triangulate()?;
    let mut data = GeometryData::new();

    for p in polygon.points() {
        data.push_vertex([p[0], p[1], 0.0], [0.0, 0.0, 1.0], *p);
    }
    for [a, b, c] in triangles {
        data.push_triangle(a as u32, b as u32, c as u32);
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn triangle_area_sum(polygon: &Polygon2D, triangles: &[[usize; 3]]) -> f32 {
        let pts = polygon.points();
        triangles
            .iter()
            .map(|t| orient(pts[t[0]], pts[t[1]], pts[t[2]]) * 0.5)
            .sum()
    }

    fn heart() -> Polygon2D {
        Polygon2D::new(vec![
            [0.0, -1.0],
            [1.0, 0.2],
            [0.8, 0.8],
            [0.4, 0.9],
            [0.0, 0.5],
            [-0.4, 0.9],
            [-0.8, 0.8],
            [-1.0, 0.2],
        ])
    }

    #[test]
    fn test_square_triangulation() {
        let square = Polygon2D::new(vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
        let triangles = square.triangulate().unwrap();
        assert_eq!(triangles.len(), 2);
        assert_relative_eq!(triangle_area_sum(&square, &triangles), 1.0);
    }

    #[test]
    fn test_concave_outline_covers_area() {
        let polygon = heart();
        let triangles = polygon.triangulate().unwrap();
        assert_eq!(triangles.len(), polygon.len() - 2);
        assert_relative_eq!(
            triangle_area_sum(&polygon, &triangles),
            polygon.signed_area(),
            epsilon = 1e-5
        );
        for t in &triangles {
            let pts = polygon.points();
            assert!(orient(pts[t[0]], pts[t[1]], pts[t[2]]) > 0.0);
        }
    }

    #[test]
    fn test_clockwise_outline_gives_ccw_triangles() {
        let mut points = heart().points().to_vec();
        points.reverse();
        let polygon = Polygon2D::new(points);
        assert!(polygon.is_clockwise());
        let triangles = polygon.triangulate().unwrap();
        assert_relative_eq!(
            triangle_area_sum(&polygon, &triangles),
            -polygon.signed_area(),
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_collinear_point_is_tolerated() {
        let polygon = Polygon2D::new(vec![
            [0.0, 0.0],
            [1.0, 0.0],
            [2.0, 0.0],
            [2.0, 2.0],
            [0.0, 2.0],
        ]);
        let triangles = polygon.triangulate().unwrap();
        assert_relative_eq!(triangle_area_sum(&polygon, &triangles), 4.0, epsilon = 1e-6);
    }

    #[test]
    fn test_degenerate_outlines_rejected() {
        let too_few = Polygon2D::new(vec![[0.0, 0.0], [1.0, 0.0]]);
        assert!(matches!(
            too_few.triangulate(),
            Err(SceneError::InvalidGeometryParameters { .. })
        ));

        let flat = Polygon2D::new(vec![[0.0, 0.0], [1.0, 0.0], [2.0, 0.0]]);
        assert!(flat.validate().is_err());

        let repeated = Polygon2D::new(vec![[0.0, 0.0], [0.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
        assert!(repeated.validate().is_err());

        let nan = Polygon2D::new(vec![[0.0, 0.0], [f32::NAN, 0.0], [1.0, 1.0]]);
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_tiny_outlines_triangulate() {
        let s = 1e-4;
        let square = Polygon2D::new(vec![[0.0, 0.0], [s, 0.0], [s, s], [0.0, s]]);
        assert_relative_eq!(square.extent(), s);
        let triangles = square.triangulate().unwrap();
        assert_eq!(triangles.len(), 2);
        assert_relative_eq!(triangle_area_sum(&square, &triangles), s * s, max_relative = 1e-4);

        let with_collinear = Polygon2D::new(vec![
            [0.0, 0.0],
            [s, 0.0],
            [2.0 * s, 0.0],
            [2.0 * s, 2.0 * s],
            [0.0, 2.0 * s],
        ]);
        let triangles = with_collinear.triangulate().unwrap();
        assert_relative_eq!(
            triangle_area_sum(&with_collinear, &triangles),
            4.0 * s * s,
            max_relative = 1e-4
        );

        let flat = Polygon2D::new(vec![[0.0, 0.0], [s, 0.0], [2.0 * s, 0.0]]);
        assert!(flat.validate().is_err());
    }

    #[test]
    fn test_generated_polygon_keeps_point_order() {
        let polygon = heart();
        let data = generate_polygon(&polygon).unwrap();
        assert_eq!(data.vertex_count(), polygon.len());
        for (v, p) in data.vertices.iter().zip(polygon.points()) {
            assert_eq!([v[0], v[1]], *p);
            assert_eq!(v[2], 0.0);
        }
    }
}
