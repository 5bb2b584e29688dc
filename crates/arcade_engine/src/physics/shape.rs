//! Convex polygon shapes in model space
//!
//! Shapes are immutable value objects. Derived shapes (rotated, translated,
//! scaled) are new instances; the vertex count never changes after
//! construction.

use crate::foundation::math::{from_heading, Vec2, Vec2Ext};
use crate::foundation::math::constants::TAU;
use thiserror::Error;

/// Minimum number of vertices a polygon needs
pub const MIN_VERTICES: usize = 3;

/// Shape construction errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    /// Fewer than three vertices were supplied
    #[error("Shape needs at least {MIN_VERTICES} vertices, got {0}")]
    TooFewVertices(usize),
}

/// Ordered convex polygon, counter-clockwise, in its owner's local space
///
/// Edge `i` runs from vertex `i - 1` to vertex `i` (wrapping), and
/// `edge_normals()[i]` is that edge's outward unit normal.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    vertices: Vec<Vec2>,
    edge_normals: Vec<Vec2>,
}

impl Shape {
    /// Build a shape from counter-clockwise vertices
    pub fn new(vertices: Vec<Vec2>) -> Result<Self, ShapeError> {
        if vertices.len() < MIN_VERTICES {
            return Err(ShapeError::TooFewVertices(vertices.len()));
        }
        let edge_normals = compute_edge_normals(&vertices);
        Ok(Self { vertices, edge_normals })
    }

    /// Regular polygon with `vertex_count` corners on a circle of `radius`
    ///
    /// The first vertex sits on the +X axis, the rest follow counter-clockwise.
    #[allow(clippy::cast_precision_loss)]
    pub fn regular_polygon(center: Vec2, radius: f64, vertex_count: usize) -> Result<Self, ShapeError> {
        let vertices = (0..vertex_count)
            .map(|i| center + from_heading(TAU * i as f64 / vertex_count as f64) * radius)
            .collect();
        Self::new(vertices)
    }

    /// Axis-aligned rectangle with its minimum corner at `(x, y)`
    pub fn rectangle(x: f64, y: f64, width: f64, height: f64) -> Self {
        let vertices = vec![
            Vec2::new(x, y),
            Vec2::new(x + width, y),
            Vec2::new(x + width, y + height),
            Vec2::new(x, y + height),
        ];
        let edge_normals = compute_edge_normals(&vertices);
        Self { vertices, edge_normals }
    }

    /// Axis-aligned rectangle centered on `center`
    pub fn centered_rectangle(center: Vec2, width: f64, height: f64) -> Self {
        Self::rectangle(center.x - width * 0.5, center.y - height * 0.5, width, height)
    }

    /// Equilateral triangle with its corners `size` away from `center`
    pub fn triangle(center: Vec2, size: f64) -> Self {
        let vertices: Vec<Vec2> = (0..3)
            .map(|i| center + from_heading(TAU * f64::from(i) / 3.0) * size)
            .collect();
        let edge_normals = compute_edge_normals(&vertices);
        Self { vertices, edge_normals }
    }

    /// Vertices in local space
    pub fn points(&self) -> &[Vec2] {
        &self.vertices
    }

    /// Outward edge normals, parallel to `points()`
    pub fn edge_normals(&self) -> &[Vec2] {
        &self.edge_normals
    }

    /// Number of vertices
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Shapes always hold at least three vertices
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Endpoints `(start, end)` of edge `index`, wrapping past the last edge
    pub fn edge(&self, index: usize) -> (Vec2, Vec2) {
        edge_endpoints(&self.vertices, index)
    }

    /// Arithmetic mean of the vertices
    #[allow(clippy::cast_precision_loss)]
    pub fn centroid(&self) -> Vec2 {
        let sum = self.vertices.iter().fold(Vec2::zeros(), |acc, v| acc + v);
        sum / self.vertices.len() as f64
    }

    /// Copy rotated counter-clockwise around the local origin
    pub fn rotated(&self, angle: f64) -> Self {
        self.map_points(|p| p.rotated(angle))
    }

    /// Copy moved by `offset`
    pub fn translated(&self, offset: Vec2) -> Self {
        self.map_points(|p| p + offset)
    }

    /// Copy scaled around the local origin
    pub fn scaled(&self, factor: f64) -> Self {
        self.map_points(|p| p * factor)
    }

    fn map_points(&self, f: impl Fn(&Vec2) -> Vec2) -> Self {
        let vertices: Vec<Vec2> = self.vertices.iter().map(f).collect();
        let edge_normals = compute_edge_normals(&vertices);
        Self { vertices, edge_normals }
    }
}

/// Endpoints of edge `index` in a vertex list (edge `i` joins `i - 1` to `i`)
pub(crate) fn edge_endpoints(vertices: &[Vec2], index: usize) -> (Vec2, Vec2) {
    let count = vertices.len();
    let index = index % count;
    (vertices[(index + count - 1) % count], vertices[index])
}

/// Outward unit normals of a counter-clockwise polygon
pub(crate) fn compute_edge_normals(vertices: &[Vec2]) -> Vec<Vec2> {
    (0..vertices.len())
        .map(|i| {
            let (prev, next) = edge_endpoints(vertices, i);
            (prev - next).normal().normalized_or_zero()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rejects_degenerate_vertex_lists() {
        let two = vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0)];
        assert_eq!(Shape::new(two), Err(ShapeError::TooFewVertices(2)));
        assert_eq!(Shape::new(Vec::new()), Err(ShapeError::TooFewVertices(0)));
        assert!(Shape::regular_polygon(Vec2::zeros(), 10.0, 2).is_err());
    }

    #[test]
    fn test_square_normals_point_outward() {
        let square = Shape::centered_rectangle(Vec2::zeros(), 10.0, 10.0);
        let normals = square.edge_normals();

        // edge 0 closes the loop: top-left -> bottom-left
        assert_relative_eq!(normals[0], Vec2::new(-1.0, 0.0));
        assert_relative_eq!(normals[1], Vec2::new(0.0, -1.0));
        assert_relative_eq!(normals[2], Vec2::new(1.0, 0.0));
        assert_relative_eq!(normals[3], Vec2::new(0.0, 1.0));

        for (i, normal) in normals.iter().enumerate() {
            let (a, b) = square.edge(i);
            let midpoint = (a + b) * 0.5;
            assert!(normal.dot(&(midpoint - square.centroid())) > 0.0);
        }
    }

    #[test]
    fn test_edge_index_wraps_around() {
        let square = Shape::centered_rectangle(Vec2::zeros(), 10.0, 10.0);
        assert_eq!(square.edge(4), square.edge(0));
        assert_eq!(square.edge(9), square.edge(1));
    }

    #[test]
    fn test_regular_polygon_layout() {
        let hexagon = Shape::regular_polygon(Vec2::new(1.0, 2.0), 4.0, 6).unwrap();
        assert_eq!(hexagon.len(), 6);
        assert_relative_eq!(hexagon.points()[0], Vec2::new(5.0, 2.0), epsilon = 1e-12);
        assert_relative_eq!(hexagon.centroid(), Vec2::new(1.0, 2.0), epsilon = 1e-12);
        for point in hexagon.points() {
            assert_relative_eq!((point - Vec2::new(1.0, 2.0)).magnitude(), 4.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_derived_shapes_leave_original_untouched() {
        let triangle = Shape::triangle(Vec2::zeros(), 3.0);
        let original = triangle.clone();

        let moved = triangle.translated(Vec2::new(1.0, 1.0));
        let grown = triangle.scaled(2.0);
        let turned = triangle.rotated(1.0);

        assert_eq!(triangle, original);
        assert_eq!(moved.len(), 3);
        assert_relative_eq!(moved.points()[0], original.points()[0] + Vec2::new(1.0, 1.0));
        assert_relative_eq!(grown.points()[1], original.points()[1] * 2.0);
        assert_relative_eq!(turned.points()[2].magnitude(), 3.0, epsilon = 1e-12);
        // rotation carries the normals with it
        assert_relative_eq!(turned.edge_normals()[0], original.edge_normals()[0].rotated(1.0), epsilon = 1e-12);
    }
}
