//! Intersection and distance tests used by avoidance and selection.

use crate::{FlockError, Vector2D};

/// A circle in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Vector2D,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vector2D, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// An axis-aligned rectangle spanned by two opposite corners in any order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub a: Vector2D,
    pub b: Vector2D,
}

impl Rect {
    pub fn from_corners(a: Vector2D, b: Vector2D) -> Self {
        Self { a, b }
    }

    pub fn min(&self) -> Vector2D {
        Vector2D::new(self.a.x.min(self.b.x), self.a.y.min(self.b.y))
    }

    pub fn max(&self) -> Vector2D {
        Vector2D::new(self.a.x.max(self.b.x), self.a.y.max(self.b.y))
    }

    /// Closest point of the rectangle to `point`.
    pub fn clamp(&self, point: Vector2D) -> Vector2D {
        let (min, max) = (self.min(), self.max());
        Vector2D::new(point.x.clamp(min.x, max.x), point.y.clamp(min.y, max.y))
    }
}

/// Tests whether `point` is inside a convex polygon.
///
/// Vertices may be wound either way; the point is inside when the scalar cross
/// product of every edge with the point never changes sign. Points exactly on
/// an edge count as inside.
pub fn point_in_convex_polygon(point: Vector2D, polygon: &[Vector2D]) -> Result<bool, FlockError> {
    if polygon.len() < 3 {
        return Err(FlockError::InvalidPolygon {
            vertices: polygon.len(),
        });
    }

    let mut positive = false;
    let mut negative = false;
    for (start, end) in edges(polygon) {
        let side = (end - start).cross(&(point - start));
        positive |= side > 0.0;
        negative |= side < 0.0;
        if positive && negative {
            return Ok(false);
        }
    }

    Ok(true)
}

/// Distance from `point` to the segment `start..end`.
///
/// The projection of the point onto the segment's line is clamped to the
/// segment's bounding box on each axis separately. A zero-length segment
/// reduces to the distance between two points.
pub fn point_to_segment_distance(point: Vector2D, start: Vector2D, end: Vector2D) -> f32 {
    let along = (point - start).project_onto(&(end - start));
    let closest = Rect::from_corners(start, end).clamp(start + along);
    closest.distance(&point)
}

/// True when the circle's center is inside the polygon or strictly closer than
/// `radius` to any of its edges. The last vertex connects back to the first.
pub fn circle_intersects_convex_polygon(
    circle: &Circle,
    polygon: &[Vector2D],
) -> Result<bool, FlockError> {
    if point_in_convex_polygon(circle.center, polygon)? {
        return Ok(true);
    }

    Ok(edges(polygon)
        .any(|(start, end)| point_to_segment_distance(circle.center, start, end) < circle.radius))
}

/// True when the circle overlaps or touches the rectangle.
pub fn circle_intersects_rect(circle: &Circle, rect: &Rect) -> bool {
    let closest = rect.clamp(circle.center);
    circle.center.distance_squared(&closest) <= circle.radius * circle.radius
}

fn edges(polygon: &[Vector2D]) -> impl Iterator<Item = (Vector2D, Vector2D)> + '_ {
    polygon
        .iter()
        .zip(polygon.iter().cycle().skip(1))
        .map(|(start, end)| (*start, *end))
}
