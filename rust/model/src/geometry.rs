// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D geometry kernel: points, polygons, and containment tests.
//!
//! All functions are pure and deterministic. Coordinates are meters in the
//! XY plane. Polygons are implicitly closed (no repeated first vertex) and
//! may be wound in either direction.

use serde::{Deserialize, Serialize};

use crate::{ModelError, Result};

/// Tolerance for point equality comparisons.
pub const POINT_EQ_TOLERANCE: f64 = 1e-6;

/// A 2D point in the XY plane (meters).
///
/// Treated as a value type: moves replace the whole point, never mutate a
/// single coordinate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point2D) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl PartialEq for Point2D {
    /// Tolerance-based equality (1e-6 m per axis).
    fn eq(&self, other: &Self) -> bool {
        (self.x - other.x).abs() < POINT_EQ_TOLERANCE
            && (self.y - other.y).abs() < POINT_EQ_TOLERANCE
    }
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Rect {
    /// The empty rectangle, identity for [`Rect::expand`].
    pub fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    /// Builds the bounding box of a set of points. Returns the empty
    /// rectangle for an empty iterator.
    pub fn from_points<'a, I: IntoIterator<Item = &'a Point2D>>(points: I) -> Self {
        let mut r = Self::empty();
        for p in points {
            r.expand(p);
        }
        r
    }

    pub fn expand(&mut self, p: &Point2D) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn center(&self) -> Point2D {
        Point2D::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// True if `(x, y)` lies inside the box grown by `margin` on all sides.
    pub fn contains_with_margin(&self, x: f64, y: f64, margin: f64) -> bool {
        x >= self.min_x - margin
            && x <= self.max_x + margin
            && y >= self.min_y - margin
            && y <= self.max_y + margin
    }

    /// True if the box overlaps another, with `eps` slack so that touching
    /// edges count as overlapping.
    pub fn overlaps(&self, other: &Rect, eps: f64) -> bool {
        self.min_x < other.max_x + eps
            && other.min_x < self.max_x + eps
            && self.min_y < other.max_y + eps
            && other.min_y < self.max_y + eps
    }

    /// The four corners as a counter-clockwise vertex list.
    pub fn corners(&self) -> Vec<Point2D> {
        vec![
            Point2D::new(self.min_x, self.min_y),
            Point2D::new(self.max_x, self.min_y),
            Point2D::new(self.max_x, self.max_y),
            Point2D::new(self.min_x, self.max_y),
        ]
    }
}

/// A closed polygon in the XY plane. Minimum 3 vertices; the closing edge
/// back to the first vertex is implicit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon2D {
    vertices: Vec<Point2D>,
}

impl Polygon2D {
    /// Creates a polygon, rejecting fewer than 3 vertices or non-finite
    /// coordinates.
    pub fn new(vertices: Vec<Point2D>) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(ModelError::DegeneratePolygon(vertices.len()));
        }
        if vertices.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::NonFiniteCoordinate("polygon".into()));
        }
        Ok(Self { vertices })
    }

    /// Convenience constructor for an axis-aligned rectangle.
    pub fn rectangle(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            vertices: Rect {
                min_x,
                min_y,
                max_x,
                max_y,
            }
            .corners(),
        }
    }

    pub fn vertices(&self) -> &[Point2D] {
        &self.vertices
    }

    /// Area by the shoelace formula. Absolute value, so the result is
    /// independent of winding order.
    pub fn area(&self) -> f64 {
        let n = self.vertices.len();
        let mut sum = 0.0;
        for i in 0..n {
            let j = (i + 1) % n;
            sum += self.vertices[i].x * self.vertices[j].y;
            sum -= self.vertices[j].x * self.vertices[i].y;
        }
        sum.abs() / 2.0
    }

    /// Total edge length including the implicit closing edge.
    pub fn perimeter(&self) -> f64 {
        let n = self.vertices.len();
        (0..n)
            .map(|i| self.vertices[i].distance_to(&self.vertices[(i + 1) % n]))
            .sum()
    }

    /// Vertex centroid (arithmetic mean of the vertices).
    pub fn centroid(&self) -> Point2D {
        let n = self.vertices.len() as f64;
        Point2D::new(
            self.vertices.iter().map(|v| v.x).sum::<f64>() / n,
            self.vertices.iter().map(|v| v.y).sum::<f64>() / n,
        )
    }

    pub fn bounding_box(&self) -> Rect {
        Rect::from_points(&self.vertices)
    }
}

/// Ray-casting point-in-polygon test (even-odd rule).
///
/// Vertices may be wound either way. Points exactly on an edge are
/// winding-dependent; use [`point_in_polygon_with_tolerance`] when boundary
/// points must count as inside.
pub fn point_in_polygon(px: f64, py: f64, vertices: &[Point2D]) -> bool {
    let n = vertices.len();
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = (vertices[i].x, vertices[i].y);
        let (xj, yj) = (vertices[j].x, vertices[j].y);
        if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Point-in-polygon with edge tolerance: also true when the point is within
/// `tolerance` of any edge.
pub fn point_in_polygon_with_tolerance(
    px: f64,
    py: f64,
    vertices: &[Point2D],
    tolerance: f64,
) -> bool {
    if point_in_polygon(px, py, vertices) {
        return true;
    }
    let n = vertices.len();
    (0..n).any(|i| {
        point_to_segment_distance(px, py, &vertices[i], &vertices[(i + 1) % n]) <= tolerance
    })
}

/// Distance from a point to a line segment.
///
/// Perpendicular distance when the projection falls within the segment,
/// otherwise distance to the nearest endpoint. A degenerate segment falls
/// back to point distance.
pub fn point_to_segment_distance(px: f64, py: f64, a: &Point2D, b: &Point2D) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let length_sq = dx * dx + dy * dy;
    if length_sq < 1e-12 {
        return Point2D::new(px, py).distance_to(a);
    }
    let t = (((px - a.x) * dx + (py - a.y) * dy) / length_sq).clamp(0.0, 1.0);
    let proj = Point2D::new(a.x + t * dx, a.y + t * dy);
    Point2D::new(px, py).distance_to(&proj)
}

/// Projects a point onto a segment, returning the foot point and the
/// projection parameter `t` (unclamped). `None` for degenerate segments.
pub fn project_onto_segment(p: &Point2D, a: &Point2D, b: &Point2D) -> Option<(Point2D, f64)> {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let length_sq = dx * dx + dy * dy;
    if length_sq < 1e-12 {
        return None;
    }
    let t = ((p.x - a.x) * dx + (p.y - a.y) * dy) / length_sq;
    Some((Point2D::new(a.x + t * dx, a.y + t * dy), t))
}
