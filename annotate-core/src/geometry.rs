//! Polygon geometry for zone annotations.
//!
//! Zones are stored as ordered vertex lists in normalized image coordinates
//! (`0.0..=1.0` on both axes). Nothing here rotates, reflects, or reorders
//! vertices: two zones are the same shape only if their vertex lists match.

use serde::{Deserialize, Serialize};

// ============================================================================
// Point
// ============================================================================

/// A polygon vertex in normalized image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate (0.0 = left edge, 1.0 = right edge)
    pub x: f64,
    /// Vertical coordinate (0.0 = top edge, 1.0 = bottom edge)
    pub y: f64,
}

impl Point {
    /// Create a point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both coordinates are finite numbers.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Both coordinates lie in `[0, 1]`.
    #[must_use]
    pub fn is_normalized(&self) -> bool {
        (0.0..=1.0).contains(&self.x) && (0.0..=1.0).contains(&self.y)
    }
}

// ============================================================================
// Bounding Box
// ============================================================================

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Width (non-negative)
    pub width: f64,
    /// Height (non-negative)
    pub height: f64,
}

impl BoundingBox {
    /// Check whether a point lies inside or on the box.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

// ============================================================================
// Polygon helpers
// ============================================================================

/// Bounding box of a vertex list, `None` when empty.
#[must_use]
pub fn bounding_box(vertices: &[Point]) -> Option<BoundingBox> {
    let first = vertices.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);

    for p in &vertices[1..] {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }

    Some(BoundingBox {
        x: min_x,
        y: min_y,
        width: max_x - min_x,
        height: max_y - min_y,
    })
}

/// Unsigned polygon area (shoelace formula). Zero for fewer than 3 vertices.
#[must_use]
pub fn area(vertices: &[Point]) -> f64 {
    if vertices.len() < 3 {
        return 0.0;
    }

    let n = vertices.len();
    let twice: f64 = (0..n)
        .map(|i| {
            let a = vertices[i];
            let b = vertices[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum();

    twice.abs() / 2.0
}

/// Point-in-polygon test (ray casting). The polygon is implicitly closed.
///
/// Returns `false` for degenerate polygons with fewer than 3 vertices.
#[must_use]
pub fn contains(vertices: &[Point], point: Point) -> bool {
    if vertices.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let vi = vertices[i];
        let vj = vertices[j];

        if ((vi.y > point.y) != (vj.y > point.y))
            && (point.x < (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x)
        {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// Every vertex lies inside the unit square.
#[must_use]
pub fn is_normalized(vertices: &[Point]) -> bool {
    vertices.iter().all(Point::is_normalized)
}
