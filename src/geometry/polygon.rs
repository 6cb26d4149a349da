//! Validated simple polygons
//!
//! The boundary of the region to pack. Construction rejects anything the
//! triangulator cannot treat as a single simple ring.

use glam::DVec2;
use robust::{orient2d, Coord};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{PackingError, Result};

/// A simple polygon, implicitly closed (last vertex connects to the first)
///
/// Either winding order is accepted. Serialized as a plain vertex list;
/// deserializing runs the same validation as [`Polygon::new`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<DVec2>", into = "Vec<DVec2>"))]
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<DVec2>,
}

impl TryFrom<Vec<DVec2>> for Polygon {
    type Error = PackingError;

    fn try_from(vertices: Vec<DVec2>) -> Result<Self> {
        Self::new(vertices)
    }
}

impl From<Polygon> for Vec<DVec2> {
    fn from(polygon: Polygon) -> Self {
        polygon.vertices
    }
}

impl Polygon {
    /// Create a polygon from its vertices
    ///
    /// # Errors
    ///
    /// Returns `InvalidPolygon` if there are fewer than 3 vertices, a
    /// coordinate is not finite, two consecutive vertices coincide (the
    /// closing pair included), the boundary intersects itself or the
    /// enclosed area is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use circle_pack::{Point, Polygon};
    ///
    /// let square = Polygon::new(vec![
    ///     Point::new(0.0, 0.0),
    ///     Point::new(4.0, 0.0),
    ///     Point::new(4.0, 4.0),
    ///     Point::new(0.0, 4.0),
    /// ])
    /// .unwrap();
    /// assert_eq!(square.area(), 16.0);
    ///
    /// // Bowtie
    /// let bowtie = Polygon::from_xy(&[(0.0, 0.0), (4.0, 4.0), (4.0, 0.0), (0.0, 4.0)]);
    /// assert!(bowtie.is_err());
    /// ```
    pub fn new(vertices: Vec<DVec2>) -> Result<Self> {
        validate(&vertices)?;
        Ok(Self { vertices })
    }

    /// Create a polygon from `(x, y)` pairs
    pub fn from_xy(coords: &[(f64, f64)]) -> Result<Self> {
        Self::new(coords.iter().map(|&(x, y)| DVec2::new(x, y)).collect())
    }

    #[inline]
    pub fn vertices(&self) -> &[DVec2] {
        &self.vertices
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Boundary edges `(start, end)`, including the closing edge
    pub fn edges(&self) -> impl Iterator<Item = (DVec2, DVec2)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Shoelace area, positive for counter-clockwise winding
    pub fn signed_area(&self) -> f64 {
        signed_area(&self.vertices)
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    pub fn is_counter_clockwise(&self) -> bool {
        self.signed_area() > 0.0
    }

    pub fn perimeter(&self) -> f64 {
        self.edges().map(|(p, q)| p.distance(q)).sum()
    }

    /// Axis-aligned bounding box as `(min, max)`
    pub fn bounds(&self) -> (DVec2, DVec2) {
        self.vertices.iter().fold(
            (DVec2::splat(f64::INFINITY), DVec2::splat(f64::NEG_INFINITY)),
            |(min, max), &v| (min.min(v), max.max(v)),
        )
    }

    /// Point-in-polygon test (even-odd rule)
    ///
    /// Points exactly on the boundary may fall either way.
    pub fn contains(&self, p: DVec2) -> bool {
        let mut inside = false;
        for (a, b) in self.edges() {
            if (a.y > p.y) != (b.y > p.y) {
                let x = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
                if p.x < x {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Vertices with the first one repeated at the end, ready for plotting
    pub fn closed_ring(&self) -> Vec<DVec2> {
        let mut ring = self.vertices.clone();
        ring.extend(self.vertices.first().copied());
        ring
    }
}

fn signed_area(vertices: &[DVec2]) -> f64 {
    let n = vertices.len();
    let twice: f64 = (0..n)
        .map(|i| vertices[i].perp_dot(vertices[(i + 1) % n]))
        .sum();
    0.5 * twice
}

fn validate(vertices: &[DVec2]) -> Result<()> {
    let n = vertices.len();
    if n < 3 {
        return Err(PackingError::InvalidPolygon(format!(
            "need at least 3 points (got {})",
            n
        )));
    }

    if let Some(i) = vertices.iter().position(|v| !v.is_finite()) {
        return Err(PackingError::InvalidPolygon(format!(
            "vertex {} has a non-finite coordinate",
            i
        )));
    }

    for i in 0..n {
        let j = (i + 1) % n;
        if vertices[i] == vertices[j] {
            return Err(PackingError::InvalidPolygon(format!(
                "duplicate consecutive points at {} and {}",
                i, j
            )));
        }
    }

    if let Some((i, j)) = find_self_intersection(vertices) {
        return Err(PackingError::InvalidPolygon(format!(
            "boundary edges {} and {} intersect",
            i, j
        )));
    }

    if signed_area(vertices) == 0.0 {
        return Err(PackingError::InvalidPolygon("polygon has zero area".into()));
    }

    Ok(())
}

#[inline]
fn orient(a: DVec2, b: DVec2, c: DVec2) -> f64 {
    orient2d(
        Coord { x: a.x, y: a.y },
        Coord { x: b.x, y: b.y },
        Coord { x: c.x, y: c.y },
    )
}

/// `p` is known to be collinear with segment `ab`
#[inline]
fn within_box(a: DVec2, b: DVec2, p: DVec2) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

fn segments_intersect(p1: DVec2, p2: DVec2, q1: DVec2, q2: DVec2) -> bool {
    let d1 = orient(q1, q2, p1);
    let d2 = orient(q1, q2, p2);
    let d3 = orient(p1, p2, q1);
    let d4 = orient(p1, p2, q2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && within_box(q1, q2, p1))
        || (d2 == 0.0 && within_box(q1, q2, p2))
        || (d3 == 0.0 && within_box(p1, p2, q1))
        || (d4 == 0.0 && within_box(p1, p2, q2))
}

/// First pair of boundary edges that touch where they should not
///
/// Edge `i` runs from vertex `i` to vertex `i + 1`. Adjacent edges may only
/// share their common vertex; they fail when they fold back onto each other.
fn find_self_intersection(vertices: &[DVec2]) -> Option<(usize, usize)> {
    let n = vertices.len();
    let edge = |i: usize| (vertices[i], vertices[(i + 1) % n]);

    for i in 0..n {
        let (a, b) = edge(i);
        let (_, c) = edge((i + 1) % n);
        if orient(a, b, c) == 0.0 && (b - a).dot(c - b) < 0.0 {
            return Some((i, (i + 1) % n));
        }
    }

    for i in 0..n {
        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            let (p1, p2) = edge(i);
            let (q1, q2) = edge(j);
            if segments_intersect(p1, p2, q1, q2) {
                return Some((i, j));
            }
        }
    }
    None
}
