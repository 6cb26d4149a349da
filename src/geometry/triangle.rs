//! Triangle metrics and incircle construction

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::Circle;

/// Scale-free collinearity threshold
///
/// A triangle is degenerate when `area <= DEGENERATE_EPSILON * longest_side²`.
/// Comparing against the squared longest side keeps the test independent of
/// the coordinate scale, so deep sub-triangles are judged by shape, not size.
pub const DEGENERATE_EPSILON: f64 = 1e-12;

/// The triangle is too close to collinear to carry an incircle
///
/// Only the packer sees this: a degenerate sub-triangle ends its branch
/// without a circle instead of failing the run.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("degenerate triangle (area {area:e}, longest side {longest_side:e})")]
pub struct DegenerateTriangle {
    /// Absolute area of the rejected triangle
    pub area: f64,
    /// Length of its longest side
    pub longest_side: f64,
}

/// Inscribed circle of a triangle (center and radius only)
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Incircle {
    /// Incenter
    pub center: DVec2,
    /// Inradius
    pub radius: f64,
}

/// A triangle with vertices A, B, C
///
/// Uses the usual notation: `a`, `b`, `c` are the lengths of the sides
/// opposite A, B, C, i.e. |BC|, |CA| and |AB|.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub a: DVec2,
    pub b: DVec2,
    pub c: DVec2,
}

impl Triangle {
    /// Create a triangle from its three vertices
    #[inline]
    pub fn new(a: DVec2, b: DVec2, c: DVec2) -> Self {
        Self { a, b, c }
    }

    /// Vertices in A, B, C order
    #[inline]
    pub fn vertices(&self) -> [DVec2; 3] {
        [self.a, self.b, self.c]
    }

    /// Signed area, positive for counter-clockwise vertex order
    #[inline]
    pub fn signed_area(&self) -> f64 {
        0.5 * (self.b - self.a).perp_dot(self.c - self.a)
    }

    /// Area from the 2D cross product of (B - A) and (C - A)
    #[inline]
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Side lengths `[a, b, c]` = `[|BC|, |CA|, |AB|]`
    #[inline]
    pub fn sides(&self) -> [f64; 3] {
        [
            self.b.distance(self.c),
            self.c.distance(self.a),
            self.a.distance(self.b),
        ]
    }

    pub fn perimeter(&self) -> f64 {
        self.sides().iter().sum()
    }

    pub fn semiperimeter(&self) -> f64 {
        0.5 * self.perimeter()
    }

    pub fn longest_side(&self) -> f64 {
        let [a, b, c] = self.sides();
        a.max(b).max(c)
    }

    pub fn centroid(&self) -> DVec2 {
        (self.a + self.b + self.c) / 3.0
    }

    /// Whether the vertices are (numerically) collinear
    pub fn is_degenerate(&self) -> bool {
        self.check_degenerate().is_err()
    }

    fn check_degenerate(&self) -> Result<(), DegenerateTriangle> {
        let area = self.area();
        let longest_side = self.longest_side();
        // Written as a negated comparison so NaN counts as degenerate
        if !(area > DEGENERATE_EPSILON * longest_side * longest_side) {
            return Err(DegenerateTriangle { area, longest_side });
        }
        Ok(())
    }

    /// Inscribed circle
    ///
    /// Inradius `r = area / s` and incenter `(a·A + b·B + c·C) / (a + b + c)`.
    ///
    /// # Errors
    ///
    /// Returns `DegenerateTriangle` for near-collinear vertices.
    ///
    /// # Example
    ///
    /// ```
    /// use circle_pack::{Point, Triangle};
    ///
    /// let tri = Triangle::new(Point::new(0.0, 0.0), Point::new(3.0, 0.0), Point::new(0.0, 4.0));
    /// let incircle = tri.incircle().unwrap();
    /// assert!((incircle.radius - 1.0).abs() < 1e-12);
    /// assert!((incircle.center - Point::new(1.0, 1.0)).length() < 1e-12);
    /// ```
    pub fn incircle(&self) -> Result<Incircle, DegenerateTriangle> {
        self.check_degenerate()?;
        let [a, b, c] = self.sides();
        let perimeter = a + b + c;
        let center = (a * self.a + b * self.b + c * self.c) / perimeter;
        let radius = 2.0 * self.area() / perimeter;
        Ok(Incircle { center, radius })
    }

    /// Points where the incircle touches the sides, ordered
    /// `[on BC, on CA, on AB]`
    ///
    /// The touch point on a side lies at distance `s - opposite` from each of
    /// the side's end vertices (tangent-length identity).
    pub fn tangent_points(&self) -> Result<[DVec2; 3], DegenerateTriangle> {
        self.check_degenerate()?;
        let [a, b, c] = self.sides();
        let s = 0.5 * (a + b + c);
        Ok([
            self.b.lerp(self.c, (s - b) / a),
            self.c.lerp(self.a, (s - c) / b),
            self.a.lerp(self.b, (s - a) / c),
        ])
    }

    /// Distances from A, B and C to the incenter
    pub fn distances_to_incenter(&self) -> Result<[f64; 3], DegenerateTriangle> {
        let incircle = self.incircle()?;
        Ok(self.vertices().map(|v| v.distance(incircle.center)))
    }

    /// The three corner voids left by the incircle, for A, B and C in order
    ///
    /// Each corner keeps its vertex as apex and takes as base the line
    /// tangent to the incircle at the incircle point nearest that vertex. It
    /// is the triangle formed by the vertex and its two incircle tangent
    /// points, shrunk toward the vertex by `d / (d + r)` where `d` is the
    /// vertex-incenter distance. Corners keep the parent's orientation, touch
    /// the incircle in exactly one point and are pairwise disjoint.
    pub fn corner_triangles(&self) -> Result<[Triangle; 3], DegenerateTriangle> {
        let incircle = self.incircle()?;
        let [on_bc, on_ca, on_ab] = self.tangent_points()?;
        let corner = |apex: DVec2, next: DVec2, prev: DVec2| {
            let d = apex.distance(incircle.center);
            let k = d / (d + incircle.radius);
            Triangle::new(apex, apex.lerp(next, k), apex.lerp(prev, k))
        };
        Ok([
            corner(self.a, on_ab, on_ca),
            corner(self.b, on_bc, on_ab),
            corner(self.c, on_ca, on_bc),
        ])
    }

    /// Whether `p` lies inside or on the boundary
    pub fn contains(&self, p: DVec2) -> bool {
        let [d1, d2, d3] = self.edge_sides(p);
        let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
        let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
        !(has_neg && has_pos)
    }

    /// Whether `p` lies strictly inside (not on an edge)
    pub fn strictly_contains(&self, p: DVec2) -> bool {
        let [d1, d2, d3] = self.edge_sides(p);
        (d1 > 0.0 && d2 > 0.0 && d3 > 0.0) || (d1 < 0.0 && d2 < 0.0 && d3 < 0.0)
    }

    fn edge_sides(&self, p: DVec2) -> [f64; 3] {
        [
            (self.b - self.a).perp_dot(p - self.a),
            (self.c - self.b).perp_dot(p - self.b),
            (self.a - self.c).perp_dot(p - self.c),
        ]
    }

    /// Distance from `p` to the nearest of the three edges
    pub fn edge_distance(&self, p: DVec2) -> f64 {
        segment_distance(p, self.a, self.b)
            .min(segment_distance(p, self.b, self.c))
            .min(segment_distance(p, self.c, self.a))
    }
}

/// Inscribe a circle into `triangle`, tagged with recursion depth and the
/// index of the top-level triangle it descends from
pub fn inscribe(triangle: &Triangle, depth: usize, owner: usize) -> Result<Circle, DegenerateTriangle> {
    let incircle = triangle.incircle()?;
    Ok(Circle::new(incircle.center, incircle.radius).with_origin(depth, owner))
}

pub(crate) fn segment_distance(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + t * ab)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn right_triangle() -> Triangle {
        Triangle::new(DVec2::new(0.0, 0.0), DVec2::new(3.0, 0.0), DVec2::new(0.0, 4.0))
    }

    #[test]
    fn test_metrics_345() {
        let tri = right_triangle();
        assert!((tri.area() - 6.0).abs() < EPS);
        let [a, b, c] = tri.sides();
        assert!((a - 5.0).abs() < EPS);
        assert!((b - 4.0).abs() < EPS);
        assert!((c - 3.0).abs() < EPS);
        assert!((tri.perimeter() - 12.0).abs() < EPS);
        assert!((tri.semiperimeter() - 6.0).abs() < EPS);
    }

    #[test]
    fn test_incircle_345() {
        let incircle = right_triangle().incircle().unwrap();
        // (3 + 4 - 5) / 2
        assert!((incircle.radius - 1.0).abs() < EPS);
        assert!(incircle.center.distance(DVec2::new(1.0, 1.0)) < EPS);
    }

    #[test]
    fn test_incircle_orientation_independent() {
        let ccw = Triangle::new(DVec2::new(2.0, 1.5), DVec2::new(6.0, 2.0), DVec2::new(4.5, 4.0));
        let cw = Triangle::new(ccw.a, ccw.c, ccw.b);
        assert!(ccw.signed_area() > 0.0);
        assert!(cw.signed_area() < 0.0);

        let i1 = ccw.incircle().unwrap();
        let i2 = cw.incircle().unwrap();
        assert!((i1.radius - i2.radius).abs() < EPS);
        assert!(i1.center.distance(i2.center) < EPS);
    }

    #[test]
    fn test_incircle_touches_every_edge() {
        let tri = Triangle::new(DVec2::new(2.0, 1.0), DVec2::new(6.0, 1.0), DVec2::new(4.0, 5.5));
        let incircle = tri.incircle().unwrap();
        assert!(tri.strictly_contains(incircle.center));
        assert!((tri.edge_distance(incircle.center) - incircle.radius).abs() < 1e-9);
    }

    #[test]
    fn test_tangent_points_lie_on_incircle() {
        let tri = Triangle::new(DVec2::new(2.0, 1.5), DVec2::new(6.0, 2.0), DVec2::new(4.5, 4.0));
        let incircle = tri.incircle().unwrap();
        for p in tri.tangent_points().unwrap() {
            assert!((p.distance(incircle.center) - incircle.radius).abs() < 1e-9);
            assert!(tri.contains(p));
        }
    }

    #[test]
    fn test_tangent_lengths() {
        let tri = right_triangle();
        let [on_bc, on_ca, on_ab] = tri.tangent_points().unwrap();
        let [a, b, c] = tri.sides();
        let s = tri.semiperimeter();
        // From A, both tangent points sit at s - a
        assert!((tri.a.distance(on_ab) - (s - a)).abs() < EPS);
        assert!((tri.a.distance(on_ca) - (s - a)).abs() < EPS);
        assert!((tri.b.distance(on_bc) - (s - b)).abs() < EPS);
        assert!((tri.c.distance(on_bc) - (s - c)).abs() < EPS);
    }

    #[test]
    fn test_distances_to_incenter() {
        let d = right_triangle().distances_to_incenter().unwrap();
        // Incenter (1, 1)
        assert!((d[0] - 2f64.sqrt()).abs() < EPS);
        assert!((d[1] - 5f64.sqrt()).abs() < EPS);
        assert!((d[2] - 10f64.sqrt()).abs() < EPS);
    }

    #[test]
    fn test_corner_triangles_clear_of_incircle() {
        let tri = Triangle::new(DVec2::new(2.0, 1.0), DVec2::new(6.0, 1.0), DVec2::new(4.0, 5.5));
        let incircle = tri.incircle().unwrap();
        let corners = tri.corner_triangles().unwrap();

        for (corner, apex) in corners.iter().zip(tri.vertices()) {
            assert_eq!(corner.a, apex);
            assert!(corner.area() < tri.area());
            assert!(corner.signed_area() > 0.0);
            for v in corner.vertices() {
                // Vertices on the parent edge may land a rounding error outside
                assert!(tri.contains(v) || tri.edge_distance(v) < 1e-12 * tri.longest_side());
                assert!(v.distance(incircle.center) >= incircle.radius - 1e-9);
            }
            let child = corner.incircle().unwrap();
            assert!(child.radius < incircle.radius);
            // Child touches the parent from outside
            let gap = child.center.distance(incircle.center) - child.radius - incircle.radius;
            assert!(gap.abs() < 1e-9);
        }

        let total: f64 = corners.iter().map(Triangle::area).sum();
        assert!(total + std::f64::consts::PI * incircle.radius.powi(2) <= tri.area() + 1e-9);
    }

    #[test]
    fn test_degenerate_triangle() {
        let tri = Triangle::new(DVec2::new(0.0, 0.0), DVec2::new(1.0, 1e-14), DVec2::new(2.0, 0.0));
        assert!(tri.is_degenerate());
        assert!(tri.incircle().is_err());
        assert!(tri.corner_triangles().is_err());

        let point = Triangle::new(DVec2::ONE, DVec2::ONE, DVec2::ONE);
        assert!(point.is_degenerate());

        let nan = Triangle::new(DVec2::new(f64::NAN, 0.0), DVec2::X, DVec2::Y);
        assert!(nan.is_degenerate());
    }

    #[test]
    fn test_degenerate_is_scale_free() {
        // Tiny but well-shaped triangles are still valid
        let tri = Triangle::new(DVec2::ZERO, DVec2::new(1e-8, 0.0), DVec2::new(0.0, 1e-8));
        assert!(!tri.is_degenerate());
        assert!(tri.incircle().unwrap().radius > 0.0);
    }

    #[test]
    fn test_inscribe_tags_origin() {
        let circle = inscribe(&right_triangle(), 2, 7).unwrap();
        assert_eq!(circle.depth, 2);
        assert_eq!(circle.triangle, 7);
        assert!((circle.radius - 1.0).abs() < EPS);
    }

    #[test]
    fn test_contains() {
        let tri = right_triangle();
        assert!(tri.contains(DVec2::new(1.0, 1.0)));
        assert!(tri.contains(DVec2::new(1.0, 0.0)));
        assert!(!tri.strictly_contains(DVec2::new(1.0, 0.0)));
        assert!(!tri.contains(DVec2::new(3.0, 3.0)));
        assert!(tri.centroid().distance(DVec2::new(1.0, 4.0 / 3.0)) < EPS);
    }
}
