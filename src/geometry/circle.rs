//! Circle primitive produced by the packer

use glam::DVec2;
use std::f64::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A packed circle
///
/// Besides its geometry, every circle remembers where it came from: the
/// recursion depth at which it was inscribed and the index of the top-level
/// mesh triangle it descends from. Circles are never mutated after packing.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    /// Center point
    pub center: DVec2,

    /// Radius (> 0 for every packed circle)
    pub radius: f64,

    /// Recursion level (0 = incircle of a mesh triangle)
    pub depth: usize,

    /// Index of the owning top-level mesh triangle
    pub triangle: usize,
}

impl Circle {
    /// Create a circle at depth 0 owned by triangle 0
    pub fn new(center: DVec2, radius: f64) -> Self {
        Self {
            center,
            radius,
            depth: 0,
            triangle: 0,
        }
    }

    /// Tag the circle with its recursion depth and owning triangle
    pub fn with_origin(mut self, depth: usize, triangle: usize) -> Self {
        self.depth = depth;
        self.triangle = triangle;
        self
    }

    #[inline]
    pub fn area(&self) -> f64 {
        PI * self.radius * self.radius
    }

    #[inline]
    pub fn diameter(&self) -> f64 {
        2.0 * self.radius
    }

    /// Circumference
    #[inline]
    pub fn perimeter(&self) -> f64 {
        2.0 * PI * self.radius
    }

    #[inline]
    pub fn curvature(&self) -> f64 {
        1.0 / self.radius
    }

    /// Whether `p` lies inside or on the circle
    #[inline]
    pub fn contains(&self, p: DVec2) -> bool {
        self.center.distance_squared(p) <= self.radius * self.radius
    }

    /// Clearance between the two boundaries (negative when overlapping)
    #[inline]
    pub fn gap(&self, other: &Circle) -> f64 {
        self.center.distance(other.center) - self.radius - other.radius
    }

    /// Whether the circles overlap by more than `tolerance`
    ///
    /// Tangent circles (gap within tolerance of zero) do not overlap.
    pub fn overlaps(&self, other: &Circle, tolerance: f64) -> bool {
        self.gap(other) < -tolerance
    }

    pub fn is_tangent_to(&self, other: &Circle, tolerance: f64) -> bool {
        self.gap(other).abs() <= tolerance
    }

    /// Circles tangent to `self`, to `other` and to a straight line touching both
    ///
    /// Special case of Descartes' theorem with one circle of infinite radius:
    /// `k = k0 + k1 + 2·sqrt(k0·k1)`. `self` and `other` should be externally
    /// tangent. The two centers are found by intersecting the circles of
    /// radius `r0 + r` and `r1 + r` around the given centers; both mirror
    /// solutions are returned. Returns `None` if those circles do not meet.
    ///
    /// # Example
    ///
    /// ```
    /// use circle_pack::{Circle, Point};
    ///
    /// // Two unit circles resting on the x axis
    /// let left = Circle::new(Point::new(-1.0, 1.0), 1.0);
    /// let right = Circle::new(Point::new(1.0, 1.0), 1.0);
    /// let (upper, lower) = left.descartes_pair(&right).unwrap();
    /// assert!((lower.radius - 0.25).abs() < 1e-12);
    /// assert!((lower.center - Point::new(0.0, 0.25)).length() < 1e-12);
    /// assert!((upper.center - Point::new(0.0, 1.75)).length() < 1e-12);
    /// ```
    pub fn descartes_pair(&self, other: &Circle) -> Option<(Circle, Circle)> {
        let (k0, k1) = (self.curvature(), other.curvature());
        let radius = 1.0 / (k0 + k1 + 2.0 * (k0 * k1).sqrt());
        self.tangent_centers(other, radius)
            .map(|(p, q)| (Circle::new(p, radius), Circle::new(q, radius)))
    }

    /// Inner Soddy circle of three mutually tangent circles
    ///
    /// General case of Descartes' theorem:
    /// `k = k0 + k1 + k2 + 2·sqrt(k0·k1 + k1·k2 + k2·k0)`. Of the two
    /// candidate centers tangent to `self` and `c1`, the one that best
    /// touches `c2` is returned.
    pub fn descartes_triple(&self, c1: &Circle, c2: &Circle) -> Option<Circle> {
        let (k0, k1, k2) = (self.curvature(), c1.curvature(), c2.curvature());
        let radius = 1.0 / (k0 + k1 + k2 + 2.0 * (k0 * k1 + k1 * k2 + k2 * k0).sqrt());
        let (p, q) = self.tangent_centers(c1, radius)?;
        let miss = |center: DVec2| (center.distance(c2.center) - c2.radius - radius).abs();
        let center = if miss(p) <= miss(q) { p } else { q };
        Some(Circle::new(center, radius))
    }

    /// Centers of circles of `radius` externally tangent to both `self` and `other`
    fn tangent_centers(&self, other: &Circle, radius: f64) -> Option<(DVec2, DVec2)> {
        let r1 = self.radius + radius;
        let r2 = other.radius + radius;
        let offset = other.center - self.center;
        let dist = offset.length();
        if !(dist > 0.0) {
            return None;
        }
        let dir = offset / dist;
        // Distance along the center line to the chord, then half chord length
        let chord = (r1 * r1 - r2 * r2 + dist * dist) / (2.0 * dist);
        let half_sq = r1 * r1 - chord * chord;
        if half_sq < -1e-9 * r1 * r1 {
            return None;
        }
        let half = half_sq.max(0.0).sqrt();
        let base = self.center + chord * dir;
        let normal = dir.perp();
        Some((base + half * normal, base - half * normal))
    }
}
