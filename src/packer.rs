//! Recursive corner packing of a single triangle
//!
//! Each triangle receives its incircle, then the three corner voids left by
//! that circle are packed the same way, one level deeper. The recursion tree
//! is walked with an explicit stack, so adversarial depths cannot overflow
//! the call stack, and the visiting order is fixed: parent first, then the
//! corners of A, B and C.

use crate::config::{PackingConfig, MAX_DEPTH_CEILING};
use crate::geometry::{inscribe, Circle, Triangle};

/// Bounded depth-first packer for one triangle
///
/// A pure function of its inputs: the same triangle always yields the same
/// circles in the same order.
///
/// # Example
///
/// ```
/// use circle_pack::{Point, RecursivePacker, Triangle};
///
/// let tri = Triangle::new(Point::new(0.0, 0.0), Point::new(3.0, 0.0), Point::new(0.0, 4.0));
///
/// // Depth 0: just the incircle
/// assert_eq!(RecursivePacker::new(0, 0.0).pack(&tri, 0).len(), 1);
///
/// // Depth 1: incircle plus one circle per corner
/// let circles = RecursivePacker::new(1, 0.0).pack(&tri, 0);
/// assert_eq!(circles.len(), 4);
/// assert!(circles[1..].iter().all(|c| c.depth == 1 && c.radius < circles[0].radius));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecursivePacker {
    /// Deepest recursion level that still receives circles
    pub max_depth: usize,
    /// Circles at or below this radius are not subdivided
    pub min_radius: f64,
    /// Circles at or below this fraction of the first incircle's radius are
    /// not subdivided
    pub min_radius_ratio: f64,
}

impl Default for RecursivePacker {
    fn default() -> Self {
        Self::from_config(&PackingConfig::default())
    }
}

impl RecursivePacker {
    /// Create a packer
    ///
    /// `max_depth` is clamped to [`MAX_DEPTH_CEILING`].
    pub fn new(max_depth: usize, min_radius: f64) -> Self {
        Self {
            max_depth: max_depth.min(MAX_DEPTH_CEILING),
            min_radius,
            min_radius_ratio: 0.0,
        }
    }

    pub fn from_config(config: &PackingConfig) -> Self {
        Self::new(config.max_depth, config.min_radius)
            .with_min_radius_ratio(config.min_radius_ratio)
    }

    /// Also stop once a circle shrinks to `ratio` times the radius of the
    /// first circle packed
    pub fn with_min_radius_ratio(mut self, ratio: f64) -> Self {
        self.min_radius_ratio = ratio;
        self
    }

    /// Pack `triangle` starting at depth 0
    ///
    /// `owner` is the index of the top-level mesh triangle, recorded on every
    /// circle produced.
    pub fn pack(&self, triangle: &Triangle, owner: usize) -> Vec<Circle> {
        self.pack_from(triangle, 0, owner)
    }

    /// Pack `triangle` as if it sat at recursion level `depth`
    pub fn pack_from(&self, triangle: &Triangle, depth: usize, owner: usize) -> Vec<Circle> {
        let mut circles = Vec::new();
        self.pack_with(triangle, depth, owner, |circle, _| circles.push(*circle));
        circles
    }

    /// Walk the recursion tree, handing each circle to `visit` together with
    /// the (sub-)triangle it was inscribed in
    ///
    /// Degenerate sub-triangles end their branch silently: no circle, no
    /// children. The relative cutoff is measured against the incircle of
    /// `triangle` itself.
    pub fn pack_with<F>(&self, triangle: &Triangle, depth: usize, owner: usize, mut visit: F)
    where
        F: FnMut(&Circle, &Triangle),
    {
        let mut stack = vec![(*triangle, depth)];
        let mut cutoff: Option<f64> = None;

        while let Some((cell, depth)) = stack.pop() {
            let circle = match inscribe(&cell, depth, owner) {
                Ok(circle) => circle,
                Err(err) => {
                    log::trace!("triangle {} depth {}: skipping branch, {}", owner, depth, err);
                    continue;
                }
            };
            visit(&circle, &cell);

            let limit = *cutoff
                .get_or_insert_with(|| self.min_radius.max(circle.radius * self.min_radius_ratio));
            if depth >= self.max_depth || circle.radius <= limit {
                continue;
            }

            match cell.corner_triangles() {
                // Reversed so the A corner is popped first
                Ok(corners) => stack.extend(corners.into_iter().rev().map(|c| (c, depth + 1))),
                Err(err) => log::trace!("triangle {} depth {}: no corners, {}", owner, depth, err),
            }
        }
    }
}
