//! Spatial indexing for fast point-to-circle lookups
//!
//! This module is only available with the `spatial-index` feature.

use std::fmt;

use glam::DVec2;
use kiddo::immutable::float::kdtree::ImmutableKdTree;
use kiddo::SquaredEuclidean;

use crate::geometry::Circle;

/// KD-tree over circle centers
///
/// Provides O(log n) nearest-center lookups and radius queries used to find
/// the circle covering a position or to scan a packing for overlaps.
///
/// # Example
///
/// ```
/// use circle_pack::{Circle, Point, SpatialIndex};
///
/// let circles = vec![
///     Circle::new(Point::new(0.0, 0.0), 1.0),
///     Circle::new(Point::new(5.0, 0.0), 2.0),
/// ];
/// let index = SpatialIndex::new(&circles);
///
/// assert_eq!(index.find_nearest(Point::new(4.0, 1.0)), Some(1));
/// assert_eq!(index.find_containing(&circles, Point::new(0.5, 0.5)), Some(0));
/// assert_eq!(index.find_containing(&circles, Point::new(2.5, 0.0)), None);
/// ```
#[derive(Clone)]
pub struct SpatialIndex {
    tree: Option<ImmutableKdTree<f64, usize, 2, 32>>,
    len: usize,
    max_radius: f64,
}

impl fmt::Debug for SpatialIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpatialIndex")
            .field("len", &self.len)
            .field("max_radius", &self.max_radius)
            .finish()
    }
}

impl SpatialIndex {
    /// Build the index from circle centers
    ///
    /// Item `i` of the tree is circle `i` of the slice.
    pub fn new(circles: &[Circle]) -> Self {
        let points: Vec<[f64; 2]> = circles.iter().map(|c| [c.center.x, c.center.y]).collect();
        let max_radius = circles.iter().map(|c| c.radius).fold(0.0, f64::max);

        Self {
            tree: (!points.is_empty()).then(|| ImmutableKdTree::new_from_slice(&points)),
            len: points.len(),
            max_radius,
        }
    }

    /// Number of indexed circles
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Index of the circle whose center is nearest to `position`
    ///
    /// Returns `None` only for an empty index.
    pub fn find_nearest(&self, position: DVec2) -> Option<usize> {
        let tree = self.tree.as_ref()?;
        let result = tree.nearest_one::<SquaredEuclidean>(&[position.x, position.y]);
        Some(result.item as usize)
    }

    /// Indices of circles whose centers lie within `distance` of `position`,
    /// in ascending order
    pub fn centers_within(&self, position: DVec2, distance: f64) -> Vec<usize> {
        let Some(tree) = self.tree.as_ref() else {
            return Vec::new();
        };
        let mut found: Vec<usize> = tree
            .within_unsorted::<SquaredEuclidean>(&[position.x, position.y], distance * distance)
            .into_iter()
            .map(|n| n.item as usize)
            .collect();
        found.sort_unstable();
        found
    }

    /// Index of a circle covering `position`, if any
    ///
    /// `circles` must be the slice the index was built from. When the point
    /// lies on the tangency of two circles, the lower index wins.
    pub fn find_containing(&self, circles: &[Circle], position: DVec2) -> Option<usize> {
        self.centers_within(position, self.max_radius)
            .into_iter()
            .find(|&i| circles[i].contains(position))
    }

    /// All pairs `(i, j)`, `i < j`, of circles overlapping by more than `tolerance`
    pub fn overlapping_pairs(&self, circles: &[Circle], tolerance: f64) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for (i, circle) in circles.iter().enumerate() {
            let reach = circle.radius + self.max_radius;
            for j in self.centers_within(circle.center, reach) {
                if j > i && circle.overlaps(&circles[j], tolerance) {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }
}
