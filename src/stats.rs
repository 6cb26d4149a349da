//! Summary statistics over a packing

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::Circle;

/// Aggregate figures for a set of packed circles
///
/// For an empty circle set the radius figures are 0.0 and the void ratio is 1.0.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PackingStats {
    /// Number of circles
    pub count: usize,
    pub radius_min: f64,
    pub radius_max: f64,
    pub radius_mean: f64,
    /// Summed circle area
    pub circle_area: f64,
    /// Area of the packed polygon
    pub polygon_area: f64,
    /// Fraction of the polygon not covered by circles: `1 - circle_area / polygon_area`
    pub void_ratio: f64,
    /// Number of circles per recursion depth (index = depth)
    pub depth_counts: Vec<usize>,
}

impl PackingStats {
    /// Compute statistics for `circles` packed into a region of `polygon_area`
    pub fn compute(circles: &[Circle], polygon_area: f64) -> Self {
        let count = circles.len();
        let circle_area: f64 = circles.iter().map(Circle::area).sum();
        let void_ratio = if polygon_area > 0.0 {
            1.0 - circle_area / polygon_area
        } else {
            1.0
        };

        let mut depth_counts = Vec::new();
        for circle in circles {
            if depth_counts.len() <= circle.depth {
                depth_counts.resize(circle.depth + 1, 0);
            }
            depth_counts[circle.depth] += 1;
        }

        if count == 0 {
            return Self {
                polygon_area,
                void_ratio,
                ..Self::default()
            };
        }

        let (radius_min, radius_max, radius_sum) = circles.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, 0.0),
            |(min, max, sum), c| (min.min(c.radius), max.max(c.radius), sum + c.radius),
        );

        Self {
            count,
            radius_min,
            radius_max,
            radius_mean: radius_sum / count as f64,
            circle_area,
            polygon_area,
            void_ratio,
            depth_counts,
        }
    }

    /// Fraction of the polygon covered by circles
    #[inline]
    pub fn coverage(&self) -> f64 {
        1.0 - self.void_ratio
    }

    /// Number of circles inscribed at `depth`
    pub fn count_at_depth(&self, depth: usize) -> usize {
        self.depth_counts.get(depth).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;
    use std::f64::consts::PI;

    #[test]
    fn test_basic_stats() {
        let circles = vec![
            Circle::new(DVec2::new(1.0, 1.0), 1.0),
            Circle::new(DVec2::new(3.0, 1.0), 0.5).with_origin(1, 0),
            Circle::new(DVec2::new(5.0, 1.0), 0.25).with_origin(1, 0),
            Circle::new(DVec2::new(7.0, 1.0), 0.25).with_origin(3, 1),
        ];
        let stats = PackingStats::compute(&circles, 20.0);

        assert_eq!(stats.count, 4);
        assert_eq!(stats.radius_min, 0.25);
        assert_eq!(stats.radius_max, 1.0);
        assert!((stats.radius_mean - 0.5).abs() < 1e-12);

        let area = PI * (1.0 + 0.25 + 0.0625 + 0.0625);
        assert!((stats.circle_area - area).abs() < 1e-12);
        assert!((stats.void_ratio - (1.0 - area / 20.0)).abs() < 1e-12);
        assert!((stats.coverage() - area / 20.0).abs() < 1e-12);

        assert_eq!(stats.depth_counts, vec![1, 2, 0, 1]);
        assert_eq!(stats.count_at_depth(1), 2);
        assert_eq!(stats.count_at_depth(9), 0);
    }

    #[test]
    fn test_empty() {
        let stats = PackingStats::compute(&[], 16.0);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.radius_min, 0.0);
        assert_eq!(stats.radius_max, 0.0);
        assert_eq!(stats.radius_mean, 0.0);
        assert_eq!(stats.void_ratio, 1.0);
        assert_eq!(stats.polygon_area, 16.0);
        assert!(stats.depth_counts.is_empty());
    }
}
