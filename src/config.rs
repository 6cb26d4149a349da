//! Packing configuration and builder
//!
//! A packing run is fully described by a polygon plus a [`PackingConfig`].
//! The same polygon and configuration always produce the identical packing.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{PackingError, Result};

/// Hard cap on the recursion depth of a single triangle
///
/// Circle count grows as roughly `triangles * 3^depth`, so depth 12 already
/// means more than half a million circles per top-level triangle.
pub const MAX_DEPTH_CEILING: usize = 12;

/// Largest minimum angle (degrees) accepted for mesh refinement
///
/// Delaunay refinement is only guaranteed to terminate for angle bounds up to
/// roughly 30 degrees.
pub const MAX_MIN_ANGLE: f64 = 30.0;

const DEFAULT_MAX_DEPTH: usize = 3;
const DEFAULT_MAX_REFINEMENT_VERTICES: usize = 100_000;

/// Configuration for a circle packing run
///
/// # Example
///
/// ```rust
/// use circle_pack::*;
///
/// let config = PackingConfigBuilder::new()
///     .max_triangle_area(2.0)
///     .unwrap()
///     .max_depth(4)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// assert_eq!(config.max_depth, 4);
/// assert!(config.validate().is_ok());
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackingConfig {
    /// Upper bound on the area of every top-level mesh triangle
    ///
    /// Smaller values give a finer starting mesh and more, smaller circles.
    /// `f64::INFINITY` keeps the plain constrained triangulation of the
    /// boundary without any area refinement. Serialized as `null`.
    #[cfg_attr(feature = "serde", serde(with = "unbounded_area"))]
    pub max_triangle_area: f64,

    /// Number of corner-subdivision rounds below each top-level triangle
    ///
    /// - 0: one incircle per mesh triangle
    /// - 1: incircle plus one circle in each of the three corners
    /// - n: up to `(3^(n+1) - 1) / 2` circles per mesh triangle
    pub max_depth: usize,

    /// Circles with a radius at or below this value are kept but not
    /// subdivided further
    pub min_radius: f64,

    /// Same cutoff as `min_radius`, relative to the incircle of the
    /// top-level triangle
    ///
    /// 0.05 stops a branch once its circle has shrunk to 5% of the first
    /// circle of its mesh triangle, whatever the mesh scale. 0.0 disables it.
    pub min_radius_ratio: f64,

    /// Minimum interior angle (degrees) enforced by mesh refinement
    ///
    /// 0.0 disables angle refinement.
    pub min_angle: f64,

    /// Maximum number of vertices mesh refinement may insert before the
    /// triangulation is reported as not converging
    pub max_refinement_vertices: usize,
}

impl PackingConfig {
    /// Check every field against its allowed range
    ///
    /// Fields are public, so a hand-assembled config is re-validated before
    /// each run.
    pub fn validate(&self) -> Result<()> {
        check_max_triangle_area(self.max_triangle_area)?;
        check_max_depth(self.max_depth)?;
        check_min_radius(self.min_radius)?;
        check_min_radius_ratio(self.min_radius_ratio)?;
        check_min_angle(self.min_angle)?;
        Ok(())
    }

    /// Upper bound on the number of circles one mesh triangle can produce
    #[inline]
    ///
    /// Saturates at `usize::MAX` for depths far above [`MAX_DEPTH_CEILING`].
    pub fn max_circles_per_triangle(&self) -> usize {
        u32::try_from(self.max_depth)
            .ok()
            .and_then(|depth| depth.checked_add(1))
            .and_then(|levels| 3usize.checked_pow(levels))
            .map_or(usize::MAX, |n| (n - 1) / 2)
    }
}

impl Default for PackingConfig {
    fn default() -> Self {
        Self {
            max_triangle_area: f64::INFINITY,
            max_depth: DEFAULT_MAX_DEPTH,
            min_radius: 0.0,
            min_radius_ratio: 0.0,
            min_angle: 0.0,
            max_refinement_vertices: DEFAULT_MAX_REFINEMENT_VERTICES,
        }
    }
}

/// Builder for creating PackingConfig with validation
///
/// # Example
///
/// ```rust
/// use circle_pack::*;
///
/// // Use defaults
/// let config = PackingConfigBuilder::new().build().unwrap();
/// assert_eq!(config, PackingConfig::default());
///
/// // Out-of-range values are rejected at the setter
/// assert!(PackingConfigBuilder::new().min_radius(-1.0).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct PackingConfigBuilder {
    config: PackingConfig,
}

impl PackingConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - max_triangle_area: unbounded (boundary triangulation only)
    /// - max_depth: 3
    /// - min_radius: 0.0 (depth is the only cutoff)
    /// - min_radius_ratio: 0.0 (disabled)
    /// - min_angle: 0.0 (no angle refinement)
    /// - max_refinement_vertices: 100,000
    pub fn new() -> Self {
        Self {
            config: PackingConfig::default(),
        }
    }

    /// Set the maximum area of a top-level mesh triangle
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the area is not positive
    pub fn max_triangle_area(mut self, area: f64) -> Result<Self> {
        check_max_triangle_area(area)?;
        self.config.max_triangle_area = area;
        Ok(self)
    }

    /// Set the recursion depth cap
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if depth > [`MAX_DEPTH_CEILING`]
    pub fn max_depth(mut self, depth: usize) -> Result<Self> {
        check_max_depth(depth)?;
        self.config.max_depth = depth;
        Ok(self)
    }

    /// Set the radius at or below which circles are not subdivided
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the radius is negative or NaN
    pub fn min_radius(mut self, radius: f64) -> Result<Self> {
        check_min_radius(radius)?;
        self.config.min_radius = radius;
        Ok(self)
    }

    /// Set the relative radius cutoff, as a fraction of each mesh triangle's
    /// incircle radius
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` unless `0 <= ratio < 1`
    pub fn min_radius_ratio(mut self, ratio: f64) -> Result<Self> {
        check_min_radius_ratio(ratio)?;
        self.config.min_radius_ratio = ratio;
        Ok(self)
    }

    /// Set the minimum mesh angle in degrees
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the angle is negative or above [`MAX_MIN_ANGLE`]
    pub fn min_angle(mut self, degrees: f64) -> Result<Self> {
        check_min_angle(degrees)?;
        self.config.min_angle = degrees;
        Ok(self)
    }

    /// Cap the number of vertices mesh refinement may add
    pub fn max_refinement_vertices(mut self, count: usize) -> Self {
        self.config.max_refinement_vertices = count;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<PackingConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for PackingConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn check_max_triangle_area(area: f64) -> Result<()> {
    // NaN fails the comparison and is rejected here too
    if !(area > 0.0) {
        return Err(PackingError::InvalidParameter(format!(
            "max triangle area must be positive (got {})",
            area
        )));
    }
    Ok(())
}

fn check_max_depth(depth: usize) -> Result<()> {
    if depth > MAX_DEPTH_CEILING {
        return Err(PackingError::InvalidParameter(format!(
            "max depth must be <= {} (got {})",
            MAX_DEPTH_CEILING, depth
        )));
    }
    Ok(())
}

fn check_min_radius(radius: f64) -> Result<()> {
    if !(radius >= 0.0) {
        return Err(PackingError::InvalidParameter(format!(
            "min radius must be >= 0 (got {})",
            radius
        )));
    }
    Ok(())
}

fn check_min_radius_ratio(ratio: f64) -> Result<()> {
    if !(0.0..1.0).contains(&ratio) {
        return Err(PackingError::InvalidParameter(format!(
            "min radius ratio must be within [0, 1) (got {})",
            ratio
        )));
    }
    Ok(())
}

fn check_min_angle(degrees: f64) -> Result<()> {
    if !(0.0..=MAX_MIN_ANGLE).contains(&degrees) {
        return Err(PackingError::InvalidParameter(format!(
            "min angle must be within [0, {}] degrees (got {})",
            MAX_MIN_ANGLE, degrees
        )));
    }
    Ok(())
}

/// `f64::INFINITY` has no JSON representation, so the unbounded area goes
/// through serde as `None`
#[cfg(feature = "serde")]
mod unbounded_area {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(area: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        area.is_finite().then_some(*area).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}
