//! CirclePacking main structure

use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::{PackingConfig, PackingConfigBuilder};
use crate::error::Result;
use crate::geometry::{Circle, Polygon, Triangle};
use crate::packer::RecursivePacker;
use crate::stats::PackingStats;
use crate::triangulation::{validate_mesh, SpadeTriangulator, Triangulator};

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;
#[cfg(feature = "spatial-index")]
use glam::DVec2;

/// A complete circle packing of a polygon
///
/// Produced in one atomic run: the polygon is triangulated once, every mesh
/// triangle is packed independently and the circles are concatenated in
/// mesh order (then depth-first A, B, C order inside each triangle). There
/// are no mutating operations; drop the value when done.
///
/// # Examples
///
/// ```
/// use circle_pack::*;
///
/// let square = [(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)];
/// let packing = CirclePacking::run(&square, 100.0, 1, 0.0).unwrap();
///
/// // Two mesh triangles, each with an incircle and three corner circles
/// assert_eq!(packing.triangles().len(), 2);
/// assert_eq!(packing.circle_count(), 8);
/// println!("void ratio: {:.3}", packing.stats().void_ratio);
/// ```
#[derive(Debug, Clone)]
pub struct CirclePacking {
    /// Configuration used for this run
    config: PackingConfig,

    /// The packed boundary
    polygon: Polygon,

    /// Top-level mesh triangles (indexed by `Circle::triangle`)
    triangles: Vec<Triangle>,

    /// All circles in mesh order, then depth-first order
    circles: Vec<Circle>,

    stats: PackingStats,

    /// Spatial index for fast position-to-circle lookups (requires spatial-index feature)
    #[cfg(feature = "spatial-index")]
    spatial_index: SpatialIndex,
}

impl CirclePacking {
    /// Pack a polygon given as raw `(x, y)` pairs
    ///
    /// # Arguments
    ///
    /// * `points` - Polygon vertices, implicitly closed
    /// * `max_triangle_area` - Upper bound on mesh triangle area
    /// * `max_depth` - Corner-subdivision rounds per mesh triangle
    /// * `min_radius` - Circles at or below this radius are not subdivided
    ///
    /// # Errors
    ///
    /// `InvalidParameter` or `InvalidPolygon` before any meshing happens,
    /// `TriangulationFailed` if no valid mesh can be produced.
    pub fn run(
        points: &[(f64, f64)],
        max_triangle_area: f64,
        max_depth: usize,
        min_radius: f64,
    ) -> Result<Self> {
        let config = PackingConfigBuilder::new()
            .max_triangle_area(max_triangle_area)?
            .max_depth(max_depth)?
            .min_radius(min_radius)?
            .build()?;
        let polygon = Polygon::from_xy(points)?;
        Self::generate(polygon, config)
    }

    /// Pack a validated polygon with the default spade mesh generator
    ///
    /// # Example
    ///
    /// ```
    /// use circle_pack::*;
    ///
    /// let polygon = Polygon::from_xy(&[(0.0, 0.0), (6.0, 0.0), (6.0, 2.0), (0.0, 3.0)]).unwrap();
    /// let config = PackingConfigBuilder::new()
    ///     .max_triangle_area(1.0)
    ///     .unwrap()
    ///     .max_depth(2)
    ///     .unwrap()
    ///     .build()
    ///     .unwrap();
    ///
    /// let packing = CirclePacking::generate(polygon, config).unwrap();
    /// assert!(packing.triangles().len() >= 15);
    /// assert!(packing.stats().void_ratio > 0.0);
    /// ```
    pub fn generate(polygon: Polygon, config: PackingConfig) -> Result<Self> {
        let triangulator = SpadeTriangulator::from_config(&config);
        Self::generate_with(polygon, config, &triangulator)
    }

    /// Pack a polygon with a custom mesh generator
    ///
    /// The generator's output is checked with
    /// [`validate_mesh`](crate::triangulation::validate_mesh) before packing.
    pub fn generate_with<M>(polygon: Polygon, config: PackingConfig, triangulator: &M) -> Result<Self>
    where
        M: Triangulator + ?Sized,
    {
        config.validate()?;
        let start = Instant::now();

        let triangles = triangulator.triangulate(&polygon, config.max_triangle_area)?;
        validate_mesh(&polygon, &triangles, config.max_triangle_area)?;
        log::debug!(
            "mesh ready: {} triangles in {:?}",
            triangles.len(),
            start.elapsed()
        );

        let packer = RecursivePacker::from_config(&config);
        let circles = pack_triangles(&packer, &triangles);
        let stats = PackingStats::compute(&circles, polygon.area());

        log::info!(
            "packed {} circles into {} triangles (max depth {}), void ratio {:.4}, total={:?}",
            stats.count,
            triangles.len(),
            config.max_depth,
            stats.void_ratio,
            start.elapsed()
        );

        #[cfg(feature = "spatial-index")]
        let spatial_index = SpatialIndex::new(&circles);

        Ok(Self {
            config,
            polygon,
            triangles,
            circles,
            stats,
            #[cfg(feature = "spatial-index")]
            spatial_index,
        })
    }

    /// Get the configuration used for this packing
    #[inline]
    pub fn config(&self) -> &PackingConfig {
        &self.config
    }

    #[inline]
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    /// Top-level mesh triangles in mesh order
    #[inline]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// All circles in mesh order, then depth-first order
    #[inline]
    pub fn circles(&self) -> &[Circle] {
        &self.circles
    }

    #[inline]
    pub fn stats(&self) -> &PackingStats {
        &self.stats
    }

    #[inline]
    pub fn circle_count(&self) -> usize {
        self.circles.len()
    }

    /// Get a circle by its position in the packing
    #[inline]
    pub fn get_circle(&self, index: usize) -> Option<&Circle> {
        self.circles.get(index)
    }

    /// Circles packed into mesh triangle `triangle`
    ///
    /// Returns an empty slice for an unknown triangle index.
    pub fn circles_in_triangle(&self, triangle: usize) -> &[Circle] {
        // Circles are grouped by owner in ascending order
        let start = self.circles.partition_point(|c| c.triangle < triangle);
        let end = self.circles.partition_point(|c| c.triangle <= triangle);
        &self.circles[start..end]
    }

    /// Circles inscribed at recursion level `depth`
    pub fn circles_at_depth(&self, depth: usize) -> impl Iterator<Item = &Circle> + '_ {
        self.circles.iter().filter(move |c| c.depth == depth)
    }

    /// Pairs of circle indices overlapping by more than `tolerance`
    ///
    /// Empty for every packing this crate produces; exposed as a check for
    /// consumers that post-process circles.
    pub fn find_overlaps(&self, tolerance: f64) -> Vec<(usize, usize)> {
        #[cfg(feature = "spatial-index")]
        {
            self.spatial_index.overlapping_pairs(&self.circles, tolerance)
        }
        #[cfg(not(feature = "spatial-index"))]
        {
            let mut pairs = Vec::new();
            for (i, a) in self.circles.iter().enumerate() {
                for (j, b) in self.circles.iter().enumerate().skip(i + 1) {
                    if a.overlaps(b, tolerance) {
                        pairs.push((i, j));
                    }
                }
            }
            pairs
        }
    }

    /// Find the circle covering a position (requires spatial-index feature)
    ///
    /// Returns `None` when the position falls into the void between circles.
    ///
    /// # Example
    ///
    /// ```
    /// # use circle_pack::*;
    /// # #[cfg(feature = "spatial-index")]
    /// # {
    /// let square = [(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)];
    /// let packing = CirclePacking::run(&square, 100.0, 0, 0.0).unwrap();
    ///
    /// let center = packing.circles()[0].center;
    /// assert_eq!(packing.find_circle_at(center), Some(0));
    /// assert_eq!(packing.find_circle_at(Point::new(0.01, 0.01)), None);
    /// # }
    /// ```
    #[cfg(feature = "spatial-index")]
    pub fn find_circle_at(&self, position: DVec2) -> Option<usize> {
        self.spatial_index.find_containing(&self.circles, position)
    }

    /// Index of the circle whose center is nearest to a position (requires
    /// spatial-index feature)
    #[cfg(feature = "spatial-index")]
    pub fn nearest_circle(&self, position: DVec2) -> Option<usize> {
        self.spatial_index.find_nearest(position)
    }
}

/// Pack every mesh triangle and concatenate the results in mesh order
///
/// The parallel path collects into indexed slots, so its output is identical
/// to the sequential one.
fn pack_triangles(packer: &RecursivePacker, triangles: &[Triangle]) -> Vec<Circle> {
    #[cfg(feature = "parallel")]
    let per_triangle: Vec<Vec<Circle>> = triangles
        .par_iter()
        .enumerate()
        .map(|(i, tri)| packer.pack(tri, i))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let per_triangle: Vec<Vec<Circle>> = triangles
        .iter()
        .enumerate()
        .map(|(i, tri)| packer.pack(tri, i))
        .collect();

    per_triangle.concat()
}
