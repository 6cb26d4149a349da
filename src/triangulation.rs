//! Boundary-conforming triangulation of the packing polygon
//!
//! Mesh generation sits behind the [`Triangulator`] trait so any constrained
//! triangulation backend can be swapped in without touching the packer. The
//! default backend is spade's constrained Delaunay triangulation with
//! Ruppert-style refinement.

use glam::DVec2;
use spade::{
    AngleLimit, ConstrainedDelaunayTriangulation, Point2, RefinementParameters, Triangulation,
};
use std::collections::{HashMap, HashSet};

use crate::config::PackingConfig;
use crate::error::{PackingError, Result};
use crate::geometry::{segment_distance, Polygon, Triangle};

/// Relative tolerance when checking that the mesh area equals the polygon area
pub const MESH_AREA_TOLERANCE: f64 = 1e-9;

/// How far (relative to the polygon's bounding box diagonal) an unshared
/// mesh edge may sit from the polygon boundary
pub const MESH_BOUNDARY_TOLERANCE: f64 = 1e-9;

/// Trait for mesh generators that partition a polygon into triangles
///
/// Implementations must return pairwise non-overlapping, non-degenerate
/// triangles whose union is the polygon, none larger than
/// `max_triangle_area`. [`validate_mesh`] is applied to the output before
/// any circle is packed.
pub trait Triangulator {
    /// Triangulate `polygon` with every triangle at most `max_triangle_area`
    fn triangulate(&self, polygon: &Polygon, max_triangle_area: f64) -> Result<Vec<Triangle>>;
}

impl<F> Triangulator for F
where
    F: Fn(&Polygon, f64) -> Result<Vec<Triangle>>,
{
    fn triangulate(&self, polygon: &Polygon, max_triangle_area: f64) -> Result<Vec<Triangle>> {
        self(polygon, max_triangle_area)
    }
}

/// Constrained Delaunay triangulation backed by spade
#[derive(Debug, Clone, Copy)]
pub struct SpadeTriangulator {
    /// Minimum interior angle in degrees (0.0 = no angle refinement)
    pub min_angle: f64,
    /// Refinement gives up after inserting this many vertices
    pub max_additional_vertices: usize,
}

impl Default for SpadeTriangulator {
    fn default() -> Self {
        Self::from_config(&PackingConfig::default())
    }
}

impl SpadeTriangulator {
    /// Take the mesh quality settings from a packing configuration
    pub fn from_config(config: &PackingConfig) -> Self {
        Self {
            min_angle: config.min_angle,
            max_additional_vertices: config.max_refinement_vertices,
        }
    }

    /// spade treats a 0 degree limit as "no angle refinement"
    fn angle_limit(&self) -> AngleLimit {
        AngleLimit::from_deg(self.min_angle.max(0.0))
    }
}

impl Triangulator for SpadeTriangulator {
    fn triangulate(&self, polygon: &Polygon, max_triangle_area: f64) -> Result<Vec<Triangle>> {
        let vertices: Vec<Point2<f64>> = polygon
            .vertices()
            .iter()
            .map(|v| Point2::new(v.x, v.y))
            .collect();
        let n = vertices.len();
        let edges: Vec<[usize; 2]> = (0..n).map(|i| [i, (i + 1) % n]).collect();

        let mut cdt = ConstrainedDelaunayTriangulation::<Point2<f64>>::bulk_load_cdt(vertices, edges)
            .map_err(|e| PackingError::TriangulationFailed(format!("vertex insertion failed: {:?}", e)))?;

        let mut params = RefinementParameters::<f64>::new()
            .exclude_outer_faces(true)
            .with_angle_limit(self.angle_limit())
            .with_max_additional_vertices(self.max_additional_vertices);
        if max_triangle_area.is_finite() {
            params = params.with_max_allowed_area(max_triangle_area);
        }

        let result = cdt.refine(params);
        if !result.refinement_complete {
            return Err(PackingError::TriangulationFailed(format!(
                "refinement did not converge within {} additional vertices",
                self.max_additional_vertices
            )));
        }

        let excluded: HashSet<_> = result.excluded_faces.into_iter().collect();
        let triangles: Vec<Triangle> = cdt
            .inner_faces()
            .filter(|face| !excluded.contains(&face.fix()))
            .map(|face| {
                let [a, b, c] = face.vertices().map(|v| {
                    let p = v.position();
                    DVec2::new(p.x, p.y)
                });
                Triangle::new(a, b, c)
            })
            .collect();

        log::debug!(
            "triangulated polygon with {} vertices into {} triangles ({} mesh vertices)",
            n,
            triangles.len(),
            cdt.num_vertices()
        );

        Ok(triangles)
    }
}

/// Check that `triangles` is a valid partition of `polygon`
///
/// # Errors
///
/// Returns `TriangulationFailed` if the mesh is empty, holds a degenerate
/// triangle, holds a triangle larger than `max_triangle_area`, does not fit
/// together edge to edge (see [`check_partition`]) or its total area differs
/// from the polygon area by more than [`MESH_AREA_TOLERANCE`] (relative).
pub fn validate_mesh(polygon: &Polygon, triangles: &[Triangle], max_triangle_area: f64) -> Result<()> {
    if triangles.is_empty() {
        return Err(PackingError::TriangulationFailed("mesh has no triangles".into()));
    }

    if let Some(i) = triangles.iter().position(Triangle::is_degenerate) {
        return Err(PackingError::TriangulationFailed(format!(
            "mesh triangle {} is degenerate",
            i
        )));
    }

    let area_limit = max_triangle_area * (1.0 + MESH_AREA_TOLERANCE);
    if let Some(i) = triangles.iter().position(|t| t.area() > area_limit) {
        return Err(PackingError::TriangulationFailed(format!(
            "mesh triangle {} has area {} above the bound {}",
            i,
            triangles[i].area(),
            max_triangle_area
        )));
    }

    let polygon_area = polygon.area();
    let mesh_area: f64 = triangles.iter().map(Triangle::area).sum();
    if (mesh_area - polygon_area).abs() > MESH_AREA_TOLERANCE * polygon_area {
        return Err(PackingError::TriangulationFailed(format!(
            "mesh area {} does not match polygon area {}",
            mesh_area, polygon_area
        )));
    }

    check_partition(polygon, triangles)
}

/// Check that a mesh is conforming and covers the polygon exactly once
///
/// All triangles must share one winding. Every directed edge may appear
/// once; an interior edge is matched by its reverse in the neighbouring
/// triangle, and an unmatched edge must run along the polygon boundary in the
/// direction the winding implies. Together with the area check in
/// [`validate_mesh`] this rules out overlapping triangles, gaps and triangles
/// outside the polygon.
///
/// Meshes with hanging vertices (a vertex in the middle of a neighbour's
/// edge) are rejected as well.
pub fn check_partition(polygon: &Polygon, triangles: &[Triangle]) -> Result<()> {
    let Some(first) = triangles.first() else {
        return Err(PackingError::TriangulationFailed("mesh has no triangles".into()));
    };
    let ccw = first.signed_area() > 0.0;
    if let Some(i) = triangles.iter().position(|t| (t.signed_area() > 0.0) != ccw) {
        return Err(PackingError::TriangulationFailed(format!(
            "mesh triangle {} is wound against the others",
            i
        )));
    }

    let mut edges: HashMap<(VertexKey, VertexKey), usize> = HashMap::with_capacity(3 * triangles.len());
    for (i, tri) in triangles.iter().enumerate() {
        for (p, q) in directed_edges(tri) {
            if let Some(j) = edges.insert((vertex_key(p), vertex_key(q)), i) {
                return Err(PackingError::TriangulationFailed(format!(
                    "mesh triangles {} and {} overlap along edge {} -> {}",
                    j, i, p, q
                )));
            }
        }
    }

    let (min, max) = polygon.bounds();
    let tolerance = MESH_BOUNDARY_TOLERANCE * min.distance(max);
    let winding = if ccw == polygon.is_counter_clockwise() { 1.0 } else { -1.0 };

    for (i, tri) in triangles.iter().enumerate() {
        for (p, q) in directed_edges(tri) {
            if edges.contains_key(&(vertex_key(q), vertex_key(p))) {
                continue;
            }
            let on_boundary = polygon.edges().any(|(a, b)| {
                segment_distance(p, a, b) <= tolerance
                    && segment_distance(q, a, b) <= tolerance
                    && (q - p).dot(b - a) * winding > 0.0
            });
            if !on_boundary {
                return Err(PackingError::TriangulationFailed(format!(
                    "mesh triangle {} has an unshared edge {} -> {} off the polygon boundary",
                    i, p, q
                )));
            }
        }
    }

    Ok(())
}

/// Bit pattern of a vertex, with -0.0 folded into 0.0
type VertexKey = (u64, u64);

fn vertex_key(p: DVec2) -> VertexKey {
    ((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits())
}

fn directed_edges(tri: &Triangle) -> [(DVec2, DVec2); 3] {
    [(tri.a, tri.b), (tri.b, tri.c), (tri.c, tri.a)]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Polygon {
        Polygon::from_xy(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]).unwrap()
    }

    fn l_shape() -> Polygon {
        Polygon::from_xy(&[
            (0.0, 0.0),
            (4.0, 0.0),
            (4.0, 1.0),
            (1.0, 1.0),
            (1.0, 4.0),
            (0.0, 4.0),
        ])
        .unwrap()
    }

    fn mesh_area(triangles: &[Triangle]) -> f64 {
        triangles.iter().map(Triangle::area).sum()
    }

    #[test]
    fn test_square_unrefined() {
        let triangles = SpadeTriangulator::default()
            .triangulate(&square(), f64::INFINITY)
            .unwrap();

        assert_eq!(triangles.len(), 2);
        for tri in &triangles {
            assert!((tri.area() - 8.0).abs() < 1e-12);
        }
        assert!(validate_mesh(&square(), &triangles, f64::INFINITY).is_ok());
    }

    #[test]
    fn test_area_bound_respected() {
        let polygon = square();
        let triangles = SpadeTriangulator::default().triangulate(&polygon, 0.5).unwrap();

        assert!(triangles.len() >= 32);
        assert!(triangles.iter().all(|t| t.area() <= 0.5 + 1e-12));
        assert!((mesh_area(&triangles) - 16.0).abs() < 1e-9);
        assert!(validate_mesh(&polygon, &triangles, 0.5).is_ok());
    }

    #[test]
    fn test_concave_polygon_excludes_outside() {
        let polygon = l_shape();
        let triangles = SpadeTriangulator::default().triangulate(&polygon, 1.0).unwrap();

        assert!((mesh_area(&triangles) - polygon.area()).abs() < 1e-9);
        for tri in &triangles {
            assert!(polygon.contains(tri.centroid()));
        }
    }

    #[test]
    fn test_clockwise_polygon() {
        let polygon = Polygon::from_xy(&[(0.0, 0.0), (0.0, 3.0), (5.0, 3.0), (5.0, 0.0)]).unwrap();
        let triangles = SpadeTriangulator::default().triangulate(&polygon, 2.0).unwrap();
        assert!(validate_mesh(&polygon, &triangles, 2.0).is_ok());
    }

    #[test]
    fn test_angle_limit() {
        // The diagonal of a 10 x 1 strip makes a 5.7 degree angle
        let polygon = Polygon::from_xy(&[(0.0, 0.0), (10.0, 0.0), (10.0, 1.0), (0.0, 1.0)]).unwrap();
        let triangulator = SpadeTriangulator {
            min_angle: 20.0,
            ..SpadeTriangulator::default()
        };
        let triangles = triangulator.triangulate(&polygon, f64::INFINITY).unwrap();
        assert!(triangles.len() > 2);
        assert!(validate_mesh(&polygon, &triangles, f64::INFINITY).is_ok());
    }

    #[test]
    fn test_refinement_cap_fails() {
        let triangulator = SpadeTriangulator {
            min_angle: 0.0,
            max_additional_vertices: 2,
        };
        let err = triangulator.triangulate(&square(), 0.01).unwrap_err();
        assert!(matches!(err, PackingError::TriangulationFailed(_)));
    }

    #[test]
    fn test_closure_triangulator() {
        let diagonal = |polygon: &Polygon, _: f64| -> Result<Vec<Triangle>> {
            let v = polygon.vertices();
            Ok(vec![Triangle::new(v[0], v[1], v[2]), Triangle::new(v[0], v[2], v[3])])
        };
        let triangles = diagonal.triangulate(&square(), 10.0).unwrap();
        assert_eq!(triangles.len(), 2);
        assert!(validate_mesh(&square(), &triangles, 10.0).is_ok());
    }

    #[test]
    fn test_validate_mesh_rejects_gaps_and_overlaps() {
        let polygon = square();
        let half = vec![Triangle::new(
            DVec2::new(0.0, 0.0),
            DVec2::new(4.0, 0.0),
            DVec2::new(4.0, 4.0),
        )];
        assert!(validate_mesh(&polygon, &half, 10.0).is_err());

        let doubled = vec![half[0], half[0], half[0]];
        assert!(validate_mesh(&polygon, &doubled, 10.0).is_err());

        assert!(validate_mesh(&polygon, &[], 10.0).is_err());
    }

    #[test]
    fn test_validate_mesh_rejects_overlap_hidden_by_area() {
        // Two copies of one half: the area sums to the square, but the other
        // half is empty and the copies overlap completely
        let polygon = square();
        let half = Triangle::new(DVec2::new(0.0, 0.0), DVec2::new(4.0, 0.0), DVec2::new(4.0, 4.0));
        let err = validate_mesh(&polygon, &[half, half], 10.0).unwrap_err();
        assert!(matches!(err, PackingError::TriangulationFailed(_)));

        // Same area, but the second triangle pokes out through the top edge
        let shifted = [
            Triangle::new(DVec2::new(0.0, 0.0), DVec2::new(4.0, 0.0), DVec2::new(4.0, 2.0)),
            Triangle::new(DVec2::new(0.0, 0.0), DVec2::new(4.0, 2.0), DVec2::new(0.0, 6.0)),
        ];
        assert_eq!(shifted.iter().map(Triangle::area).sum::<f64>(), 16.0);
        assert!(validate_mesh(&polygon, &shifted, 100.0).is_err());
    }

    #[test]
    fn test_check_partition() {
        let polygon = square();
        let split = [
            Triangle::new(DVec2::new(0.0, 0.0), DVec2::new(4.0, 0.0), DVec2::new(4.0, 4.0)),
            Triangle::new(DVec2::new(0.0, 0.0), DVec2::new(4.0, 4.0), DVec2::new(0.0, 4.0)),
        ];
        assert!(check_partition(&polygon, &split).is_ok());

        // Clockwise copies of the same mesh are fine as long as all agree
        let flipped: Vec<Triangle> = split.iter().map(|t| Triangle::new(t.a, t.c, t.b)).collect();
        assert!(check_partition(&polygon, &flipped).is_ok());

        let mixed = [split[0], flipped[1]];
        assert!(check_partition(&polygon, &mixed).is_err());

        // Refined spade meshes split boundary edges and still pass
        let refined = SpadeTriangulator::default().triangulate(&l_shape(), 0.3).unwrap();
        assert!(check_partition(&l_shape(), &refined).is_ok());
    }

    #[test]
    fn test_validate_mesh_rejects_degenerate_and_oversized() {
        let polygon = square();
        let mut triangles = vec![
            Triangle::new(DVec2::new(0.0, 0.0), DVec2::new(4.0, 0.0), DVec2::new(4.0, 4.0)),
            Triangle::new(DVec2::new(0.0, 0.0), DVec2::new(4.0, 4.0), DVec2::new(0.0, 4.0)),
        ];
        assert!(validate_mesh(&polygon, &triangles, 8.0).is_ok());
        assert!(validate_mesh(&polygon, &triangles, 7.0).is_err());

        triangles.push(Triangle::new(DVec2::ZERO, DVec2::ONE, DVec2::splat(2.0)));
        assert!(validate_mesh(&polygon, &triangles, 8.0).is_err());
    }
}
