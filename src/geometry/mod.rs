//! Planar geometry kernel
//!
//! Exact, closed-form triangle metrics (area, sides, incircle, tangent
//! points), the corner sub-triangles used by the recursive packer, circle
//! primitives and validated boundary polygons.

mod circle;
mod polygon;
mod triangle;

pub use circle::Circle;
pub use polygon::Polygon;
pub use triangle::{inscribe, DegenerateTriangle, Incircle, Triangle, DEGENERATE_EPSILON};
pub(crate) use triangle::segment_distance;

/// 2D point / vector type used throughout the crate
pub type Point = glam::DVec2;
