//! Recursive circle packing of simple polygons
//!
//! Approximates the area of an arbitrary simple polygon with non-overlapping
//! circles, as used to model blocks-in-matrix (BIMS) geomaterials. The
//! polygon is split into a conforming triangle mesh; every triangle gets its
//! incircle, and the three corner voids around that circle are packed the
//! same way, down to a depth or radius cutoff.
//!
//! # Quick Start
//!
//! ```rust
//! use circle_pack::*;
//!
//! let slope = [(0.0, 0.0), (10.0, 0.0), (10.0, 3.0), (4.0, 6.0), (0.0, 6.0)];
//!
//! let config = PackingConfigBuilder::new()
//!     .max_triangle_area(2.0).unwrap()
//!     .max_depth(3).unwrap()
//!     .min_radius(0.02).unwrap()
//!     .build().unwrap();
//!
//! let packing = CirclePacking::generate(Polygon::from_xy(&slope).unwrap(), config).unwrap();
//!
//! let stats = packing.stats();
//! println!("{} circles, void ratio {:.3}", stats.count, stats.void_ratio);
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): KD-tree lookups from positions to circles
//! - `parallel` (default): packs mesh triangles on the rayon thread pool
//! - `serde`: Enables serialization support for configuration and results

// Modules
pub mod error;
pub mod config;
pub mod geometry;
pub mod triangulation;
pub mod packer;
pub mod stats;
pub mod packing;
pub mod export;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{PackingError, Result};
pub use config::{PackingConfig, PackingConfigBuilder, MAX_DEPTH_CEILING};
pub use geometry::{Circle, Incircle, Point, Polygon, Triangle};
pub use triangulation::{SpadeTriangulator, Triangulator};
pub use packer::RecursivePacker;
pub use stats::PackingStats;
pub use packing::CirclePacking;
pub use export::{CircleRecord, RenderData};

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;
