//! Error types for circle packing

/// Errors that can abort a packing run
///
/// A run either returns a complete packing or exactly one of these errors;
/// no partial result is ever handed back.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PackingError {
    /// The boundary polygon failed validation (too few points, repeated
    /// vertices, zero area or a self-intersecting boundary)
    #[error("invalid polygon: {0}")]
    InvalidPolygon(String),
    /// A packing parameter is out of range
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// The mesh generator could not produce a valid conforming triangulation
    #[error("triangulation failed: {0}")]
    TriangulationFailed(String),
}

/// Result type alias for packing operations
pub type Result<T> = std::result::Result<T, PackingError>;
