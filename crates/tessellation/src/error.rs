use thiserror::Error;

/// Result type of the stroker's operations.
pub type TessellationResult<T> = Result<T, TessellationError>;

/// An error that can happen while generating a mesh.
///
/// Nothing is produced when an operation fails, callers typically skip the shape.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum TessellationError {
    #[error("Failed to grow a scratch buffer")]
    AllocationFailure,
    #[error("The mesh has more vertices than 16 bits indices can address")]
    TooManyVertices,
    #[error("Polygon triangulation failed: {0}")]
    Triangulation(#[from] TriangulationError),
}

/// Reasons for a [`PolygonTessellator`](crate::PolygonTessellator) to reject its input.
#[derive(Error, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TriangulationError {
    #[error("No contour to triangulate")]
    NoContours,
    #[error("Contour {0} has less than three points or no area")]
    DegenerateContour(usize),
    #[error("Contours intersect themselves or each other")]
    SelfIntersection,
    #[error("Ear clipping failed")]
    Earcut,
}
