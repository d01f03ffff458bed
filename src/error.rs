//! Error types for triangulation and mask clipping.
//!
//! Expected geometric edge cases (collinear points, zero-area triangles in a
//! batch, touching-only overlaps) are resolved silently by the algorithms.
//! Only precondition violations reach these types.

use thiserror::Error;

/// Which operand of a clip a triangle came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriangleRole {
    Source,
    Mask,
}

impl std::fmt::Display for TriangleRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Source => f.write_str("source"),
            Self::Mask => f.write_str("mask"),
        }
    }
}

/// Errors raised by the Delaunay triangulator.
#[derive(Debug, Error, PartialEq)]
pub enum TriangulationError {
    /// A point has a NaN or infinite coordinate.
    #[error("point {index} has a non-finite coordinate")]
    NonFinitePoint { index: usize },

    /// Edge legalization did not settle within the configured flip budget.
    #[error("edge legalization exceeded the flip budget of {limit}")]
    FlipBudgetExceeded { limit: usize },
}

/// Errors raised by the mask clipper.
#[derive(Debug, Error, PartialEq)]
pub enum ClipError {
    /// A triangle passed to a single-pair clip has (near) zero area.
    #[error("{role} triangle is degenerate")]
    DegenerateTriangle { role: TriangleRole },

    /// A fragment has a vertex count the small convex hull table cannot
    /// triangulate. Both operands were not convex.
    #[error("clip fragment has {count} vertices; expected 0 or 3..=6")]
    FragmentSize { count: usize },

    /// A sorted fragment turned out not to be convex.
    #[error("clip fragment is not convex")]
    NonConvexFragment,

    /// An index buffer is not a whole number of triangles or points past
    /// the end of its vertex buffer.
    #[error("invalid {role} index buffer: {message}")]
    InvalidIndexBuffer { role: TriangleRole, message: String },
}

impl ClipError {
    /// Creates an invalid index buffer error.
    pub fn invalid_indices(role: TriangleRole, message: impl Into<String>) -> Self {
        Self::InvalidIndexBuffer {
            role,
            message: message.into(),
        }
    }
}

/// Any error produced by this crate.
#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error(transparent)]
    Triangulation(#[from] TriangulationError),

    #[error(transparent)]
    Clip(#[from] ClipError),
}
