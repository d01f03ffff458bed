//! Geometry core for masked UI meshes.
//!
//! This crate provides the two algorithms UI mask effects are built on:
//! Delaunay triangulation of loose point sets, and clipping of triangle
//! meshes by convex mask meshes with full vertex attribute interpolation.
//! Everything runs on the CPU over caller-owned buffers.
//!
//! # Quick Start
//!
//! ```
//! use uimask::prelude::*;
//!
//! let points = [
//!     Vec2::new(0.0, 0.0),
//!     Vec2::new(4.0, 0.0),
//!     Vec2::new(4.0, 4.0),
//!     Vec2::new(0.0, 4.0),
//! ];
//! let indices = triangulate(&points)?;
//! assert_eq!(indices.len(), 6);
//!
//! let quad: Vec<Vertex> = points.iter().map(|&p| Vertex::from(p)).collect();
//! let mask = [
//!     Vertex::at_xy(1.0, 1.0),
//!     Vertex::at_xy(3.0, 1.0),
//!     Vertex::at_xy(1.0, 3.0),
//! ];
//! let clipped = MaskClipper::new(ClipConfig::default())
//!     .clip_batch(&quad, &indices, &mask, &[0, 1, 2])?;
//! assert!(!clipped.is_empty());
//! # Ok::<(), GeometryError>(())
//! ```

pub mod clipper;
pub mod colors;
pub mod config;
pub mod error;
pub mod math;
pub mod predicates;
pub mod triangulation;
pub mod vertex;

// Re-export commonly needed types at crate root for convenience
pub use clipper::{clip_triangle, ClipFragment, ClippedMesh, MaskClipper};
pub use error::{ClipError, GeometryError, TriangulationError};
pub use triangulation::{triangulate, DelaunayTriangulator, Triangulation};
pub use vertex::Vertex;

/// Prelude module for convenient imports.
///
/// # Example
/// ```
/// use uimask::prelude::*;
/// ```
pub mod prelude {
    // Math
    pub use crate::math::{Vec2, Vec3, Vec4};

    // Vertices & colors
    pub use crate::colors::{BlendMode, Color32};
    pub use crate::vertex::Vertex;

    // Triangulation
    pub use crate::triangulation::{triangulate, DelaunayTriangulator, Triangulation};

    // Clipping
    pub use crate::clipper::{
        clip_triangle, ClipFragment, ClippedMesh, ColorBlend, MaskClipper, VertexBlend,
    };

    // Config & errors
    pub use crate::config::{ClipConfig, TriangulationConfig};
    pub use crate::error::{ClipError, GeometryError, TriangulationError};
}
