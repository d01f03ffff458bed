//! Delaunay triangulation of 2D point sets.
//!
//! - [`delaunay`]: the incremental triangulator and its result type.
//! - [`triangle`]: vertex references and sides shared by the flip passes.

pub mod delaunay;
pub mod triangle;

pub use delaunay::{is_delaunay, triangulate, DelaunayTriangulator, Triangulation};
pub use triangle::{Side, VertexRef};
