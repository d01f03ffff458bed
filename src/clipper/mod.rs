//! Triangle-by-triangle mask clipping.
//!
//! A mask is a triangle mesh whose triangles are convex (a quad is two
//! triangles). Clipping a source mesh by a mask keeps only the parts of each
//! source triangle covered by a mask triangle, with every vertex attribute
//! interpolated at the new corners.
//!
//! - [`mask`]: the per-pair clip and the batch [`MaskClipper`].
//! - [`fragment`]: the convex polygon a clip produces and its triangulation.
//! - [`blend`]: how source and mask vertices combine at each corner.

pub mod blend;
pub mod fragment;
pub mod mask;

pub use blend::{ColorBlend, KeepSource, VertexBlend};
pub use fragment::{triangulate_hull, ClipFragment};
pub use mask::{clip_triangle, ClippedMesh, MaskClipper};
