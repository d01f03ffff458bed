//! Clipping triangle meshes by convex mask meshes.
//!
//! Clipping one source triangle by one mask triangle collects three kinds of
//! candidate corners:
//!
//! 1. Source corners inside the mask, blended with the mask sampled there.
//! 2. Mask corners inside the source, blended with the source sampled there.
//! 3. Proper crossings of a source edge with a mask edge.
//!
//! Both triangles are convex, so the candidates are the corners of a convex
//! polygon with at most six vertices, which [`ClipFragment`] triangulates.
//! Sampling a triangle at a point uses area-ratio barycentric weights over
//! every vertex attribute.

use tracing::{debug, warn};

use super::blend::{ColorBlend, VertexBlend};
use super::fragment::ClipFragment;
use crate::config::ClipConfig;
use crate::error::{ClipError, TriangleRole};
use crate::math::Vec2;
use crate::predicates::{
    barycentric_weights, contains_in_convex_hull, crossing_vertex, is_degenerate, triangle_area,
};
use crate::vertex::Vertex;

/// Clips `source` by `mask` and returns the overlap.
///
/// If every source corner lies inside the mask the fragment is the source
/// triangle, in its own order, recolored by `blend`. Overlaps that only touch
/// along an edge or at a corner give an empty fragment.
pub fn clip_triangle<B>(
    source: &[Vertex; 3],
    mask: &[Vertex; 3],
    blend: &B,
    config: &ClipConfig,
) -> Result<ClipFragment, ClipError>
where
    B: VertexBlend + ?Sized,
{
    let source_points = corner_points(source);
    let mask_points = corner_points(mask);
    if is_degenerate_triangle(&source_points) {
        return Err(ClipError::DegenerateTriangle {
            role: TriangleRole::Source,
        });
    }
    if is_degenerate_triangle(&mask_points) {
        return Err(ClipError::DegenerateTriangle {
            role: TriangleRole::Mask,
        });
    }

    let tolerance = config.crossing_sqr_tolerance();
    let merge = config.corner_merge_tolerance()
        * longest_sqr_side(&source_points).min(longest_sqr_side(&mask_points));
    let mut corners: Vec<Vertex> = Vec::with_capacity(6);

    // Source corners are distinct once the source is not degenerate.
    for vertex in source {
        let point = vertex.point();
        if contains_in_convex_hull(&mask_points, point) {
            let sampled = pickup(mask, &mask_points, point, TriangleRole::Mask)?;
            corners.push(blend.blend(vertex, &sampled));
        }
    }
    if corners.len() == 3 {
        return ClipFragment::from_points(corners);
    }

    for vertex in mask {
        let point = vertex.point();
        if contains_in_convex_hull(&source_points, point) {
            let sampled = pickup(source, &source_points, point, TriangleRole::Source)?;
            push_distinct(&mut corners, blend.blend(&sampled, vertex), merge);
        }
    }

    for i in 0..3 {
        let (a_start, a_end) = (&source[i], &source[(i + 1) % 3]);
        for k in 0..3 {
            let (b_start, b_end) = (&mask[k], &mask[(k + 1) % 3]);
            if let Some(crossing) =
                crossing_vertex(a_start, a_end, b_start, b_end, blend, tolerance)
            {
                push_distinct(&mut corners, crossing, merge);
            }
        }
    }

    let fragment = ClipFragment::from_points(corners).map_err(|err| {
        warn!(%err, "rejected clip fragment");
        err
    })?;
    if config.verify_convexity() && !fragment.is_convex() {
        warn!(corners = fragment.len(), "clip fragment is not convex");
        return Err(ClipError::NonConvexFragment);
    }
    Ok(fragment)
}

/// An indexed triangle mesh produced by a batch clip.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClippedMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl ClippedMesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Appends a fragment's vertices and its triangulation, offset past the
    /// vertices already in the mesh.
    pub fn push_fragment(&mut self, fragment: ClipFragment, local_indices: &[u32]) {
        let offset = self.vertices.len() as u32;
        self.indices
            .extend(local_indices.iter().map(|&index| index + offset));
        self.vertices.extend(fragment.into_vertices());
    }

    /// Expands the index buffer into one vertex per triangle corner.
    pub fn to_flat(&self) -> Vec<Vertex> {
        self.indices
            .iter()
            .filter_map(|&index| self.vertices.get(index as usize).copied())
            .collect()
    }

    /// Total area of the mesh triangles in the mesh plane.
    pub fn area(&self) -> f32 {
        self.indices
            .chunks_exact(3)
            .filter_map(|tri| {
                let a = self.vertices.get(tri[0] as usize)?.point();
                let b = self.vertices.get(tri[1] as usize)?.point();
                let c = self.vertices.get(tri[2] as usize)?.point();
                Some(triangle_area(a, b, c))
            })
            .sum()
    }
}

/// Clips whole meshes by a mask mesh with one blend and configuration.
///
/// [`MaskClipper::new`] uses [`ColorBlend`]'s multiply mode;
/// [`MaskClipper::with_blend`] takes any [`VertexBlend`].
///
/// # Example
/// ```
/// use uimask::clipper::MaskClipper;
/// use uimask::config::ClipConfig;
/// use uimask::vertex::Vertex;
///
/// let source = [
///     Vertex::at_xy(0.0, 0.0),
///     Vertex::at_xy(4.0, 0.0),
///     Vertex::at_xy(0.0, 4.0),
/// ];
/// let mask = [
///     Vertex::at_xy(1.0, 1.0),
///     Vertex::at_xy(2.0, 1.0),
///     Vertex::at_xy(1.0, 2.0),
/// ];
/// let mesh = MaskClipper::new(ClipConfig::default())
///     .clip_batch(&source, &[0, 1, 2], &mask, &[0, 1, 2])
///     .unwrap();
/// assert_eq!(mesh.indices.len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MaskClipper<B = ColorBlend> {
    blend: B,
    config: ClipConfig,
}

impl MaskClipper<ColorBlend> {
    pub fn new(config: ClipConfig) -> Self {
        Self::with_blend(ColorBlend::default(), config)
    }
}

impl<B: VertexBlend> MaskClipper<B> {
    pub fn with_blend(blend: B, config: ClipConfig) -> Self {
        Self { blend, config }
    }

    pub fn blend(&self) -> &B {
        &self.blend
    }

    pub fn config(&self) -> &ClipConfig {
        &self.config
    }

    /// Clips a single pair of triangles with this clipper's settings.
    pub fn clip_triangle(
        &self,
        source: &[Vertex; 3],
        mask: &[Vertex; 3],
    ) -> Result<ClipFragment, ClipError> {
        clip_triangle(source, mask, &self.blend, &self.config)
    }

    /// Clips every source triangle by every mask triangle.
    ///
    /// Degenerate triangles in either mesh are skipped. Fragments are
    /// appended mask triangle by mask triangle, and within each, in source
    /// triangle order.
    pub fn clip_batch(
        &self,
        source_vertices: &[Vertex],
        source_indices: &[u32],
        mask_vertices: &[Vertex],
        mask_indices: &[u32],
    ) -> Result<ClippedMesh, ClipError> {
        let sources = gather_triangles(source_vertices, source_indices, TriangleRole::Source)?;
        let masks = gather_triangles(mask_vertices, mask_indices, TriangleRole::Mask)?;
        self.clip_gathered(&sources, &masks)
    }

    /// Clips flat triangle lists, three vertices per triangle, and returns a
    /// flat triangle list.
    pub fn clip_flat(
        &self,
        source_vertices: &[Vertex],
        mask_vertices: &[Vertex],
    ) -> Result<Vec<Vertex>, ClipError> {
        let sources = gather_flat(source_vertices, TriangleRole::Source)?;
        let masks = gather_flat(mask_vertices, TriangleRole::Mask)?;
        Ok(self.clip_gathered(&sources, &masks)?.to_flat())
    }

    fn clip_gathered(
        &self,
        sources: &[[Vertex; 3]],
        masks: &[[Vertex; 3]],
    ) -> Result<ClippedMesh, ClipError> {
        let mut mesh = ClippedMesh::default();
        let mut fragments = 0usize;
        for mask in masks {
            for source in sources {
                let fragment = self.clip_triangle(source, mask)?;
                if fragment.is_empty() {
                    continue;
                }
                let local = fragment.triangulate()?;
                mesh.push_fragment(fragment, &local);
                fragments += 1;
            }
        }
        debug!(
            sources = sources.len(),
            masks = masks.len(),
            fragments,
            triangles = mesh.triangle_count(),
            "clipped mesh"
        );
        Ok(mesh)
    }
}

/// Samples `triangle` at `point`.
fn pickup(
    triangle: &[Vertex; 3],
    points: &[Vec2; 3],
    point: Vec2,
    role: TriangleRole,
) -> Result<Vertex, ClipError> {
    let weights =
        barycentric_weights(*points, point).ok_or(ClipError::DegenerateTriangle { role })?;
    Ok(Vertex::weighted_average(triangle, weights))
}

/// Pushes `vertex` unless a corner within `sqr_tolerance` is already there.
/// Exactly equal corners always merge.
fn push_distinct(corners: &mut Vec<Vertex>, vertex: Vertex, sqr_tolerance: f32) {
    let point = vertex.point();
    let duplicate = corners
        .iter()
        .any(|corner| (corner.point() - point).sqr_magnitude() <= sqr_tolerance);
    if !duplicate {
        corners.push(vertex);
    }
}

fn corner_points(triangle: &[Vertex; 3]) -> [Vec2; 3] {
    triangle.map(|vertex| vertex.point())
}

fn longest_sqr_side(points: &[Vec2; 3]) -> f32 {
    (0..3)
        .map(|i| (points[(i + 1) % 3] - points[i]).sqr_magnitude())
        .fold(0.0, f32::max)
}

fn is_degenerate_triangle(points: &[Vec2; 3]) -> bool {
    is_degenerate(points[0], points[1], points[2])
}

/// Resolves an index buffer into non-degenerate triangles.
fn gather_triangles(
    vertices: &[Vertex],
    indices: &[u32],
    role: TriangleRole,
) -> Result<Vec<[Vertex; 3]>, ClipError> {
    if indices.len() % 3 != 0 {
        return Err(ClipError::invalid_indices(
            role,
            format!("length {} is not a multiple of 3", indices.len()),
        ));
    }
    if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
        return Err(ClipError::invalid_indices(
            role,
            format!("index {index} is out of range for {} vertices", vertices.len()),
        ));
    }
    Ok(indices
        .chunks_exact(3)
        .map(|tri| [tri[0], tri[1], tri[2]].map(|i| vertices[i as usize]))
        .filter(|triangle| !is_degenerate_triangle(&corner_points(triangle)))
        .collect())
}

fn gather_flat(vertices: &[Vertex], role: TriangleRole) -> Result<Vec<[Vertex; 3]>, ClipError> {
    if vertices.len() % 3 != 0 {
        return Err(ClipError::invalid_indices(
            role,
            format!("{} flat vertices is not a multiple of 3", vertices.len()),
        ));
    }
    Ok(vertices
        .chunks_exact(3)
        .map(|tri| [tri[0], tri[1], tri[2]])
        .filter(|triangle| !is_degenerate_triangle(&corner_points(triangle)))
        .collect())
}
