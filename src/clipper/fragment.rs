//! The convex polygon left over after clipping one triangle by another.

use crate::config::MAX_FRAGMENT_VERTICES;
use crate::error::ClipError;
use crate::math::Vec2;
use crate::predicates::is_convex_polygon;
use crate::vertex::Vertex;

/// Triangulations of small convex polygons, indexed by
/// `vertex_count - 4`.
const HULL_TABLES: [&[u32]; 3] = [
    &[0, 1, 2, 0, 2, 3],
    &[0, 1, 2, 0, 2, 3, 0, 3, 4],
    &[0, 1, 2, 0, 2, 3, 0, 3, 5, 3, 4, 5],
];

/// Result of clipping one source triangle by one mask triangle.
///
/// Holds zero or three to six vertices. Three-vertex fragments keep the
/// order in which the clipper found them; larger fragments are sorted
/// counter-clockwise around their centroid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClipFragment {
    vertices: Vec<Vertex>,
}

impl ClipFragment {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a fragment from the points a clip produced.
    ///
    /// Fewer than three points give an empty fragment. Four to six points are
    /// sorted counter-clockwise by angle around their centroid. More than six
    /// cannot come from two convex triangles and are rejected.
    pub fn from_points(mut vertices: Vec<Vertex>) -> Result<Self, ClipError> {
        match vertices.len() {
            0..=2 => Ok(Self::empty()),
            3 => Ok(Self { vertices }),
            4..=MAX_FRAGMENT_VERTICES => {
                sort_counter_clockwise(&mut vertices);
                Ok(Self { vertices })
            }
            count => Err(ClipError::FragmentSize { count }),
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn into_vertices(self) -> Vec<Vertex> {
        self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Corner positions in the mesh plane.
    pub fn points(&self) -> Vec<Vec2> {
        self.vertices.iter().map(Vertex::point).collect()
    }

    /// True if the corners form a convex polygon.
    pub fn is_convex(&self) -> bool {
        self.is_empty() || is_convex_polygon(&self.points())
    }

    /// Local triangle indices into [`vertices`](Self::vertices).
    pub fn triangulate(&self) -> Result<Vec<u32>, ClipError> {
        triangulate_hull(self.vertices.len())
    }

    /// Like [`triangulate`](Self::triangulate), but first rejects a fragment
    /// whose corners do not form a convex polygon.
    pub fn triangulate_checked(&self) -> Result<Vec<u32>, ClipError> {
        if !self.is_convex() {
            return Err(ClipError::NonConvexFragment);
        }
        self.triangulate()
    }
}

/// Index list for a convex polygon with `vertex_count` corners.
pub fn triangulate_hull(vertex_count: usize) -> Result<Vec<u32>, ClipError> {
    match vertex_count {
        0 => Ok(Vec::new()),
        3 => Ok(vec![0, 1, 2]),
        4..=MAX_FRAGMENT_VERTICES => Ok(HULL_TABLES[vertex_count - 4].to_vec()),
        count => Err(ClipError::FragmentSize { count }),
    }
}

fn sort_counter_clockwise(vertices: &mut [Vertex]) {
    let sum = vertices
        .iter()
        .fold(Vec2::ZERO, |sum, vertex| sum + vertex.point());
    let center = sum / vertices.len() as f32;
    vertices.sort_by(|a, b| {
        let a = (a.point() - center).angle();
        let b = (b.point() - center).angle();
        a.total_cmp(&b)
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corners(points: &[(f32, f32)]) -> Vec<Vertex> {
        points.iter().map(|&(x, y)| Vertex::at_xy(x, y)).collect()
    }

    #[test]
    fn small_inputs_are_empty() {
        let fragment = ClipFragment::from_points(corners(&[(0.0, 0.0), (1.0, 0.0)])).unwrap();
        assert!(fragment.is_empty());
        assert_eq!(fragment.triangulate().unwrap(), Vec::<u32>::new());
    }

    #[test]
    fn triangles_keep_their_order() {
        let points = corners(&[(0.0, 0.0), (0.0, 1.0), (1.0, 0.0)]);
        let fragment = ClipFragment::from_points(points.clone()).unwrap();
        assert_eq!(fragment.vertices(), &points[..]);
        assert_eq!(fragment.triangulate().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn quads_are_sorted_counter_clockwise() {
        let fragment = ClipFragment::from_points(corners(&[
            (1.0, 1.0),
            (-1.0, -1.0),
            (-1.0, 1.0),
            (1.0, -1.0),
        ]))
        .unwrap();
        let points = fragment.points();
        assert_eq!(
            points,
            vec![
                Vec2::new(-1.0, -1.0),
                Vec2::new(1.0, -1.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(-1.0, 1.0),
            ]
        );
        assert!(fragment.is_convex());
        assert_eq!(fragment.triangulate().unwrap(), vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn hexagon_table() {
        assert_eq!(
            triangulate_hull(6).unwrap(),
            vec![0, 1, 2, 0, 2, 3, 0, 3, 5, 3, 4, 5]
        );
        assert_eq!(triangulate_hull(5).unwrap().len(), 9);
    }

    #[test]
    fn oversized_fragments_are_rejected() {
        let seven = corners(&[(0.0, 0.0); 7]);
        assert_eq!(
            ClipFragment::from_points(seven),
            Err(ClipError::FragmentSize { count: 7 })
        );
        assert_eq!(triangulate_hull(2), Err(ClipError::FragmentSize { count: 2 }));
    }

    #[test]
    fn concave_fragment_fails_the_checked_path() {
        // Dart with a reflex corner at (1, 0.5).
        let fragment = ClipFragment::from_points(corners(&[
            (0.0, 0.0),
            (4.0, -3.0),
            (1.0, 0.5),
            (4.0, 3.0),
        ]))
        .unwrap();
        assert!(!fragment.is_convex());
        assert_eq!(
            fragment.triangulate_checked(),
            Err(ClipError::NonConvexFragment)
        );
    }
}
