//! Triangles and sides of an in-progress triangulation.

use crate::math::Vec2;
use crate::predicates::{contains_in_convex_hull, Circumcircle};

/// A corner of a triangle under construction.
///
/// `Real` points index the caller's point slice. `Outer` points are the three
/// corners of the super-triangle and never reach the output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VertexRef {
    Outer(u8),
    Real(u32),
}

impl VertexRef {
    #[inline]
    pub fn is_outer(self) -> bool {
        matches!(self, Self::Outer(_))
    }

    /// Index into the caller's points, if this is a real vertex.
    #[inline]
    pub fn real(self) -> Option<u32> {
        match self {
            Self::Real(index) => Some(index),
            Self::Outer(_) => None,
        }
    }
}

/// An undirected edge. `Side::new(a, b) == Side::new(b, a)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Side {
    lo: VertexRef,
    hi: VertexRef,
}

impl Side {
    pub fn new(a: VertexRef, b: VertexRef) -> Self {
        if a <= b {
            Self { lo: a, hi: b }
        } else {
            Self { lo: b, hi: a }
        }
    }

    /// Both endpoints; outer endpoints sort first.
    #[inline]
    pub fn endpoints(&self) -> [VertexRef; 2] {
        [self.lo, self.hi]
    }

    #[inline]
    pub fn touches(&self, vertex: VertexRef) -> bool {
        self.lo == vertex || self.hi == vertex
    }

    /// Number of outer endpoints.
    pub fn outer_count(&self) -> usize {
        self.lo.is_outer() as usize + self.hi.is_outer() as usize
    }
}

/// Resolves [`VertexRef`]s to coordinates.
pub(crate) struct VertexTable<'a> {
    real: &'a [Vec2],
    outer: [Vec2; 3],
}

impl<'a> VertexTable<'a> {
    pub(crate) fn new(real: &'a [Vec2], outer: [Vec2; 3]) -> Self {
        Self { real, outer }
    }

    /// Every `VertexRef` handed out by the triangulator is in range.
    #[inline]
    pub(crate) fn get(&self, vertex: VertexRef) -> Vec2 {
        match vertex {
            VertexRef::Real(index) => self.real[index as usize],
            VertexRef::Outer(index) => self.outer[index as usize],
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.real.len()
    }
}

/// An immutable triangle with its circumcircle cached at construction.
#[derive(Clone, Debug)]
pub(crate) struct Triangle {
    refs: [VertexRef; 3],
    corners: [Vec2; 3],
    circle: Circumcircle,
}

impl Triangle {
    pub(crate) fn new(refs: [VertexRef; 3], table: &VertexTable<'_>) -> Self {
        let corners = refs.map(|vertex| table.get(vertex));
        let circle = Circumcircle::through(corners[0], corners[1], corners[2]);
        Self {
            refs,
            corners,
            circle,
        }
    }

    #[inline]
    pub(crate) fn refs(&self) -> [VertexRef; 3] {
        self.refs
    }

    /// False for collinear corners, whose circumcircle does not exist.
    #[inline]
    pub(crate) fn is_valid(&self) -> bool {
        self.circle.is_finite()
    }

    /// Inside or on the boundary.
    #[inline]
    pub(crate) fn contains(&self, point: Vec2) -> bool {
        contains_in_convex_hull(&self.corners, point)
    }

    #[inline]
    pub(crate) fn in_circumcircle(&self, point: Vec2) -> bool {
        self.circle.contains_strictly(point)
    }

    #[inline]
    pub(crate) fn has_vertex(&self, vertex: VertexRef) -> bool {
        self.refs.contains(&vertex)
    }

    pub(crate) fn has_side(&self, side: Side) -> bool {
        let [a, b] = side.endpoints();
        self.has_vertex(a) && self.has_vertex(b)
    }

    /// The corner opposite `side`, or `None` if `side` is not an edge of
    /// this triangle.
    pub(crate) fn other_ref(&self, side: Side) -> Option<VertexRef> {
        if !self.has_side(side) {
            return None;
        }
        self.refs.iter().copied().find(|&vertex| !side.touches(vertex))
    }

    /// The three edges in corner order: (0, 1), (1, 2), (2, 0).
    pub(crate) fn sides(&self) -> [Side; 3] {
        let [a, b, c] = self.refs;
        [Side::new(a, b), Side::new(b, c), Side::new(c, a)]
    }

    pub(crate) fn outer_count(&self) -> usize {
        self.refs.iter().filter(|vertex| vertex.is_outer()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POINTS: [Vec2; 3] = [
        Vec2::new(0.0, 0.0),
        Vec2::new(2.0, 0.0),
        Vec2::new(0.0, 2.0),
    ];

    fn table() -> VertexTable<'static> {
        VertexTable::new(
            &POINTS,
            [
                Vec2::new(10.0, 10.0),
                Vec2::new(10.0, -30.0),
                Vec2::new(-30.0, 10.0),
            ],
        )
    }

    fn real(i: u32) -> VertexRef {
        VertexRef::Real(i)
    }

    #[test]
    fn sides_are_unordered() {
        assert_eq!(Side::new(real(1), real(2)), Side::new(real(2), real(1)));
        let side = Side::new(real(3), VertexRef::Outer(0));
        assert_eq!(side.endpoints()[0], VertexRef::Outer(0));
        assert_eq!(side.outer_count(), 1);
    }

    #[test]
    fn other_ref_finds_the_apex() {
        let t = Triangle::new([real(0), real(1), real(2)], &table());
        assert_eq!(t.other_ref(Side::new(real(2), real(0))), Some(real(1)));
        assert_eq!(t.other_ref(Side::new(real(0), VertexRef::Outer(1))), None);
    }

    #[test]
    fn circumcircle_test_is_strict() {
        let t = Triangle::new([real(0), real(1), real(2)], &table());
        assert!(t.is_valid());
        assert!(t.in_circumcircle(Vec2::new(1.0, 1.0)));
        assert!(!t.in_circumcircle(Vec2::new(2.0, 2.0)));
    }

    #[test]
    fn contains_counts_the_boundary() {
        let t = Triangle::new([real(0), real(1), real(2)], &table());
        assert!(t.contains(Vec2::new(1.0, 0.0)));
        assert!(!t.contains(Vec2::new(1.5, 1.5)));
    }

    #[test]
    fn collinear_triangle_is_invalid() {
        let points = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(3.0, 3.0),
        ];
        let table = VertexTable::new(&points, [Vec2::ZERO; 3]);
        let t = Triangle::new([real(0), real(1), real(2)], &table);
        assert!(!t.is_valid());
    }

    #[test]
    fn outer_corners_resolve_through_the_table() {
        let t = Triangle::new([real(0), VertexRef::Outer(0), VertexRef::Outer(2)], &table());
        assert_eq!(t.outer_count(), 2);
        assert!(t.has_vertex(VertexRef::Outer(2)));
        assert!(t.contains(Vec2::new(0.0, 5.0)));
    }
}
