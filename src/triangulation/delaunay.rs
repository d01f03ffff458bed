//! Incremental Delaunay triangulation inside a super-triangle.
//!
//! Points are inserted one at a time. Each insertion removes the triangles
//! containing the new point, fans the point to their edges and then restores
//! the empty-circumcircle property with edge flips. Once every point is in,
//! edges that still run to the super-triangle are flipped away where the real
//! endpoint is not on the convex hull, and every triangle touching the
//! super-triangle is dropped.
//!
//! Triangles live in a plain `Vec` and every lookup is a linear scan, so a run
//! is O(n^2) in the point count. UI meshes are small enough for this to be
//! cheaper than maintaining an adjacency structure.

use std::collections::HashSet;

use tracing::{debug, trace, warn};

use super::triangle::{Side, Triangle, VertexRef, VertexTable};
use crate::config::TriangulationConfig;
use crate::error::TriangulationError;
use crate::math::Vec2;
use crate::predicates::{contains_in_convex_hull, orient, segments_cross, Circumcircle};

/// Output of a triangulation: a flat list of index triples into the input
/// points.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Triangulation {
    indices: Vec<u32>,
}

impl Triangulation {
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn into_indices(self) -> Vec<u32> {
        self.indices
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Index triples in output order.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|tri| [tri[0], tri[1], tri[2]])
    }
}

/// Delaunay triangulator with a fixed configuration.
///
/// # Example
/// ```
/// use uimask::math::Vec2;
/// use uimask::triangulation::DelaunayTriangulator;
///
/// let points = [
///     Vec2::new(0.0, 0.0),
///     Vec2::new(1.0, 0.0),
///     Vec2::new(1.0, 1.0),
///     Vec2::new(0.0, 1.0),
/// ];
/// let indices = DelaunayTriangulator::default().triangulate(&points).unwrap();
/// assert_eq!(indices.len(), 6);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DelaunayTriangulator {
    config: TriangulationConfig,
}

impl DelaunayTriangulator {
    pub fn new(config: TriangulationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TriangulationConfig {
        &self.config
    }

    /// Triangulates `points` and returns index triples into it.
    ///
    /// Fewer than three points, or points that are all collinear, give an
    /// empty list. Duplicate points keep only the last occurrence.
    pub fn triangulate(&self, points: &[Vec2]) -> Result<Vec<u32>, TriangulationError> {
        self.triangulation(points).map(Triangulation::into_indices)
    }

    /// Same as [`triangulate`](Self::triangulate), wrapped in a
    /// [`Triangulation`].
    pub fn triangulation(&self, points: &[Vec2]) -> Result<Triangulation, TriangulationError> {
        if points.len() < 3 {
            return Ok(Triangulation::default());
        }
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(TriangulationError::NonFinitePoint { index });
        }

        let outer = super_triangle(points, self.config.super_triangle_margin());
        let mut mesh = Mesh::new(
            VertexTable::new(points, outer),
            self.config.flip_budget(points.len()),
        );

        for index in 0..points.len() {
            mesh.insert(index as u32)?;
        }
        debug!(
            points = points.len(),
            triangles = mesh.triangles.len(),
            flips = mesh.flips,
            "inserted points"
        );

        mesh.remove_outer()?;
        mesh.wrap_hull();

        if self.config.legalize_interior() {
            mesh.legalize_all()?;
        }

        let indices: Vec<u32> = mesh
            .triangles
            .iter()
            .filter(|triangle| triangle.is_valid())
            .flat_map(|triangle| triangle.refs())
            .filter_map(VertexRef::real)
            .collect();
        debug!(
            triangles = indices.len() / 3,
            flips = mesh.flips,
            "triangulation finished"
        );
        Ok(Triangulation { indices })
    }
}

/// Triangulates `points` with the default configuration.
pub fn triangulate(points: &[Vec2]) -> Result<Vec<u32>, TriangulationError> {
    DelaunayTriangulator::default().triangulate(points)
}

/// Checks that no point lies strictly inside the circumcircle of any
/// triangle in `indices`.
///
/// A relative tolerance absorbs rounding on cocircular points. Indices out of
/// range fail the check.
pub fn is_delaunay(points: &[Vec2], indices: &[u32]) -> bool {
    const RELATIVE_TOLERANCE: f64 = 1e-6;

    if indices.len() % 3 != 0 {
        return false;
    }
    for tri in indices.chunks_exact(3) {
        let Some(corners) = tri
            .iter()
            .map(|&i| points.get(i as usize).copied())
            .collect::<Option<Vec<_>>>()
        else {
            return false;
        };
        let circle = Circumcircle::through(corners[0], corners[1], corners[2]);
        if !circle.is_finite() {
            continue;
        }
        let limit = circle.sqr_radius * (1.0 - RELATIVE_TOLERANCE);
        let violated = points
            .iter()
            .enumerate()
            .filter(|(i, _)| !tri.contains(&(*i as u32)))
            .any(|(_, &p)| circle.sqr_distance(p) < limit);
        if violated {
            return false;
        }
    }
    true
}

/// Corners of a right triangle that strictly encloses every point.
///
/// The right angle sits past the top right corner of the bounding box,
/// padded by `margin` times the box diagonal; the hypotenuse runs below and
/// left of the box with the same padding.
fn super_triangle(points: &[Vec2], margin: f32) -> [Vec2; 3] {
    let (min, max) = points.iter().fold(
        (Vec2::new(f32::MAX, f32::MAX), Vec2::new(f32::MIN, f32::MIN)),
        |(min, max), &p| (min.min(p), max.max(p)),
    );
    let size = max - min;
    let diagonal = size.magnitude();
    let pad = if diagonal > 0.0 { diagonal * margin } else { 1.0 };

    let corner = max + Vec2::new(pad, pad);
    let side = 2.0 * (size.x + size.y + 2.0 * pad);
    [
        corner,
        Vec2::new(corner.x, corner.y - side),
        Vec2::new(corner.x - side, corner.y),
    ]
}

/// Working state of one triangulation run.
struct Mesh<'a> {
    table: VertexTable<'a>,
    triangles: Vec<Triangle>,
    flips: usize,
    budget: usize,
}

impl<'a> Mesh<'a> {
    fn new(table: VertexTable<'a>, budget: usize) -> Self {
        let seed = Triangle::new(
            [VertexRef::Outer(0), VertexRef::Outer(1), VertexRef::Outer(2)],
            &table,
        );
        Self {
            table,
            triangles: vec![seed],
            flips: 0,
            budget,
        }
    }

    fn triangle(&self, refs: [VertexRef; 3]) -> Triangle {
        Triangle::new(refs, &self.table)
    }

    /// Indices of the triangles that have `side` as an edge.
    fn sharing(&self, side: Side) -> Vec<usize> {
        self.triangles
            .iter()
            .enumerate()
            .filter(|(_, triangle)| triangle.has_side(side))
            .map(|(i, _)| i)
            .collect()
    }

    fn count_flip(&mut self) -> Result<(), TriangulationError> {
        self.flips += 1;
        if self.flips > self.budget {
            warn!(limit = self.budget, "flip budget exhausted");
            return Err(TriangulationError::FlipBudgetExceeded { limit: self.budget });
        }
        Ok(())
    }

    /// Replaces the two triangles at `first` and `second` with the pair
    /// split along `other`-`more_other`.
    fn replace_pair(&mut self, first: usize, second: usize, new: [Triangle; 2]) {
        let (lo, hi) = if first < second {
            (first, second)
        } else {
            (second, first)
        };
        self.triangles.remove(hi);
        self.triangles.remove(lo);
        self.triangles.extend(new);
    }

    fn insert(&mut self, index: u32) -> Result<(), TriangulationError> {
        let vertex = VertexRef::Real(index);
        let point = self.table.get(vertex);

        let mut removed = Vec::new();
        let mut i = self.triangles.len();
        while i > 0 {
            i -= 1;
            if self.triangles[i].contains(point) {
                removed.push(self.triangles.remove(i));
            }
        }

        let mut stack: Vec<Side> = Vec::new();
        for triangle in &removed {
            for side in triangle.sides() {
                let [a, b] = side.endpoints();
                let fan = self.triangle([a, b, vertex]);
                if fan.is_valid() {
                    self.triangles.push(fan);
                }
                push_unique(&mut stack, side);
            }
        }
        trace!(index, removed = removed.len(), "inserted point");

        self.legalize(stack)
    }

    /// Lawson flips until no side on the stack violates the empty
    /// circumcircle test.
    fn legalize(&mut self, mut stack: Vec<Side>) -> Result<(), TriangulationError> {
        while let Some(side) = stack.pop() {
            let sharing = self.sharing(side);
            let [first, second] = sharing[..] else {
                continue;
            };
            let Some(other) = self.triangles[second].other_ref(side) else {
                continue;
            };
            if !self.triangles[first].in_circumcircle(self.table.get(other)) {
                continue;
            }
            let Some(more_other) = self.triangles[first].other_ref(side) else {
                continue;
            };

            let [s0, s1] = side.endpoints();
            let new = [
                self.triangle([other, more_other, s0]),
                self.triangle([other, more_other, s1]),
            ];
            if !new.iter().all(Triangle::is_valid) {
                continue;
            }

            self.count_flip()?;
            self.replace_pair(first, second, new);
            for side in [
                Side::new(other, s0),
                Side::new(more_other, s0),
                Side::new(other, s1),
                Side::new(more_other, s1),
            ] {
                push_unique(&mut stack, side);
            }
        }
        Ok(())
    }

    /// Flips away sides joining the super-triangle to points that are not
    /// on the convex hull, then drops every triangle touching an outer
    /// vertex. Hull triangles lost with them are restored by
    /// [`Mesh::wrap_hull`].
    fn remove_outer(&mut self) -> Result<(), TriangulationError> {
        let mut seeds: Vec<Side> = Vec::new();
        for triangle in &self.triangles {
            if triangle.outer_count() != 1 {
                continue;
            }
            let mut refs = triangle.refs();
            refs.sort();
            push_unique(&mut seeds, Side::new(refs[0], refs[1]));
            push_unique(&mut seeds, Side::new(refs[0], refs[2]));
        }
        // Popped from the back; reverse so discovery order is processed first.
        seeds.reverse();
        let mut stack = seeds;

        let flips_before = self.flips;
        while let Some(side) = stack.pop() {
            let sharing = self.sharing(side);
            let [first, second] = sharing[..] else {
                continue;
            };
            let (Some(other), Some(more_other)) = (
                self.triangles[second].other_ref(side),
                self.triangles[first].other_ref(side),
            ) else {
                continue;
            };
            let [outer, inner] = side.endpoints();
            if outer.is_outer() == inner.is_outer() {
                continue;
            }

            let wedge = [
                self.table.get(outer),
                self.table.get(other),
                self.table.get(more_other),
            ];
            if contains_in_convex_hull(&wedge, self.table.get(inner)) {
                continue;
            }

            let new = [
                self.triangle([other, more_other, outer]),
                self.triangle([other, more_other, inner]),
            ];
            if !new.iter().all(Triangle::is_valid) {
                continue;
            }

            self.count_flip()?;
            self.replace_pair(first, second, new);
            for apex in [other, more_other] {
                if !apex.is_outer() {
                    push_unique(&mut stack, Side::new(outer, apex));
                }
            }
        }

        let before = self.triangles.len();
        self.triangles.retain(|triangle| triangle.outer_count() == 0);
        debug!(
            flips = self.flips - flips_before,
            removed = before - self.triangles.len(),
            "removed outer triangles"
        );
        Ok(())
    }

    /// Closes the gaps left between the real triangles and the convex hull.
    ///
    /// A finite super-triangle can take thin hull triangles with it. Every
    /// boundary side that still has points strictly beyond it gets the
    /// visible point whose circumcircle holds no other visible point on that
    /// side, until no such side is left.
    fn wrap_hull(&mut self) {
        let limit = 2 * self.table.len() + 2;
        let mut added = 0usize;
        if self.triangles.is_empty() {
            let Some(seed) = self.seed_triangle() else {
                return;
            };
            self.triangles.push(seed);
            added += 1;
        }

        loop {
            let boundary = self.boundary();
            let next = boundary.iter().find_map(|&(a, b)| {
                self.wrap_side(a, b, &boundary)
                    .map(|apex| self.triangle([a, apex, b]))
            });
            let Some(triangle) = next else {
                break;
            };
            if added == limit {
                warn!(added, "hull wrap did not converge");
                break;
            }
            self.triangles.push(triangle);
            added += 1;
        }
        if added > 0 {
            debug!(added, "wrapped convex hull");
        }
    }

    /// Directed sides with a triangle on their left and none on their right.
    fn boundary(&self) -> Vec<(VertexRef, VertexRef)> {
        let mut sides = Vec::with_capacity(self.triangles.len() * 3);
        for triangle in &self.triangles {
            let [a, mut b, mut c] = triangle.refs();
            if orient(self.table.get(a), self.table.get(b), self.table.get(c)) < 0.0 {
                std::mem::swap(&mut b, &mut c);
            }
            sides.extend([(a, b), (b, c), (c, a)]);
        }
        let directed: HashSet<(VertexRef, VertexRef)> = sides.iter().copied().collect();
        sides
            .into_iter()
            .filter(|&(a, b)| !directed.contains(&(b, a)))
            .collect()
    }

    /// The apex of the triangle to add right of the directed side `a -> b`,
    /// or `None` when no point lies strictly on that side.
    fn wrap_side(
        &self,
        a: VertexRef,
        b: VertexRef,
        boundary: &[(VertexRef, VertexRef)],
    ) -> Option<VertexRef> {
        let (start, end) = (self.table.get(a), self.table.get(b));
        let mut best: Option<(VertexRef, Circumcircle)> = None;
        for index in 0..self.table.len() as u32 {
            let candidate = VertexRef::Real(index);
            let apex = self.table.get(candidate);
            if orient(start, end, apex) >= 0.0 {
                continue;
            }
            // Caps of circles through `a` and `b` are nested on one side.
            if let Some((_, circle)) = &best {
                if !circle.contains_strictly(apex) {
                    continue;
                }
            }
            if !self.is_clear([start, apex, end], boundary) {
                continue;
            }
            best = Some((candidate, Circumcircle::through(start, end, apex)));
        }
        best.map(|(apex, _)| apex)
    }

    /// True when the counter-clockwise triangle `corners` holds no point
    /// besides its corners and its two new sides cross no boundary side.
    fn is_clear(&self, corners: [Vec2; 3], boundary: &[(VertexRef, VertexRef)]) -> bool {
        let [start, apex, end] = corners;
        let covered = (0..self.table.len() as u32)
            .map(|index| self.table.get(VertexRef::Real(index)))
            .filter(|point| !corners.contains(point))
            .any(|point| (0..3).all(|i| orient(corners[i], corners[(i + 1) % 3], point) >= 0.0));
        if covered {
            return false;
        }
        boundary.iter().all(|&(c, d)| {
            let (c, d) = (self.table.get(c), self.table.get(d));
            !segments_cross(start, apex, c, d) && !segments_cross(apex, end, c, d)
        })
    }

    /// A first triangle on a hull side, for runs where the super-triangle
    /// took every triangle with it.
    fn seed_triangle(&self) -> Option<Triangle> {
        let refs = || (0..self.table.len() as u32).map(VertexRef::Real);
        let start = refs().min_by(|&l, &r| {
            let (l, r) = (self.table.get(l), self.table.get(r));
            l.x.total_cmp(&r.x).then(l.y.total_cmp(&r.y))
        })?;
        let origin = self.table.get(start);

        // Most clockwise point seen from the lowest leftmost one; the nearest
        // wins among collinear ties, so no point sits on the side.
        let mut end: Option<VertexRef> = None;
        for candidate in refs() {
            let point = self.table.get(candidate);
            if point == origin {
                continue;
            }
            let replace = match end {
                None => true,
                Some(current) => {
                    let current = self.table.get(current);
                    let turn = orient(origin, current, point);
                    turn < 0.0
                        || (turn == 0.0
                            && (point - origin).sqr_magnitude()
                                < (current - origin).sqr_magnitude())
                }
            };
            if replace {
                end = Some(candidate);
            }
        }
        let end = end?;
        let apex = self.wrap_side(end, start, &[])?;
        Some(self.triangle([end, apex, start]))
    }

    /// Runs the flip loop over every side of the remaining triangles.
    fn legalize_all(&mut self) -> Result<(), TriangulationError> {
        let mut stack = Vec::new();
        for triangle in &self.triangles {
            for side in triangle.sides() {
                push_unique(&mut stack, side);
            }
        }
        let flips_before = self.flips;
        self.legalize(stack)?;
        debug!(
            points = self.table.len(),
            flips = self.flips - flips_before,
            "legalized interior"
        );
        Ok(())
    }
}

fn push_unique(stack: &mut Vec<Side>, side: Side) {
    if !stack.contains(&side) {
        stack.push(side);
    }
}
