//! Geometric predicates shared by the triangulator and the clipper.
//!
//! # Orientation
//!
//! Everything here is built on the 2D cross product
//!
//! ```text
//! cross(a, b) = a.x * b.y - a.y * b.x
//! ```
//!
//! which is twice the signed area of the triangle `(0, a, b)`:
//! - Positive: `b` is counter-clockwise from `a`
//! - Negative: `b` is clockwise from `a`
//! - Zero: `a` and `b` are collinear
//!
//! # Boundary policy
//!
//! [`contains_in_convex_hull`] treats points on an edge as inside. Shared
//! edges between neighbouring triangles therefore belong to both, which is
//! what lets point insertion and clipping agree at seams.

use crate::clipper::VertexBlend;
use crate::math::{Vec2, Vec3};
use crate::vertex::Vertex;

/// 2D cross product `a.x * b.y - a.y * b.x`.
#[inline]
pub fn cross(a: Vec2, b: Vec2) -> f32 {
    a.cross(b)
}

/// Unsigned area of the triangle `(p0, p1, p2)`.
#[inline]
pub fn triangle_area(p0: Vec2, p1: Vec2, p2: Vec2) -> f32 {
    0.5 * cross(p1 - p0, p2 - p0).abs()
}

/// True when the three points are collinear or coincident.
#[inline]
pub fn is_degenerate(p0: Vec2, p1: Vec2, p2: Vec2) -> bool {
    cross(p1 - p0, p2 - p0).abs() < f32::EPSILON
}

/// Twice the signed area of `(a, b, c)`, evaluated in `f64`.
///
/// Positive when `c` is left of the directed line `a -> b`. Differences and
/// products of `f32` inputs are exact in `f64` for coordinates of similar
/// magnitude, so the sign is reliable where the `f32` cross is not.
pub fn orient(a: Vec2, b: Vec2, c: Vec2) -> f64 {
    let (ax, ay) = (a.x as f64, a.y as f64);
    let (bx, by) = (b.x as f64 - ax, b.y as f64 - ay);
    let (cx, cy) = (c.x as f64 - ax, c.y as f64 - ay);
    bx * cy - by * cx
}

/// True when the open segments `a0..a1` and `b0..b1` cross at a single
/// point interior to both. Touching at an endpoint does not count.
pub fn segments_cross(a0: Vec2, a1: Vec2, b0: Vec2, b1: Vec2) -> bool {
    orient(a0, a1, b0) * orient(a0, a1, b1) < 0.0
        && orient(b0, b1, a0) * orient(b0, b1, a1) < 0.0
}

/// Tests whether `point` lies inside or on the boundary of a convex polygon.
///
/// Works for either winding. The reference sign is taken from the closing
/// edge (last vertex to first) and replaced by the first nonzero edge cross
/// while it is still zero; any edge whose cross has the opposite sign rejects
/// the point.
pub fn contains_in_convex_hull(polygon: &[Vec2], point: Vec2) -> bool {
    let Some(&last) = polygon.last() else {
        return false;
    };
    let mut reference = cross(polygon[0] - last, point - last);
    for pair in polygon.windows(2) {
        let current = cross(pair[1] - pair[0], point - pair[0]);
        if reference * current < 0.0 {
            return false;
        }
        if reference == 0.0 && current != 0.0 {
            reference = current;
        }
    }
    true
}

/// True when every turn of the closed polygon has the same orientation.
/// Collinear turns are allowed.
pub fn is_convex_polygon(polygon: &[Vec2]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut sign = 0.0f32;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        let c = polygon[(i + 2) % n];
        let turn = cross(b - a, c - b);
        if turn.abs() < f32::EPSILON {
            continue;
        }
        if sign == 0.0 {
            sign = turn.signum();
        } else if sign * turn < 0.0 {
            return false;
        }
    }
    true
}

/// Parameters of the closest points between two segments.
///
/// `a` is the progress along the first segment and `b` along the second,
/// both in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentProgress {
    pub a: f32,
    pub b: f32,
}

/// Closest-point parameters between segments `a_start..a_end` and
/// `b_start..b_end`.
///
/// Solves the 2x2 normal equations for the unclamped parameters, clamps, and
/// re-solves the first parameter whenever the second one had to be clamped.
/// Zero-length segments are treated as points.
pub fn nearest_progress_on_segments(
    a_start: Vec3,
    a_end: Vec3,
    b_start: Vec3,
    b_end: Vec3,
) -> SegmentProgress {
    let a_direction = a_end - a_start;
    let b_direction = b_end - b_start;
    let between = a_start - b_start;
    let a_sqr_length = a_direction.sqr_magnitude();
    let b_sqr_length = b_direction.sqr_magnitude();

    // Point & point
    if a_sqr_length == 0.0 && b_sqr_length == 0.0 {
        return SegmentProgress { a: 0.0, b: 0.0 };
    }

    let between_on_b = b_direction.dot(between);
    // Point & segment
    if a_sqr_length == 0.0 {
        return SegmentProgress {
            a: 0.0,
            b: clamp01(between_on_b / b_sqr_length),
        };
    }

    let between_on_a = a_direction.dot(between);
    // Segment & point
    if b_sqr_length == 0.0 {
        return SegmentProgress {
            a: clamp01(-between_on_a / a_sqr_length),
            b: 0.0,
        };
    }

    let b_on_a = a_direction.dot(b_direction);
    let denom = a_sqr_length * b_sqr_length - b_on_a * b_on_a;
    // Parallel segments have no unique solution; start from a = 0.
    let a = if denom != 0.0 {
        clamp01((b_on_a * between_on_b - between_on_a * b_sqr_length) / denom)
    } else {
        0.0
    };

    let b_numerator = b_on_a * a + between_on_b;
    if b_numerator < 0.0 {
        SegmentProgress {
            a: clamp01(-between_on_a / a_sqr_length),
            b: 0.0,
        }
    } else if b_sqr_length < b_numerator {
        SegmentProgress {
            a: clamp01((b_on_a - between_on_a) / a_sqr_length),
            b: 1.0,
        }
    } else {
        SegmentProgress {
            a,
            b: b_numerator / b_sqr_length,
        }
    }
}

/// The closest point on each segment, in `[on_a, on_b]` order.
pub fn nearest_points_on_segments(
    a_start: Vec3,
    a_end: Vec3,
    b_start: Vec3,
    b_end: Vec3,
) -> [Vec3; 2] {
    let progress = nearest_progress_on_segments(a_start, a_end, b_start, b_end);
    [
        a_start.lerp(a_end, progress.a),
        b_start.lerp(b_end, progress.b),
    ]
}

/// Squared distance between two segments.
pub fn sqr_distance_between_segments(
    a_start: Vec3,
    a_end: Vec3,
    b_start: Vec3,
    b_end: Vec3,
) -> f32 {
    let [on_a, on_b] = nearest_points_on_segments(a_start, a_end, b_start, b_end);
    (on_a - on_b).sqr_magnitude()
}

/// The vertex where two edges properly cross, or `None`.
///
/// Crossings at either segment's endpoint are excluded so that shared
/// corners are not emitted twice. The two interpolated vertices must agree
/// in the mesh plane within `sqr_tolerance`; they are then combined with
/// `blend` (edge `a` is the source, edge `b` the mask).
pub fn crossing_vertex<B>(
    a_start: &Vertex,
    a_end: &Vertex,
    b_start: &Vertex,
    b_end: &Vertex,
    blend: &B,
    sqr_tolerance: f32,
) -> Option<Vertex>
where
    B: VertexBlend + ?Sized,
{
    let progress = nearest_progress_on_segments(
        a_start.position,
        a_end.position,
        b_start.position,
        b_end.position,
    );
    if is_endpoint(progress.a) || is_endpoint(progress.b) {
        return None;
    }
    let on_a = a_start.lerp(a_end, progress.a);
    let on_b = b_start.lerp(b_end, progress.b);
    if (on_a.point() - on_b.point()).sqr_magnitude() < sqr_tolerance {
        Some(blend.blend(&on_a, &on_b))
    } else {
        None
    }
}

/// Area-ratio barycentric weights of `point` with respect to `triangle`.
///
/// Returns `None` for a degenerate triangle. Weights sum to one for points
/// inside or on the triangle; they are unsigned, so points outside get
/// weights summing to more than one.
pub fn barycentric_weights(triangle: [Vec2; 3], point: Vec2) -> Option<[f32; 3]> {
    let [p0, p1, p2] = triangle;
    if is_degenerate(p0, p1, p2) {
        return None;
    }
    let inverse_area = 1.0 / triangle_area(p0, p1, p2);
    Some([
        triangle_area(point, p1, p2) * inverse_area,
        triangle_area(p0, point, p2) * inverse_area,
        triangle_area(p0, p1, point) * inverse_area,
    ])
}

/// Circumscribed circle of a triangle, computed in double precision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circumcircle {
    pub center: [f64; 2],
    pub sqr_radius: f64,
}

impl Circumcircle {
    /// Collinear corners give an infinite or NaN radius.
    pub fn through(p0: Vec2, p1: Vec2, p2: Vec2) -> Self {
        let (x0, y0) = (p0.x as f64, p0.y as f64);
        let (bx, by) = (p1.x as f64 - x0, p1.y as f64 - y0);
        let (cx, cy) = (p2.x as f64 - x0, p2.y as f64 - y0);
        let d = 2.0 * (bx * cy - by * cx);
        let b_sqr = bx * bx + by * by;
        let c_sqr = cx * cx + cy * cy;
        let ux = (cy * b_sqr - by * c_sqr) / d;
        let uy = (bx * c_sqr - cx * b_sqr) / d;
        Self {
            center: [x0 + ux, y0 + uy],
            sqr_radius: ux * ux + uy * uy,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.sqr_radius.is_finite() && self.center[0].is_finite() && self.center[1].is_finite()
    }

    /// Squared distance from the center to `point`.
    pub fn sqr_distance(&self, point: Vec2) -> f64 {
        let dx = self.center[0] - point.x as f64;
        let dy = self.center[1] - point.y as f64;
        dx * dx + dy * dy
    }

    /// Inside or on the circle.
    pub fn contains(&self, point: Vec2) -> bool {
        self.sqr_distance(point) <= self.sqr_radius
    }

    /// Strictly inside the circle. Cocircular points are not contained,
    /// which keeps edge legalization from flipping back and forth.
    pub fn contains_strictly(&self, point: Vec2) -> bool {
        self.sqr_distance(point) < self.sqr_radius
    }
}

#[inline]
fn clamp01(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}

#[inline]
fn is_endpoint(progress: f32) -> bool {
    progress < f32::EPSILON || (1.0 - progress) < f32::EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipper::ColorBlend;
    use crate::colors::Color32;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn v(x: f32, y: f32) -> Vec2 {
        Vec2::new(x, y)
    }

    fn p(x: f32, y: f32) -> Vec3 {
        Vec3::new(x, y, 0.0)
    }

    #[test]
    fn area_is_unsigned() {
        assert_eq!(triangle_area(v(0.0, 0.0), v(4.0, 0.0), v(0.0, 4.0)), 8.0);
        assert_eq!(triangle_area(v(0.0, 0.0), v(0.0, 4.0), v(4.0, 0.0)), 8.0);
    }

    #[test]
    fn orient_sign_follows_turn() {
        assert_eq!(orient(v(0.0, 0.0), v(4.0, 0.0), v(1.0, 3.0)), 12.0);
        assert_eq!(orient(v(0.0, 0.0), v(4.0, 0.0), v(1.0, -3.0)), -12.0);
        assert_eq!(orient(v(0.0, 0.0), v(4.0, 0.0), v(9.0, 0.0)), 0.0);
    }

    #[test]
    fn segments_cross_only_in_their_interiors() {
        assert!(segments_cross(v(0.0, 0.0), v(2.0, 2.0), v(0.0, 2.0), v(2.0, 0.0)));
        // Shared endpoint.
        assert!(!segments_cross(v(0.0, 0.0), v(2.0, 2.0), v(2.0, 2.0), v(3.0, 0.0)));
        // Endpoint resting on the other segment.
        assert!(!segments_cross(v(0.0, 0.0), v(2.0, 0.0), v(1.0, 0.0), v(1.0, 3.0)));
        // Apart.
        assert!(!segments_cross(v(0.0, 0.0), v(1.0, 0.0), v(2.0, -1.0), v(2.0, 1.0)));
    }

    #[test]
    fn collinear_points_are_degenerate() {
        assert!(is_degenerate(v(0.0, 0.0), v(1.0, 1.0), v(2.0, 2.0)));
        assert!(is_degenerate(v(1.0, 1.0), v(1.0, 1.0), v(5.0, 0.0)));
        assert!(!is_degenerate(v(0.0, 0.0), v(1.0, 0.0), v(0.0, 1.0)));
    }

    #[test]
    fn hull_contains_interior_and_boundary() {
        let tri = [v(0.0, 0.0), v(4.0, 0.0), v(0.0, 4.0)];
        assert!(contains_in_convex_hull(&tri, v(1.0, 1.0)));
        assert!(contains_in_convex_hull(&tri, v(2.0, 2.0)));
        assert!(contains_in_convex_hull(&tri, v(0.0, 0.0)));
        assert!(contains_in_convex_hull(&tri, v(2.0, 0.0)));
        assert!(!contains_in_convex_hull(&tri, v(3.0, 3.0)));
        assert!(!contains_in_convex_hull(&tri, v(-0.1, 1.0)));
    }

    #[test]
    fn hull_ignores_winding() {
        let cw = [v(0.0, 0.0), v(0.0, 4.0), v(4.0, 0.0)];
        assert!(contains_in_convex_hull(&cw, v(1.0, 1.0)));
        assert!(!contains_in_convex_hull(&cw, v(5.0, 5.0)));
    }

    #[test]
    fn hull_of_nothing_contains_nothing() {
        assert!(!contains_in_convex_hull(&[], v(0.0, 0.0)));
    }

    #[test]
    fn convexity_check() {
        let square = [v(0.0, 0.0), v(1.0, 0.0), v(1.0, 1.0), v(0.0, 1.0)];
        assert!(is_convex_polygon(&square));
        let dart = [v(0.0, 0.0), v(2.0, 1.0), v(4.0, 0.0), v(2.0, 3.0)];
        assert!(!is_convex_polygon(&dart));
    }

    #[test]
    fn crossing_segments_meet_in_the_middle() {
        let t = nearest_progress_on_segments(p(0.0, 0.0), p(4.0, 0.0), p(-1.0, 3.0), p(3.0, -1.0));
        assert_relative_eq!(t.a, 0.5);
        assert_relative_eq!(t.b, 0.75);
    }

    #[test]
    fn disjoint_segments_clamp() {
        let t = nearest_progress_on_segments(p(0.0, 0.0), p(1.0, 0.0), p(3.0, 1.0), p(3.0, 2.0));
        assert_eq!(t, SegmentProgress { a: 1.0, b: 0.0 });
        let d = sqr_distance_between_segments(p(0.0, 0.0), p(1.0, 0.0), p(3.0, 1.0), p(3.0, 2.0));
        assert_relative_eq!(d, 5.0);
    }

    #[test]
    fn point_against_segment() {
        let t = nearest_progress_on_segments(p(1.0, 1.0), p(1.0, 1.0), p(0.0, 0.0), p(4.0, 0.0));
        assert_eq!(t, SegmentProgress { a: 0.0, b: 0.25 });
        let t = nearest_progress_on_segments(p(0.0, 0.0), p(4.0, 0.0), p(3.0, 2.0), p(3.0, 2.0));
        assert_eq!(t, SegmentProgress { a: 0.75, b: 0.0 });
    }

    #[test]
    fn parallel_overlap_lands_on_an_endpoint() {
        let t = nearest_progress_on_segments(p(4.0, 0.0), p(0.0, 4.0), p(3.0, 1.0), p(1.0, 3.0));
        assert_eq!(t.b, 0.0);
        assert_relative_eq!(t.a, 0.25);
    }

    #[test]
    fn crossing_vertex_blends_both_edges() {
        let blend = ColorBlend::default();
        let a0 = Vertex::at_xy(0.0, 0.0);
        let a1 = Vertex::at_xy(4.0, 0.0);
        let b0 = Vertex::at_xy(2.0, -1.0).with_color(Color32::new(255, 0, 0, 255));
        let b1 = Vertex::at_xy(2.0, 1.0).with_color(Color32::new(255, 0, 0, 255));
        let hit = crossing_vertex(&a0, &a1, &b0, &b1, &blend, 1e-5).unwrap();
        assert_relative_eq!(hit.position, p(2.0, 0.0));
        assert_eq!(hit.color, Color32::new(255, 0, 0, 255));
    }

    #[test]
    fn crossing_at_shared_endpoint_is_ignored() {
        let blend = ColorBlend::default();
        let a0 = Vertex::at_xy(0.0, 0.0);
        let a1 = Vertex::at_xy(4.0, 0.0);
        let b0 = Vertex::at_xy(4.0, 0.0);
        let b1 = Vertex::at_xy(4.0, 4.0);
        assert!(crossing_vertex(&a0, &a1, &b0, &b1, &blend, 1e-5).is_none());
    }

    #[test]
    fn skew_segments_do_not_cross() {
        let blend = ColorBlend::default();
        let a0 = Vertex::at_xy(0.0, 0.0);
        let a1 = Vertex::at_xy(1.0, 0.0);
        let b0 = Vertex::at_xy(0.5, 1.0);
        let b1 = Vertex::at_xy(0.5, 2.0);
        assert!(crossing_vertex(&a0, &a1, &b0, &b1, &blend, 1e-5).is_none());
    }

    #[test]
    fn barycentric_weights_sum_to_one_inside() {
        let tri = [v(0.0, 0.0), v(4.0, 0.0), v(0.0, 4.0)];
        let w = barycentric_weights(tri, v(1.0, 1.0)).unwrap();
        assert_abs_diff_eq!(w[0] + w[1] + w[2], 1.0, epsilon = 1e-6);
        assert_relative_eq!(w[0], 0.5);
        assert_relative_eq!(w[1], 0.25);
        assert_relative_eq!(w[2], 0.25);
        assert_eq!(barycentric_weights(tri, v(4.0, 0.0)), Some([0.0, 1.0, 0.0]));
    }

    #[test]
    fn barycentric_weights_reject_degenerate() {
        let tri = [v(0.0, 0.0), v(1.0, 1.0), v(2.0, 2.0)];
        assert!(barycentric_weights(tri, v(1.0, 1.0)).is_none());
    }

    #[test]
    fn circumcircle_of_right_triangle() {
        let c = Circumcircle::through(v(0.0, 0.0), v(2.0, 0.0), v(0.0, 2.0));
        assert_relative_eq!(c.center[0], 1.0);
        assert_relative_eq!(c.center[1], 1.0);
        assert_relative_eq!(c.sqr_radius, 2.0);
        assert!(c.contains_strictly(v(1.0, 1.5)));
        assert!(c.contains(v(2.0, 2.0)));
        assert!(!c.contains_strictly(v(2.0, 2.0)));
    }

    #[test]
    fn circumcircle_of_collinear_points_is_not_finite() {
        let c = Circumcircle::through(v(0.0, 0.0), v(1.0, 1.0), v(2.0, 2.0));
        assert!(!c.is_finite());
    }
}
