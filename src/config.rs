//! Tunable tolerances and budgets.
//!
//! Defaults reproduce the behavior UI effects were tuned against. Both config
//! structs are `Copy` and use a fluent builder style, so a caller can keep one
//! per effect and hand it to every rebuild.

// =============================================================================
// CONSTANTS
// =============================================================================

/// Super-triangle padding as a multiple of the point set's bounding-box
/// diagonal. A little bigger than √2.
pub const SUPER_TRIANGLE_MARGIN: f32 = 1.41422;

/// Two segment points closer than this (squared, in mesh units) are treated
/// as the same crossing.
pub const CROSSING_SQR_TOLERANCE: f32 = 1e-5;

/// Fragment corners are merged when their squared distance is below this
/// times the squared longest side of the smaller input triangle.
pub const CORNER_MERGE_TOLERANCE: f32 = 1e-10;

/// Flip budget granted per inserted point. The total budget of a run is this
/// times the point count (plus one for the seed pass).
pub const DEFAULT_MAX_FLIPS_PER_POINT: usize = 4096;

/// Largest fragment the small convex hull table can triangulate.
pub const MAX_FRAGMENT_VERTICES: usize = 6;

// =============================================================================
// TRIANGULATION
// =============================================================================

/// Settings for [`DelaunayTriangulator`](crate::triangulation::DelaunayTriangulator).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangulationConfig {
    super_triangle_margin: f32,
    max_flips_per_point: usize,
    legalize_interior: bool,
}

impl TriangulationConfig {
    pub fn new() -> Self {
        Self {
            super_triangle_margin: SUPER_TRIANGLE_MARGIN,
            max_flips_per_point: DEFAULT_MAX_FLIPS_PER_POINT,
            legalize_interior: true,
        }
    }

    pub fn super_triangle_margin(&self) -> f32 {
        self.super_triangle_margin
    }

    /// Sets the super-triangle padding. Values below 1 are raised to 1.
    pub fn set_super_triangle_margin(&mut self, margin: f32) -> &mut Self {
        self.super_triangle_margin = margin.max(1.0);
        self
    }

    pub fn max_flips_per_point(&self) -> usize {
        self.max_flips_per_point
    }

    pub fn set_max_flips_per_point(&mut self, flips: usize) -> &mut Self {
        self.max_flips_per_point = flips;
        self
    }

    /// Total flip budget for a run over `point_count` points.
    pub fn flip_budget(&self, point_count: usize) -> usize {
        self.max_flips_per_point
            .saturating_mul(point_count.saturating_add(1))
    }

    pub fn legalize_interior(&self) -> bool {
        self.legalize_interior
    }

    /// Whether to run a final Lawson pass over real triangles after the
    /// super-triangle is removed.
    pub fn set_legalize_interior(&mut self, enabled: bool) -> &mut Self {
        self.legalize_interior = enabled;
        self
    }
}

impl Default for TriangulationConfig {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// CLIPPING
// =============================================================================

/// Settings for [`MaskClipper`](crate::clipper::MaskClipper) and
/// [`clip_triangle`](crate::clipper::clip_triangle).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipConfig {
    crossing_sqr_tolerance: f32,
    corner_merge_tolerance: f32,
    verify_convexity: bool,
}

impl ClipConfig {
    pub fn new() -> Self {
        Self {
            crossing_sqr_tolerance: CROSSING_SQR_TOLERANCE,
            corner_merge_tolerance: CORNER_MERGE_TOLERANCE,
            verify_convexity: false,
        }
    }

    pub fn crossing_sqr_tolerance(&self) -> f32 {
        self.crossing_sqr_tolerance
    }

    pub fn set_crossing_sqr_tolerance(&mut self, tolerance: f32) -> &mut Self {
        self.crossing_sqr_tolerance = tolerance.abs();
        self
    }

    pub fn corner_merge_tolerance(&self) -> f32 {
        self.corner_merge_tolerance
    }

    /// Sets the merge tolerance, relative to the squared size of the
    /// triangles being clipped. Zero merges only exactly equal corners.
    pub fn set_corner_merge_tolerance(&mut self, tolerance: f32) -> &mut Self {
        self.corner_merge_tolerance = tolerance.abs();
        self
    }

    pub fn verify_convexity(&self) -> bool {
        self.verify_convexity
    }

    /// Re-check every sorted fragment for convexity before triangulating it.
    pub fn set_verify_convexity(&mut self, enabled: bool) -> &mut Self {
        self.verify_convexity = enabled;
        self
    }
}

impl Default for ClipConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let t = TriangulationConfig::default();
        assert_eq!(t.super_triangle_margin(), SUPER_TRIANGLE_MARGIN);
        assert_eq!(t.max_flips_per_point(), DEFAULT_MAX_FLIPS_PER_POINT);
        assert!(t.legalize_interior());

        let c = ClipConfig::default();
        assert_eq!(c.crossing_sqr_tolerance(), CROSSING_SQR_TOLERANCE);
        assert_eq!(c.corner_merge_tolerance(), CORNER_MERGE_TOLERANCE);
        assert!(!c.verify_convexity());
    }

    #[test]
    fn fluent_setters_chain() {
        let mut t = TriangulationConfig::new();
        t.set_super_triangle_margin(0.5)
            .set_max_flips_per_point(10)
            .set_legalize_interior(false);
        assert_eq!(t.super_triangle_margin(), 1.0);
        assert_eq!(t.flip_budget(4), 50);
        assert!(!t.legalize_interior());
    }

    #[test]
    fn clip_tolerances_are_independent() {
        let mut c = ClipConfig::new();
        c.set_corner_merge_tolerance(-1e-6).set_verify_convexity(true);
        assert_eq!(c.corner_merge_tolerance(), 1e-6);
        assert_eq!(c.crossing_sqr_tolerance(), CROSSING_SQR_TOLERANCE);
        assert!(c.verify_convexity());
    }

    #[test]
    fn flip_budget_saturates() {
        let mut t = TriangulationConfig::new();
        t.set_max_flips_per_point(usize::MAX);
        assert_eq!(t.flip_budget(3), usize::MAX);
    }
}
