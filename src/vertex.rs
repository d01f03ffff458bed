//! Per-vertex attribute bundle and its interpolation rules.

use crate::colors::Color32;
use crate::math::{Vec2, Vec3, Vec4};

/// A UI mesh vertex with every attribute the clipper interpolates.
///
/// `Vertex` is a plain value: every interpolation returns a fresh vertex and
/// nothing is mutated in place.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    /// Position in the shared mesh plane. z is carried but ignored by the
    /// 2D predicates.
    pub position: Vec3,
    pub color: Color32,
    pub normal: Vec3,
    pub tangent: Vec4,
    pub uv0: Vec2,
    pub uv1: Vec2,
}

impl Default for Vertex {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            color: Color32::WHITE,
            normal: Vec3::BACK,
            tangent: Vec4::new(1.0, 0.0, 0.0, -1.0),
            uv0: Vec2::ZERO,
            uv1: Vec2::ZERO,
        }
    }
}

impl Vertex {
    /// A default-attributed vertex at `position`.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// A default-attributed vertex at `(x, y, 0)`.
    pub fn at_xy(x: f32, y: f32) -> Self {
        Self::at(Vec3::new(x, y, 0.0))
    }

    pub fn with_color(mut self, color: Color32) -> Self {
        self.color = color;
        self
    }

    pub fn with_uv0(mut self, uv0: Vec2) -> Self {
        self.uv0 = uv0;
        self
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// The position projected onto the mesh plane.
    #[inline]
    pub fn point(&self) -> Vec2 {
        self.position.to_vec2()
    }

    /// Linearly interpolate all attributes between two vertices.
    /// Used when a triangle edge crosses a mask edge.
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            position: self.position.lerp(other.position, t),
            color: self.color.lerp(other.color, t),
            normal: self.normal.lerp(other.normal, t),
            tangent: self.tangent.lerp(other.tangent, t),
            uv0: self.uv0.lerp(other.uv0, t),
            uv1: self.uv1.lerp(other.uv1, t),
        }
    }

    /// Weighted sum of every attribute, color included.
    ///
    /// Pairs are consumed until either iterator runs out. Weights are used
    /// as given; callers pass barycentric weights that already sum to one.
    pub fn weighted_average<'a, V, W>(vertices: V, weights: W) -> Self
    where
        V: IntoIterator<Item = &'a Vertex>,
        W: IntoIterator<Item = f32>,
    {
        let mut position = Vec3::ZERO;
        let mut normal = Vec3::ZERO;
        let mut tangent = Vec4::ZERO;
        let mut uv0 = Vec2::ZERO;
        let mut uv1 = Vec2::ZERO;
        let mut color = [0.0f32; 4];

        for (vertex, weight) in vertices.into_iter().zip(weights) {
            position += vertex.position * weight;
            normal += vertex.normal * weight;
            tangent += vertex.tangent * weight;
            uv0 += vertex.uv0 * weight;
            uv1 += vertex.uv1 * weight;
            for (sum, channel) in color.iter_mut().zip(vertex.color.to_rgba_f32()) {
                *sum += channel * weight;
            }
        }

        Self {
            position,
            color: Color32::from_rgba_f32(color),
            normal,
            tangent,
            uv0,
            uv1,
        }
    }

    /// Keeps every attribute of `self` but multiplies its color by `other`'s.
    pub fn multiply_color(&self, other: &Self) -> Self {
        Self {
            color: self.color.multiply(other.color),
            ..*self
        }
    }
}

impl From<Vec3> for Vertex {
    fn from(position: Vec3) -> Self {
        Self::at(position)
    }
}

impl From<Vec2> for Vertex {
    fn from(point: Vec2) -> Self {
        Self::at(point.to_vec3())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn lerp_interpolates_every_attribute() {
        let a = Vertex::at_xy(0.0, 0.0)
            .with_color(Color32::BLACK)
            .with_uv0(Vec2::ZERO);
        let b = Vertex::at_xy(2.0, 4.0)
            .with_color(Color32::WHITE)
            .with_uv0(Vec2::ONE);
        let mid = a.lerp(&b, 0.5);
        assert_relative_eq!(mid.position, Vec3::new(1.0, 2.0, 0.0));
        assert_relative_eq!(mid.uv0, Vec2::new(0.5, 0.5));
        assert_eq!(mid.color.r, 127);
        assert_eq!(mid.color.a, 255);
    }

    #[test]
    fn weighted_average_of_corners_recovers_centroid() {
        let corners = [
            Vertex::at_xy(0.0, 0.0).with_uv0(Vec2::new(0.0, 0.0)),
            Vertex::at_xy(3.0, 0.0).with_uv0(Vec2::new(1.0, 0.0)),
            Vertex::at_xy(0.0, 3.0).with_uv0(Vec2::new(0.0, 1.0)),
        ];
        let third = 1.0 / 3.0;
        let v = Vertex::weighted_average(&corners, [third; 3]);
        assert_relative_eq!(v.position, Vec3::new(1.0, 1.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(v.uv0, Vec2::new(third, third), epsilon = 1e-6);
        assert_eq!(v.color, Color32::WHITE);
    }

    #[test]
    fn weighted_average_stops_at_shorter_input() {
        let corners = [Vertex::at_xy(1.0, 1.0), Vertex::at_xy(5.0, 5.0)];
        let v = Vertex::weighted_average(&corners, [1.0]);
        assert_relative_eq!(v.position, Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn depth_is_carried_but_not_projected() {
        let near = Vertex::default()
            .with_uv0(Vec2::ONE)
            .with_position(Vec3::new(2.0, 4.0, -1.0));
        let far = near.with_position(Vec3::new(2.0, 4.0, 3.0));
        assert_eq!(near.point(), far.point());
        assert_eq!(near.uv0, Vec2::ONE);
        assert_relative_eq!(near.lerp(&far, 0.25).position.z, 0.0);
    }

    #[test]
    fn multiply_color_keeps_geometry() {
        let source = Vertex::at_xy(1.0, 2.0).with_uv0(Vec2::new(0.3, 0.7));
        let mask = Vertex::at_xy(9.0, 9.0).with_color(Color32::new(255, 0, 255, 128));
        let out = source.multiply_color(&mask);
        assert_eq!(out.position, source.position);
        assert_eq!(out.uv0, source.uv0);
        assert_eq!(out.color, Color32::new(255, 0, 255, 128));
    }
}
