//! How a clipped vertex combines the source and mask vertices it came from.
//!
//! Every corner of a clip fragment has two parents: the source-mesh vertex
//! (or an interpolation of source vertices) and the mask vertex (or an
//! interpolation of mask vertices) at the same position. A [`VertexBlend`]
//! decides what survives. The default, [`ColorBlend`] with
//! [`BlendMode::Multiply`], keeps the source vertex and multiplies its color
//! by the mask's, which is what alpha masks and gradient overlays want.

use crate::colors::BlendMode;
use crate::vertex::Vertex;

/// Combines a source vertex with the mask vertex at the same position.
///
/// Implemented for every `Fn(&Vertex, &Vertex) -> Vertex`, so a closure can
/// be passed wherever a blend is expected.
pub trait VertexBlend {
    fn blend(&self, source: &Vertex, mask: &Vertex) -> Vertex;
}

impl<F> VertexBlend for F
where
    F: Fn(&Vertex, &Vertex) -> Vertex,
{
    #[inline]
    fn blend(&self, source: &Vertex, mask: &Vertex) -> Vertex {
        self(source, mask)
    }
}

/// Keeps the source vertex and blends the mask color into it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColorBlend {
    /// Applied to the red, green and blue channels.
    pub color_mode: BlendMode,
    pub alpha_mode: BlendMode,
}

impl ColorBlend {
    pub fn new(color_mode: BlendMode, alpha_mode: BlendMode) -> Self {
        Self {
            color_mode,
            alpha_mode,
        }
    }

    /// Same mode for every channel.
    pub fn uniform(mode: BlendMode) -> Self {
        Self::new(mode, mode)
    }
}

impl VertexBlend for ColorBlend {
    #[inline]
    fn blend(&self, source: &Vertex, mask: &Vertex) -> Vertex {
        Vertex {
            color: source
                .color
                .blend(mask.color, self.color_mode, self.alpha_mode),
            ..*source
        }
    }
}

/// Keeps the source vertex untouched. Clips geometry without recoloring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeepSource;

impl VertexBlend for KeepSource {
    #[inline]
    fn blend(&self, source: &Vertex, _mask: &Vertex) -> Vertex {
        *source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::Color32;
    use crate::math::Vec2;

    fn pair() -> (Vertex, Vertex) {
        let source = Vertex::at_xy(1.0, 1.0)
            .with_color(Color32::new(200, 100, 50, 255))
            .with_uv0(Vec2::new(0.25, 0.75));
        let mask = Vertex::at_xy(1.0, 1.0)
            .with_color(Color32::new(255, 0, 255, 51))
            .with_uv0(Vec2::new(0.9, 0.9));
        (source, mask)
    }

    #[test]
    fn default_multiplies_colors() {
        let (source, mask) = pair();
        let out = ColorBlend::default().blend(&source, &mask);
        assert_eq!(out.color, Color32::new(200, 0, 50, 51));
        assert_eq!(out.uv0, source.uv0);
    }

    #[test]
    fn override_takes_mask_color() {
        let (source, mask) = pair();
        let out = ColorBlend::uniform(BlendMode::Override).blend(&source, &mask);
        assert_eq!(out.color, mask.color);
        assert_eq!(out.position, source.position);
    }

    #[test]
    fn separate_alpha_mode() {
        let (source, mask) = pair();
        let out = ColorBlend::new(BlendMode::Ignore, BlendMode::Override).blend(&source, &mask);
        assert_eq!(out.color, Color32::new(200, 100, 50, 51));
    }

    #[test]
    fn closures_are_blends() {
        let (source, mask) = pair();
        let take_mask = |_: &Vertex, m: &Vertex| *m;
        assert_eq!(take_mask.blend(&source, &mask), mask);
        assert_eq!(KeepSource.blend(&source, &mask), source);
    }
}
