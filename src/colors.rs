//! Byte colors carried by mesh vertices.
//!
//! Vertex colors are stored as four normalized bytes ([`Color32`]). Weighted
//! sums and blend modes are evaluated in float space and quantized back with
//! rounding; plain linear interpolation and the multiply mask stay in byte
//! space so that masking an opaque white source is lossless.

/// An RGBA color with one byte per channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color32 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color32 {
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    pub const CLEAR: Self = Self::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Quantizes float channels, clamping each to [0, 1] first.
    pub fn from_rgba_f32(rgba: [f32; 4]) -> Self {
        Self::new(
            quantize(rgba[0]),
            quantize(rgba[1]),
            quantize(rgba[2]),
            quantize(rgba[3]),
        )
    }

    /// Channels as floats in [0, 1].
    pub fn to_rgba_f32(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }

    /// Per-channel linear interpolation; `t` is clamped to [0, 1] and the
    /// result truncated toward `self`.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let channel = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t) as u8;
        Self::new(
            channel(self.r, other.r),
            channel(self.g, other.g),
            channel(self.b, other.b),
            channel(self.a, other.a),
        )
    }

    /// Channel-wise product in byte space: `a * b / 255`, truncated.
    pub fn multiply(self, other: Self) -> Self {
        let channel = |a: u8, b: u8| ((a as u16 * b as u16) / 0xFF) as u8;
        Self::new(
            channel(self.r, other.r),
            channel(self.g, other.g),
            channel(self.b, other.b),
            channel(self.a, other.a),
        )
    }

    /// Blends `other` over `self`, using one mode for RGB and one for alpha.
    pub fn blend(self, other: Self, color_mode: BlendMode, alpha_mode: BlendMode) -> Self {
        if color_mode == BlendMode::Multiply && alpha_mode == BlendMode::Multiply {
            return self.multiply(other);
        }
        let x = self.to_rgba_f32();
        let y = other.to_rgba_f32();
        Self::from_rgba_f32([
            color_mode.apply(x[0], y[0]),
            color_mode.apply(x[1], y[1]),
            color_mode.apply(x[2], y[2]),
            alpha_mode.apply(x[3], y[3]),
        ])
    }
}

impl Default for Color32 {
    fn default() -> Self {
        Self::WHITE
    }
}

fn quantize(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Per-channel blend function combining a base value `x` with a layer `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// `x * y`
    #[default]
    Multiply,
    /// `y`
    Override,
    /// `x`
    Ignore,
    /// `x + y`
    Add,
    /// `x - y`
    Subtract,
    /// `1 - (1 - x)(1 - y)`
    Screen,
    /// Multiply below half, Screen above.
    HardLight,
    /// Multiply below half, Add above.
    HardLightFast,
    /// `min(x, y)`
    Darken,
    /// `max(x, y)`
    Lighten,
}

impl BlendMode {
    #[inline]
    pub fn apply(self, x: f32, y: f32) -> f32 {
        match self {
            Self::Multiply => x * y,
            Self::Override => y,
            Self::Ignore => x,
            Self::Add => x + y,
            Self::Subtract => x - y,
            Self::Screen => 1.0 - (1.0 - x) * (1.0 - y),
            Self::HardLight => {
                if y < 0.5 {
                    x * y
                } else {
                    1.0 - (1.0 - x) * (1.0 - y)
                }
            }
            Self::HardLightFast => {
                if y < 0.5 {
                    x * y
                } else {
                    x + y
                }
            }
            Self::Darken => x.min(y),
            Self::Lighten => x.max(y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiply_by_white_is_identity() {
        let c = Color32::new(12, 200, 77, 128);
        assert_eq!(c.multiply(Color32::WHITE), c);
    }

    #[test]
    fn multiply_truncates() {
        let half = Color32::new(128, 128, 128, 128);
        assert_eq!(half.multiply(half), Color32::new(64, 64, 64, 64));
    }

    #[test]
    fn lerp_clamps_parameter() {
        let a = Color32::BLACK;
        let b = Color32::WHITE;
        assert_eq!(a.lerp(b, 2.0), b);
        assert_eq!(a.lerp(b, -1.0), a);
        assert_eq!(a.lerp(b, 0.5).r, 127);
    }

    #[test]
    fn float_round_trip_rounds() {
        let c = Color32::from_rgba_f32([0.5, 1.5, -0.2, 1.0]);
        assert_eq!(c, Color32::new(128, 255, 0, 255));
    }

    #[test]
    fn screen_lightens() {
        let base = Color32::new(128, 128, 128, 255);
        let out = base.blend(base, BlendMode::Screen, BlendMode::Ignore);
        assert!(out.r > base.r);
        assert_eq!(out.a, 255);
    }

    #[test]
    fn hard_light_switches_at_half() {
        assert_eq!(BlendMode::HardLight.apply(0.5, 0.25), 0.125);
        assert_eq!(BlendMode::HardLight.apply(0.5, 0.5), 0.75);
        assert_eq!(BlendMode::HardLightFast.apply(0.25, 0.5), 0.75);
    }
}
