use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// A linear-light RGBA color with unpremultiplied alpha.
///
/// `#[repr(C)]` + `Pod` so texel storage can be built from raw byte
/// buffers without copying per channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Gray value with full alpha.
    pub const fn splat(v: f32) -> Self {
        Self::new(v, v, v, 1.0)
    }

    /// Replace the alpha channel.
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Scale the color channels, leaving alpha untouched.
    pub fn scale_rgb(self, s: f32) -> Self {
        Self::new(self.r * s, self.g * s, self.b * s, self.a)
    }

    /// Clamp every channel into `[0, 1]`.
    pub fn clamped(self) -> Self {
        Self::new(
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
            self.a.clamp(0.0, 1.0),
        )
    }

    /// Component-wise multiply, the texel-times-tint operation.
    pub fn modulate(self, other: Self) -> Self {
        Self::new(
            self.r * other.r,
            self.g * other.g,
            self.b * other.b,
            self.a * other.a,
        )
    }

    /// Linear interpolation between two colors, all four channels.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }

    /// Decode an 8-bit sRGB texel into linear light.
    pub fn from_srgb8(rgba: [u8; 4]) -> Self {
        Self::new(
            srgb_to_linear(rgba[0] as f32 / 255.0),
            srgb_to_linear(rgba[1] as f32 / 255.0),
            srgb_to_linear(rgba[2] as f32 / 255.0),
            rgba[3] as f32 / 255.0,
        )
    }

    /// Encode into 8-bit sRGB for image output. Channels are clamped first.
    pub fn to_srgb8(self) -> [u8; 4] {
        let c = self.clamped();
        [
            (linear_to_srgb(c.r) * 255.0).round() as u8,
            (linear_to_srgb(c.g) * 255.0).round() as u8,
            (linear_to_srgb(c.b) * 255.0).round() as u8,
            (c.a * 255.0).round() as u8,
        ]
    }
}

impl std::ops::Add for Rgba {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.r + rhs.r,
            self.g + rhs.g,
            self.b + rhs.b,
            self.a + rhs.a,
        )
    }
}

impl std::ops::Mul<f32> for Rgba {
    type Output = Self;

    fn mul(self, s: f32) -> Self {
        Self::new(self.r * s, self.g * s, self.b * s, self.a * s)
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}
