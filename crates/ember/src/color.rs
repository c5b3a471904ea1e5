//! Packed RGBA color.

/// An 8-bit-per-channel RGBA color.
///
/// Stored packed so it is cheap to copy around as ambient draw state; the
/// float accessors produce the `0..=1` values written into vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Self = Self::rgba8(255, 255, 255, 255);
    pub const BLACK: Self = Self::rgba8(0, 0, 0, 255);
    pub const RED: Self = Self::rgba8(255, 0, 0, 255);
    pub const GREEN: Self = Self::rgba8(0, 255, 0, 255);
    pub const BLUE: Self = Self::rgba8(0, 0, 255, 255);
    pub const TRANSPARENT: Self = Self::rgba8(0, 0, 0, 0);
    /// The engine's default background.
    pub const LIGHT_DARK: Self = Self::rgba8(25, 25, 25, 255);

    pub const fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Build from float channels in `0..=1`. Out-of-range values saturate.
    pub fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            r: channel_to_u8(r),
            g: channel_to_u8(g),
            b: channel_to_u8(b),
            a: channel_to_u8(a),
        }
    }

    /// Build from float RGB with full alpha.
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    pub fn r_f32(self) -> f32 {
        self.r as f32 / 255.0
    }

    pub fn g_f32(self) -> f32 {
        self.g as f32 / 255.0
    }

    pub fn b_f32(self) -> f32 {
        self.b as f32 / 255.0
    }

    pub fn a_f32(self) -> f32 {
        self.a as f32 / 255.0
    }

    /// Same color with a different alpha.
    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: channel_to_u8(a),
            ..self
        }
    }

    /// Float channels in vertex order.
    pub fn to_array(self) -> [f32; 4] {
        [self.r_f32(), self.g_f32(), self.b_f32(), self.a_f32()]
    }

    pub(crate) fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r_f32() as f64,
            g: self.g_f32() as f64,
            b: self.b_f32() as f64,
            a: self.a_f32() as f64,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<[f32; 4]> for Color {
    fn from(c: [f32; 4]) -> Self {
        Self::rgba(c[0], c[1], c[2], c[3])
    }
}

fn channel_to_u8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_round_trip_is_within_one_step() {
        let c = Color::rgba(0.1, 0.5, 0.75, 1.0);
        for (got, want) in c.to_array().iter().zip([0.1, 0.5, 0.75, 1.0]) {
            assert!((got - want).abs() <= 1.0 / 255.0, "{got} vs {want}");
        }
    }

    #[test]
    fn channels_saturate() {
        assert_eq!(Color::rgba(-1.0, 2.0, 0.0, 1.0), Color::rgba8(0, 255, 0, 255));
    }

    #[test]
    fn default_is_white() {
        assert_eq!(Color::default().to_array(), [1.0; 4]);
    }
}
