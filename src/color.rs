//! Vertex colors and ARGB8888 packing.

/// An 8-bit-per-channel RGB color, the base color attached to each vertex.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Scales each channel by a light intensity in [0, 1].
    ///
    /// Channels are normalized to [0, 1] before scaling so the result stays a
    /// shade of the base color rather than saturating to black or white.
    pub fn scaled(self, intensity: f32) -> Self {
        let t = intensity.clamp(0.0, 1.0);
        Self {
            r: (self.r as f32 / 255.0 * t * 255.0) as u8,
            g: (self.g as f32 / 255.0 * t * 255.0) as u8,
            b: (self.b as f32 / 255.0 * t * 255.0) as u8,
        }
    }

    /// Packs into ARGB8888 with full alpha, the color buffer's pixel format.
    pub const fn to_argb(self) -> u32 {
        0xFF00_0000 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }
}
