// src/color.rs

//! The concrete `Color` written into textures and the painter palette.

/// A straight (non premultiplied) RGBA color, one byte per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const GREEN: Color = Color::rgb(0x00, 0xff, 0x00);
    /// Figure fill.
    pub const YELLOW: Color = Color::rgb(0xff, 0xff, 0x0f);

    /// Opaque color from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 0xff }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }

    /// Byte layout used by `SoftwareTexture` (R, G, B, A).
    pub fn to_rgba_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn from_rgba_bytes(bytes: [u8; 4]) -> Self {
        Color::rgba(bytes[0], bytes[1], bytes[2], bytes[3])
    }
}

impl Default for Color {
    /// The canvas starts out black.
    fn default() -> Self {
        Color::BLACK
    }
}
