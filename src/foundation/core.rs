pub use kurbo::{Affine, Point, Rect, Size};

use crate::foundation::error::{FrameError, FrameResult};

/// Logical resolution a surface reports to the renderer for scale calculations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dpi {
    /// Horizontal dots per inch.
    pub x: f64,
    /// Vertical dots per inch.
    pub y: f64,
}

impl Dpi {
    /// 96x96, the resolution at which one logical unit is one pixel.
    pub const STANDARD: Dpi = Dpi { x: 96.0, y: 96.0 };

    /// Create a validated DPI pair.
    pub fn new(x: f64, y: f64) -> FrameResult<Self> {
        if !(x.is_finite() && y.is_finite() && x > 0.0 && y > 0.0) {
            return Err(FrameError::validation(format!(
                "dpi must be finite and > 0, got {x}x{y}"
            )));
        }
        Ok(Self { x, y })
    }

    /// Logical-to-device scale factors.
    pub fn scale(self) -> (f64, f64) {
        (self.x / 96.0, self.y / 96.0)
    }
}

impl Default for Dpi {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Straight-alpha RGBA8 color used for solid brushes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const PINK: Color = Color::rgb(255, 192, 203);
    pub const CHARTREUSE: Color = Color::rgb(127, 255, 0);
    pub const CRIMSON: Color = Color::rgb(220, 20, 60);
    pub const GOLD: Color = Color::rgb(255, 215, 0);

    /// Opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color with explicit straight alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Premultiplied `[r, g, b, a]`.
    pub fn to_premul(self) -> [u8; 4] {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        [
            premul(self.r, self.a),
            premul(self.g, self.a),
            premul(self.b, self.a),
            self.a,
        ]
    }
}

/// Integer pixel bounds of a `width` x `height` surface as a [`Rect`].
pub fn surface_rect(width: u32, height: u32) -> Rect {
    Rect::new(0.0, 0.0, f64::from(width), f64::from(height))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
