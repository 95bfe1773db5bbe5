//! RGBA color type shared by the block editor and the timeline editor.

use serde::{Deserialize, Serialize};

fn default_alpha() -> f32 {
    1.0
}

/// An RGBA color as authored in the editor.
///
/// Channels are 0-255; alpha is a 0.0-1.0 opacity. The block codec only keeps
/// whether each channel is on, and the timeline treats a color as "off" when
/// all three channels are zero regardless of alpha.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Color {
    #[serde(rename = "R")]
    pub r: u8,
    #[serde(rename = "G")]
    pub g: u8,
    #[serde(rename = "B")]
    pub b: u8,
    #[serde(rename = "A", default = "default_alpha")]
    pub a: f32,
}

impl Color {
    /// Opaque black, the "off" color of a timeline.
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    /// Opaque color from channel values.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// True when no channel is lit. Alpha is not considered.
    #[inline]
    pub fn is_black(&self) -> bool {
        self.r == 0 && self.g == 0 && self.b == 0
    }

    /// 3-bit on/off mask: `4*(R!=0) + 2*(G!=0) + (B!=0)`.
    #[inline]
    pub fn code(&self) -> u8 {
        (u8::from(self.r != 0) << 2) | (u8::from(self.g != 0) << 1) | u8::from(self.b != 0)
    }

    /// Rebuild a color from a 3-bit mask. Lit channels become 255.
    ///
    /// Bits above the low three are ignored.
    pub fn from_code(code: u8, alpha: f32) -> Self {
        let channel = |bit: u8| if code & bit != 0 { 255 } else { 0 };
        Self {
            r: channel(0b100),
            g: channel(0b010),
            b: channel(0b001),
            a: alpha,
        }
    }

    /// Color as displayed: each channel scaled by alpha and rounded.
    pub fn premultiplied(&self) -> [u8; 3] {
        let alpha = self.a.clamp(0.0, 1.0);
        let scale = |c: u8| (c as f32 * alpha).round() as u8;
        [scale(self.r), scale(self.g), scale(self.b)]
    }

    /// Pack into a `0xRRGGBBAA` word with alpha scaled to 0-255.
    pub fn to_rgba_u32(&self) -> u32 {
        let alpha = (self.a.clamp(0.0, 1.0) * 255.0).round() as u32;
        (self.r as u32) << 24 | (self.g as u32) << 16 | (self.b as u32) << 8 | alpha
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_masks() {
        assert_eq!(Color::BLACK.code(), 0);
        assert_eq!(Color::BLUE.code(), 1);
        assert_eq!(Color::GREEN.code(), 2);
        assert_eq!(Color::RED.code(), 4);
        assert_eq!(Color::WHITE.code(), 7);

        // Any nonzero value counts as on
        assert_eq!(Color::rgb(1, 0, 128).code(), 5);
    }

    #[test]
    fn test_from_code_inverts_mask() {
        for code in 0..8u8 {
            let color = Color::from_code(code, 1.0);
            assert_eq!(color.code(), code);
            for c in [color.r, color.g, color.b] {
                assert!(c == 0 || c == 255);
            }
        }
        assert_eq!(Color::from_code(6, 0.5), Color::rgba(255, 255, 0, 0.5));
    }

    #[test]
    fn test_is_black_ignores_alpha() {
        assert!(Color::rgba(0, 0, 0, 0.0).is_black());
        assert!(Color::BLACK.is_black());
        assert!(!Color::rgba(0, 0, 1, 0.0).is_black());
    }

    #[test]
    fn test_premultiplied() {
        assert_eq!(Color::rgba(255, 100, 0, 0.5).premultiplied(), [128, 50, 0]);
        assert_eq!(Color::WHITE.premultiplied(), [255, 255, 255]);
    }

    #[test]
    fn test_to_rgba_u32() {
        assert_eq!(Color::RED.to_rgba_u32(), 0xFF00_00FF);
        assert_eq!(Color::rgb(0, 255, 255).to_rgba_u32(), 0x00FF_FFFF);
        assert_eq!(Color::rgba(0, 0, 0, 0.0).to_rgba_u32(), 0);
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_string(&Color::rgba(1, 2, 3, 0.5)).unwrap();
        assert_eq!(json, r#"{"R":1,"G":2,"B":3,"A":0.5}"#);

        // Alpha defaults to opaque when missing
        let color: Color = serde_json::from_str(r#"{"R":255,"G":0,"B":0}"#).unwrap();
        assert_eq!(color, Color::RED);
    }
}
