//! 3D UI Components
//!
//! Builders for the spatial controls placed in the scene: box buttons, text
//! lines and background panels.

pub mod button;
pub mod panel;
pub mod text3d;

pub use button::{Button3D, ButtonColors};
pub use panel::Panel3D;
pub use text3d::{Text3D, TextAlignment};

/// Named colors used by the built-in controls.
pub mod palette {
    use raypanel_core::Color;

    pub const WHITE: Color = [1.0, 1.0, 1.0, 1.0];
    pub const BLACK: Color = [0.0, 0.0, 0.0, 1.0];
    pub const RED: Color = [1.0, 0.0, 0.0, 1.0];
    pub const GREEN: Color = [0.0, 0.5, 0.0, 1.0];
    pub const BLUE: Color = [0.0, 0.0, 1.0, 1.0];
    pub const YELLOW: Color = [1.0, 1.0, 0.0, 1.0];
    pub const SKY_BLUE: Color = [0.53, 0.81, 0.92, 1.0];

    /// Parse a CSS-style color name or `#rrggbb` hex string.
    pub fn parse(name: &str) -> Option<Color> {
        let name = name.trim().to_ascii_lowercase();
        if let Some(hex) = name.strip_prefix('#') {
            if hex.len() != 6 {
                return None;
            }
            let value = u32::from_str_radix(hex, 16).ok()?;
            return Some(from_hex(value));
        }
        match name.as_str() {
            "white" => Some(WHITE),
            "black" => Some(BLACK),
            "red" => Some(RED),
            "green" => Some(GREEN),
            "blue" => Some(BLUE),
            "yellow" => Some(YELLOW),
            "skyblue" => Some(SKY_BLUE),
            _ => None,
        }
    }

    /// Convert `0xRRGGBB` to an opaque color.
    pub fn from_hex(value: u32) -> Color {
        [
            ((value >> 16) & 0xff) as f32 / 255.0,
            ((value >> 8) & 0xff) as f32 / 255.0,
            (value & 0xff) as f32 / 255.0,
            1.0,
        ]
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn parses_names_and_hex() {
            assert_eq!(parse("Green"), Some(GREEN));
            assert_eq!(parse("#ff0000"), Some(RED));
            assert_eq!(parse("#333333").map(|c| c[0]), Some(0x33 as f32 / 255.0));
            assert_eq!(parse("mauve"), None);
            assert_eq!(parse("#fff"), None);
        }
    }
}
