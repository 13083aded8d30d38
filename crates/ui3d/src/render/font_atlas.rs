//! Font atlas: glyph metrics plus a row-packed coverage texture.
//!
//! Atlases are built from TTF/OTF bytes with `fontdue`. When no font file is
//! available, [`FontAtlas::builtin`] provides a fixed-advance glyph set so
//! text can still be laid out.

use fontdue::{Font, FontSettings};
use raypanel_assets::AssetError;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// Character range for ASCII printable characters
pub const ASCII_RANGE: std::ops::Range<u32> = 32..127;

/// Advance of a builtin glyph, as a fraction of the em size.
const BUILTIN_ADVANCE: f32 = 0.6;

/// Pre-rasterized glyphs and their layout metrics.
pub struct FontAtlas {
    /// Parsed font; `None` for the builtin glyph set.
    font: Option<Font>,

    /// Atlas texture data (grayscale)
    pub texture_data: Vec<u8>,

    /// Atlas dimensions
    pub width: u32,
    pub height: u32,

    /// Glyph metrics and positions in atlas
    glyphs: HashMap<char, GlyphInfo>,

    /// Font size used for rasterization
    pub font_size: f32,

    /// Padding around each glyph
    pub padding: u32,
}

impl std::fmt::Debug for FontAtlas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontAtlas")
            .field("builtin", &self.font.is_none())
            .field("glyphs", &self.glyphs.len())
            .field("width", &self.width)
            .field("height", &self.height)
            .field("font_size", &self.font_size)
            .finish()
    }
}

/// Information about a glyph in the atlas
#[derive(Debug, Clone, Copy)]
pub struct GlyphInfo {
    /// Position in atlas texture (pixels)
    pub atlas_x: u32,
    pub atlas_y: u32,

    /// Glyph dimensions (pixels)
    pub width: u32,
    pub height: u32,

    /// Glyph metrics (for layout)
    pub advance_width: f32,
    pub bearing_x: f32,
    pub bearing_y: f32,

    /// Normalized texture coordinates (0.0 to 1.0)
    pub uv_min: (f32, f32),
    pub uv_max: (f32, f32),
}

impl FontAtlas {
    /// Parse and rasterize a font file with default settings.
    pub fn load(path: &Path, font_size: f32) -> Result<Self, AssetError> {
        FontAtlasBuilder::from_file(path)?
            .with_font_size(font_size)
            .build()
    }

    /// Fixed-advance glyph set covering printable ASCII.
    ///
    /// Every glyph is a solid cell sampling the single white texel of the
    /// atlas, so layout widths are predictable.
    pub fn builtin(font_size: f32) -> Self {
        let advance = font_size * BUILTIN_ADVANCE;
        let glyphs = ASCII_RANGE
            .filter_map(char::from_u32)
            .map(|c| {
                let (width, height) = if c == ' ' {
                    (0, 0)
                } else {
                    ((advance * 0.8) as u32, (font_size * 0.7) as u32)
                };
                (
                    c,
                    GlyphInfo {
                        atlas_x: 0,
                        atlas_y: 0,
                        width,
                        height,
                        advance_width: advance,
                        bearing_x: advance * 0.1,
                        bearing_y: 0.0,
                        uv_min: (0.0, 0.0),
                        uv_max: (1.0, 1.0),
                    },
                )
            })
            .collect();

        Self {
            font: None,
            texture_data: vec![255],
            width: 1,
            height: 1,
            glyphs,
            font_size,
            padding: 0,
        }
    }

    /// Whether this is the builtin fallback set.
    pub fn is_builtin(&self) -> bool {
        self.font.is_none()
    }

    /// Get glyph information for a character
    pub fn get_glyph(&self, c: char) -> Option<&GlyphInfo> {
        self.glyphs.get(&c)
    }

    /// Get the font
    pub fn font(&self) -> Option<&Font> {
        self.font.as_ref()
    }

    /// Number of glyphs in the atlas.
    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// Calculate text layout for a string
    pub fn layout_text(&self, text: &str, font_size: f32) -> Vec<GlyphLayout> {
        let scale = font_size / self.font_size;
        let mut layouts = Vec::with_capacity(text.len());
        let mut cursor_x = 0.0;

        for c in text.chars() {
            if c == '\n' {
                cursor_x = 0.0;
                continue;
            }

            if let Some(glyph) = self.get_glyph(c) {
                layouts.push(GlyphLayout {
                    char: c,
                    position_x: cursor_x + glyph.bearing_x * scale,
                    position_y: glyph.bearing_y * scale,
                    width: glyph.width as f32 * scale,
                    height: glyph.height as f32 * scale,
                    uv_min: glyph.uv_min,
                    uv_max: glyph.uv_max,
                });

                cursor_x += glyph.advance_width * scale;
            }
        }

        layouts
    }

    /// Calculate the width of a string when rendered
    pub fn measure_text(&self, text: &str, font_size: f32) -> f32 {
        let scale = font_size / self.font_size;
        text.chars()
            .filter_map(|c| self.get_glyph(c))
            .map(|glyph| glyph.advance_width * scale)
            .sum()
    }
}

/// Layout information for a single glyph
#[derive(Debug, Clone, Copy)]
pub struct GlyphLayout {
    pub char: char,
    pub position_x: f32,
    pub position_y: f32,
    pub width: f32,
    pub height: f32,
    pub uv_min: (f32, f32),
    pub uv_max: (f32, f32),
}

/// Gap in texels kept around every packed glyph.
const GLYPH_PADDING: u32 = 2;

/// Atlas rows wrap before this width.
const MAX_ATLAS_WIDTH: u32 = 2048;

/// Rasterizes a font's glyphs into a [`FontAtlas`].
pub struct FontAtlasBuilder {
    font_data: Vec<u8>,
    font_size: f32,
    chars: Vec<char>,
}

struct Rasterized {
    c: char,
    metrics: fontdue::Metrics,
    coverage: Vec<u8>,
}

impl FontAtlasBuilder {
    /// Builder over raw TTF/OTF bytes, printable ASCII at 48px.
    pub fn new(font_data: Vec<u8>) -> Self {
        Self {
            font_data,
            font_size: 48.0,
            chars: ASCII_RANGE.filter_map(char::from_u32).collect(),
        }
    }

    /// Builder over the bytes of a font file
    pub fn from_file(path: &Path) -> Result<Self, AssetError> {
        Ok(Self::new(std::fs::read(path)?))
    }

    /// Rasterization size in pixels
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    /// Restrict the atlas to `chars`
    pub fn with_chars(mut self, chars: Vec<char>) -> Self {
        self.chars = chars;
        self
    }

    /// Parse the font, rasterize every requested glyph and pack them.
    pub fn build(self) -> Result<FontAtlas, AssetError> {
        let font = Font::from_bytes(self.font_data, FontSettings::default())
            .map_err(|e| AssetError::Font(e.to_string()))?;

        let rasterized: Vec<Rasterized> = self
            .chars
            .iter()
            .map(|&c| {
                let (metrics, coverage) = font.rasterize(c, self.font_size);
                Rasterized { c, metrics, coverage }
            })
            .collect();

        let (width, height, origins) = pack_rows(&rasterized);
        let mut texture_data = vec![0u8; (width * height) as usize];
        let mut glyphs = HashMap::with_capacity(rasterized.len());

        for (glyph, &(x, y)) in rasterized.iter().zip(&origins) {
            let w = glyph.metrics.width;
            for (row, src) in glyph.coverage.chunks_exact(w.max(1)).enumerate() {
                let start = ((y as usize + row) * width as usize) + x as usize;
                if let Some(dst) = texture_data.get_mut(start..start + src.len()) {
                    dst.copy_from_slice(src);
                }
            }

            let (gw, gh) = (w as u32, glyph.metrics.height as u32);
            glyphs.insert(
                glyph.c,
                GlyphInfo {
                    atlas_x: x,
                    atlas_y: y,
                    width: gw,
                    height: gh,
                    advance_width: glyph.metrics.advance_width,
                    bearing_x: glyph.metrics.xmin as f32,
                    bearing_y: glyph.metrics.ymin as f32,
                    uv_min: (x as f32 / width as f32, y as f32 / height as f32),
                    uv_max: ((x + gw) as f32 / width as f32, (y + gh) as f32 / height as f32),
                },
            );
        }

        info!(
            glyphs = glyphs.len(),
            width,
            height,
            font_size = self.font_size,
            "font atlas built"
        );

        Ok(FontAtlas {
            font: Some(font),
            texture_data,
            width,
            height,
            glyphs,
            font_size: self.font_size,
            padding: GLYPH_PADDING,
        })
    }
}

/// Shelf-pack glyphs left to right, wrapping at [`MAX_ATLAS_WIDTH`].
///
/// Returns power-of-two atlas dimensions and the top-left texel of each glyph.
fn pack_rows(glyphs: &[Rasterized]) -> (u32, u32, Vec<(u32, u32)>) {
    let mut origins = Vec::with_capacity(glyphs.len());
    let (mut x, mut y) = (GLYPH_PADDING, GLYPH_PADDING);
    let mut shelf = 0u32;
    let mut widest = 1u32;

    for glyph in glyphs {
        let cell_w = glyph.metrics.width as u32 + GLYPH_PADDING * 2;
        let cell_h = glyph.metrics.height as u32 + GLYPH_PADDING * 2;
        if x + cell_w > MAX_ATLAS_WIDTH {
            x = GLYPH_PADDING;
            y += shelf + GLYPH_PADDING;
            shelf = 0;
        }
        origins.push((x, y));
        x += cell_w;
        shelf = shelf.max(cell_h);
        widest = widest.max(x);
    }

    debug!(rows_end = y + shelf, widest, "packed glyph rows");
    (
        widest.next_power_of_two(),
        (y + shelf + GLYPH_PADDING).next_power_of_two(),
        origins,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_range() {
        let chars: Vec<char> = ASCII_RANGE.filter_map(char::from_u32).collect();
        assert!(!chars.is_empty());
        assert!(chars.contains(&'A'));
        assert!(chars.contains(&'z'));
        assert!(chars.contains(&'0'));
    }

    #[test]
    fn builtin_layout_is_fixed_advance() {
        let atlas = FontAtlas::builtin(32.0);
        assert!(atlas.is_builtin());
        assert_eq!(atlas.glyph_count(), 95);

        let width = atlas.measure_text("abcd", 0.04);
        assert!((width - 4.0 * 0.04 * BUILTIN_ADVANCE).abs() < 1e-6);

        let layout = atlas.layout_text("a b", 0.04);
        assert_eq!(layout.len(), 3);
        assert!(layout[1].position_x > layout[0].position_x);
        assert_eq!(layout[1].width, 0.0);
    }

    #[test]
    fn unparseable_font_is_reported() {
        let err = FontAtlasBuilder::new(vec![0, 1, 2, 3]).build().unwrap_err();
        assert!(matches!(err, AssetError::Font(_)));
    }

    const MONO: &[u8] = include_bytes!("../../../../assets/fonts/DejaVuSansMono.ttf");

    #[test]
    fn bundled_font_builds_packed_atlas() {
        let atlas = FontAtlasBuilder::new(MONO.to_vec())
            .with_font_size(32.0)
            .with_chars(vec!['A', 'g', ' '])
            .build()
            .unwrap();

        assert!(!atlas.is_builtin());
        assert_eq!(atlas.glyph_count(), 3);
        assert!(atlas.width.is_power_of_two() && atlas.height.is_power_of_two());
        assert_eq!(atlas.texture_data.len(), (atlas.width * atlas.height) as usize);

        let a = *atlas.get_glyph('A').unwrap();
        assert!(a.width > 0 && a.height > 0);
        assert!(a.uv_max.0 <= 1.0 && a.uv_max.1 <= 1.0);
        assert!(atlas.texture_data.iter().any(|&texel| texel > 0));
        assert_eq!(atlas.get_glyph(' ').unwrap().width, 0);

        // Monospaced: every advance matches.
        let g = atlas.get_glyph('g').unwrap();
        assert!((a.advance_width - g.advance_width).abs() < 1e-3);
        let width = atlas.measure_text("AgA", 32.0);
        assert!((width - 3.0 * a.advance_width).abs() < 1e-3);
    }

    #[test]
    fn glyphs_do_not_overlap() {
        let atlas = FontAtlasBuilder::new(MONO.to_vec()).build().unwrap();
        let mut cells: Vec<_> = ASCII_RANGE
            .filter_map(char::from_u32)
            .filter_map(|c| atlas.get_glyph(c).copied())
            .filter(|glyph| glyph.width > 0)
            .collect();
        cells.sort_by_key(|glyph| (glyph.atlas_y, glyph.atlas_x));
        for pair in cells.windows(2) {
            if pair[0].atlas_y == pair[1].atlas_y {
                assert!(pair[0].atlas_x + pair[0].width <= pair[1].atlas_x);
            }
        }
    }

    #[test]
    fn missing_font_file_is_io_error() {
        let err = FontAtlas::load(Path::new("does/not/exist.ttf"), 32.0).unwrap_err();
        assert!(matches!(err, AssetError::Io(_)));
    }
}
