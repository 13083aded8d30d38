//! 3D Text Component

use glam::Vec3;
use raypanel_core::{Color, Transform};

/// A line of text placed relative to a parent node
#[derive(Debug, Clone, PartialEq)]
pub struct Text3D {
    /// Transform relative to the owning node
    pub transform: Transform,

    /// Text content
    pub text: String,

    /// Glyph size in world units
    pub font_size: f32,

    /// Text color (RGBA)
    pub color: Color,

    /// Text alignment
    pub alignment: TextAlignment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlignment {
    Left,
    Center,
    Right,
}

impl Default for Text3D {
    fn default() -> Self {
        Self {
            transform: Transform::default(),
            text: String::new(),
            font_size: 0.04,
            color: [1.0, 1.0, 1.0, 1.0],
            alignment: TextAlignment::Left,
        }
    }
}

impl Text3D {
    /// Create a new Text3D component
    pub fn new(position: Vec3, text: impl Into<String>) -> Self {
        Self {
            transform: Transform::new(position),
            text: text.into(),
            ..Default::default()
        }
    }

    /// Builder: Set font size
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    /// Builder: Set color
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Builder: Set alignment
    pub fn with_alignment(mut self, alignment: TextAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Get a reference to the text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Horizontal offset applied for the alignment, given the measured width
    pub fn alignment_offset(&self, width: f32) -> f32 {
        match self.alignment {
            TextAlignment::Left => 0.0,
            TextAlignment::Center => -width * 0.5,
            TextAlignment::Right => -width,
        }
    }
}
