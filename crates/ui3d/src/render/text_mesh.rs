//! Text meshes - glyph quads built from a font atlas

use super::font_atlas::FontAtlas;
use crate::components::Text3D;
use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// Vertex format for text rendering
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct TextVertex {
    /// Position relative to the owning node
    pub position: [f32; 3],
    /// UV coordinates in font atlas
    pub uv: [f32; 2],
    /// Text color (RGBA)
    pub color: [f32; 4],
}

/// Glyph quads for one line of text, in the space of the node that owns it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextMesh {
    pub vertices: Vec<TextVertex>,
    pub indices: Vec<u32>,
    /// Rendered width of the line.
    pub width: f32,
}

impl TextMesh {
    /// Generate the mesh for a Text3D component
    pub fn build(atlas: &FontAtlas, text: &Text3D) -> Self {
        let layouts = atlas.layout_text(&text.text, text.font_size);
        let mut vertices = Vec::with_capacity(layouts.len() * 4);
        let mut indices = Vec::with_capacity(layouts.len() * 6);

        let width = atlas.measure_text(&text.text, text.font_size);
        let offset = text.alignment_offset(width);
        let local = text.transform.to_matrix();
        let color = text.color;

        for layout in layouts {
            if layout.width <= 0.0 || layout.height <= 0.0 {
                continue;
            }
            let base_vertex = vertices.len() as u32;

            let x0 = layout.position_x + offset;
            let y0 = layout.position_y;
            let x1 = x0 + layout.width;
            let y1 = y0 + layout.height;

            let (u0, v0) = layout.uv_min;
            let (u1, v1) = layout.uv_max;

            for (x, y, u, v) in [(x0, y0, u0, v1), (x1, y0, u1, v1), (x1, y1, u1, v0), (x0, y1, u0, v0)] {
                vertices.push(TextVertex {
                    position: transform_point(&local, x, y),
                    uv: [u, v],
                    color,
                });
            }

            // Two triangles for the quad
            indices.extend_from_slice(&[
                base_vertex,
                base_vertex + 1,
                base_vertex + 2,
                base_vertex,
                base_vertex + 2,
                base_vertex + 3,
            ]);
        }

        Self {
            vertices,
            indices,
            width,
        }
    }

    /// Number of glyph quads.
    pub fn quad_count(&self) -> usize {
        self.indices.len() / 6
    }

    /// Raw vertex bytes for upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

fn transform_point(local: &Mat4, x: f32, y: f32) -> [f32; 3] {
    local.transform_point3(glam::Vec3::new(x, y, 0.0)).to_array()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn one_quad_per_visible_glyph() {
        let atlas = FontAtlas::builtin(32.0);
        let text = Text3D::new(Vec3::new(-0.55, 0.15, 0.0), "ab c").with_font_size(0.04);
        let mesh = TextMesh::build(&atlas, &text);

        assert_eq!(mesh.quad_count(), 3);
        assert_eq!(mesh.vertices.len(), 12);
        assert_eq!(mesh.vertex_bytes().len(), 12 * std::mem::size_of::<TextVertex>());
    }

    #[test]
    fn quads_are_offset_by_text_position() {
        let atlas = FontAtlas::builtin(32.0);
        let text = Text3D::new(Vec3::new(-0.55, 0.15, 0.0), "a").with_font_size(0.04);
        let mesh = TextMesh::build(&atlas, &text);

        let first = mesh.vertices[0].position;
        assert!(first[0] >= -0.55 && first[0] < -0.5);
        assert!((first[1] - 0.15).abs() < 1e-6);
    }
}
