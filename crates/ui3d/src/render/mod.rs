//! CPU-side render data for 3D UI: font atlases and text meshes handed to the
//! rendering collaborator.

pub mod font_atlas;
pub mod text_mesh;

pub use font_atlas::{FontAtlas, FontAtlasBuilder, GlyphLayout};
pub use text_mesh::{TextMesh, TextVertex};
