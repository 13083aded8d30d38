//! 3D Panel Component - Background quad for UI elements

use glam::Vec3;
use raypanel_core::{Color, NodeId, SceneGraph, Shape, Transform};

/// 3D Panel - A background quad for UI elements
#[derive(Debug, Clone, PartialEq)]
pub struct Panel3D {
    /// Transform relative to the parent node
    pub transform: Transform,

    /// Panel size (width, height)
    pub size: (f32, f32),

    /// Background color
    pub color: Color,

    /// Whether the panel is visible
    pub visible: bool,
}

impl Default for Panel3D {
    fn default() -> Self {
        Self {
            transform: Transform::default(),
            size: (1.2, 0.4),
            color: [0.0, 0.0, 0.0, 0.7], // Black, semi-transparent
            visible: true,
        }
    }
}

impl Panel3D {
    /// Create a new 3D panel
    pub fn new(position: Vec3, width: f32, height: f32) -> Self {
        Self {
            transform: Transform::new(position),
            size: (width, height),
            ..Default::default()
        }
    }

    /// Collision shape of the background quad
    pub fn shape(&self) -> Shape {
        Shape::quad(self.size.0, self.size.1)
    }

    /// Add the background quad under `parent`.
    pub fn spawn(&self, scene: &mut SceneGraph, parent: NodeId, name: &str) -> NodeId {
        let node = scene.spawn_shape(parent, name, self.transform, self.shape());
        if let Some(entry) = scene.node_mut(node) {
            entry.visible = self.visible;
        }
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_creation() {
        let panel = Panel3D::new(Vec3::ZERO, 1.2, 0.4);
        assert_eq!(panel.size, (1.2, 0.4));
        assert!(panel.visible);
        assert_eq!(panel.color, [0.0, 0.0, 0.0, 0.7]);
    }

    #[test]
    fn test_panel_spawn() {
        let mut scene = SceneGraph::new();
        let panel = Panel3D {
            visible: false,
            ..Panel3D::new(Vec3::ZERO, 1.2, 0.4)
        };
        let root = scene.root();
        let node = panel.spawn(&mut scene, root, "log_background");
        let entry = scene.node(node).unwrap();
        assert!(matches!(entry.shape, Some(Shape::Quad { .. })));
        assert!(!entry.visible);
    }
}
