//! Interactive 3D Button Component

use super::palette;
use glam::Vec3;
use raypanel_core::{
    Appearance, Color, InteractiveTarget, NodeId, SceneGraph, Shape, TargetAction, Transform,
};

/// Color scheme for the two toggle states
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtonColors {
    /// Color while inactive
    pub normal: Color,
    /// Color while active
    pub active: Color,
}

impl Default for ButtonColors {
    fn default() -> Self {
        Self {
            normal: [0.8, 0.8, 0.8, 1.0], // Light gray
            active: palette::YELLOW,
        }
    }
}

/// A box-shaped button that becomes an interactive target when spawned
#[derive(Debug, Clone)]
pub struct Button3D {
    /// Transform relative to the parent node
    pub transform: Transform,

    /// Button label, also the target label
    pub label: String,

    /// Color scheme
    pub colors: ButtonColors,

    /// Box size (width, height, depth)
    pub size: Vec3,

    /// Whether the button is visible
    pub visible: bool,
}

impl Default for Button3D {
    fn default() -> Self {
        Self {
            transform: Transform::default(),
            label: String::new(),
            colors: ButtonColors::default(),
            size: Vec3::new(0.4, 0.2, 0.05),
            visible: true,
        }
    }
}

impl Button3D {
    /// Create a new 3D button
    pub fn new(position: Vec3, label: impl Into<String>) -> Self {
        Self {
            transform: Transform::new(position),
            label: label.into(),
            ..Default::default()
        }
    }

    /// Builder: Set color scheme
    pub fn with_colors(mut self, normal: Color, active: Color) -> Self {
        self.colors = ButtonColors { normal, active };
        self
    }

    /// Collision shape of the button
    pub fn shape(&self) -> Shape {
        Shape::cuboid(self.size.x, self.size.y, self.size.z)
    }

    /// Add the button node under `parent` and build its interactive target.
    ///
    /// The caller registers the returned target.
    pub fn spawn(
        &self,
        scene: &mut SceneGraph,
        parent: NodeId,
        action: impl TargetAction + 'static,
    ) -> InteractiveTarget {
        let node = scene.spawn_shape(parent, self.label.clone(), self.transform, self.shape());
        if let Some(entry) = scene.node_mut(node) {
            entry.visible = self.visible;
        }
        InteractiveTarget::new(node, self.label.clone(), action)
            .with_appearance(Appearance::new(self.colors.normal, self.colors.active))
    }
}
