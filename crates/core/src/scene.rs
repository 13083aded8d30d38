//! Scene graph arena.
//!
//! Nodes live for the whole session and are addressed by [`NodeId`]. Each node
//! carries a local [`Transform`], an optional collision [`Shape`] used by ray
//! queries, and parent/child links. World matrices are composed on demand by
//! walking the parent chain.

use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};
use std::fmt;

/// Stable handle to a node in a [`SceneGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Index of the node inside its arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Local transform relative to the parent node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Translation in parent space.
    pub translation: Vec3,
    /// Rotation in parent space.
    pub rotation: Quat,
    /// Non-uniform scale.
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Transform positioned at `translation` with identity rotation and unit scale.
    pub fn new(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    /// Builder: set scale.
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Builder: set rotation.
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builder: set rotation from XYZ Euler angles in radians.
    pub fn with_euler(self, euler: Vec3) -> Self {
        self.with_rotation(Quat::from_euler(EulerRot::XYZ, euler.x, euler.y, euler.z))
    }

    /// Decompose an affine matrix into a transform.
    pub fn from_matrix(matrix: Mat4) -> Self {
        let (scale, rotation, translation) = matrix.to_scale_rotation_translation();
        Self {
            translation,
            rotation,
            scale,
        }
    }

    /// Compose the local matrix (scale, then rotate, then translate).
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// Collision shape in node-local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Axis-aligned box centered on the node origin.
    Cuboid {
        /// Half size along each local axis.
        half_extents: Vec3,
    },
    /// Flat rectangle in the local XY plane, facing +Z.
    Quad {
        /// Half width and half height.
        half_size: Vec2,
    },
}

impl Shape {
    /// Box shape from full width, height and depth.
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        Shape::Cuboid {
            half_extents: Vec3::new(width, height, depth) * 0.5,
        }
    }

    /// Quad shape from full width and height.
    pub fn quad(width: f32, height: f32) -> Self {
        Shape::Quad {
            half_size: Vec2::new(width, height) * 0.5,
        }
    }
}

/// A single scene node.
#[derive(Debug, Clone)]
pub struct Node {
    /// Debug name, not required to be unique.
    pub name: String,
    /// Local transform.
    pub transform: Transform,
    /// Optional collision geometry.
    pub shape: Option<Shape>,
    /// Hidden nodes are skipped by ray queries.
    pub visible: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    /// Parent of this node, `None` for the scene root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Direct children in insertion order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Arena-backed scene graph with a single root.
#[derive(Debug, Clone)]
pub struct SceneGraph {
    nodes: Vec<Node>,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Create a graph containing only the root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                name: "scene".to_string(),
                transform: Transform::default(),
                shape: None,
                visible: true,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the root node exists from construction.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add an empty grouping node under `parent`.
    ///
    /// An unknown parent falls back to the root.
    pub fn spawn(&mut self, parent: NodeId, name: impl Into<String>, transform: Transform) -> NodeId {
        self.insert(parent, name.into(), transform, None)
    }

    /// Add a node with collision geometry under `parent`.
    pub fn spawn_shape(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        transform: Transform,
        shape: Shape,
    ) -> NodeId {
        self.insert(parent, name.into(), transform, Some(shape))
    }

    fn insert(
        &mut self,
        parent: NodeId,
        name: String,
        transform: Transform,
        shape: Option<Shape>,
    ) -> NodeId {
        let parent = if self.contains(parent) {
            parent
        } else {
            self.root()
        };
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            name,
            transform,
            shape,
            visible: true,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.index()].children.push(id);
        id
    }

    /// Whether `id` belongs to this graph.
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    /// Borrow a node.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Mutably borrow a node.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Parent of `id`, if any.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|node| node.parent)
    }

    /// Local transform of `id`.
    pub fn transform(&self, id: NodeId) -> Option<Transform> {
        self.node(id).map(|node| node.transform)
    }

    /// Replace the local transform of `id`. Returns false for unknown nodes.
    pub fn set_transform(&mut self, id: NodeId, transform: Transform) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.transform = transform;
                true
            }
            None => false,
        }
    }

    /// First node whose name matches exactly, in creation order.
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|node| node.name == name)
            .map(|index| NodeId(index as u32))
    }

    /// World matrix of `id`, composed from the root down.
    pub fn world_matrix(&self, id: NodeId) -> Option<Mat4> {
        let mut matrix = self.node(id)?.transform.to_matrix();
        let mut current = self.parent(id);
        while let Some(parent) = current {
            let node = &self.nodes[parent.index()];
            matrix = node.transform.to_matrix() * matrix;
            current = node.parent;
        }
        Some(matrix)
    }

    /// `id` followed by its parent chain up to the root.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            scene: self,
            next: self.contains(id).then_some(id),
        }
    }

    /// `id` and every node below it, depth-first pre-order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.contains(id) {
            return out;
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            let children = &self.nodes[current.index()].children;
            stack.extend(children.iter().rev().copied());
        }
        out
    }
}

/// Iterator over a node and its ancestors.
pub struct Ancestors<'a> {
    scene: &'a SceneGraph,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.scene.parent(current);
        Some(current)
    }
}
