use std::fs;
use std::path::Path;

use glam::Vec3;
use raypanel_core::{NodeId, SceneGraph, Shape, Transform};
use serde::{Deserialize, Serialize};

use crate::AssetError;

/// A composite model: a named tree of parts, each optionally carrying a box
/// collider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDefinition {
    /// Name given to the model's group node.
    pub name: String,
    /// Top-level parts.
    #[serde(default)]
    pub parts: Vec<PartDefinition>,
}

/// One node of a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartDefinition {
    /// Part name.
    pub name: String,
    /// Translation relative to the parent part.
    #[serde(default)]
    pub translation: [f32; 3],
    /// XYZ Euler rotation in radians.
    #[serde(default)]
    pub rotation: [f32; 3],
    /// Scale relative to the parent part.
    #[serde(default = "unit_scale")]
    pub scale: [f32; 3],
    /// Full box size; parts without one are grouping nodes.
    #[serde(default)]
    pub size: Option<[f32; 3]>,
    /// Nested parts.
    #[serde(default)]
    pub children: Vec<PartDefinition>,
}

fn unit_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

impl PartDefinition {
    fn transform(&self) -> Transform {
        Transform::new(Vec3::from(self.translation))
            .with_euler(Vec3::from(self.rotation))
            .with_scale(Vec3::from(self.scale))
    }

    fn visit<'a>(&'a self, out: &mut Vec<&'a PartDefinition>) {
        out.push(self);
        for child in &self.children {
            child.visit(out);
        }
    }
}

impl ModelDefinition {
    /// All parts, depth-first.
    pub fn flatten(&self) -> Vec<&PartDefinition> {
        let mut out = Vec::new();
        for part in &self.parts {
            part.visit(&mut out);
        }
        out
    }

    /// Reject models that could never be hit or that contain bad numbers.
    pub fn validate(&self) -> Result<(), AssetError> {
        if self.name.trim().is_empty() {
            return Err(AssetError::Invalid("model name cannot be empty".into()));
        }
        let parts = self.flatten();
        for part in &parts {
            let finite = part
                .translation
                .iter()
                .chain(part.rotation.iter())
                .chain(part.scale.iter())
                .all(|v| v.is_finite());
            if !finite {
                return Err(AssetError::Invalid(format!(
                    "part {} has a non-finite transform",
                    part.name
                )));
            }
            if let Some(size) = part.size {
                if size.iter().any(|v| !v.is_finite() || *v <= 0.0) {
                    return Err(AssetError::Invalid(format!(
                        "part {} has a non-positive size",
                        part.name
                    )));
                }
            }
        }
        if !parts.iter().any(|part| part.size.is_some()) {
            return Err(AssetError::Invalid(format!(
                "model {} has no solid parts",
                self.name
            )));
        }
        Ok(())
    }

    /// Build the model under `parent` and return its group node.
    pub fn instantiate(&self, scene: &mut SceneGraph, parent: NodeId, transform: Transform) -> NodeId {
        let group = scene.spawn(parent, self.name.clone(), transform);
        for part in &self.parts {
            spawn_part(scene, group, part);
        }
        group
    }
}

fn spawn_part(scene: &mut SceneGraph, parent: NodeId, part: &PartDefinition) {
    let node = match part.size {
        Some([w, h, d]) => scene.spawn_shape(parent, part.name.clone(), part.transform(), Shape::cuboid(w, h, d)),
        None => scene.spawn(parent, part.name.clone(), part.transform()),
    };
    for child in &part.children {
        spawn_part(scene, node, child);
    }
}

/// Parse and validate a model document.
pub fn load_model_from_str(input: &str) -> Result<ModelDefinition, AssetError> {
    let model: ModelDefinition = serde_json::from_str(input)?;
    model.validate()?;
    Ok(model)
}

/// Read, parse and validate a model file.
pub fn load_model_from_file(path: &Path) -> Result<ModelDefinition, AssetError> {
    let data = fs::read_to_string(path)?;
    load_model_from_str(&data)
}
