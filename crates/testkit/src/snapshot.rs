//! Deterministic snapshot testing utilities.
//!
//! This module provides a minimal "golden file" snapshot helper for tests.
//! Snapshots are serialized as canonical pretty JSON with object keys sorted.
//!
//! By default, tests compare against the golden file on disk. To update goldens,
//! rerun with `RAYPANEL_UPDATE_SNAPSHOTS=1`.

use anyhow::{Context, Result};
use raypanel_core::{InteractiveRegistry, SceneGraph};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Environment variable that enables snapshot updates.
pub const UPDATE_SNAPSHOTS_ENV: &str = "RAYPANEL_UPDATE_SNAPSHOTS";

/// Observable state of one registered target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetSnapshot {
    /// Display label.
    pub label: String,
    /// Toggle state.
    pub is_active: bool,
    /// Activation latch.
    pub clicked: bool,
    /// Local translation of the target node.
    pub translation: [f32; 3],
}

/// Capture every registered target in registration order.
pub fn capture_targets(scene: &SceneGraph, registry: &InteractiveRegistry) -> Vec<TargetSnapshot> {
    registry
        .iter()
        .map(|target| TargetSnapshot {
            label: target.label().to_string(),
            is_active: target.state.is_active,
            clicked: target.state.clicked,
            translation: scene
                .transform(target.node())
                .map(|transform| transform.translation.to_array())
                .unwrap_or_default(),
        })
        .collect()
}

/// Assert that `value` matches the JSON snapshot stored at `path`.
///
/// If `RAYPANEL_UPDATE_SNAPSHOTS=1` is set, the snapshot file is written/overwritten
/// with the current value instead.
pub fn assert_json_snapshot<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> Result<()> {
    let path = path.as_ref();
    let actual = canonical_json(value)?;

    if should_update_snapshots() {
        write_snapshot(path, &actual)?;
        return Ok(());
    }

    let expected = fs::read_to_string(path).with_context(|| {
        format!(
            "Snapshot missing at {} (run with {}=1 to create/update)",
            path.display(),
            UPDATE_SNAPSHOTS_ENV
        )
    })?;

    if expected != actual {
        anyhow::bail!(
            "Snapshot mismatch at {} (run with {}=1 to update)",
            path.display(),
            UPDATE_SNAPSHOTS_ENV
        );
    }

    Ok(())
}

fn should_update_snapshots() -> bool {
    matches!(
        std::env::var(UPDATE_SNAPSHOTS_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("TRUE") | Ok("yes") | Ok("YES")
    )
}

fn write_snapshot(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create snapshot directory {}", parent.display()))?;
    }
    fs::write(path, contents)
        .with_context(|| format!("Failed to write snapshot {}", path.display()))
}

/// Serialize `value` as pretty JSON with sorted object keys and a trailing newline.
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String> {
    let value = serde_json::to_value(value).context("Failed to serialize snapshot value")?;
    let value = canonicalize_value(value);
    let mut s = serde_json::to_string_pretty(&value).context("Failed to format snapshot JSON")?;
    s.push('\n');
    Ok(s)
}

fn canonicalize_value(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut out = serde_json::Map::with_capacity(entries.len());
            for (k, v) in entries {
                out.insert(k, canonicalize_value(v));
            }
            Value::Object(out)
        }
        Value::Array(values) => Value::Array(values.into_iter().map(canonicalize_value).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use raypanel_core::{ActivationContext, InteractiveTarget, Transform};

    #[test]
    fn canonical_json_sorts_keys() {
        let json = canonical_json(&serde_json::json!({"b": 1, "a": {"d": 2, "c": 3}})).unwrap();
        assert_eq!(json, "{\n  \"a\": {\n    \"c\": 3,\n    \"d\": 2\n  },\n  \"b\": 1\n}\n");
    }

    #[test]
    fn capture_lists_targets_in_registration_order() {
        let mut scene = SceneGraph::new();
        let first = scene.spawn(scene.root(), "first", Transform::new(Vec3::new(0.0, -0.3, 0.0)));
        let second = scene.spawn(scene.root(), "second", Transform::default());
        let mut registry = InteractiveRegistry::new();
        registry
            .register(InteractiveTarget::new(first, "First", |_: &mut ActivationContext<'_>| {}))
            .unwrap();
        registry
            .register(InteractiveTarget::new(second, "Second", |_: &mut ActivationContext<'_>| {}))
            .unwrap();

        let snapshot = capture_targets(&scene, &registry);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].label, "First");
        assert_eq!(snapshot[0].translation, [0.0, -0.3, 0.0]);
        assert!(!snapshot[1].is_active);
    }
}
