//! Root resolution: map a raw geometric hit to its logical interactive target.

use crate::registry::InteractiveRegistry;
use crate::scene::{NodeId, SceneGraph};

/// Walk from `hit` up through its parents and return the first node that is
/// registered as an interactive target.
///
/// Returns `None` when no node on the chain is registered, so stray meshes are
/// never treated as interactive.
pub fn resolve_root(
    scene: &SceneGraph,
    registry: &InteractiveRegistry,
    hit: NodeId,
) -> Option<NodeId> {
    scene.ancestors(hit).find(|&node| registry.contains(node))
}
