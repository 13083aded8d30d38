//! Interactive registry.
//!
//! The live set of targets eligible for pointer interaction, indexed by the
//! node identity of each target's logical root. Iteration follows registration
//! order so ray queries and reports are reproducible across runs.

use crate::scene::NodeId;
use crate::target::InteractiveTarget;
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

/// Errors returned by [`InteractiveRegistry::register`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The node already has a target registered for it.
    #[error("{0} is already registered as an interactive target")]
    AlreadyRegistered(NodeId),
}

/// Registration-ordered set of interactive targets.
#[derive(Debug, Default)]
pub struct InteractiveRegistry {
    targets: Vec<InteractiveTarget>,
    index: HashMap<NodeId, usize>,
    nodes: Vec<NodeId>,
}

impl InteractiveRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a target to the candidate set.
    pub fn register(&mut self, target: InteractiveTarget) -> Result<NodeId, RegistryError> {
        let node = target.node();
        if self.index.contains_key(&node) {
            return Err(RegistryError::AlreadyRegistered(node));
        }
        debug!(%node, label = target.label(), "registered interactive target");
        self.index.insert(node, self.targets.len());
        self.targets.push(target);
        self.nodes.push(node);
        Ok(node)
    }

    /// Candidate nodes for ray queries, in registration order.
    pub fn all(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Whether `node` carries activation metadata.
    pub fn contains(&self, node: NodeId) -> bool {
        self.index.contains_key(&node)
    }

    /// Look up the target registered for `node`.
    pub fn get(&self, node: NodeId) -> Option<&InteractiveTarget> {
        self.index.get(&node).map(|&slot| &self.targets[slot])
    }

    /// Mutable lookup of the target registered for `node`.
    pub fn get_mut(&mut self, node: NodeId) -> Option<&mut InteractiveTarget> {
        match self.index.get(&node) {
            Some(&slot) => self.targets.get_mut(slot),
            None => None,
        }
    }

    /// First target whose label matches.
    pub fn find_by_label(&self, label: &str) -> Option<&InteractiveTarget> {
        self.targets.iter().find(|target| target.label() == label)
    }

    /// Targets in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &InteractiveTarget> {
        self.targets.iter()
    }

    /// Mutable targets in registration order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut InteractiveTarget> {
        self.targets.iter_mut()
    }

    /// Number of registered targets.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether no targets are registered.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
