#![warn(missing_docs)]
//! Core primitives shared across the workspace: the scene graph arena,
//! interactive targets and the registry that indexes them.

pub mod registry;
pub mod resolve;
pub mod scene;
pub mod target;

use serde::{Deserialize, Serialize};
use std::fmt;

// Re-export commonly used types
pub use registry::{InteractiveRegistry, RegistryError};
pub use resolve::resolve_root;
pub use scene::{Node, NodeId, SceneGraph, Shape, Transform};
pub use target::{
    ActivationContext, Appearance, Color, InteractiveTarget, LogSink, TargetAction, TargetState,
    VisualState,
};

/// Frame counter for the interaction loop (one tick per display refresh).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SimTick(pub u64);

impl SimTick {
    /// First tick of every session.
    pub const ZERO: Self = Self(0);

    /// Advance by `delta` ticks.
    pub fn advance(self, delta: u64) -> Self {
        Self(self.0 + delta)
    }

    /// Number of ticks elapsed since `earlier` (saturating).
    pub fn since(self, earlier: SimTick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl fmt::Display for SimTick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tick {}", self.0)
    }
}
