//! Controller interaction state machine and activation dispatch.
//!
//! Nothing here is persisted between frames except the target's own `clicked`
//! latch: each tick the outcome is derived from whether the controller hits a
//! target, whether its trigger is held, and that latch.
//!
//! The latch is only cleared while the target is still being hit. A controller
//! that leaves a target with the trigger held and releases over empty space
//! leaves the latch set until the next hit-and-release.
//!
//! With several controllers, a released trigger over a target only re-arms it
//! when no controller is holding its trigger on that target in the same tick.

use glam::Mat4;
use raypanel_core::{InteractiveRegistry, LogSink, NodeId, SceneGraph, SimTick};
use tracing::debug;

/// Trigger and pose state for one pointing device
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerState {
    /// Stable slot assigned at session start
    pub index: usize,
    /// Set by select start/end events
    pub select_pressed: bool,
    /// Aim pose in world space
    pub pose: Mat4,
    /// Grip pose in world space
    pub grip_pose: Mat4,
    /// Scene node following the aim pose
    pub node: NodeId,
    /// Child of `node` drawn as the pointing ray
    pub ray_node: NodeId,
    /// Scene node following the grip pose
    pub grip_node: NodeId,
}

impl ControllerState {
    /// Controller at the origin with the trigger released
    pub fn new(index: usize, node: NodeId, ray_node: NodeId, grip_node: NodeId) -> Self {
        Self {
            index,
            select_pressed: false,
            pose: Mat4::IDENTITY,
            grip_pose: Mat4::IDENTITY,
            node,
            ray_node,
            grip_node,
        }
    }
}

/// Per-frame phase of a controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    /// Nothing interactive under the ray
    NoHit,
    /// Hitting a target, trigger released
    HitIdle,
    /// Hitting a target, trigger held
    HitPressed,
}

impl PointerPhase {
    /// Phase from this frame's hit and trigger state
    pub fn of(hit: bool, pressed: bool) -> Self {
        match (hit, pressed) {
            (false, _) => PointerPhase::NoHit,
            (true, false) => PointerPhase::HitIdle,
            (true, true) => PointerPhase::HitPressed,
        }
    }
}

/// What a controller did to its target this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerOutcome {
    /// No target; latches untouched
    Nothing,
    /// Action fired and the latch was set
    Activated,
    /// Trigger still held on a latched target; suppressed
    Debounced,
    /// Trigger released over the target; latch cleared
    Rearmed,
    /// Trigger released over a target another controller is pressing on;
    /// latch kept
    Held,
}

/// Transition for a phase given the target's current latch.
///
/// `held` is true when some controller has its trigger down on the target
/// this tick.
pub fn next_outcome(phase: PointerPhase, clicked: bool, held: bool) -> PointerOutcome {
    match phase {
        PointerPhase::NoHit => PointerOutcome::Nothing,
        PointerPhase::HitPressed if !clicked => PointerOutcome::Activated,
        PointerPhase::HitPressed => PointerOutcome::Debounced,
        PointerPhase::HitIdle if held => PointerOutcome::Held,
        PointerPhase::HitIdle => PointerOutcome::Rearmed,
    }
}

/// Apply one controller's frame to its resolved target.
///
/// `target` is the logical root from root resolution, or `None` when nothing
/// interactive was hit. `held` is true when any controller is pressing on
/// that target this tick.
pub fn dispatch(
    pressed: bool,
    target: Option<NodeId>,
    held: bool,
    registry: &mut InteractiveRegistry,
    scene: &mut SceneGraph,
    log: &mut dyn LogSink,
    tick: SimTick,
) -> PointerOutcome {
    let Some(target) = target.and_then(|node| registry.get_mut(node)) else {
        return PointerOutcome::Nothing;
    };

    let outcome = next_outcome(PointerPhase::of(true, pressed), target.state.clicked, held);
    match outcome {
        PointerOutcome::Activated => {
            debug!(target = target.label(), %tick, "activating target");
            target.activate(scene, log, tick);
        }
        PointerOutcome::Rearmed => target.state.clicked = false,
        PointerOutcome::Debounced | PointerOutcome::Held | PointerOutcome::Nothing => {}
    }
    outcome
}

/// Reset hover emphasis on every target
pub fn clear_hover(registry: &mut InteractiveRegistry) {
    for target in registry.iter_mut() {
        target.state.clear_emphasis();
    }
}

/// Emphasize the target under a controller ray
pub fn apply_hover(registry: &mut InteractiveRegistry, node: NodeId, emissive: [f32; 3]) {
    if let Some(target) = registry.get_mut(node) {
        target.state.emphasize(emissive);
    }
}
