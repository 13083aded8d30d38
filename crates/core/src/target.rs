//! Interactive targets and their activation callbacks.

use crate::scene::{NodeId, SceneGraph, Transform};
use crate::SimTick;
use std::fmt;

/// RGBA color.
pub type Color = [f32; 4];

/// Material state of a target that supports color swaps and hover emphasis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Appearance {
    /// Color while inactive.
    pub base_color: Color,
    /// Color while `is_active` is set.
    pub active_color: Color,
    /// Color currently shown.
    pub color: Color,
    /// Emissive term, used for hover emphasis.
    pub emissive: [f32; 3],
}

impl Appearance {
    /// Appearance starting in the inactive color with no emission.
    pub fn new(base_color: Color, active_color: Color) -> Self {
        Self {
            base_color,
            active_color,
            color: base_color,
            emissive: [0.0; 3],
        }
    }

    /// Show the color matching the toggle state.
    pub fn show_active(&mut self, active: bool) {
        self.color = if active {
            self.active_color
        } else {
            self.base_color
        };
    }
}

/// Mutable per-target state visible to activation callbacks.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetState {
    /// Display label.
    pub label: String,
    /// Domain-specific toggle.
    pub is_active: bool,
    /// Set on activation; cleared when a controller releases while still hitting the target.
    pub clicked: bool,
    /// Optional material; targets without one get no hover emphasis.
    pub appearance: Option<Appearance>,
}

impl TargetState {
    /// Fresh state with the given label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            is_active: false,
            clicked: false,
            appearance: None,
        }
    }

    /// Reset hover emphasis to neutral.
    pub fn clear_emphasis(&mut self) {
        if let Some(appearance) = self.appearance.as_mut() {
            appearance.emissive = [0.0; 3];
        }
    }

    /// Apply hover emphasis if the target has a material.
    pub fn emphasize(&mut self, emissive: [f32; 3]) {
        if let Some(appearance) = self.appearance.as_mut() {
            appearance.emissive = emissive;
        }
    }

    /// Whether hover emphasis is currently applied.
    pub fn is_emphasized(&self) -> bool {
        self.appearance
            .map(|appearance| appearance.emissive != [0.0; 3])
            .unwrap_or(false)
    }
}

/// Per-frame visual state derived from hover and latch status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualState {
    /// Not pointed at.
    Idle,
    /// Pointed at by at least one controller.
    Hovered,
    /// Pointed at while the latch from an activation is held.
    Pressed,
}

impl VisualState {
    /// Derive the state from this frame's hover flag and the target latch.
    pub fn derive(hovered: bool, clicked: bool) -> Self {
        match (hovered, clicked) {
            (false, _) => VisualState::Idle,
            (true, false) => VisualState::Hovered,
            (true, true) => VisualState::Pressed,
        }
    }
}

/// Destination for feedback messages produced by activations.
pub trait LogSink {
    /// Append a message.
    fn append(&mut self, message: String);
}

impl LogSink for Vec<String> {
    fn append(&mut self, message: String) {
        self.push(message);
    }
}

/// Everything an activation may read or mutate.
pub struct ActivationContext<'a> {
    /// Logical root node of the activated target.
    pub node: NodeId,
    /// The target's own state.
    pub state: &'a mut TargetState,
    /// Scene graph, for repositioning the target or its parts.
    pub scene: &'a mut SceneGraph,
    /// Feedback log.
    pub log: &'a mut dyn LogSink,
    /// Tick the activation happened on.
    pub tick: SimTick,
}

impl ActivationContext<'_> {
    /// Flip `is_active`, update the shown color, and return the new value.
    pub fn toggle_active(&mut self) -> bool {
        self.state.is_active = !self.state.is_active;
        let active = self.state.is_active;
        if let Some(appearance) = self.state.appearance.as_mut() {
            appearance.show_active(active);
        }
        active
    }

    /// Append a message to the feedback log.
    pub fn log(&mut self, message: impl Into<String>) {
        self.log.append(message.into());
    }

    /// Local transform of the target node.
    pub fn transform(&self) -> Transform {
        self.scene.transform(self.node).unwrap_or_default()
    }

    /// Replace the local transform of the target node.
    pub fn set_transform(&mut self, transform: Transform) {
        self.scene.set_transform(self.node, transform);
    }
}

/// Behavior run when a target is activated.
pub trait TargetAction {
    /// Run the action. Called exactly once per press episode.
    fn activate(&mut self, ctx: &mut ActivationContext<'_>);
}

impl<F> TargetAction for F
where
    F: FnMut(&mut ActivationContext<'_>),
{
    fn activate(&mut self, ctx: &mut ActivationContext<'_>) {
        self(ctx)
    }
}

/// A scene node registered for pointer interaction.
pub struct InteractiveTarget {
    node: NodeId,
    /// Mutable state, shared with the action on activation.
    pub state: TargetState,
    action: Box<dyn TargetAction>,
}

impl fmt::Debug for InteractiveTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractiveTarget")
            .field("node", &self.node)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl InteractiveTarget {
    /// Tag `node` as interactive with the given label and action.
    pub fn new(node: NodeId, label: impl Into<String>, action: impl TargetAction + 'static) -> Self {
        Self {
            node,
            state: TargetState::new(label),
            action: Box::new(action),
        }
    }

    /// Builder: attach a material.
    pub fn with_appearance(mut self, appearance: Appearance) -> Self {
        self.state.appearance = Some(appearance);
        self
    }

    /// Node identity of this target.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Display label.
    pub fn label(&self) -> &str {
        &self.state.label
    }

    /// Run the action against this target's state, then latch `clicked`.
    pub fn activate(&mut self, scene: &mut SceneGraph, log: &mut dyn LogSink, tick: SimTick) {
        let mut ctx = ActivationContext {
            node: self.node,
            state: &mut self.state,
            scene,
            log,
            tick,
        };
        self.action.activate(&mut ctx);
        self.state.clicked = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn visual_state_derivation() {
        assert_eq!(VisualState::derive(false, true), VisualState::Idle);
        assert_eq!(VisualState::derive(true, false), VisualState::Hovered);
        assert_eq!(VisualState::derive(true, true), VisualState::Pressed);
    }

    #[test]
    fn activation_runs_action_then_latches() {
        let mut scene = SceneGraph::new();
        let node = scene.spawn(scene.root(), "button", Transform::default());
        let mut target = InteractiveTarget::new(node, "Toggle", |ctx: &mut ActivationContext<'_>| {
            assert!(!ctx.state.clicked, "latch is set after the action runs");
            ctx.toggle_active();
            ctx.log("toggled");
        })
        .with_appearance(Appearance::new([0.0, 1.0, 0.0, 1.0], [1.0, 0.0, 0.0, 1.0]));

        let mut log: Vec<String> = Vec::new();
        target.activate(&mut scene, &mut log, SimTick::ZERO);

        assert!(target.state.clicked);
        assert!(target.state.is_active);
        assert_eq!(target.state.appearance.unwrap().color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(log, vec!["toggled".to_string()]);
    }

    #[test]
    fn action_can_move_its_node() {
        let mut scene = SceneGraph::new();
        let node = scene.spawn(scene.root(), "model", Transform::new(Vec3::new(0.0, -0.4, 0.1)));
        let mut target = InteractiveTarget::new(node, "Model", |ctx: &mut ActivationContext<'_>| {
            let mut transform = ctx.transform();
            transform.translation.z = -transform.translation.z;
            ctx.set_transform(transform);
        });

        let mut log: Vec<String> = Vec::new();
        target.activate(&mut scene, &mut log, SimTick::ZERO);
        assert_eq!(scene.transform(node).unwrap().translation.z, -0.1);
    }

    #[test]
    fn emphasis_requires_appearance() {
        let mut bare = TargetState::new("group");
        bare.emphasize([0.2; 3]);
        assert!(!bare.is_emphasized());

        let mut lit = TargetState::new("button");
        lit.appearance = Some(Appearance::new([1.0; 4], [0.5; 4]));
        lit.emphasize([0.2; 3]);
        assert!(lit.is_emphasized());
        lit.clear_emphasis();
        assert!(!lit.is_emphasized());
    }
}
