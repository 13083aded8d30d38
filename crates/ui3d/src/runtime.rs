//! Boundary to the XR host: controller poses, select events and frame submission.

use crate::interaction::PointerOutcome;
use anyhow::Result;
use glam::Mat4;
use raypanel_core::{NodeId, SceneGraph, SimTick, VisualState};

/// Edge of the select trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectKind {
    /// Trigger pressed
    Start,
    /// Trigger released
    End,
}

/// A select press or release on one controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectEvent {
    /// Controller slot
    pub controller: usize,
    /// Press or release
    pub kind: SelectKind,
}

impl SelectEvent {
    /// Press on `controller`
    pub fn start(controller: usize) -> Self {
        Self {
            controller,
            kind: SelectKind::Start,
        }
    }

    /// Release on `controller`
    pub fn end(controller: usize) -> Self {
        Self {
            controller,
            kind: SelectKind::End,
        }
    }
}

/// What one controller saw and did during a tick
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerFrame {
    /// Controller slot
    pub index: usize,
    /// Node whose shape the ray struck
    pub hit: Option<NodeId>,
    /// Registered root the hit resolved to
    pub target: Option<NodeId>,
    /// Length of the visual ray segment
    pub ray_length: f32,
    /// What the pointer did to its target
    pub outcome: PointerOutcome,
}

/// A fired target action
#[derive(Debug, Clone, PartialEq)]
pub struct Activation {
    /// Controller whose press fired the action
    pub controller: usize,
    /// Activated target
    pub target: NodeId,
    /// Target label at activation time
    pub label: String,
    /// Tick the action ran on
    pub tick: SimTick,
}

/// Summary of a tick handed to the host with the scene
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameReport {
    /// Tick this report describes
    pub tick: SimTick,
    /// One entry per controller slot, in slot order
    pub controllers: Vec<ControllerFrame>,
    /// Actions fired this tick, in the order they ran
    pub activations: Vec<Activation>,
    /// Derived visual state of every registered target, in registration order
    pub visual_states: Vec<(NodeId, VisualState)>,
}

impl FrameReport {
    /// Empty report for `tick`
    pub fn new(tick: SimTick) -> Self {
        Self {
            tick,
            controllers: Vec::new(),
            activations: Vec::new(),
            visual_states: Vec::new(),
        }
    }

    /// Visual state of `node` this tick, if it is registered
    pub fn visual_state(&self, node: NodeId) -> Option<VisualState> {
        self.visual_states
            .iter()
            .find(|(id, _)| *id == node)
            .map(|&(_, state)| state)
    }

    /// Frame data for controller `index`
    pub fn controller(&self, index: usize) -> Option<&ControllerFrame> {
        self.controllers.iter().find(|frame| frame.index == index)
    }
}

/// Host that supplies input and presents frames.
///
/// Poses are world transforms. A controller the host is not tracking returns
/// `None` and keeps its previous pose.
pub trait XrRuntime {
    /// Aim pose of controller `index`
    fn controller_pose(&self, index: usize) -> Option<Mat4>;

    /// Grip pose of controller `index`; defaults to the aim pose
    fn grip_pose(&self, index: usize) -> Option<Mat4> {
        self.controller_pose(index)
    }

    /// Select edges since the last call, in the order they happened
    fn poll_select_events(&mut self) -> Vec<SelectEvent>;

    /// Enter the immersive session
    fn begin_session(&mut self) -> Result<()> {
        Ok(())
    }

    /// Present the finished tick
    fn submit_frame(&mut self, scene: &SceneGraph, report: &FrameReport);

    /// Whether the host has no more frames to produce
    fn is_finished(&self) -> bool {
        false
    }
}
