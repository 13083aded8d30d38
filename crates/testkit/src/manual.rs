//! Hand-driven XR host for tests.
//!
//! Tests place controllers, press and release triggers between ticks, and
//! inspect every frame the session submitted.

use anyhow::{bail, Result};
use glam::{Mat4, Quat, Vec3};
use raypanel_core::{NodeId, SceneGraph};
use raypanel_ui3d::{Activation, FrameReport, SelectEvent, XrRuntime};

/// Fake host whose poses and triggers are set directly.
#[derive(Debug, Default)]
pub struct ManualRuntime {
    poses: Vec<Option<Mat4>>,
    grips: Vec<Option<Mat4>>,
    pressed: Vec<bool>,
    events: Vec<SelectEvent>,
    frames: Vec<FrameReport>,
    session_started: bool,
    refuse_session: bool,
}

impl ManualRuntime {
    /// Host with `controllers` untracked controllers.
    pub fn new(controllers: usize) -> Self {
        Self {
            poses: vec![None; controllers],
            grips: vec![None; controllers],
            pressed: vec![false; controllers],
            ..Default::default()
        }
    }

    /// Host that fails to enter the immersive session.
    pub fn refusing_session(controllers: usize) -> Self {
        Self {
            refuse_session: true,
            ..Self::new(controllers)
        }
    }

    /// Set the aim pose of controller `index`.
    pub fn set_pose(&mut self, index: usize, pose: Mat4) {
        if let Some(slot) = self.poses.get_mut(index) {
            *slot = Some(pose);
        }
    }

    /// Set the grip pose of controller `index`.
    pub fn set_grip(&mut self, index: usize, pose: Mat4) {
        if let Some(slot) = self.grips.get_mut(index) {
            *slot = Some(pose);
        }
    }

    /// Place controller `index` at `origin`, pointing at `target`.
    pub fn aim_at(&mut self, index: usize, origin: Vec3, target: Vec3) {
        let direction = (target - origin).normalize_or_zero();
        let rotation = Quat::from_rotation_arc(Vec3::NEG_Z, direction);
        self.set_pose(index, Mat4::from_rotation_translation(rotation, origin));
    }

    /// Point controller `index` straight up, away from everything in front of it.
    pub fn aim_away(&mut self, index: usize) {
        self.aim_at(index, Vec3::ZERO, Vec3::Y);
    }

    /// Press the trigger; a no-op while already held.
    pub fn press(&mut self, index: usize) {
        if let Some(pressed) = self.pressed.get_mut(index) {
            if !*pressed {
                *pressed = true;
                self.events.push(SelectEvent::start(index));
            }
        }
    }

    /// Release the trigger; a no-op while already released.
    pub fn release(&mut self, index: usize) {
        if let Some(pressed) = self.pressed.get_mut(index) {
            if *pressed {
                *pressed = false;
                self.events.push(SelectEvent::end(index));
            }
        }
    }

    /// Whether `begin_session` was called.
    pub fn session_started(&self) -> bool {
        self.session_started
    }

    /// Every submitted frame, oldest first.
    pub fn frames(&self) -> &[FrameReport] {
        &self.frames
    }

    /// Most recent submitted frame.
    pub fn last_frame(&self) -> Option<&FrameReport> {
        self.frames.last()
    }

    /// All activations across submitted frames.
    pub fn activations(&self) -> impl Iterator<Item = &Activation> {
        self.frames.iter().flat_map(|frame| frame.activations.iter())
    }

    /// Number of activations of `target` across submitted frames.
    pub fn activation_count(&self, target: NodeId) -> usize {
        self.activations()
            .filter(|activation| activation.target == target)
            .count()
    }
}

impl XrRuntime for ManualRuntime {
    fn controller_pose(&self, index: usize) -> Option<Mat4> {
        self.poses.get(index).copied().flatten()
    }

    fn grip_pose(&self, index: usize) -> Option<Mat4> {
        self.grips
            .get(index)
            .copied()
            .flatten()
            .or_else(|| self.controller_pose(index))
    }

    fn poll_select_events(&mut self) -> Vec<SelectEvent> {
        std::mem::take(&mut self.events)
    }

    fn begin_session(&mut self) -> Result<()> {
        if self.refuse_session {
            bail!("immersive session not supported");
        }
        self.session_started = true;
        Ok(())
    }

    fn submit_frame(&mut self, _scene: &SceneGraph, report: &FrameReport) {
        self.frames.push(report.clone());
    }
}
