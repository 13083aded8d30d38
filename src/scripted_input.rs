use anyhow::{bail, Context, Result};
use glam::{EulerRot, Mat4, Quat, Vec3};
use raypanel_core::SceneGraph;
use raypanel_ui3d::{FrameReport, SelectEvent, XrRuntime};
use serde::Deserialize;
use std::{fs, path::Path};
use tracing::debug;

#[derive(Debug, Deserialize)]
struct ScriptedInputFile {
    steps: Vec<ScriptedStep>,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct ScriptedStep {
    ticks: u64,
    #[serde(default)]
    controllers: Vec<ScriptedController>,
}

#[derive(Debug, Clone, Copy, Deserialize, Default)]
#[serde(default)]
struct ScriptedController {
    position: [f32; 3],
    /// Degrees, positive turns left.
    yaw: f32,
    /// Degrees, positive looks up.
    pitch: f32,
    select: bool,
}

impl ScriptedController {
    fn pose(&self) -> Mat4 {
        let rotation = Quat::from_euler(
            EulerRot::YXZ,
            self.yaw.to_radians(),
            self.pitch.to_radians(),
            0.0,
        );
        Mat4::from_rotation_translation(rotation, Vec3::from(self.position))
    }
}

/// Headless XR host that replays a JSON script of controller poses and triggers.
///
/// Each step holds for `ticks` frames; select edges are emitted on the first
/// frame of the step that changes a controller's trigger.
pub struct ScriptedRuntime {
    steps: Vec<ScriptedStep>,
    index: usize,
    ticks_in_step: u64,
    pressed: Vec<bool>,
}

impl ScriptedRuntime {
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_json(&contents).with_context(|| format!("invalid script {}", path.display()))
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        let file: ScriptedInputFile = serde_json::from_str(contents)?;
        if file.steps.is_empty() {
            bail!("scripted input file contains no steps");
        }
        if let Some(i) = file.steps.iter().position(|step| step.ticks == 0) {
            bail!("step {i} lasts zero ticks");
        }
        Ok(Self {
            steps: file.steps,
            index: 0,
            ticks_in_step: 0,
            pressed: Vec::new(),
        })
    }

    /// A host with untracked controllers that never finishes.
    pub fn idle() -> Self {
        Self {
            steps: Vec::new(),
            index: 0,
            ticks_in_step: 0,
            pressed: Vec::new(),
        }
    }

    fn current(&self, index: usize) -> Option<&ScriptedController> {
        self.steps.get(self.index)?.controllers.get(index)
    }
}

impl XrRuntime for ScriptedRuntime {
    fn controller_pose(&self, index: usize) -> Option<Mat4> {
        self.current(index).map(ScriptedController::pose)
    }

    fn poll_select_events(&mut self) -> Vec<SelectEvent> {
        let Some(step) = self.steps.get(self.index) else {
            return Vec::new();
        };
        if self.pressed.len() < step.controllers.len() {
            self.pressed.resize(step.controllers.len(), false);
        }

        let mut events = Vec::new();
        for (index, pressed) in self.pressed.iter_mut().enumerate() {
            let wanted = step
                .controllers
                .get(index)
                .map(|controller| controller.select)
                .unwrap_or(false);
            if wanted != *pressed {
                *pressed = wanted;
                events.push(if wanted {
                    SelectEvent::start(index)
                } else {
                    SelectEvent::end(index)
                });
            }
        }
        events
    }

    fn submit_frame(&mut self, _scene: &SceneGraph, report: &FrameReport) {
        let Some(step) = self.steps.get(self.index) else {
            return;
        };
        self.ticks_in_step += 1;
        if self.ticks_in_step >= step.ticks {
            debug!(step = self.index, tick = report.tick.0, "scripted step finished");
            self.index += 1;
            self.ticks_in_step = 0;
        }
    }

    fn is_finished(&self) -> bool {
        !self.steps.is_empty() && self.index >= self.steps.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raypanel_core::SimTick;
    use raypanel_ui3d::{controller_ray, SelectKind};

    const SCRIPT: &str = r#"{
        "steps": [
            { "ticks": 2, "controllers": [{ "position": [0.0, 1.25, 0.0] }] },
            { "ticks": 1, "controllers": [{ "position": [0.0, 1.25, 0.0], "select": true }] },
            { "ticks": 1, "controllers": [{ "position": [0.0, 1.25, 0.0], "yaw": 90.0 }] }
        ]
    }"#;

    fn frame(runtime: &mut ScriptedRuntime, tick: u64) -> Vec<SelectEvent> {
        let events = runtime.poll_select_events();
        runtime.submit_frame(&SceneGraph::new(), &FrameReport::new(SimTick(tick)));
        events
    }

    #[test]
    fn plays_steps_and_emits_edges() {
        let mut runtime = ScriptedRuntime::from_json(SCRIPT).unwrap();
        assert!(frame(&mut runtime, 0).is_empty());
        assert!(frame(&mut runtime, 1).is_empty());

        let pressed = frame(&mut runtime, 2);
        assert_eq!(pressed, vec![SelectEvent::start(0)]);

        let yaw = runtime.controller_pose(0).unwrap();
        let released = frame(&mut runtime, 3);
        assert_eq!(released.len(), 1);
        assert_eq!(released[0].kind, SelectKind::End);

        let ray = controller_ray(&yaw);
        assert!((ray.direction - Vec3::NEG_X).length() < 1e-5);
        assert!(runtime.is_finished());
    }

    #[test]
    fn pitch_tilts_ray_up() {
        let controller = ScriptedController {
            pitch: 90.0,
            ..Default::default()
        };
        let ray = controller_ray(&controller.pose());
        assert!((ray.direction - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn rejects_empty_and_zero_length_steps() {
        assert!(ScriptedRuntime::from_json(r#"{ "steps": [] }"#).is_err());
        assert!(ScriptedRuntime::from_json(r#"{ "steps": [{ "ticks": 0 }] }"#).is_err());
    }

    #[test]
    fn idle_runtime_never_finishes() {
        let mut runtime = ScriptedRuntime::idle();
        assert!(frame(&mut runtime, 0).is_empty());
        assert!(runtime.controller_pose(0).is_none());
        assert!(!runtime.is_finished());
    }
}
