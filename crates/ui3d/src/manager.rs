//! Interaction session - owns the scene and drives the per-tick pointer pipeline

use crate::interaction::{
    apply_hover, cast_ray, clear_hover, controller_ray, dispatch, ray_length, ControllerState,
    PointerOutcome, DEFAULT_RAY_LENGTH,
};
use crate::log_panel::{EventLog, DEFAULT_MAX_LOGS};
use crate::render::FontAtlas;
use crate::runtime::{Activation, ControllerFrame, FrameReport, SelectKind, XrRuntime};
use anyhow::{Context, Result};
use glam::Vec3;
use raypanel_assets::{
    load_model_from_file, spawn_load, AssetError, LoadHandle, LoadStatus, ModelDefinition,
};
use raypanel_core::{
    resolve_root, InteractiveRegistry, InteractiveTarget, NodeId, RegistryError, SceneGraph,
    SimTick, Transform, VisualState,
};
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Called once when a requested model finishes loading
pub type OnModelReady = Box<dyn FnOnce(&mut InteractionSession, ModelDefinition) -> Result<()>>;

/// Tunables for a session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    /// Number of controller slots
    pub controllers: usize,
    /// Event log capacity
    pub max_logs: usize,
    /// Ray length shown when nothing is hit
    pub default_ray_length: f32,
    /// Emissive applied to hovered targets
    pub hover_emissive: [f32; 3],
    /// Ticks a load may stay pending before it is abandoned; 0 waits forever
    pub load_timeout_ticks: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            controllers: 2,
            max_logs: DEFAULT_MAX_LOGS,
            default_ray_length: DEFAULT_RAY_LENGTH,
            hover_emissive: [0.2, 0.2, 0.2], // 0x333333
            load_timeout_ticks: 0,
        }
    }
}

struct PendingFont {
    handle: LoadHandle<FontAtlas>,
    font_size: f32,
    requested: SimTick,
}

struct PendingModel {
    handle: LoadHandle<ModelDefinition>,
    requested: SimTick,
    on_ready: OnModelReady,
}

/// Interaction state for one immersive session.
///
/// Everything a tick touches lives here: the scene, the registry of
/// interactive targets, controller slots, the event log and loads still in
/// flight. Loads resolve only at the start of a tick.
pub struct InteractionSession {
    scene: SceneGraph,
    registry: InteractiveRegistry,
    controllers: Vec<ControllerState>,
    log: EventLog,
    settings: SessionSettings,
    pending_font: Option<PendingFont>,
    pending_models: Vec<PendingModel>,
    tick: SimTick,
}

impl fmt::Debug for InteractionSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractionSession")
            .field("tick", &self.tick)
            .field("targets", &self.registry.len())
            .field("controllers", &self.controllers.len())
            .field("pending_loads", &self.pending_loads())
            .finish()
    }
}

impl InteractionSession {
    /// Create a session with one node set (aim, ray, grip) per controller slot
    pub fn new(settings: SessionSettings) -> Self {
        let mut scene = SceneGraph::new();
        let root = scene.root();

        let controllers = (0..settings.controllers)
            .map(|index| {
                let node = scene.spawn(root, format!("controller{index}"), Transform::default());
                let ray = Transform::default().with_scale(Vec3::new(
                    1.0,
                    1.0,
                    settings.default_ray_length,
                ));
                let ray_node = scene.spawn(node, format!("controller{index}_ray"), ray);
                let grip_node =
                    scene.spawn(root, format!("controller{index}_grip"), Transform::default());
                ControllerState::new(index, node, ray_node, grip_node)
            })
            .collect();

        Self {
            scene,
            registry: InteractiveRegistry::new(),
            controllers,
            log: EventLog::new(settings.max_logs),
            settings,
            pending_font: None,
            pending_models: Vec::new(),
            tick: SimTick::ZERO,
        }
    }

    /// Enter the host's immersive session
    pub fn start(&mut self, runtime: &mut dyn XrRuntime) -> Result<()> {
        runtime
            .begin_session()
            .context("failed to begin XR session")?;
        info!(
            controllers = self.controllers.len(),
            targets = self.registry.len(),
            "interaction session started"
        );
        Ok(())
    }

    /// Add a target; it is hittable from the next ray cast on
    pub fn register(&mut self, target: InteractiveTarget) -> Result<NodeId, RegistryError> {
        self.registry.register(target)
    }

    /// Place the event log panel under the scene root
    pub fn spawn_log_panel(&mut self, position: Vec3) -> NodeId {
        let root = self.scene.root();
        self.log.spawn(&mut self.scene, root, position)
    }

    /// Start loading a font in the background. Replaces any pending font load.
    pub fn request_font(&mut self, path: impl Into<PathBuf>, font_size: f32) {
        let path = path.into();
        debug!(path = %path.display(), "requesting font");
        let handle = spawn_load(path, move |path| FontAtlas::load(path, font_size));
        self.pending_font = Some(PendingFont {
            handle,
            font_size,
            requested: self.tick,
        });
    }

    /// Hand the log panel a font directly
    pub fn set_font(&mut self, font: FontAtlas) {
        self.pending_font = None;
        self.log.set_font(font);
    }

    /// Start loading a model; `on_ready` runs at the start of the tick that sees it
    pub fn request_model(&mut self, path: impl Into<PathBuf>, on_ready: OnModelReady) {
        let path = path.into();
        debug!(path = %path.display(), "requesting model");
        let handle = spawn_load(path, load_model_from_file);
        self.watch_model(handle, on_ready);
    }

    /// Track an externally driven model load
    pub fn watch_model(&mut self, handle: LoadHandle<ModelDefinition>, on_ready: OnModelReady) {
        self.pending_models.push(PendingModel {
            handle,
            requested: self.tick,
            on_ready,
        });
    }

    /// Loads not yet resolved
    pub fn pending_loads(&self) -> usize {
        self.pending_models.len() + usize::from(self.pending_font.is_some())
    }

    /// Run one tick against `runtime` and return what happened.
    pub fn tick(&mut self, runtime: &mut dyn XrRuntime) -> FrameReport {
        let tick = self.tick;
        self.poll_loads();
        self.apply_input(runtime);

        clear_hover(&mut self.registry);

        let mut report = FrameReport::new(tick);
        let mut hovered: Vec<NodeId> = Vec::new();

        // Every ray is cast against the scene as it stood at the start of the tick.
        let mut frames = Vec::with_capacity(self.controllers.len());
        for slot in 0..self.controllers.len() {
            let controller = &self.controllers[slot];
            let ray_node = controller.ray_node;
            let ray = controller_ray(&controller.pose);

            let hit = cast_ray(&ray, &self.scene, &self.registry);
            let target = hit.and_then(|hit| resolve_root(&self.scene, &self.registry, hit.node));
            let length = ray_length(hit.as_ref(), self.settings.default_ray_length);
            self.set_ray_length(ray_node, length);

            if let Some(target) = target {
                apply_hover(&mut self.registry, target, self.settings.hover_emissive);
                if !hovered.contains(&target) {
                    hovered.push(target);
                }
            }
            frames.push((slot, hit.map(|hit| hit.node), target, length));
        }

        let held: Vec<NodeId> = frames
            .iter()
            .filter(|&&(slot, _, _, _)| self.controllers[slot].select_pressed)
            .filter_map(|&(_, _, target, _)| target)
            .collect();

        for (slot, hit, target, length) in frames {
            let index = self.controllers[slot].index;
            let pressed = self.controllers[slot].select_pressed;
            let outcome = dispatch(
                pressed,
                target,
                target.map_or(false, |node| held.contains(&node)),
                &mut self.registry,
                &mut self.scene,
                &mut self.log,
                tick,
            );

            if let (PointerOutcome::Activated, Some(node)) = (outcome, target) {
                let label = self
                    .registry
                    .get(node)
                    .map(|target| target.label().to_string())
                    .unwrap_or_default();
                info!(controller = index, %node, %label, %tick, "target activated");
                report.activations.push(Activation {
                    controller: index,
                    target: node,
                    label,
                    tick,
                });
            }

            report.controllers.push(ControllerFrame {
                index,
                hit,
                target,
                ray_length: length,
                outcome,
            });
        }

        report.visual_states = self
            .registry
            .iter()
            .map(|target| {
                let node = target.node();
                (
                    node,
                    VisualState::derive(hovered.contains(&node), target.state.clicked),
                )
            })
            .collect();

        runtime.submit_frame(&self.scene, &report);
        self.tick = tick.advance(1);
        report
    }

    fn apply_input(&mut self, runtime: &mut dyn XrRuntime) {
        for event in runtime.poll_select_events() {
            match self.controllers.get_mut(event.controller) {
                Some(controller) => {
                    controller.select_pressed = event.kind == SelectKind::Start;
                }
                None => debug!(controller = event.controller, "select event for unknown controller"),
            }
        }

        for controller in &mut self.controllers {
            if let Some(pose) = runtime.controller_pose(controller.index) {
                controller.pose = pose;
                self.scene
                    .set_transform(controller.node, Transform::from_matrix(pose));
            }
            if let Some(grip) = runtime.grip_pose(controller.index) {
                controller.grip_pose = grip;
                self.scene
                    .set_transform(controller.grip_node, Transform::from_matrix(grip));
            }
        }
    }

    fn set_ray_length(&mut self, ray_node: NodeId, length: f32) {
        if let Some(mut transform) = self.scene.transform(ray_node) {
            transform.scale.z = length;
            self.scene.set_transform(ray_node, transform);
        }
    }

    fn poll_loads(&mut self) {
        self.poll_font();

        let pending = std::mem::take(&mut self.pending_models);
        for load in pending {
            match self.check(&load.handle, load.requested) {
                LoadStatus::Pending => self.pending_models.push(load),
                LoadStatus::Ready(model) => {
                    info!(model = %model.name, path = %load.handle.path().display(), "model loaded");
                    if let Err(err) = (load.on_ready)(self, model) {
                        warn!(error = %format!("{err:#}"), "failed to place loaded model");
                        self.log.append(format!("Model setup failed: {err}"));
                    }
                }
                LoadStatus::Failed(err) => {
                    warn!(%err, path = %load.handle.path().display(), "model load failed");
                    self.log.append(format!("Model load failed: {err}"));
                }
            }
        }
    }

    fn poll_font(&mut self) {
        let Some(pending) = self.pending_font.take() else {
            return;
        };
        match self.check(&pending.handle, pending.requested) {
            LoadStatus::Pending => self.pending_font = Some(pending),
            LoadStatus::Ready(font) => {
                info!(glyphs = font.glyph_count(), "font ready");
                self.log.set_font(font);
            }
            LoadStatus::Failed(err) => {
                warn!(%err, "font load failed, using builtin glyphs");
                self.log.set_font(FontAtlas::builtin(pending.font_size));
                self.log.append(format!("Font load failed: {err}"));
            }
        }
    }

    /// Poll `handle`, turning an overdue pending load into a timeout.
    fn check<T>(&self, handle: &LoadHandle<T>, requested: SimTick) -> LoadStatus<T> {
        match handle.poll() {
            LoadStatus::Pending => {
                let waited = self.tick.since(requested);
                let limit = self.settings.load_timeout_ticks;
                if limit > 0 && waited >= limit {
                    LoadStatus::Failed(AssetError::TimedOut {
                        path: handle.path().display().to_string(),
                        ticks: waited,
                    })
                } else {
                    LoadStatus::Pending
                }
            }
            status => status,
        }
    }

    /// Tick the next call to [`tick`](Self::tick) will run
    pub fn current_tick(&self) -> SimTick {
        self.tick
    }

    /// Scene graph owned by the session
    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    /// Mutable scene, for building content before or between ticks
    pub fn scene_mut(&mut self) -> &mut SceneGraph {
        &mut self.scene
    }

    /// Registered interactive targets
    pub fn registry(&self) -> &InteractiveRegistry {
        &self.registry
    }

    /// Controller slots in index order
    pub fn controllers(&self) -> &[ControllerState] {
        &self.controllers
    }

    /// Controller slot `index`, if it exists
    pub fn controller(&self, index: usize) -> Option<&ControllerState> {
        self.controllers.get(index)
    }

    /// Event log panel
    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// Mutable event log, for messages from outside target actions
    pub fn log_mut(&mut self) -> &mut EventLog {
        &mut self.log
    }

    /// Settings the session was created with
    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::SelectEvent;
    use glam::Mat4;
    use raypanel_core::{ActivationContext, Shape};

    /// Minimal host: fixed poses, queued select events.
    #[derive(Default)]
    struct StubRuntime {
        poses: Vec<Mat4>,
        events: Vec<SelectEvent>,
        frames: usize,
    }

    impl XrRuntime for StubRuntime {
        fn controller_pose(&self, index: usize) -> Option<Mat4> {
            self.poses.get(index).copied()
        }

        fn poll_select_events(&mut self) -> Vec<SelectEvent> {
            std::mem::take(&mut self.events)
        }

        fn submit_frame(&mut self, _scene: &SceneGraph, _report: &FrameReport) {
            self.frames += 1;
        }
    }

    fn button_at(session: &mut InteractionSession, z: f32, message: &'static str) -> NodeId {
        let root = session.scene().root();
        let node = session.scene_mut().spawn_shape(
            root,
            message,
            Transform::new(Vec3::new(0.0, 0.0, z)),
            Shape::cuboid(0.4, 0.2, 0.05),
        );
        session
            .register(InteractiveTarget::new(
                node,
                message,
                move |ctx: &mut ActivationContext<'_>| {
                    ctx.toggle_active();
                    ctx.log(message);
                },
            ))
            .unwrap()
    }

    #[test]
    fn press_fires_once_and_logs() {
        let mut session = InteractionSession::new(SessionSettings::default());
        let button = button_at(&mut session, -1.0, "Command 1 sent");
        let mut runtime = StubRuntime {
            poses: vec![Mat4::IDENTITY, Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0))],
            ..Default::default()
        };

        runtime.events.push(SelectEvent::start(0));
        let report = session.tick(&mut runtime);
        assert_eq!(report.activations.len(), 1);
        assert_eq!(report.activations[0].target, button);
        assert_eq!(report.visual_state(button), Some(VisualState::Pressed));

        let held = session.tick(&mut runtime);
        assert!(held.activations.is_empty());
        assert_eq!(held.controller(0).unwrap().outcome, PointerOutcome::Debounced);

        assert_eq!(session.log().messages().collect::<Vec<_>>(), vec!["Command 1 sent"]);
        assert!(session.registry().get(button).unwrap().state.is_active);
        assert_eq!(runtime.frames, 2);
        assert_eq!(session.current_tick(), SimTick(2));
    }

    #[test]
    fn ray_length_tracks_hit_distance() {
        let mut session = InteractionSession::new(SessionSettings::default());
        button_at(&mut session, -2.0, "far");
        let mut runtime = StubRuntime {
            poses: vec![Mat4::IDENTITY, Mat4::from_rotation_y(std::f32::consts::PI)],
            ..Default::default()
        };

        let report = session.tick(&mut runtime);
        let hit = report.controller(0).unwrap();
        assert!((hit.ray_length - 1.975).abs() < 1e-4);
        let miss = report.controller(1).unwrap();
        assert_eq!(miss.ray_length, DEFAULT_RAY_LENGTH);

        let ray_node = session.controller(0).unwrap().ray_node;
        let scale = session.scene().transform(ray_node).unwrap().scale;
        assert!((scale.z - 1.975).abs() < 1e-4);
    }

    #[test]
    fn hover_is_applied_and_cleared() {
        let mut session = InteractionSession::new(SessionSettings::default());
        let root = session.scene().root();
        let node = session.scene_mut().spawn_shape(
            root,
            "button",
            Transform::new(Vec3::new(0.0, 0.0, -1.0)),
            Shape::cuboid(0.4, 0.2, 0.05),
        );
        session
            .register(
                InteractiveTarget::new(node, "button", |_: &mut ActivationContext<'_>| {})
                    .with_appearance(raypanel_core::Appearance::new([0.0, 0.0, 1.0, 1.0], [1.0; 4])),
            )
            .unwrap();
        let mut runtime = StubRuntime {
            poses: vec![Mat4::IDENTITY, Mat4::IDENTITY],
            ..Default::default()
        };

        let report = session.tick(&mut runtime);
        assert_eq!(report.visual_state(node), Some(VisualState::Hovered));
        assert!(session.registry().get(node).unwrap().state.is_emphasized());

        runtime.poses = vec![Mat4::from_rotation_y(std::f32::consts::PI); 2];
        let report = session.tick(&mut runtime);
        assert_eq!(report.visual_state(node), Some(VisualState::Idle));
        assert!(!session.registry().get(node).unwrap().state.is_emphasized());
    }

    #[test]
    fn model_load_failure_is_logged() {
        let mut session = InteractionSession::new(SessionSettings::default());
        let (completer, handle) = LoadHandle::pair("missing.json");
        session.watch_model(handle, Box::new(|_: &mut InteractionSession, _: ModelDefinition| -> Result<()> { Ok(()) }));
        completer.complete(Err(AssetError::Invalid("no parts".into())));

        session.tick(&mut StubRuntime::default());
        assert_eq!(session.pending_loads(), 0);
        let messages: Vec<_> = session.log().messages().collect();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("Model load failed"));
    }

    #[test]
    fn pending_load_times_out() {
        let mut session = InteractionSession::new(SessionSettings {
            load_timeout_ticks: 3,
            ..Default::default()
        });
        let (_completer, handle) = LoadHandle::<ModelDefinition>::pair("slow.json");
        session.watch_model(handle, Box::new(|_: &mut InteractionSession, _: ModelDefinition| -> Result<()> { Ok(()) }));

        let mut runtime = StubRuntime::default();
        for _ in 0..3 {
            session.tick(&mut runtime);
            assert_eq!(session.pending_loads(), 1);
        }
        session.tick(&mut runtime);
        assert_eq!(session.pending_loads(), 0);
        assert!(session
            .log()
            .messages()
            .any(|message| message.contains("timed out")));
    }

    #[test]
    fn font_failure_falls_back_to_builtin() {
        let mut session = InteractionSession::new(SessionSettings::default());
        session.request_font("does/not/exist.ttf", 24.0);
        let mut runtime = StubRuntime::default();

        for _ in 0..200 {
            session.tick(&mut runtime);
            if session.pending_loads() == 0 {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        assert!(session.log().is_ready());
        assert_eq!(session.log().font_size(), Some(24.0));
        assert_eq!(session.log().lines().len(), 1);
    }
}
