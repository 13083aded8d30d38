use crate::config::SessionConfig;
use crate::demo;
use crate::scripted_input::ScriptedRuntime;
use anyhow::{bail, Context, Result};
use raypanel_testkit::{EventRecord, JsonlSink};
use raypanel_ui3d::{FrameReport, InteractionSession, XrRuntime};
use serde_json::json;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{info, warn};

pub struct HeadlessConfig {
    pub session: SessionConfig,
    pub scripted_input: Option<PathBuf>,
    pub max_ticks: Option<u64>,
    pub event_log: Option<PathBuf>,
    /// Sleep between ticks to hold `tick_rate`.
    pub paced: bool,
}

/// What a headless run produced
#[derive(Debug)]
pub struct RunSummary {
    pub ticks: u64,
    pub activations: usize,
    pub log: Vec<String>,
}

pub fn run(cfg: HeadlessConfig) -> Result<RunSummary> {
    let mut runtime = match &cfg.scripted_input {
        Some(path) => ScriptedRuntime::from_path(path)?,
        None => {
            if cfg.max_ticks.is_none() {
                bail!("a headless run needs --scripted-input or --max-ticks");
            }
            ScriptedRuntime::idle()
        }
    };

    let mut sink = match &cfg.event_log {
        Some(path) => Some(
            JsonlSink::create(path)
                .with_context(|| format!("failed to create event log {}", path.display()))?,
        ),
        None => None,
    };

    let mut session = InteractionSession::new(cfg.session.settings());
    let scene = demo::build(&mut session, &cfg.session)?;
    info!(
        floor = %scene.floor,
        panel = %scene.button_panel,
        log_panel = %scene.log_panel,
        toggle_grip = %scene.toggle_grip,
        send_command = %scene.send_command,
        "scene ready"
    );
    session.start(&mut runtime)?;

    let frame_time = (cfg.paced && cfg.session.tick_rate > 0.0)
        .then(|| Duration::from_secs_f32(1.0 / cfg.session.tick_rate));

    let mut ticks = 0u64;
    let mut activations = 0usize;
    while !runtime.is_finished() && cfg.max_ticks.map_or(true, |max| ticks < max) {
        let started = Instant::now();
        let report = session.tick(&mut runtime);
        ticks += 1;
        activations += report.activations.len();

        if let Some(sink) = sink.as_mut() {
            record_frame(sink, &report)?;
        }

        if let Some(frame_time) = frame_time {
            if let Some(remaining) = frame_time.checked_sub(started.elapsed()) {
                std::thread::sleep(remaining);
            }
        }
    }

    if session.pending_loads() > 0 {
        warn!(pending = session.pending_loads(), "run ended with loads still pending");
    }
    if let Some(sink) = sink.as_mut() {
        sink.flush()?;
    }

    info!(ticks, activations, "headless run finished");
    Ok(RunSummary {
        ticks,
        activations,
        log: session.log().messages().map(str::to_string).collect(),
    })
}

fn record_frame(sink: &mut JsonlSink, report: &FrameReport) -> Result<()> {
    for activation in &report.activations {
        let payload = json!({
            "controller": activation.controller,
            "target": activation.target.index(),
            "label": activation.label,
        })
        .to_string();
        sink.write(&EventRecord {
            tick: activation.tick,
            kind: "activation",
            payload: &payload,
        })?;
    }
    Ok(())
}
