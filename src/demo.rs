//! The control-panel scene: two buttons, an event log and a deferred SOS model.

use crate::config::SessionConfig;
use anyhow::{Context, Result};
use glam::Vec3;
use raypanel_assets::ModelDefinition;
use raypanel_core::{ActivationContext, InteractiveTarget, NodeId, Shape, Transform};
use raypanel_ui3d::{palette, Button3D, FontAtlas, InteractionSession};
use tracing::info;

pub const SOS_LABEL: &str = "GLB SOS";

/// Nodes of the built scene
#[derive(Debug, Clone, Copy)]
pub struct DemoScene {
    pub floor: NodeId,
    pub button_panel: NodeId,
    pub toggle_grip: NodeId,
    pub send_command: NodeId,
    pub log_panel: NodeId,
}

pub fn build(session: &mut InteractionSession, config: &SessionConfig) -> Result<DemoScene> {
    let root = session.scene().root();
    let floor = session.scene_mut().spawn_shape(
        root,
        "floor",
        Transform::default().with_euler(Vec3::new(-std::f32::consts::FRAC_PI_2, 0.0, 0.0)),
        Shape::quad(6.0, 6.0),
    );

    let button_panel = session.scene_mut().spawn(
        root,
        "button_panel",
        Transform::new(config.button_panel_position()),
    );

    let toggle_grip = Button3D::new(Vec3::ZERO, "Toggle Grip")
        .with_colors(palette::GREEN, palette::RED)
        .spawn(session.scene_mut(), button_panel, |ctx: &mut ActivationContext<'_>| {
            ctx.toggle_active();
            ctx.log("Command 2 Sent.");
        });
    let toggle_grip = session
        .register(toggle_grip)
        .context("failed to register Toggle Grip")?;

    let send_command = Button3D::new(Vec3::new(0.0, -0.3, 0.0), "Send Command")
        .with_colors(palette::BLUE, palette::YELLOW)
        .spawn(session.scene_mut(), button_panel, |ctx: &mut ActivationContext<'_>| {
            ctx.toggle_active();
            ctx.log("Command 1 sent");
        });
    let send_command = session
        .register(send_command)
        .context("failed to register Send Command")?;

    let log_panel = session.spawn_log_panel(config.log_panel_position());

    match &config.font_path {
        Some(path) => session.request_font(path.clone(), config.font_size),
        None => session.set_font(FontAtlas::builtin(config.font_size)),
    }

    session.request_model(
        config.model_path.clone(),
        Box::new(move |session: &mut InteractionSession, model: ModelDefinition| {
            place_sos_model(session, button_panel, &model).map(|_| ())
        }),
    );

    info!(
        targets = session.registry().len(),
        nodes = session.scene().len(),
        "demo scene built"
    );

    Ok(DemoScene {
        floor,
        button_panel,
        toggle_grip,
        send_command,
        log_panel,
    })
}

/// Instantiate the loaded SOS model under `panel` and make it clickable.
pub fn place_sos_model(
    session: &mut InteractionSession,
    panel: NodeId,
    model: &ModelDefinition,
) -> Result<NodeId> {
    let transform = Transform::new(Vec3::new(0.0, -0.4, 0.1))
        .with_euler(Vec3::new(-80.0, 0.0, 0.0))
        .with_scale(Vec3::splat(20.0));
    let node = model.instantiate(session.scene_mut(), panel, transform);

    session
        .register(InteractiveTarget::new(node, SOS_LABEL, toggle_sos))
        .with_context(|| format!("failed to register {}", model.name))?;
    session.log_mut().append("GLB SOS model loaded");
    Ok(node)
}

/// Flip the model between its resting and pressed depth.
fn toggle_sos(ctx: &mut ActivationContext<'_>) {
    ctx.toggle_active();
    let mut transform = ctx.transform();
    if (transform.translation.z - 0.1).abs() < 1e-4 {
        transform.translation.z = -0.1;
    } else if (transform.translation.z + 0.1).abs() < 1e-4 {
        transform.translation.z = 0.1;
    }
    ctx.set_transform(transform);
    ctx.log("GLB SOS toggled");
}
