//! 3D pointer interaction for raypanel
//!
//! Controllers cast rays into a scene of interactive targets. Hits resolve to
//! their registered root, a per-target latch turns a held trigger into a single
//! activation, and activations report back through a small 3D event log.
//!
//! # Features
//!
//! - **Ray casting**: controller poses to world rays, nearest hit over registered subtrees
//! - **Debounced activation**: one action per press, re-armed on release over the target
//! - **Event log panel**: bounded message queue rebuilt into text meshes once a font is ready
//! - **Components**: buttons, panels and text placed in the scene graph
//!
//! # Example
//!
//! ```rust,no_run
//! use raypanel_ui3d::{Button3D, InteractionSession, SessionSettings};
//! use raypanel_core::ActivationContext;
//! use glam::Vec3;
//!
//! let mut session = InteractionSession::new(SessionSettings::default());
//! let root = session.scene().root();
//! let button = Button3D::new(Vec3::new(0.0, 1.5, -1.5), "Send Command");
//! let target = button.spawn(session.scene_mut(), root, |ctx: &mut ActivationContext<'_>| {
//!     ctx.toggle_active();
//!     ctx.log("Command 1 sent");
//! });
//! session.register(target).unwrap();
//!
//! // Once per display refresh:
//! // let report = session.tick(&mut runtime);
//! ```

pub mod components;
pub mod interaction;
pub mod log_panel;
pub mod manager;
pub mod render;
pub mod runtime;

// Re-export commonly used types
pub use components::{palette, Button3D, ButtonColors, Panel3D, Text3D, TextAlignment};
pub use interaction::{
    cast_ray, controller_ray, dispatch, ControllerState, PointerOutcome, PointerPhase, Ray, RayHit,
    DEFAULT_RAY_LENGTH,
};
pub use log_panel::{EventLog, TextLine, DEFAULT_MAX_LOGS};
pub use manager::{InteractionSession, OnModelReady, SessionSettings};
pub use render::{FontAtlas, FontAtlasBuilder, TextMesh, TextVertex};
pub use runtime::{Activation, ControllerFrame, FrameReport, SelectEvent, SelectKind, XrRuntime};

use anyhow::Result;

/// Version of the UI3D crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the interaction system
pub fn init() -> Result<()> {
    tracing::info!("Initializing raypanel-ui3d v{}", VERSION);
    Ok(())
}
