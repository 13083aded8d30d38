//! raypanel - ray-pointer interaction with a spatial control panel
//!
//! Headless host: builds the control-panel scene and drives it from scripted
//! controller input.

mod config;
mod demo;
mod headless;
mod scripted_input;

use anyhow::Result;
use clap::Parser;
use config::{SessionConfig, DEFAULT_CONFIG_PATH};
use headless::HeadlessConfig;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(about = "Ray-pointer interaction with a spatial control panel", version)]
struct Cli {
    /// Session settings (TOML)
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// JSON script of controller poses and triggers
    #[arg(long)]
    scripted_input: Option<PathBuf>,

    /// Stop after this many ticks
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Write activations as newline-delimited JSON
    #[arg(long)]
    event_log: Option<PathBuf>,

    /// Override the number of controller slots
    #[arg(long)]
    controllers: Option<usize>,

    /// Run ticks back to back instead of at the configured tick rate
    #[arg(long)]
    unpaced: bool,

    /// Write the effective configuration to this path and exit
    #[arg(long)]
    write_config: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize tracing with WARN level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    info!("Starting raypanel v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let mut session = SessionConfig::load_from_path(&cli.config);
    if let Some(controllers) = cli.controllers {
        session.controllers = controllers;
    }

    if let Some(path) = &cli.write_config {
        session.save_to_path(path)?;
        println!("wrote {}", path.display());
        return Ok(());
    }

    raypanel_ui3d::init()?;

    let summary = headless::run(HeadlessConfig {
        session,
        scripted_input: cli.scripted_input,
        max_ticks: cli.max_ticks,
        event_log: cli.event_log,
        paced: !cli.unpaced,
    })?;

    println!(
        "{} ticks, {} activations",
        summary.ticks, summary.activations
    );
    for line in &summary.log {
        println!("{line}");
    }
    Ok(())
}
