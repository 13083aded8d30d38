use anyhow::Result;
use glam::Vec3;
use raypanel_ui3d::{palette, SessionSettings, DEFAULT_MAX_LOGS, DEFAULT_RAY_LENGTH};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "config/scene.toml";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Number of controller slots.
    pub controllers: usize,
    /// Event log capacity.
    pub max_logs: usize,
    pub default_ray_length: f32,
    /// Hover emphasis as `#rrggbb` or a color name.
    pub hover_emissive: String,
    /// Ticks per second when pacing in real time.
    pub tick_rate: f32,
    /// Ticks before a pending asset load is abandoned (0 = never).
    pub load_timeout_ticks: u64,
    /// TTF/OTF font for the log panel; the builtin glyph set is used when unset.
    pub font_path: Option<PathBuf>,
    pub font_size: f32,
    pub model_path: PathBuf,
    pub log_panel_position: [f32; 3],
    pub button_panel_position: [f32; 3],
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            controllers: 2,
            max_logs: DEFAULT_MAX_LOGS,
            default_ray_length: DEFAULT_RAY_LENGTH,
            hover_emissive: "#333333".to_string(),
            tick_rate: 72.0,
            load_timeout_ticks: 600,
            font_path: None,
            font_size: 32.0,
            model_path: PathBuf::from("assets/models/sos_button.json"),
            log_panel_position: [1.0, 0.5, -1.5],
            button_panel_position: [0.0, 1.5, -1.5],
        }
    }
}

impl SessionConfig {
    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<SessionConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    SessionConfig::default()
                }
            },
            Err(err) => {
                if path != Path::new(DEFAULT_CONFIG_PATH)
                    || err.kind() != std::io::ErrorKind::NotFound
                {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                } else {
                    warn!(
                        "Session config not found at {}. Using defaults",
                        path.display()
                    );
                }
                SessionConfig::default()
            }
        }
    }

    /// Save configuration to an explicit path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        Ok(())
    }

    /// Session tunables derived from this config.
    pub fn settings(&self) -> SessionSettings {
        let hover = palette::parse(&self.hover_emissive).unwrap_or_else(|| {
            warn!(
                value = %self.hover_emissive,
                "Unrecognized hover_emissive color. Using #333333"
            );
            palette::from_hex(0x333333)
        });

        SessionSettings {
            controllers: self.controllers,
            max_logs: self.max_logs,
            default_ray_length: if self.default_ray_length > 0.0 {
                self.default_ray_length
            } else {
                DEFAULT_RAY_LENGTH
            },
            hover_emissive: [hover[0], hover[1], hover[2]],
            load_timeout_ticks: self.load_timeout_ticks,
        }
    }

    pub fn log_panel_position(&self) -> Vec3 {
        Vec3::from(self.log_panel_position)
    }

    pub fn button_panel_position(&self) -> Vec3 {
        Vec3::from(self.button_panel_position)
    }
}
