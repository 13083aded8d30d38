#![warn(missing_docs)]
//! Asset schemas and background loading.
//!
//! Loads run on their own thread and hand back exactly one result through a
//! [`LoadHandle`], which the frame loop polls between ticks.

mod loader;
mod model;

pub use loader::{spawn_load, LoadCompleter, LoadHandle, LoadStatus};
pub use model::{load_model_from_file, load_model_from_str, ModelDefinition, PartDefinition};

use thiserror::Error;

/// Errors emitted while loading assets.
#[derive(Debug, Error)]
pub enum AssetError {
    /// Wrap IO errors when reading asset files.
    #[error("failed to read asset: {0}")]
    Io(#[from] std::io::Error),
    /// Wrap serde parsing issues.
    #[error("failed to parse asset: {0}")]
    Parse(#[from] serde_json::Error),
    /// The document parsed but describes something unusable.
    #[error("invalid asset: {0}")]
    Invalid(String),
    /// Font bytes could not be parsed.
    #[error("failed to parse font: {0}")]
    Font(String),
    /// The load never produced a result (thread died or was never started).
    #[error("load of {0} was abandoned")]
    Abandoned(String),
    /// The load did not resolve within the allowed number of ticks.
    #[error("load of {path} timed out after {ticks} ticks")]
    TimedOut {
        /// Requested path.
        path: String,
        /// Ticks waited.
        ticks: u64,
    },
}
