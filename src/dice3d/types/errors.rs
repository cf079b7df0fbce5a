//! Error types
//!
//! `GeometryError` is fatal and surfaces at startup. `DegenerateNormalError`
//! never leaves the roll controller: it is compensated with a fallback axis.

use std::path::PathBuf;

use thiserror::Error;

/// Die construction failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("die radius must be a positive number, got {radius}")]
    NonPositiveRadius { radius: f32 },

    #[error("bevel {bevel} must lie in [0, {radius})")]
    InvalidBevel { bevel: f32, radius: f32 },

    #[error("face {number} is degenerate (area {area})")]
    DegenerateFace { number: u8, area: f32 },
}

/// The face normal has no well-defined rotation axis toward the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DegenerateNormalError {
    #[error("face normal already points at the camera")]
    Parallel,

    #[error("face normal points directly away from the camera")]
    Antiparallel,
}

/// Settings could not be read.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
