//! Error types for the volvis facade.

use std::path::PathBuf;

use thiserror::Error;
use volvis_core::VolumeError;
use volvis_render::RenderError;

/// Failure to turn a raw file into a volume.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The file could not be opened or read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is shorter than the declared layout requires.
    #[error("{path} is truncated: layout needs {expected} bytes, file has {actual}")]
    Truncated {
        path: PathBuf,
        expected: usize,
        actual: usize,
    },

    /// The declared dimensions were rejected.
    #[error("invalid volume: {0}")]
    Volume(#[from] VolumeError),
}

/// The main error type for volvis operations.
#[derive(Error, Debug)]
pub enum VolvisError {
    /// Loading the input volume failed.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Building or configuring a volume failed.
    #[error(transparent)]
    Volume(#[from] VolumeError),

    /// Rendering failed.
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// A specialized Result type for volvis operations.
pub type Result<T> = std::result::Result<T, VolvisError>;
