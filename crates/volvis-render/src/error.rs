//! Rendering error types.

use thiserror::Error;
use volvis_core::VolumeError;

/// Errors that can occur during a render.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The render was cancelled before every row was marched.
    #[error("render cancelled")]
    Cancelled,

    /// Render options or inputs were rejected.
    #[error("invalid render input: {0}")]
    InvalidInput(#[from] VolumeError),

    /// Failed to create the worker pool.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// A specialized Result type for rendering operations.
pub type RenderResult<T> = std::result::Result<T, RenderError>;
