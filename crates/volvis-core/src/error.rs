//! Error types for volvis-core.

use glam::UVec3;
use thiserror::Error;

/// The main error type for volume construction and configuration.
#[derive(Error, Debug)]
pub enum VolumeError {
    /// A volume dimension was zero.
    #[error("volume dimensions must all be positive, got {0}")]
    EmptyDimension(UVec3),

    /// Sample count does not match the declared dimensions.
    #[error("data size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// Projection axis outside 0..=2.
    #[error("invalid projection axis {0} (expected 0, 1 or 2)")]
    InvalidAxis(u8),

    /// Acceleration structure block size was zero.
    #[error("acceleration block size must be positive")]
    InvalidBlockSize,

    /// A render option failed validation.
    #[error("invalid render option: {0}")]
    InvalidOption(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for volvis-core operations.
pub type Result<T> = std::result::Result<T, VolumeError>;
