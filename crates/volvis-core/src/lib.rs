//! Core data structures for volvis.
//!
//! This crate provides the inputs of the ray-marching renderers:
//! - [`VoxelVolume`], a dense 8-bit scalar volume with axis reordering
//! - [`AccelerationStructure`], per-block maxima for empty-space skipping
//! - [`GradientField`], central-difference gradients over the volume interior
//! - [`sampler`], trilinear interpolation of densities and gradients
//! - [`VolumeSnapshot`], the immutable triple handed to a render
//! - [`RenderOptions`], serializable render configuration

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder-style accessors don't need must_use everywhere
#![allow(clippy::must_use_candidate)]

pub mod acceleration;
pub mod error;
pub mod gradient;
pub mod options;
pub mod sampler;
pub mod snapshot;
pub mod volume;

pub use acceleration::{AccelerationStructure, DEFAULT_BLOCK_SIZE};
pub use error::{Result, VolumeError};
pub use gradient::GradientField;
pub use options::{HitPolicy, RenderOptions, MIN_SAMPLING_DISTANCE};
pub use sampler::{sample_density, sample_gradient};
pub use snapshot::VolumeSnapshot;
pub use volume::{Axis, VoxelVolume};

// Re-export glam types for convenience
pub use glam::{DVec3, I16Vec3, UVec3};
