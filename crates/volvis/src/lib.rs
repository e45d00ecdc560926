//! volvis: isosurface and contour projections of raw 8-bit density volumes.
//!
//! A run loads a raw volume, optionally reorders it so a chosen axis becomes
//! the depth axis, then ray-marches two orthographic projections along depth:
//!
//! - an **isosurface** image, shaded by the normalized density gradient at the
//!   deepest sample along each ray whose density exceeds the isovalue (with
//!   empty-space skipping; [`HitPolicy::FirstHit`] shades the front-most one
//!   instead), and
//! - a **contour** image, accumulating squared gradient magnitude inside the
//!   surface and mapping it through a saturating curve.
//!
//! # Quick Start
//!
//! ```no_run
//! use volvis::*;
//!
//! fn main() -> Result<()> {
//!     let volume = RawVolumeLoader::new(UVec3::new(256, 256, 225), 62)
//!         .load("bighead_den256X256X225B62H.raw")?;
//!     let pipeline = Pipeline::new(volume, RenderOptions::default())?;
//!     pipeline.swap_axis(Axis::Y)?;
//!
//!     let cancel = CancelToken::new();
//!     let iso = pipeline.render_isosurface(80, &cancel)?;
//!     OutputPlan::new(".", "png").write(&FileImageWriter::new(), "iso", &iso.image);
//!     Ok(())
//! }
//! ```
//!
//! # Crates
//!
//! - `volvis-core`: volumes, acceleration structure, gradients, sampling, options
//! - `volvis-render`: renderers, projection images, colour maps, image output

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod cli;
pub mod error;
pub mod loader;
pub mod output;
pub mod pipeline;

pub use error::{LoadError, Result, VolvisError};
pub use loader::{RawLayout, RawVolumeLoader};
pub use output::{OutputPlan, WriteReport, TIMESTAMP_FORMAT};
pub use pipeline::{Pipeline, Projections};

// Re-export core types
pub use volvis_core::{
    sample_density, sample_gradient, AccelerationStructure, Axis, DVec3, GradientField,
    HitPolicy, I16Vec3, RenderOptions, UVec3, VolumeError, VolumeSnapshot, VoxelVolume,
    DEFAULT_BLOCK_SIZE, MIN_SAMPLING_DISTANCE,
};

// Re-export render types
pub use volvis_render::{
    contour_intensity, shade, CancelToken, ColorImage, ColorMap, ColorMapRegistry,
    ContourRenderer, FileImageWriter, ImageSink, ImageWriteError, IsosurfaceRenderer,
    ProjectionImage, ProjectionRenderer, RenderError, RenderOutput, RenderStats,
};
