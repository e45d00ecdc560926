//! CPU rendering backend for volvis.
//!
//! This crate provides the ray-marching renderers and their outputs:
//! - [`IsosurfaceRenderer`], shaded isosurface with empty-space skipping
//! - [`ContourRenderer`], gradient-energy accumulation along each ray
//! - [`ProjectionImage`] and [`ColorImage`] buffers, and the [`ColorMap`] system
//! - [`ImageSink`] and [`FileImageWriter`] for persisting images
//!
//! Rendering is row-parallel on rayon and can be interrupted with a
//! [`CancelToken`].

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod cancel;
pub mod color_maps;
pub mod contour;
pub mod error;
pub mod isosurface;
pub mod march;
mod pool;
pub mod projection;
pub mod writer;

pub use cancel::CancelToken;
pub use color_maps::{ColorMap, ColorMapRegistry};
pub use contour::{contour_intensity, ContourRenderer};
pub use error::{RenderError, RenderResult};
pub use isosurface::{shade, IsosurfaceRenderer};
pub use march::{ProjectionRenderer, RenderOutput, RenderStats};
pub use projection::{ColorImage, ProjectionImage};
pub use writer::{FileImageWriter, ImageSink, ImageWriteError};
