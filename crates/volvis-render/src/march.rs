//! Row-parallel ray marching shared by the projection renderers.

use std::ops::{Add, AddAssign};
use std::time::Instant;

use rayon::prelude::*;
use volvis_core::{RenderOptions, VolumeSnapshot};

use crate::cancel::CancelToken;
use crate::error::{RenderError, RenderResult};
use crate::pool::run_on_pool;
use crate::projection::ProjectionImage;

/// Counters collected while marching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Rays marched (one per pixel).
    pub rays: u64,
    /// Trilinear density samples taken.
    pub density_samples: u64,
    /// Acceleration blocks skipped without sampling.
    pub skipped_blocks: u64,
    /// Samples that exceeded the isovalue and had a defined gradient.
    pub hits: u64,
}

impl Add for RenderStats {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            rays: self.rays + rhs.rays,
            density_samples: self.density_samples + rhs.density_samples,
            skipped_blocks: self.skipped_blocks + rhs.skipped_blocks,
            hits: self.hits + rhs.hits,
        }
    }
}

impl AddAssign for RenderStats {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// A rendered projection and the counters gathered while producing it.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub image: ProjectionImage,
    pub stats: RenderStats,
}

/// A renderer producing one orthographic projection along the depth axis.
pub trait ProjectionRenderer: Sync {
    /// Short name used in logs and output file names.
    fn name(&self) -> &'static str;

    /// Renders `snapshot`, checking `cancel` between rows.
    fn render_with_cancel(
        &self,
        snapshot: &VolumeSnapshot,
        isovalue: u8,
        cancel: &CancelToken,
    ) -> RenderResult<RenderOutput>;

    /// Renders `snapshot` to completion.
    fn render(&self, snapshot: &VolumeSnapshot, isovalue: u8) -> RenderResult<RenderOutput> {
        self.render_with_cancel(snapshot, isovalue, &CancelToken::new())
    }
}

/// Volume-space position of the ray through pixel column `i`, row `j`.
pub(crate) fn ray_origin(i: u32, j: u32, zoom: f64) -> (f64, f64) {
    (f64::from(i) / zoom, f64::from(j) / zoom)
}

/// Depth of fine sample `steps` in a run starting at `start`.
///
/// Computed from the step count so that rounding does not accumulate along
/// the ray.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn fine_position(start: f64, steps: u64, sampling_distance: f64) -> f64 {
    start + steps as f64 * sampling_distance
}

/// Fills a `resolution x resolution` image one row at a time on the worker
/// pool. `march_row` receives the row index and its pixels.
pub(crate) fn render_rows<F>(
    name: &str,
    options: &RenderOptions,
    cancel: &CancelToken,
    march_row: F,
) -> RenderResult<RenderOutput>
where
    F: Fn(u32, &mut [u8]) -> RenderStats + Sync,
{
    options.validate()?;
    let resolution = options.resolution;
    let mut image = ProjectionImage::new(resolution, resolution);
    let start = Instant::now();

    let stats = run_on_pool(options.threads, || {
        image
            .pixels_mut()
            .par_chunks_mut(resolution as usize)
            .enumerate()
            .map(|(j, row)| {
                if cancel.is_cancelled() {
                    return Err(RenderError::Cancelled);
                }
                #[allow(clippy::cast_possible_truncation)]
                let j = j as u32;
                Ok(march_row(j, row))
            })
            .try_reduce(RenderStats::default, |a, b| Ok(a + b))
    })??;

    log::info!(
        "{name} render: {resolution}x{resolution} in {:.1}ms, {} samples, {} blocks skipped",
        start.elapsed().as_secs_f64() * 1e3,
        stats.density_samples,
        stats.skipped_blocks
    );

    Ok(RenderOutput { image, stats })
}
