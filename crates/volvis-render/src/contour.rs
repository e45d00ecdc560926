//! Contour (gradient-energy accumulation) projection.

use glam::DVec3;
use volvis_core::{sample_density, sample_gradient, RenderOptions, VolumeSnapshot};

use crate::cancel::CancelToken;
use crate::error::RenderResult;
use crate::march::{
    fine_position, ray_origin, render_rows, ProjectionRenderer, RenderOutput, RenderStats,
};

/// Accumulates squared gradient magnitude inside the isosurface along each ray.
///
/// Every ray takes fine samples over the full depth range; no blocks are
/// skipped. The summed energy `s` is mapped to `floor(255 * s / (K + s))`.
#[derive(Debug, Clone, Default)]
pub struct ContourRenderer {
    options: RenderOptions,
}

impl ContourRenderer {
    /// Creates a renderer with the given options.
    #[must_use]
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Returns the render options.
    #[must_use]
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    fn march_ray(
        &self,
        snapshot: &VolumeSnapshot,
        x: f64,
        y: f64,
        isovalue: u8,
        stats: &mut RenderStats,
    ) -> f64 {
        let end = f64::from(snapshot.volume().depth()) - 1.0;
        let threshold = f64::from(isovalue);

        let mut sum = 0.0;
        let mut steps = 0;
        loop {
            let k = fine_position(0.0, steps, self.options.sampling_distance);
            if k >= end {
                break;
            }
            let p = DVec3::new(x, y, k);
            stats.density_samples += 1;
            if sample_density(snapshot.volume(), p) > threshold {
                if let Some(gradient) = sample_gradient(snapshot.gradient(), p) {
                    stats.hits += 1;
                    sum += gradient.length_squared();
                }
            }
            steps += 1;
        }
        sum
    }
}

impl ProjectionRenderer for ContourRenderer {
    fn name(&self) -> &'static str {
        "contour"
    }

    fn render_with_cancel(
        &self,
        snapshot: &VolumeSnapshot,
        isovalue: u8,
        cancel: &CancelToken,
    ) -> RenderResult<RenderOutput> {
        let zoom = self.options.zoom;
        let softening = self.options.contour_softening;
        render_rows(self.name(), &self.options, cancel, |j, row| {
            let mut stats = RenderStats::default();
            for (i, pixel) in (0..).zip(row.iter_mut()) {
                let (x, y) = ray_origin(i, j, zoom);
                let sum = self.march_ray(snapshot, x, y, isovalue, &mut stats);
                *pixel = contour_intensity(sum, softening);
                stats.rays += 1;
            }
            stats
        })
    }
}

/// Saturating map `floor(255 * sum / (softening + sum))`.
///
/// Zero for a zero sum, non-decreasing, and never 255 for finite sums.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn contour_intensity(sum: f64, softening: f64) -> u8 {
    if sum <= 0.0 {
        return 0;
    }
    // Rounding can reach 255.0 for sums many orders above the softening.
    (255.0 * sum / (softening + sum)).floor().min(254.0) as u8
}
