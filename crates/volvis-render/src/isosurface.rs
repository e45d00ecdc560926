//! Isosurface projection with empty-space skipping.

use glam::DVec3;
use volvis_core::{sample_density, sample_gradient, HitPolicy, RenderOptions, VolumeSnapshot};

use crate::cancel::CancelToken;
use crate::error::RenderResult;
use crate::march::{
    fine_position, ray_origin, render_rows, ProjectionRenderer, RenderOutput, RenderStats,
};

/// Shades the isosurface of a volume seen along its depth axis.
///
/// Each ray marches depth `k` from 0 while `k < depth - 1`. Blocks whose
/// acceleration maximum is below the isovalue are stepped over whole;
/// elsewhere the ray advances by the fine sampling distance and every sample
/// whose density exceeds the isovalue shades the pixel by
/// `|gradient.z| / |gradient|`. With [`HitPolicy::LastHit`] the deepest such
/// sample determines the pixel.
#[derive(Debug, Clone, Default)]
pub struct IsosurfaceRenderer {
    options: RenderOptions,
}

impl IsosurfaceRenderer {
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
    ) -> u8 {
        let volume = snapshot.volume();
        let acceleration = snapshot.acceleration();
        let block = f64::from(snapshot.block_size());
        let end = f64::from(volume.depth()) - 1.0;
        let threshold = f64::from(isovalue);

        // Fine samples sit at `start + steps * d`; a skip restarts the run at
        // the next block boundary.
        let mut pixel = 0;
        let mut start = 0.0;
        let mut steps = 0;
        loop {
            let k = fine_position(start, steps, self.options.sampling_distance);
            if k >= end {
                break;
            }
            if acceleration.block_max_at(x, y, k) < isovalue {
                stats.skipped_blocks += 1;
                start = ((k / block).floor() + 1.0) * block;
                steps = 0;
                continue;
            }

            let p = DVec3::new(x, y, k);
            stats.density_samples += 1;
            if sample_density(volume, p) > threshold {
                if let Some(gradient) = sample_gradient(snapshot.gradient(), p) {
                    stats.hits += 1;
                    pixel = shade(gradient);
                    if self.options.hit_policy == HitPolicy::FirstHit {
                        break;
                    }
                }
            }
            steps += 1;
        }
        pixel
    }
}

impl ProjectionRenderer for IsosurfaceRenderer {
    fn name(&self) -> &'static str {
        "iso"
    }

    fn render_with_cancel(
        &self,
        snapshot: &VolumeSnapshot,
        isovalue: u8,
        cancel: &CancelToken,
    ) -> RenderResult<RenderOutput> {
        if isovalue > snapshot.volume().max_value() {
            log::warn!(
                "isovalue {isovalue} exceeds every sample (max {}), image will be black",
                snapshot.volume().max_value()
            );
        }

        let zoom = self.options.zoom;
        render_rows(self.name(), &self.options, cancel, |j, row| {
            let mut stats = RenderStats::default();
            for (i, pixel) in (0..).zip(row.iter_mut()) {
                let (x, y) = ray_origin(i, j, zoom);
                *pixel = self.march_ray(snapshot, x, y, isovalue, &mut stats);
                stats.rays += 1;
            }
            stats
        })
    }
}

/// One-axis Lambertian term `|255 * g.z / |g||`; a zero gradient shades black.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn shade(gradient: DVec3) -> u8 {
    let norm = gradient.length();
    if norm == 0.0 {
        return 0;
    }
    (255.0 * gradient.z / norm).abs().min(255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use volvis_core::{UVec3, VoxelVolume};

    fn single_voxel_snapshot(hit_policy: HitPolicy) -> (VolumeSnapshot, IsosurfaceRenderer) {
        let mut volume = VoxelVolume::zeros(UVec3::splat(8)).unwrap();
        volume.set(5, 5, 5, 200);
        let snapshot = VolumeSnapshot::build(volume, 2).unwrap();
        let renderer = IsosurfaceRenderer::new(RenderOptions {
            resolution: 8,
            zoom: 1.0,
            block_size: 2,
            hit_policy,
            ..RenderOptions::default()
        });
        (snapshot, renderer)
    }

    #[test]
    fn test_shade() {
        assert_eq!(shade(DVec3::new(0.0, 0.0, 3.0)), 255);
        assert_eq!(shade(DVec3::new(0.0, 0.0, -3.0)), 255);
        assert_eq!(shade(DVec3::new(4.0, 0.0, 0.0)), 0);
        assert_eq!(shade(DVec3::new(3.0, 0.0, 4.0)), 204);
        assert_eq!(shade(DVec3::ZERO), 0);
    }

    #[test]
    fn test_skips_empty_blocks() {
        let (snapshot, renderer) = single_voxel_snapshot(HitPolicy::LastHit);
        let output = renderer.render(&snapshot, 100).unwrap();

        // Only rays with x and y in [4, 6) enter the one qualifying block,
        // and they take the 8 fine samples of depth range [4, 6).
        assert_eq!(output.stats.rays, 64);
        assert_eq!(output.stats.density_samples, 4 * 8);
        assert_eq!(output.stats.skipped_blocks, 60 * 4 + 4 * 3);
    }

    #[test]
    fn test_last_hit_wins() {
        let (snapshot, renderer) = single_voxel_snapshot(HitPolicy::LastHit);
        let output = renderer.render(&snapshot, 100).unwrap();

        // Along the ray through (5, 5) the samples at k = 4.75, 5.0 and 5.25
        // exceed the isovalue; the gradient vanishes at 5.0 but the last hit
        // at 5.25 points down the depth axis.
        assert_eq!(output.stats.hits, 3);
        assert_eq!(output.image.get(5, 5), Some(255));
        assert_eq!(output.image.lit_pixel_count(), 1);
    }

    #[test]
    fn test_first_hit_stops_early() {
        let (snapshot, renderer) = single_voxel_snapshot(HitPolicy::FirstHit);
        let output = renderer.render(&snapshot, 100).unwrap();

        assert_eq!(output.stats.hits, 1);
        assert_eq!(output.stats.density_samples, 3 * 8 + 4);
        assert_eq!(output.image.get(5, 5), Some(255));
    }

    #[test]
    fn test_policies_agree_on_single_hit() {
        // Along the ray through (5, 5) density is 200 at k = 5 and falls to
        // 175 by k = 5.25 and 150 at k = 4.75, so with isovalue 190 only the
        // lattice sample qualifies. Its gradient (0, 0, 50) points down the
        // depth axis.
        let mut volume = VoxelVolume::zeros(UVec3::splat(8)).unwrap();
        volume.set(5, 5, 5, 200);
        volume.set(5, 5, 6, 100);
        let snapshot = VolumeSnapshot::build(volume, 2).unwrap();

        let render = |hit_policy| {
            IsosurfaceRenderer::new(RenderOptions {
                resolution: 8,
                zoom: 1.0,
                block_size: 2,
                hit_policy,
                ..RenderOptions::default()
            })
            .render(&snapshot, 190)
            .unwrap()
        };
        let last = render(HitPolicy::LastHit);
        let first = render(HitPolicy::FirstHit);

        assert_eq!(last.stats.hits, 1);
        assert_eq!(first.stats.hits, 1);
        assert_eq!(last.image.get(5, 5), Some(255));
        assert_eq!(first.image, last.image);
        assert!(first.stats.density_samples <= last.stats.density_samples);
    }

    #[test]
    fn test_step_too_small_to_advance_is_rejected() {
        let volume = VoxelVolume::from_fn(UVec3::splat(4), |_, _, _| 255).unwrap();
        let snapshot = VolumeSnapshot::build(volume, 2).unwrap();
        let renderer = IsosurfaceRenderer::new(RenderOptions {
            resolution: 1,
            sampling_distance: 1e-18,
            ..RenderOptions::default()
        });
        assert!(matches!(
            renderer.render(&snapshot, 10),
            Err(crate::RenderError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_rays_outside_volume_are_black() {
        let volume = VoxelVolume::from_fn(UVec3::splat(4), |_, _, _| 255).unwrap();
        let snapshot = VolumeSnapshot::build(volume, 2).unwrap();
        let renderer = IsosurfaceRenderer::new(RenderOptions {
            resolution: 16,
            zoom: 1.0,
            block_size: 2,
            ..RenderOptions::default()
        });
        let output = renderer.render(&snapshot, 10).unwrap();

        // A constant volume has a zero gradient, so even hits shade black.
        assert_eq!(output.image.lit_pixel_count(), 0);
        // Only the 4x4 rays inside the volume sample, at k = 0, 0.25, .., 2.75.
        assert_eq!(output.stats.density_samples, 16 * 12);
    }

    #[test]
    fn test_cancelled_render() {
        let (snapshot, renderer) = single_voxel_snapshot(HitPolicy::LastHit);
        let cancel = CancelToken::new();
        cancel.cancel();
        assert!(matches!(
            renderer.render_with_cancel(&snapshot, 100, &cancel),
            Err(crate::RenderError::Cancelled)
        ));
    }
}
