//! Load-swap-render orchestration.

use std::sync::{Arc, PoisonError, RwLock};

use volvis_core::{Axis, RenderOptions, VolumeSnapshot, VoxelVolume};
use volvis_render::{
    CancelToken, ContourRenderer, IsosurfaceRenderer, ProjectionRenderer, RenderOutput,
};

use crate::error::Result;

/// Both projections of one render pass.
#[derive(Debug, Clone)]
pub struct Projections {
    pub isosurface: RenderOutput,
    pub contour: RenderOutput,
}

/// Owns the current [`VolumeSnapshot`] and renders projections from it.
///
/// Renders hold their own `Arc` to the snapshot they started with. Changing
/// the depth axis builds a complete replacement snapshot and publishes it in
/// one step, so a render never observes a volume paired with derived data
/// from a different orientation.
#[derive(Debug)]
pub struct Pipeline {
    snapshot: RwLock<Arc<VolumeSnapshot>>,
    options: RenderOptions,
}

impl Pipeline {
    /// Validates `options` and builds the initial snapshot from `volume`.
    pub fn new(volume: VoxelVolume, options: RenderOptions) -> Result<Self> {
        options.validate()?;
        let snapshot = VolumeSnapshot::build(volume, options.block_size)?;
        Ok(Self {
            snapshot: RwLock::new(Arc::new(snapshot)),
            options,
        })
    }

    /// Returns the render options.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Returns the currently published snapshot.
    pub fn snapshot(&self) -> Arc<VolumeSnapshot> {
        Arc::clone(&self.snapshot.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Makes `axis` the depth axis of the current volume.
    ///
    /// [`Axis::Z`] leaves the published snapshot untouched. Renders already
    /// running keep the snapshot they started with. The write lock is held
    /// while the replacement is built, so concurrent swaps apply in turn.
    pub fn swap_axis(&self, axis: Axis) -> Result<()> {
        if axis == Axis::Z {
            return Ok(());
        }
        let mut current = self
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let next = Arc::new(current.with_depth_axis(axis)?);
        log::info!(
            "depth axis {axis:?}: dims {} -> {}",
            current.volume().dims(),
            next.volume().dims()
        );
        *current = next;
        Ok(())
    }

    /// Renders the isosurface projection of the current snapshot.
    pub fn render_isosurface(&self, isovalue: u8, cancel: &CancelToken) -> Result<RenderOutput> {
        self.render_with(&IsosurfaceRenderer::new(self.options.clone()), isovalue, cancel)
    }

    /// Renders the contour projection of the current snapshot.
    pub fn render_contour(&self, isovalue: u8, cancel: &CancelToken) -> Result<RenderOutput> {
        self.render_with(&ContourRenderer::new(self.options.clone()), isovalue, cancel)
    }

    /// Renders both projections from the same snapshot.
    pub fn render_all(&self, isovalue: u8, cancel: &CancelToken) -> Result<Projections> {
        let snapshot = self.snapshot();
        let iso = IsosurfaceRenderer::new(self.options.clone());
        let contour = ContourRenderer::new(self.options.clone());
        Ok(Projections {
            isosurface: iso.render_with_cancel(&snapshot, isovalue, cancel)?,
            contour: contour.render_with_cancel(&snapshot, isovalue, cancel)?,
        })
    }

    fn render_with(
        &self,
        renderer: &dyn ProjectionRenderer,
        isovalue: u8,
        cancel: &CancelToken,
    ) -> Result<RenderOutput> {
        let snapshot = self.snapshot();
        Ok(renderer.render_with_cancel(&snapshot, isovalue, cancel)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use volvis_core::UVec3;
    use volvis_render::RenderError;

    use crate::error::VolvisError;

    fn small_options() -> RenderOptions {
        RenderOptions {
            resolution: 8,
            zoom: 1.0,
            block_size: 2,
            ..RenderOptions::default()
        }
    }

    #[test]
    fn test_swap_publishes_new_snapshot() {
        let volume = VoxelVolume::zeros(UVec3::new(8, 6, 4)).unwrap();
        let pipeline = Pipeline::new(volume, small_options()).unwrap();
        let before = pipeline.snapshot();

        pipeline.swap_axis(Axis::X).unwrap();
        let after = pipeline.snapshot();

        assert_eq!(before.volume().dims(), UVec3::new(8, 6, 4));
        assert_eq!(after.volume().dims(), UVec3::new(4, 6, 8));
        assert_eq!(after.acceleration().dims(), UVec3::new(2, 3, 4));
        assert!(!Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn test_concurrent_swaps_both_apply() {
        let volume =
            VoxelVolume::from_fn(UVec3::new(8, 6, 4), |x, y, z| (x + 8 * y + 48 * z) as u8)
                .unwrap();
        let original = volume.clone();
        let pipeline = Pipeline::new(volume, small_options()).unwrap();

        std::thread::scope(|scope| {
            for _ in 0..2 {
                scope.spawn(|| pipeline.swap_axis(Axis::X).unwrap());
            }
        });

        // Swapping the same axis twice restores the volume.
        assert_eq!(pipeline.snapshot().volume(), &original);
    }

    #[test]
    fn test_depth_axis_z_keeps_snapshot() {
        let volume = VoxelVolume::zeros(UVec3::splat(4)).unwrap();
        let pipeline = Pipeline::new(volume, small_options()).unwrap();
        let before = pipeline.snapshot();
        pipeline.swap_axis(Axis::Z).unwrap();
        assert!(Arc::ptr_eq(&before, &pipeline.snapshot()));
    }

    #[test]
    fn test_invalid_options_rejected() {
        let volume = VoxelVolume::zeros(UVec3::splat(4)).unwrap();
        let options = RenderOptions {
            block_size: 0,
            ..small_options()
        };
        assert!(matches!(
            Pipeline::new(volume, options),
            Err(VolvisError::Volume(_))
        ));
    }

    #[test]
    fn test_render_all_and_cancel() {
        let mut volume = VoxelVolume::zeros(UVec3::splat(8)).unwrap();
        volume.set(5, 5, 5, 200);
        let pipeline = Pipeline::new(volume, small_options()).unwrap();

        let projections = pipeline.render_all(100, &CancelToken::new()).unwrap();
        assert_eq!(projections.isosurface.image.get(5, 5), Some(255));
        assert_eq!(projections.isosurface.image.lit_pixel_count(), 1);
        assert_eq!(projections.contour.image.width(), 8);

        let cancel = CancelToken::new();
        cancel.cancel();
        assert!(matches!(
            pipeline.render_contour(100, &cancel),
            Err(VolvisError::Render(RenderError::Cancelled))
        ));
    }
}
