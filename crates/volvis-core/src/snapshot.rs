//! Immutable volume snapshots consumed by the renderers.

use std::time::Instant;

use crate::acceleration::AccelerationStructure;
use crate::error::Result;
use crate::gradient::GradientField;
use crate::volume::{Axis, VoxelVolume};

/// A volume together with the structures derived from it.
///
/// The acceleration structure and gradient field are always built from the
/// volume they are stored with; a snapshot is never mutated after
/// construction, so it can be shared between threads for the duration of a
/// render. Changing the volume means building a new snapshot.
#[derive(Debug, Clone)]
pub struct VolumeSnapshot {
    volume: VoxelVolume,
    acceleration: AccelerationStructure,
    gradient: GradientField,
}

impl VolumeSnapshot {
    /// Takes ownership of `volume` and derives its acceleration structure
    /// and gradient field.
    pub fn build(volume: VoxelVolume, block_size: u32) -> Result<Self> {
        let start = Instant::now();
        let acceleration = AccelerationStructure::build(&volume, block_size)?;
        log::info!(
            "acceleration structure built in {:.1}ms",
            start.elapsed().as_secs_f64() * 1e3
        );

        let start = Instant::now();
        let gradient = GradientField::build(&volume);
        log::info!(
            "gradient field built in {:.1}ms",
            start.elapsed().as_secs_f64() * 1e3
        );

        Ok(Self {
            volume,
            acceleration,
            gradient,
        })
    }

    /// Builds a new snapshot whose depth axis is `axis`.
    ///
    /// `self` is left untouched, so renders still holding it stay
    /// consistent.
    pub fn with_depth_axis(&self, axis: Axis) -> Result<Self> {
        Self::build(self.volume.swapped(axis), self.acceleration.block_size())
    }

    /// Returns the volume.
    #[must_use]
    pub fn volume(&self) -> &VoxelVolume {
        &self.volume
    }

    /// Returns the acceleration structure.
    #[must_use]
    pub fn acceleration(&self) -> &AccelerationStructure {
        &self.acceleration
    }

    /// Returns the gradient field.
    #[must_use]
    pub fn gradient(&self) -> &GradientField {
        &self.gradient
    }

    /// Returns the block size the acceleration structure was built with.
    #[must_use]
    pub fn block_size(&self) -> u32 {
        self.acceleration.block_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::UVec3;

    #[test]
    fn test_depth_axis_rebuilds_derived_structures() {
        let volume =
            VoxelVolume::from_fn(UVec3::new(6, 4, 3), |x, y, z| (x + y + z) as u8).unwrap();
        let snapshot = VolumeSnapshot::build(volume, 2).unwrap();
        let swapped = snapshot.with_depth_axis(Axis::X).unwrap();

        assert_eq!(swapped.volume().dims(), UVec3::new(3, 4, 6));
        assert_eq!(swapped.acceleration().dims(), UVec3::new(2, 2, 3));
        assert_eq!(swapped.gradient().dims(), UVec3::new(1, 2, 4));
        assert_eq!(swapped.block_size(), 2);
        assert_eq!(snapshot.volume().dims(), UVec3::new(6, 4, 3));
    }
}
