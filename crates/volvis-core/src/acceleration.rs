//! Coarse per-block maximum index used for empty-space skipping.

use glam::UVec3;
use rayon::prelude::*;

use crate::error::{Result, VolumeError};
use crate::volume::VoxelVolume;

/// Default edge length of an acceleration block, in voxels.
pub const DEFAULT_BLOCK_SIZE: u32 = 8;

/// Maximum sample value over each block of a [`VoxelVolume`].
///
/// Cell `(bx, by, bz)` covers block origin `(bx, by, bz) * block_size` and
/// stores the maximum over the `(block_size + 1)^3` sample window starting
/// there, clipped to the volume. The extra sample layer makes the cell an
/// upper bound for any trilinearly interpolated density inside the block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccelerationStructure {
    block_size: u32,
    dims: UVec3,
    volume_dims: UVec3,
    cells: Vec<u8>,
}

impl AccelerationStructure {
    /// Builds the index for `volume` with blocks of `block_size` voxels.
    ///
    /// # Errors
    /// Returns [`VolumeError::InvalidBlockSize`] if `block_size` is zero.
    pub fn build(volume: &VoxelVolume, block_size: u32) -> Result<Self> {
        if block_size == 0 {
            return Err(VolumeError::InvalidBlockSize);
        }

        let volume_dims = volume.dims();
        let dims = UVec3::new(
            volume_dims.x.div_ceil(block_size),
            volume_dims.y.div_ceil(block_size),
            volume_dims.z.div_ceil(block_size),
        );
        let slab_len = dims.x as usize * dims.y as usize;
        let mut cells = vec![0_u8; slab_len * dims.z as usize];

        cells
            .par_chunks_mut(slab_len)
            .enumerate()
            .for_each(|(bz, slab)| {
                #[allow(clippy::cast_possible_truncation)]
                let bz = bz as u32;
                for by in 0..dims.y {
                    for bx in 0..dims.x {
                        let origin = UVec3::new(bx, by, bz) * block_size;
                        slab[(by * dims.x + bx) as usize] =
                            window_max(volume, origin, block_size);
                    }
                }
            });

        log::debug!(
            "built acceleration structure: {dims} cells of {block_size}^3 over {volume_dims}"
        );

        Ok(Self {
            block_size,
            dims,
            volume_dims,
            cells,
        })
    }

    /// Returns the block edge length.
    #[must_use]
    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    /// Returns the number of cells along each axis.
    #[must_use]
    pub fn dims(&self) -> UVec3 {
        self.dims
    }

    /// Returns the maximum stored for a cell, or `None` outside the grid.
    #[must_use]
    pub fn cell(&self, bx: u32, by: u32, bz: u32) -> Option<u8> {
        if bx < self.dims.x && by < self.dims.y && bz < self.dims.z {
            let idx = (bz as usize * self.dims.y as usize + by as usize) * self.dims.x as usize
                + bx as usize;
            Some(self.cells[idx])
        } else {
            None
        }
    }

    /// Returns the maximum of the block containing a continuous point.
    ///
    /// Points outside the volume report 0, as no density can be sampled
    /// there.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn block_max_at(&self, x: f64, y: f64, z: f64) -> u8 {
        if x < 0.0 || y < 0.0 || z < 0.0 {
            return 0;
        }
        let (x, y, z) = (x as u32, y as u32, z as u32);
        if x >= self.volume_dims.x || y >= self.volume_dims.y || z >= self.volume_dims.z {
            return 0;
        }
        self.cell(x / self.block_size, y / self.block_size, z / self.block_size)
            .unwrap_or(0)
    }
}

fn window_max(volume: &VoxelVolume, origin: UVec3, block_size: u32) -> u8 {
    let end = (origin + UVec3::splat(block_size + 1)).min(volume.dims());
    let mut max = 0;
    for z in origin.z..end.z {
        for y in origin.y..end.y {
            for x in origin.x..end.x {
                max = max.max(volume.value(x, y, z));
            }
        }
    }
    max
}
