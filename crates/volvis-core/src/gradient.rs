//! Central-difference gradient field of a voxel volume.

use glam::{I16Vec3, UVec3};
use rayon::prelude::*;

use crate::volume::VoxelVolume;

/// Per-voxel gradient over the interior of a [`VoxelVolume`].
///
/// The one-voxel border of the volume has no central difference, so the
/// field is two samples smaller along every axis: field index `(i, j, k)`
/// holds the gradient at volume voxel `(i + 1, j + 1, k + 1)`. Volumes
/// thinner than three voxels along any axis produce an empty field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradientField {
    dims: UVec3,
    data: Vec<I16Vec3>,
}

impl GradientField {
    /// Computes `(I(p + e) - I(p - e)) / 2` per axis for every interior voxel.
    ///
    /// The halving truncates toward zero.
    #[must_use]
    pub fn build(volume: &VoxelVolume) -> Self {
        let dims = volume.dims().saturating_sub(UVec3::splat(2));
        let slice_len = dims.x as usize * dims.y as usize;
        let mut data = vec![I16Vec3::ZERO; slice_len * dims.z as usize];

        if slice_len > 0 {
            data.par_chunks_mut(slice_len)
                .enumerate()
                .for_each(|(k, slice)| {
                    #[allow(clippy::cast_possible_truncation)]
                    let z = k as u32 + 1;
                    for y in 1..=dims.y {
                        for x in 1..=dims.x {
                            slice[((y - 1) * dims.x + (x - 1)) as usize] =
                                central_difference(volume, x, y, z);
                        }
                    }
                });
        }

        log::debug!("built gradient field: {dims}");
        Self { dims, data }
    }

    /// Returns the field dimensions (volume dimensions minus two).
    #[must_use]
    pub fn dims(&self) -> UVec3 {
        self.dims
    }

    /// Returns whether the field holds no gradients.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the gradient at a field index, or `None` outside the field.
    #[must_use]
    pub fn get(&self, i: u32, j: u32, k: u32) -> Option<I16Vec3> {
        if i < self.dims.x && j < self.dims.y && k < self.dims.z {
            Some(self.data[self.flatten_index(i, j, k)])
        } else {
            None
        }
    }

    /// Returns the gradient at volume voxel `(x, y, z)`, or `None` on the border.
    #[must_use]
    pub fn at_voxel(&self, x: u32, y: u32, z: u32) -> Option<I16Vec3> {
        if x == 0 || y == 0 || z == 0 {
            return None;
        }
        self.get(x - 1, y - 1, z - 1)
    }

    pub(crate) fn flatten_index(&self, i: u32, j: u32, k: u32) -> usize {
        (k as usize * self.dims.y as usize + j as usize) * self.dims.x as usize + i as usize
    }

    pub(crate) fn data(&self) -> &[I16Vec3] {
        &self.data
    }
}

fn central_difference(volume: &VoxelVolume, x: u32, y: u32, z: u32) -> I16Vec3 {
    let diff = |a: u8, b: u8| (i16::from(a) - i16::from(b)) / 2;
    I16Vec3::new(
        diff(volume.value(x + 1, y, z), volume.value(x - 1, y, z)),
        diff(volume.value(x, y + 1, z), volume.value(x, y - 1, z)),
        diff(volume.value(x, y, z + 1), volume.value(x, y, z - 1)),
    )
}
