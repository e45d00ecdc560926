//! Dense 8-bit voxel volumes.

use glam::UVec3;

use crate::error::{Result, VolumeError};

/// One of the three principal axes of a volume.
///
/// Renderers always march along [`Axis::Z`]; projecting along another axis is
/// done by swapping that axis into the depth position first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Axis {
    /// The fastest-varying storage axis.
    X,
    /// The middle storage axis.
    Y,
    /// The depth axis (slowest-varying).
    #[default]
    Z,
}

impl TryFrom<u8> for Axis {
    type Error = VolumeError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Axis::X),
            1 => Ok(Axis::Y),
            2 => Ok(Axis::Z),
            other => Err(VolumeError::InvalidAxis(other)),
        }
    }
}

/// A regular 3D grid of unsigned 8-bit intensity samples.
///
/// Samples are stored in one flat buffer with x varying fastest, then y,
/// then z: the sample at `(x, y, z)` lives at `(z * dim_y + y) * dim_x + x`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoxelVolume {
    dims: UVec3,
    data: Vec<u8>,
}

impl VoxelVolume {
    /// Creates a volume from samples in x-fastest order.
    ///
    /// # Errors
    /// Returns [`VolumeError::EmptyDimension`] if any dimension is zero and
    /// [`VolumeError::SizeMismatch`] if `data` does not hold exactly
    /// `dims.x * dims.y * dims.z` samples.
    pub fn new(dims: UVec3, data: Vec<u8>) -> Result<Self> {
        let expected = checked_len(dims)?;
        if data.len() != expected {
            return Err(VolumeError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { dims, data })
    }

    /// Creates a volume filled with zeros.
    pub fn zeros(dims: UVec3) -> Result<Self> {
        let len = checked_len(dims)?;
        Ok(Self {
            dims,
            data: vec![0; len],
        })
    }

    /// Creates a volume by evaluating `f` at every lattice point.
    pub fn from_fn(dims: UVec3, mut f: impl FnMut(u32, u32, u32) -> u8) -> Result<Self> {
        let len = checked_len(dims)?;
        let mut data = Vec::with_capacity(len);
        for z in 0..dims.z {
            for y in 0..dims.y {
                for x in 0..dims.x {
                    data.push(f(x, y, z));
                }
            }
        }
        Ok(Self { dims, data })
    }

    /// Returns the number of samples along each axis.
    #[must_use]
    pub fn dims(&self) -> UVec3 {
        self.dims
    }

    /// Returns the number of samples along the depth (z) axis.
    #[must_use]
    pub fn depth(&self) -> u32 {
        self.dims.z
    }

    /// Returns the raw sample buffer.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the number of samples in one z-slice.
    #[must_use]
    pub fn slice_len(&self) -> usize {
        self.dims.x as usize * self.dims.y as usize
    }

    /// Flattens a lattice index to a buffer offset.
    #[must_use]
    pub fn flatten_index(&self, x: u32, y: u32, z: u32) -> usize {
        (z as usize * self.dims.y as usize + y as usize) * self.dims.x as usize + x as usize
    }

    /// Returns whether `(x, y, z)` is a lattice point of this volume.
    #[must_use]
    pub fn contains(&self, x: u32, y: u32, z: u32) -> bool {
        x < self.dims.x && y < self.dims.y && z < self.dims.z
    }

    /// Bounds-checked lattice access.
    #[must_use]
    pub fn get(&self, x: u32, y: u32, z: u32) -> Option<u8> {
        if self.contains(x, y, z) {
            Some(self.data[self.flatten_index(x, y, z)])
        } else {
            None
        }
    }

    /// Lattice access for loops that already stay inside the volume.
    ///
    /// # Panics
    /// Panics if `(x, y, z)` lies outside the volume.
    #[must_use]
    pub fn value(&self, x: u32, y: u32, z: u32) -> u8 {
        assert!(
            self.contains(x, y, z),
            "voxel ({x}, {y}, {z}) outside volume {}",
            self.dims
        );
        self.data[self.flatten_index(x, y, z)]
    }

    /// Sets the sample at a lattice point.
    ///
    /// # Panics
    /// Panics if `(x, y, z)` lies outside the volume.
    pub fn set(&mut self, x: u32, y: u32, z: u32, value: u8) {
        assert!(
            self.contains(x, y, z),
            "voxel ({x}, {y}, {z}) outside volume {}",
            self.dims
        );
        let idx = self.flatten_index(x, y, z);
        self.data[idx] = value;
    }

    /// Returns the largest sample in the volume.
    #[must_use]
    pub fn max_value(&self) -> u8 {
        self.data.iter().copied().max().unwrap_or(0)
    }

    /// Returns a new volume whose depth axis is `axis`.
    ///
    /// Swapping [`Axis::X`] exchanges x and z, swapping [`Axis::Y`] exchanges
    /// y and z; every sample is copied into a freshly allocated grid.
    /// [`Axis::Z`] returns an unchanged copy. Swapping the same axis twice
    /// restores the original layout.
    #[must_use]
    pub fn swapped(&self, axis: Axis) -> Self {
        let UVec3 { x: nx, y: ny, z: nz } = self.dims;
        let new_dims = match axis {
            Axis::X => UVec3::new(nz, ny, nx),
            Axis::Y => UVec3::new(nx, nz, ny),
            Axis::Z => return self.clone(),
        };

        let mut data = vec![0; self.data.len()];
        let new_nx = new_dims.x as usize;
        let new_ny = new_dims.y as usize;
        let mut src = 0;
        for z in 0..nz as usize {
            for y in 0..ny as usize {
                for x in 0..nx as usize {
                    let (dx, dy, dz) = match axis {
                        Axis::X => (z, y, x),
                        _ => (x, z, y),
                    };
                    data[(dz * new_ny + dy) * new_nx + dx] = self.data[src];
                    src += 1;
                }
            }
        }

        log::debug!("swapped {axis:?} into depth: {} -> {new_dims}", self.dims);
        Self {
            dims: new_dims,
            data,
        }
    }

    /// Replaces this volume with [`VoxelVolume::swapped`].
    pub fn swap_axis(&mut self, axis: Axis) {
        if axis != Axis::Z {
            *self = self.swapped(axis);
        }
    }
}

fn checked_len(dims: UVec3) -> Result<usize> {
    if dims.cmpeq(UVec3::ZERO).any() {
        return Err(VolumeError::EmptyDimension(dims));
    }
    Ok(dims.x as usize * dims.y as usize * dims.z as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ramp(dims: UVec3) -> VoxelVolume {
        VoxelVolume::from_fn(dims, |x, y, z| ((x + 3 * y + 7 * z) % 251) as u8).unwrap()
    }

    #[test]
    fn test_new_validates_size() {
        let err = VoxelVolume::new(UVec3::new(2, 2, 2), vec![0; 7]).unwrap_err();
        assert!(matches!(
            err,
            VolumeError::SizeMismatch {
                expected: 8,
                actual: 7
            }
        ));
    }

    #[test]
    fn test_new_rejects_zero_dimension() {
        let err = VoxelVolume::new(UVec3::new(2, 0, 2), Vec::new()).unwrap_err();
        assert!(matches!(err, VolumeError::EmptyDimension(_)));
    }

    #[test]
    fn test_x_fastest_layout() {
        let volume = VoxelVolume::new(UVec3::new(2, 2, 2), (0..8).collect()).unwrap();
        assert_eq!(volume.get(1, 0, 0), Some(1));
        assert_eq!(volume.get(0, 1, 0), Some(2));
        assert_eq!(volume.get(0, 0, 1), Some(4));
        assert_eq!(volume.get(2, 0, 0), None);
    }

    #[test]
    fn test_axis_from_u8() {
        assert_eq!(Axis::try_from(0).unwrap(), Axis::X);
        assert_eq!(Axis::try_from(1).unwrap(), Axis::Y);
        assert_eq!(Axis::try_from(2).unwrap(), Axis::Z);
        assert!(matches!(Axis::try_from(3), Err(VolumeError::InvalidAxis(3))));
    }

    #[test]
    fn test_swap_x_moves_x_into_depth() {
        let volume = ramp(UVec3::new(4, 3, 2));
        let swapped = volume.swapped(Axis::X);
        assert_eq!(swapped.dims(), UVec3::new(2, 3, 4));
        for z in 0..2 {
            for y in 0..3 {
                for x in 0..4 {
                    assert_eq!(swapped.value(z, y, x), volume.value(x, y, z));
                }
            }
        }
    }

    #[test]
    fn test_swap_y_moves_y_into_depth() {
        let volume = ramp(UVec3::new(4, 3, 2));
        let swapped = volume.swapped(Axis::Y);
        assert_eq!(swapped.dims(), UVec3::new(4, 2, 3));
        for z in 0..2 {
            for y in 0..3 {
                for x in 0..4 {
                    assert_eq!(swapped.value(x, z, y), volume.value(x, y, z));
                }
            }
        }
    }

    #[test]
    fn test_swap_z_is_noop() {
        let mut volume = ramp(UVec3::new(3, 4, 5));
        let original = volume.clone();
        volume.swap_axis(Axis::Z);
        assert_eq!(volume, original);
    }

    proptest! {
        #[test]
        fn swap_twice_restores_volume(
            nx in 1u32..7,
            ny in 1u32..7,
            nz in 1u32..7,
            seed in any::<u8>(),
            along_x in any::<bool>(),
        ) {
            let axis = if along_x { Axis::X } else { Axis::Y };
            let dims = UVec3::new(nx, ny, nz);
            let volume = VoxelVolume::from_fn(dims, |x, y, z| {
                (x * 31 + y * 17 + z * 7 + u32::from(seed)) as u8
            })
            .unwrap();

            let mut twice = volume.clone();
            twice.swap_axis(axis);
            twice.swap_axis(axis);
            prop_assert_eq!(twice, volume);
        }
    }
}
