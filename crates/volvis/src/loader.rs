//! Raw 8-bit volume files.
//!
//! A raw file is `header_size` bytes of ignored header followed by one
//! unsigned byte per sample. Where sample `(i, j, k)` lives depends on the
//! [`RawLayout`].

use std::path::Path;

use glam::UVec3;
use volvis_core::{VolumeError, VoxelVolume};

use crate::error::LoadError;

/// Byte layout of the samples after the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RawLayout {
    /// Slices packed back to back: offset `k * sx * sy + j * sx + i`.
    #[default]
    Packed,
    /// Slice stride fixed at `256 * sy`: offset `k * 256 * sy + j * sx + i`.
    ///
    /// Matches files produced with a hard-coded 256 slice width;
    /// identical to [`RawLayout::Packed`] when `sx == 256`.
    Legacy256,
}

impl RawLayout {
    fn slice_stride(self, dims: UVec3) -> usize {
        let sy = dims.y as usize;
        match self {
            RawLayout::Packed => dims.x as usize * sy,
            RawLayout::Legacy256 => 256 * sy,
        }
    }
}

/// Reads raw volumes with known dimensions and header size.
#[derive(Debug, Clone, Copy)]
pub struct RawVolumeLoader {
    dims: UVec3,
    header_size: usize,
    layout: RawLayout,
}

impl RawVolumeLoader {
    /// Creates a loader for `dims` samples after `header_size` header bytes.
    #[must_use]
    pub fn new(dims: UVec3, header_size: usize) -> Self {
        Self {
            dims,
            header_size,
            layout: RawLayout::default(),
        }
    }

    /// Sets the byte layout.
    #[must_use]
    pub fn with_layout(mut self, layout: RawLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Number of bytes a file must hold for this layout.
    pub fn required_len(&self) -> Result<usize, LoadError> {
        if self.dims.cmpeq(UVec3::ZERO).any() {
            return Err(VolumeError::EmptyDimension(self.dims).into());
        }
        let last = self.dims - UVec3::ONE;
        Ok(self.offset(last.x, last.y, last.z) + 1)
    }

    fn offset(&self, i: u32, j: u32, k: u32) -> usize {
        self.header_size
            + k as usize * self.layout.slice_stride(self.dims)
            + j as usize * self.dims.x as usize
            + i as usize
    }

    /// Reads and decodes the file at `path`.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<VoxelVolume, LoadError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!(
            "read {} bytes from {} ({:?} layout, {} header bytes)",
            bytes.len(),
            path.display(),
            self.layout,
            self.header_size
        );
        self.decode(&bytes).map_err(|err| match err {
            LoadError::Truncated {
                expected, actual, ..
            } => LoadError::Truncated {
                path: path.to_path_buf(),
                expected,
                actual,
            },
            other => other,
        })
    }

    /// Decodes an in-memory raw file.
    pub fn decode(&self, bytes: &[u8]) -> Result<VoxelVolume, LoadError> {
        let expected = self.required_len()?;
        if bytes.len() < expected {
            return Err(LoadError::Truncated {
                path: "<memory>".into(),
                expected,
                actual: bytes.len(),
            });
        }

        let samples = match self.layout {
            RawLayout::Packed => {
                let len = self.dims.x as usize * self.dims.y as usize * self.dims.z as usize;
                bytes[self.header_size..self.header_size + len].to_vec()
            }
            RawLayout::Legacy256 => {
                let sx = self.dims.x as usize;
                let mut samples = Vec::with_capacity(sx * self.dims.y as usize * self.dims.z as usize);
                for k in 0..self.dims.z {
                    for j in 0..self.dims.y {
                        let start = self.offset(0, j, k);
                        samples.extend_from_slice(&bytes[start..start + sx]);
                    }
                }
                samples
            }
        };

        if bytes.len() > expected {
            log::debug!("ignoring {} trailing bytes", bytes.len() - expected);
        }
        Ok(VoxelVolume::new(self.dims, samples)?)
    }
}
