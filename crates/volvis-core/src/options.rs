//! Configuration options for rendering.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::acceleration::DEFAULT_BLOCK_SIZE;
use crate::error::{Result, VolumeError};

/// Smallest accepted depth step between fine samples, in voxels.
pub const MIN_SAMPLING_DISTANCE: f64 = 1e-6;

/// Which qualifying sample along a ray shades the isosurface pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HitPolicy {
    /// March the whole ray; the deepest qualifying sample wins.
    #[default]
    LastHit,
    /// Stop at the first qualifying sample (front surface).
    FirstHit,
}

/// Options shared by the renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Output image edge length in pixels.
    pub resolution: u32,

    /// Pixels per voxel: pixel `(i, j)` samples volume position `(i / zoom, j / zoom)`.
    pub zoom: f64,

    /// Depth step between fine samples, in voxels; at least [`MIN_SAMPLING_DISTANCE`].
    pub sampling_distance: f64,

    /// Edge length of an acceleration block, in voxels.
    pub block_size: u32,

    /// Softening constant `K` of the contour mapping `255 * s / (K + s)`.
    pub contour_softening: f64,

    /// Isosurface hit policy.
    pub hit_policy: HitPolicy,

    /// Worker threads for rendering; `None` uses the global pool.
    pub threads: Option<usize>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            resolution: 1024,
            zoom: 4.0,
            sampling_distance: 0.25,
            block_size: DEFAULT_BLOCK_SIZE,
            contour_softening: 20_000.0,
            hit_policy: HitPolicy::LastHit,
            threads: None,
        }
    }
}

impl RenderOptions {
    /// Reads options from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let options: Self = serde_json::from_str(&text)?;
        options.validate()?;
        Ok(options)
    }

    /// Checks that every option is usable.
    pub fn validate(&self) -> Result<()> {
        if self.resolution == 0 {
            return Err(VolumeError::InvalidOption(
                "resolution must be positive".into(),
            ));
        }
        if !(self.zoom.is_finite() && self.zoom > 0.0) {
            return Err(VolumeError::InvalidOption(format!(
                "zoom must be positive and finite, got {}",
                self.zoom
            )));
        }
        if !(self.sampling_distance.is_finite() && self.sampling_distance >= MIN_SAMPLING_DISTANCE)
        {
            return Err(VolumeError::InvalidOption(format!(
                "sampling distance must be finite and at least {MIN_SAMPLING_DISTANCE}, got {}",
                self.sampling_distance
            )));
        }
        if !(self.contour_softening.is_finite() && self.contour_softening > 0.0) {
            return Err(VolumeError::InvalidOption(format!(
                "contour softening must be positive and finite, got {}",
                self.contour_softening
            )));
        }
        if self.block_size == 0 {
            return Err(VolumeError::InvalidBlockSize);
        }
        if self.threads == Some(0) {
            return Err(VolumeError::InvalidOption(
                "thread count must be positive".into(),
            ));
        }
        Ok(())
    }
}
