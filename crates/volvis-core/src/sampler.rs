//! Continuous-domain trilinear sampling of densities and gradients.
//!
//! Positions are in voxel units of the volume: lattice point `(x, y, z)` sits
//! at `DVec3::new(x, y, z)`.

#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::many_single_char_names
)]

use glam::{DVec3, UVec3};

use crate::gradient::GradientField;
use crate::volume::VoxelVolume;

/// Lattice cell containing a continuous position.
#[derive(Debug, Clone, Copy)]
struct Cell {
    base: UVec3,
    frac: DVec3,
}

impl Cell {
    /// Splits a non-negative position into its floor and fractional part.
    fn containing(p: DVec3) -> Self {
        let floor = p.floor();
        Self {
            base: UVec3::new(floor.x as u32, floor.y as u32, floor.z as u32),
            frac: p - floor,
        }
    }

    /// The eight corner offsets paired with their trilinear weights.
    fn corners(self) -> [(UVec3, f64); 8] {
        let DVec3 { x, y, z } = self.frac;
        let (ix, iy, iz) = (1.0 - x, 1.0 - y, 1.0 - z);
        [
            (UVec3::new(0, 0, 0), ix * iy * iz),
            (UVec3::new(1, 0, 0), x * iy * iz),
            (UVec3::new(0, 1, 0), ix * y * iz),
            (UVec3::new(1, 1, 0), x * y * iz),
            (UVec3::new(0, 0, 1), ix * iy * z),
            (UVec3::new(1, 0, 1), x * iy * z),
            (UVec3::new(0, 1, 1), ix * y * z),
            (UVec3::new(1, 1, 1), x * y * z),
        ]
    }
}

/// Trilinearly interpolates the density at `p`.
///
/// Returns 0 when any coordinate is `<= 0` or `>= dim - 1`, where no full
/// lattice cell surrounds the point.
#[must_use]
pub fn sample_density(volume: &VoxelVolume, p: DVec3) -> f64 {
    let upper = volume.dims().as_dvec3() - DVec3::ONE;
    if p.cmple(DVec3::ZERO).any() || p.cmpge(upper).any() {
        return 0.0;
    }

    let cell = Cell::containing(p);
    cell.corners()
        .iter()
        .map(|&(offset, weight)| {
            let q = cell.base + offset;
            f64::from(volume.value(q.x, q.y, q.z)) * weight
        })
        .sum()
}

/// Trilinearly interpolates the gradient at `p`.
///
/// The position is shifted by -1 on every axis to match the field's
/// border-trimmed indexing. Returns `None` when the shifted position falls
/// outside `[0, dim - 3)` on any axis, `dim` being the volume dimension.
#[must_use]
pub fn sample_gradient(field: &GradientField, p: DVec3) -> Option<DVec3> {
    let q = p - DVec3::ONE;
    let upper = field.dims().as_dvec3() - DVec3::ONE;
    if q.cmplt(DVec3::ZERO).any() || q.cmpge(upper).any() {
        return None;
    }

    let cell = Cell::containing(q);
    let data = field.data();
    let gradient = cell
        .corners()
        .iter()
        .fold(DVec3::ZERO, |acc, &(offset, weight)| {
            let c = cell.base + offset;
            let g = data[field.flatten_index(c.x, c.y, c.z)];
            acc + DVec3::new(f64::from(g.x), f64::from(g.y), f64::from(g.z)) * weight
        });
    Some(gradient)
}
