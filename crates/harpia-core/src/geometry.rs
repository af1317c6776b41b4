//! Topology angles → phase and elevation grids → torus coordinates.

use crate::constants::{AZIMUTH_DRIFT, FLUX_COUPLING, PHI, PRECESSION_RATE};
use crate::error::Result;
use crate::grid::Grid;
use crate::topology::BaseAngles;

pub type Point3 = [f64; 3];

/// Elevation per (frame, point): base elevation plus slow precession
/// `t · 0.1 · φ`.
pub fn elevation_grid(angles: &BaseAngles, times: &[f64]) -> Grid {
    Grid::from_fn(times.len(), angles.elevation.len(), |frame, point| {
        angles.elevation[point] + times[frame] * PRECESSION_RATE * PHI
    })
}

/// Pre-filter phase:
/// `azimuth + (singularity + torque) + flux · 0.08 + t · 0.2`.
pub fn ideal_phase(
    angles: &BaseAngles,
    singularity: &Grid,
    torque: &Grid,
    flux: &[f64],
    times: &[f64],
) -> Result<Grid> {
    let perturbation = singularity.zip_map(torque, |s, q| s + q)?;
    perturbation.ensure_shape((times.len(), angles.azimuth.len()))?;
    Ok(Grid::from_fn(
        times.len(),
        angles.azimuth.len(),
        |frame, point| {
            angles.azimuth[point]
                + perturbation.get(frame, point)
                + flux[frame] * FLUX_COUPLING
                + times[frame] * AZIMUTH_DRIFT
        },
    ))
}

/// Torus with a fixed major radius and vertical flattening. The minor radius
/// arrives per cell from the coherence filter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TorusSurface {
    pub major_radius: f64,
    pub flattening_factor: f64,
}

impl TorusSurface {
    pub fn new(major_radius: f64, flattening_factor: f64) -> Self {
        Self {
            major_radius,
            flattening_factor,
        }
    }

    pub fn project(&self, elevation: f64, phase: f64, minor_radius: f64) -> Point3 {
        let effective_major = self.major_radius + minor_radius * elevation.cos();
        [
            effective_major * phase.cos(),
            effective_major * phase.sin(),
            minor_radius * self.flattening_factor * elevation.sin(),
        ]
    }

    /// Project whole grids; output is row-major like the inputs.
    pub fn map(&self, elevation: &Grid, phase: &Grid, minor_radius: &Grid) -> Result<Vec<Point3>> {
        phase.ensure_shape(elevation.shape())?;
        minor_radius.ensure_shape(elevation.shape())?;
        Ok(elevation
            .iter()
            .zip(phase.iter())
            .zip(minor_radius.iter())
            .map(|((e, p), r)| self.project(e, p, r))
            .collect())
    }
}
