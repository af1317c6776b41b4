//! Coherence filter: damps noise, scores coherence, and derives the
//! corrected phase and breathing minor radius.
//!
//! Every cell is independent. A frame's result depends on its own noise and
//! index only, never on earlier frames.

use crate::constants::PHI;
use crate::error::Result;
use crate::grid::Grid;

#[derive(Clone, Debug, PartialEq)]
pub struct CoherenceOutput {
    pub phase: Grid,
    pub radius: Grid,
    pub coherence: Grid,
}

/// Filtered noise and coherence score for one noise sample.
///
/// The filtered magnitude peaks at 1/(1.5e) ≈ 0.245, so the score stays in
/// (0, 1].
pub fn coherence_score(noise: f64) -> (f64, f64) {
    let filtered = noise * (-noise.abs() * 1.5).exp();
    let memory_weight = if noise.abs() > 0.1 { 0.99 } else { 0.95 };
    let long_term = (-filtered.abs() * 0.01).exp();
    let short_term = (-filtered.abs() * 0.5).exp();
    let coherence = memory_weight * long_term + (1.0 - memory_weight) * short_term;
    (filtered, coherence)
}

/// Apply the filter to a `[frames, points]` phase grid; row index is the
/// frame index.
pub fn apply_coherence(
    ideal_phase: &Grid,
    noise: &Grid,
    base_minor_radius: f64,
) -> Result<CoherenceOutput> {
    noise.ensure_shape(ideal_phase.shape())?;
    let (rows, cols) = ideal_phase.shape();

    let mut phase = Vec::with_capacity(rows * cols);
    let mut radius = Vec::with_capacity(rows * cols);
    let mut coherence = Vec::with_capacity(rows * cols);

    for frame in 0..rows {
        let breathing = (frame as f64 / PHI).sin();
        for point in 0..cols {
            let (filtered, score) = coherence_score(noise.get(frame, point));
            phase.push(ideal_phase.get(frame, point) + filtered * (1.0 - score) * 0.01);
            radius.push(base_minor_radius * (1.0 + (1.0 - score) * 0.001 * breathing));
            coherence.push(score);
        }
    }

    Ok(CoherenceOutput {
        phase: Grid::from_vec(rows, cols, phase)?,
        radius: Grid::from_vec(rows, cols, radius)?,
        coherence: Grid::from_vec(rows, cols, coherence)?,
    })
}
