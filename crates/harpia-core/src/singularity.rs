use rand::Rng;

use crate::constants::SINGULARITY_SCALE;
use crate::grid::Grid;

/// Draw one uniform `[0, 1)` value per (frame, point), row-major, scaled by
/// `0.1 * effective_chaos[frame]`.
///
/// This is the pipeline's only randomness; the draw order is fixed so a
/// seeded RNG reproduces the grid bit for bit.
pub fn sample_singularities(
    effective_chaos: &[f64],
    point_count: usize,
    rng: &mut impl Rng,
) -> Grid {
    Grid::from_fn(effective_chaos.len(), point_count, |frame, _| {
        rng.random::<f64>() * (effective_chaos[frame] * SINGULARITY_SCALE)
    })
}
