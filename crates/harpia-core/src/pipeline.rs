//! One generation run, start to finish.
//!
//! Stage order:
//! 1. Validate the config (before any allocation).
//! 2. Time vector and oracle flux per frame.
//! 3. Chaos ramp with phoenix clamp; interference burst.
//! 4. Singularities (the only RNG draw).
//! 5. Gain engine on (singularity, -chaos).
//! 6. Ideal phase, coherence filter, torus projection.
//! 7. Pack rows and run statistics.
//!
//! Each call owns all of its intermediate grids; nothing is shared between
//! calls, so concurrent runs need no coordination.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::coherence::apply_coherence;
use crate::config::SimulationConfig;
use crate::constants::SINGULARITY_NOISE_COUPLING;
use crate::dataset::{Dataset, FrameSummary, RunStats};
use crate::error::Result;
use crate::gain::{GainEngine, GainStrategy, evaluate_checked};
use crate::geometry::{Point3, TorusSurface, elevation_grid, ideal_phase};
use crate::grid::Grid;
use crate::oracle::FluxOracle;
use crate::schedule::{ChaosSchedule, NoiseWindow};
use crate::singularity::sample_singularities;

/// Dataset plus the run statistics handed back to the caller.
#[derive(Clone, Debug)]
pub struct Generation {
    pub dataset: Dataset,
    pub stats: RunStats,
}

/// Every intermediate value for one (frame, point) cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointState {
    pub frame_index: usize,
    pub point_index: usize,
    pub elevation: f64,
    pub azimuth: f64,
    pub singularity: f64,
    pub gain: f64,
    pub torque: f64,
    pub phase: f64,
    pub radius: f64,
    pub coherence: f64,
    pub position: Point3,
}

struct Stages {
    elevation: Grid,
    azimuth: Vec<f64>,
    singularity: Grid,
    gain: Grid,
    torque: Grid,
    phase: Grid,
    radius: Grid,
    coherence: Grid,
}

impl Stages {
    fn point_states(&self, coords: &[Point3]) -> Vec<PointState> {
        let (rows, cols) = self.elevation.shape();
        let mut states = Vec::with_capacity(rows * cols);
        for frame in 0..rows {
            for point in 0..cols {
                states.push(PointState {
                    frame_index: frame,
                    point_index: point,
                    elevation: self.elevation.get(frame, point),
                    azimuth: self.azimuth[point],
                    singularity: self.singularity.get(frame, point),
                    gain: self.gain.get(frame, point),
                    torque: self.torque.get(frame, point),
                    phase: self.phase.get(frame, point),
                    radius: self.radius.get(frame, point),
                    coherence: self.coherence.get(frame, point),
                    position: coords[frame * cols + point],
                });
            }
        }
        states
    }
}

/// RNG for a config: seeded when `config.seed` is set, OS entropy otherwise.
pub fn rng_for(config: &SimulationConfig) -> StdRng {
    match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Generate with the engine the config selects.
pub fn generate(config: &SimulationConfig, rng: &mut impl Rng) -> Result<Generation> {
    let engine = GainStrategy::from_config(config).engine();
    generate_with(config, engine.as_ref(), rng)
}

/// Generate with a caller-supplied gain engine.
pub fn generate_with(
    config: &SimulationConfig,
    engine: &dyn GainEngine,
    rng: &mut impl Rng,
) -> Result<Generation> {
    run(config, engine, rng).map(|(generation, _)| generation)
}

/// Like [`generate_with`], also returning every per-cell intermediate.
pub fn generate_traced(
    config: &SimulationConfig,
    engine: &dyn GainEngine,
    rng: &mut impl Rng,
) -> Result<(Generation, Vec<PointState>)> {
    let (generation, stages) = run(config, engine, rng)?;
    let states = stages.point_states(generation.dataset.coords());
    Ok((generation, states))
}

fn run(
    config: &SimulationConfig,
    engine: &dyn GainEngine,
    rng: &mut impl Rng,
) -> Result<(Generation, Stages)> {
    let topology = config.validate()?;
    let start = Instant::now();

    let frames = config.frame_count;
    let points = config.point_count;

    let times: Vec<f64> = (0..frames).map(SimulationConfig::time_of).collect();
    let flux = FluxOracle::default().evaluate(&times);

    let chaos = ChaosSchedule::new(frames);
    let chaos_base = chaos.base_series();
    let chaos_effective = chaos.effective_series();
    let resets_fenix = chaos.clamped_frames();
    let noise = NoiseWindow::new(frames).series();

    let singularity = sample_singularities(&chaos_effective, points, rng);

    let negated_chaos = Grid::broadcast_rows(&chaos_effective, points).map(|c| -c);
    let field = evaluate_checked(engine, &singularity, &negated_chaos)?;

    let angles = topology.base_angles(points);
    let elevation = elevation_grid(&angles, &times);
    let phase = ideal_phase(&angles, &singularity, &field.torque, &flux, &times)?;

    let total_noise = Grid::broadcast_rows(&noise, points)
        .zip_map(&singularity, |n, s| n + s * SINGULARITY_NOISE_COUPLING)?;
    let filtered = apply_coherence(&phase, &total_noise, config.minor_radius)?;

    let torus = TorusSurface::new(config.major_radius, config.flattening_factor);
    let coords = torus.map(&elevation, &filtered.phase, &filtered.radius)?;

    let mean_gain = field.gain.row_means();
    let rows = (0..frames)
        .map(|f| FrameSummary {
            frame_index: f,
            time: times[f],
            global_chaos: chaos_base[f],
            mean_gain: mean_gain[f],
            oracle_flux: flux[f],
        })
        .collect();

    let elapsed = start.elapsed().as_secs_f64();
    let stats = RunStats {
        resets_fenix,
        mean_coherence: filtered.coherence.mean(),
        frames_per_second: if elapsed > 0.0 {
            frames as f64 / elapsed
        } else {
            f64::INFINITY
        },
        elapsed_secs: elapsed,
    };

    let stages = Stages {
        elevation,
        azimuth: angles.azimuth,
        singularity,
        gain: field.gain,
        torque: field.torque,
        phase: filtered.phase,
        radius: filtered.radius,
        coherence: filtered.coherence,
    };

    let dataset = Dataset::assemble(topology, points, rows, coords);
    Ok((Generation { dataset, stats }, stages))
}
