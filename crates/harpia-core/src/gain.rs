//! Gain engine: turns singularities and (negated) chaos into a stabilizing
//! gain multiplier and a corrective torque.
//!
//! The engine is a trait so a higher-fidelity implementation can replace the
//! local formula without touching downstream stages. Which engine runs is an
//! explicit configuration choice made before the run; a failing engine fails
//! the run instead of being swapped for another formula.

use crate::config::SimulationConfig;
use crate::error::{CoreError, Result};
use crate::grid::Grid;

/// Gain and torque grids, both shaped like the engine's inputs.
#[derive(Clone, Debug, PartialEq)]
pub struct GainField {
    pub gain: Grid,
    pub torque: Grid,
}

pub trait GainEngine: Send + Sync {
    fn name(&self) -> &str;

    /// `singularity` and `negated_chaos` are `[frames, points]`.
    fn evaluate(&self, singularity: &Grid, negated_chaos: &Grid) -> Result<GainField>;
}

/// Closed-form local engine.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalGain;

impl LocalGain {
    /// gain = exp(-|s|·0.01) · (1 + 0.99·tanh(c)) · (1 + 0.2·exp(-|c|))
    pub fn gain(singularity: f64, negated_chaos: f64) -> f64 {
        let base_gain = (-singularity.abs() * 0.01).exp();
        let amplifier = 1.0 + 0.99 * negated_chaos.tanh();
        let boost = 1.0 + 0.2 * (-negated_chaos.abs()).exp();
        base_gain * amplifier * boost
    }
}

impl GainEngine for LocalGain {
    fn name(&self) -> &str {
        "local"
    }

    fn evaluate(&self, singularity: &Grid, negated_chaos: &Grid) -> Result<GainField> {
        let gain = singularity.zip_map(negated_chaos, Self::gain)?;
        let torque = singularity.zip_map(&gain, |s, g| -s * g)?;
        Ok(GainField { gain, torque })
    }
}

/// Disabled engine: gain 1, torque 0 everywhere.
#[derive(Clone, Copy, Debug, Default)]
pub struct PassThrough;

impl GainEngine for PassThrough {
    fn name(&self) -> &str {
        "pass-through"
    }

    fn evaluate(&self, singularity: &Grid, negated_chaos: &Grid) -> Result<GainField> {
        negated_chaos.ensure_shape(singularity.shape())?;
        let (rows, cols) = singularity.shape();
        Ok(GainField {
            gain: Grid::filled(rows, cols, 1.0),
            torque: Grid::zeros(rows, cols),
        })
    }
}

/// Built-in engine selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GainStrategy {
    Local,
    PassThrough,
}

impl GainStrategy {
    pub fn from_config(config: &SimulationConfig) -> Self {
        if config.enable_gain_engine {
            GainStrategy::Local
        } else {
            GainStrategy::PassThrough
        }
    }

    pub fn engine(self) -> Box<dyn GainEngine> {
        match self {
            GainStrategy::Local => Box::new(LocalGain),
            GainStrategy::PassThrough => Box::new(PassThrough),
        }
    }
}

/// Run an engine and reject any output whose shape differs from its input.
pub(crate) fn evaluate_checked(
    engine: &dyn GainEngine,
    singularity: &Grid,
    negated_chaos: &Grid,
) -> Result<GainField> {
    let field = engine.evaluate(singularity, negated_chaos)?;
    for grid in [&field.gain, &field.torque] {
        grid.ensure_shape(singularity.shape())
            .map_err(|e| CoreError::Gain {
                engine: engine.name().to_string(),
                reason: e.to_string(),
            })?;
    }
    Ok(field)
}
