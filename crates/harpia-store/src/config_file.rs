//! Layered run configuration.
//!
//! A run starts from a built-in preset, then applies an optional TOML file,
//! then explicit command-line overrides. Every layer is a `ConfigOverrides`;
//! later layers win field by field.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use harpia_core::{SimulationConfig, Topology};
use serde::Deserialize;

use crate::error::{Result, StoreError};

/// Built-in starting points, both on the horn torus.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// 4-point tetrahedron.
    Pyramid,
    /// 8-point cube.
    #[default]
    Cube,
}

impl Preset {
    pub fn config(self) -> SimulationConfig {
        match self {
            Preset::Pyramid => SimulationConfig::pyramid(),
            Preset::Cube => SimulationConfig::cube(),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Preset::Pyramid => write!(f, "pyramid"),
            Preset::Cube => write!(f, "cube"),
        }
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pyramid" | "tetrahedron" => Ok(Preset::Pyramid),
            "cube" => Ok(Preset::Cube),
            other => Err(format!("unknown preset '{other}'")),
        }
    }
}

/// One configuration layer. Unset fields leave the layer below untouched.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverrides {
    pub preset: Option<Preset>,
    pub point_count: Option<usize>,
    pub frame_count: Option<usize>,
    pub major_radius: Option<f64>,
    pub minor_radius: Option<f64>,
    pub flattening_factor: Option<f64>,
    pub enable_gain_engine: Option<bool>,
    pub topology: Option<Topology>,
    pub seed: Option<u64>,
}

impl ConfigOverrides {
    /// Apply this layer on top of `base`.
    ///
    /// Changing `point_count` without naming a topology drops the inherited
    /// topology so it is re-inferred from the new count.
    pub fn apply(&self, base: SimulationConfig) -> SimulationConfig {
        let mut config = match self.preset {
            Some(preset) => preset.config(),
            None => base,
        };
        if let Some(n) = self.point_count {
            config.point_count = n;
            config.topology = None;
        }
        if let Some(topology) = self.topology {
            config.topology = Some(topology);
        }
        if let Some(frames) = self.frame_count {
            config.frame_count = frames;
        }
        if let Some(r) = self.major_radius {
            config.major_radius = r;
        }
        if let Some(r) = self.minor_radius {
            config.minor_radius = r;
        }
        if let Some(f) = self.flattening_factor {
            config.flattening_factor = f;
        }
        if let Some(enabled) = self.enable_gain_engine {
            config.enable_gain_engine = enabled;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        config
    }
}

pub fn parse_overrides(content: &str) -> Result<ConfigOverrides> {
    Ok(toml::from_str(content)?)
}

pub fn load_overrides(path: &Path) -> Result<ConfigOverrides> {
    let content = fs::read_to_string(path).map_err(|e| {
        StoreError::Config(format!("failed to read {}: {e}", path.display()))
    })?;
    let overrides = parse_overrides(&content)?;
    tracing::debug!("loaded config layer from {}", path.display());
    Ok(overrides)
}
