use serde::{Deserialize, Serialize};

use crate::constants::{HORN_MAJOR_RADIUS, HORN_MINOR_RADIUS, TIME_STEP};
use crate::error::ConfigError;
use crate::topology::Topology;

/// Everything one generation run depends on besides the RNG.
///
/// `topology: None` infers the geometry from `point_count`; an explicit
/// topology is checked against the point count instead of silently
/// falling back to a ring.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub point_count: usize,
    pub frame_count: usize,
    pub major_radius: f64,
    pub minor_radius: f64,
    pub flattening_factor: f64,
    pub enable_gain_engine: bool,
    pub topology: Option<Topology>,
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::cube()
    }
}

impl SimulationConfig {
    /// Horn torus, 8-point cube.
    pub fn cube() -> Self {
        Self::horn_torus(8, Topology::Cube)
    }

    /// Horn torus, 4-point tetrahedron.
    pub fn pyramid() -> Self {
        Self::horn_torus(4, Topology::Tetrahedron)
    }

    /// Horn torus, `point_count` points on the equatorial ring.
    pub fn ring(point_count: usize) -> Self {
        Self::horn_torus(point_count, Topology::Ring)
    }

    fn horn_torus(point_count: usize, topology: Topology) -> Self {
        Self {
            point_count,
            frame_count: 50_000,
            major_radius: HORN_MAJOR_RADIUS,
            minor_radius: HORN_MINOR_RADIUS,
            flattening_factor: 1.0,
            enable_gain_engine: true,
            topology: Some(topology),
            seed: None,
        }
    }

    pub fn with_frames(mut self, frame_count: usize) -> Self {
        self.frame_count = frame_count;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_gain_engine(mut self, enabled: bool) -> Self {
        self.enable_gain_engine = enabled;
        self
    }

    /// Requested topology, or the one implied by `point_count`.
    pub fn resolved_topology(&self) -> Topology {
        self.topology
            .unwrap_or_else(|| Topology::infer(self.point_count))
    }

    /// Check every rule and return the topology the run will use.
    pub fn validate(&self) -> Result<Topology, ConfigError> {
        if self.frame_count == 0 {
            return Err(ConfigError::ZeroFrames);
        }
        if self.point_count < 3 {
            return Err(ConfigError::TooFewPoints {
                point_count: self.point_count,
            });
        }
        for (field, value) in [
            ("major_radius", self.major_radius),
            ("minor_radius", self.minor_radius),
            ("flattening_factor", self.flattening_factor),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        if self.minor_radius > self.major_radius {
            return Err(ConfigError::RadiusOrder {
                major_radius: self.major_radius,
                minor_radius: self.minor_radius,
            });
        }

        let topology = self.resolved_topology();
        if !topology.accepts(self.point_count) {
            return Err(ConfigError::TopologyMismatch {
                topology,
                point_count: self.point_count,
            });
        }
        Ok(topology)
    }

    /// Simulated time of a frame.
    pub fn time_of(frame: usize) -> f64 {
        frame as f64 * TIME_STEP
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        assert_eq!(SimulationConfig::cube().validate(), Ok(Topology::Cube));
        assert_eq!(
            SimulationConfig::pyramid().validate(),
            Ok(Topology::Tetrahedron)
        );
        assert_eq!(SimulationConfig::ring(6).validate(), Ok(Topology::Ring));
    }

    #[test]
    fn test_zero_frames_rejected() {
        let config = SimulationConfig::cube().with_frames(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroFrames));
    }

    #[test]
    fn test_non_positive_radius_rejected() {
        let mut config = SimulationConfig::cube();
        config.minor_radius = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive {
                field: "minor_radius",
                ..
            })
        ));

        let mut config = SimulationConfig::cube();
        config.major_radius = f64::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive {
                field: "major_radius",
                ..
            })
        ));
    }

    #[test]
    fn test_radius_order_enforced() {
        let mut config = SimulationConfig::cube();
        config.minor_radius = 12.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::RadiusOrder { .. })
        ));
    }

    #[test]
    fn test_cube_with_five_points_is_an_error() {
        let mut config = SimulationConfig::cube();
        config.point_count = 5;
        assert_eq!(
            config.validate(),
            Err(ConfigError::TopologyMismatch {
                topology: Topology::Cube,
                point_count: 5,
            })
        );
    }

    #[test]
    fn test_inferred_topology() {
        let mut config = SimulationConfig::cube();
        config.topology = None;
        config.point_count = 4;
        assert_eq!(config.validate(), Ok(Topology::Tetrahedron));
        config.point_count = 6;
        assert_eq!(config.validate(), Ok(Topology::Ring));
    }

    #[test]
    fn test_too_few_points() {
        let config = SimulationConfig::ring(2);
        assert_eq!(
            config.validate(),
            Err(ConfigError::TooFewPoints { point_count: 2 })
        );
    }

    #[test]
    fn test_time_of() {
        assert_eq!(SimulationConfig::time_of(0), 0.0);
        assert!((SimulationConfig::time_of(20) - 1.0).abs() < 1e-12);
    }
}
