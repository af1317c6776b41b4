use std::fmt;

use crate::topology::Topology;

/// A configuration rule that failed before any array was allocated.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    ZeroFrames,
    TooFewPoints {
        point_count: usize,
    },
    NonPositive {
        field: &'static str,
        value: f64,
    },
    RadiusOrder {
        major_radius: f64,
        minor_radius: f64,
    },
    TopologyMismatch {
        topology: Topology,
        point_count: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroFrames => write!(f, "frame_count must be positive"),
            ConfigError::TooFewPoints { point_count } => {
                write!(f, "point_count must be at least 3, got {point_count}")
            }
            ConfigError::NonPositive { field, value } => {
                write!(f, "{field} must be a positive finite number, got {value}")
            }
            ConfigError::RadiusOrder {
                major_radius,
                minor_radius,
            } => write!(
                f,
                "minor_radius ({minor_radius}) must not exceed major_radius ({major_radius})"
            ),
            ConfigError::TopologyMismatch {
                topology,
                point_count,
            } => match topology.required_points() {
                Some(required) => write!(
                    f,
                    "{topology} topology needs exactly {required} points, got {point_count}"
                ),
                None => write!(f, "{topology} topology cannot use {point_count} points"),
            },
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug)]
pub enum CoreError {
    Config(ConfigError),
    Gain {
        engine: String,
        reason: String,
    },
    Shape {
        expected: (usize, usize),
        actual: (usize, usize),
    },
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::Config(e) => write!(f, "invalid configuration: {e}"),
            CoreError::Gain { engine, reason } => {
                write!(f, "gain engine '{engine}' failed: {reason}")
            }
            CoreError::Shape { expected, actual } => write!(
                f,
                "grid shape mismatch: expected {}x{}, got {}x{}",
                expected.0, expected.1, actual.0, actual.1
            ),
        }
    }
}

impl std::error::Error for CoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CoreError::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for CoreError {
    fn from(e: ConfigError) -> Self {
        CoreError::Config(e)
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
