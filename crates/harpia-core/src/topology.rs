use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, FRAC_PI_6, PI, TAU};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Mapping from point index to base elevation/azimuth on the torus.
///
/// Point ordering is part of the output contract: downstream renderers draw
/// fixed edge lists against these indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    /// 4 points: point 0 is the apex, points 1..=3 the base triangle.
    #[serde(alias = "pyramid")]
    Tetrahedron,
    /// 8 points: 0..=3 bottom ring, 4..=7 top ring.
    Cube,
    /// N points evenly spaced in azimuth on the equator.
    Ring,
}

/// Per-point base angles, before time-dependent precession.
#[derive(Clone, Debug, PartialEq)]
pub struct BaseAngles {
    pub elevation: Vec<f64>,
    pub azimuth: Vec<f64>,
}

const TETRAHEDRON_EDGES: [(usize, usize); 6] = [(1, 2), (2, 3), (3, 1), (0, 1), (0, 2), (0, 3)];

const CUBE_EDGES: [(usize, usize); 12] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 0),
    (4, 5),
    (5, 6),
    (6, 7),
    (7, 4),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

impl Topology {
    /// Topology implied by a bare point count: 4 → tetrahedron, 8 → cube,
    /// anything else → ring.
    pub fn infer(point_count: usize) -> Self {
        match point_count {
            4 => Topology::Tetrahedron,
            8 => Topology::Cube,
            _ => Topology::Ring,
        }
    }

    /// Exact point count this topology needs, if it is fixed.
    pub fn required_points(self) -> Option<usize> {
        match self {
            Topology::Tetrahedron => Some(4),
            Topology::Cube => Some(8),
            Topology::Ring => None,
        }
    }

    pub fn accepts(self, point_count: usize) -> bool {
        match self.required_points() {
            Some(required) => point_count == required,
            None => point_count >= 3,
        }
    }

    /// Name embedded in output file names. Rings carry their size.
    pub fn label(self, point_count: usize) -> String {
        match self {
            Topology::Ring => format!("ring{point_count}"),
            other => other.to_string(),
        }
    }

    pub fn base_angles(self, point_count: usize) -> BaseAngles {
        match self {
            Topology::Tetrahedron => BaseAngles {
                elevation: vec![FRAC_PI_2, -FRAC_PI_6, -FRAC_PI_6, -FRAC_PI_6],
                azimuth: vec![0.0, 0.0, 2.0 * PI / 3.0, 4.0 * PI / 3.0],
            },
            Topology::Cube => {
                let ring = [0.0, FRAC_PI_2, PI, 3.0 * FRAC_PI_2];
                BaseAngles {
                    elevation: [FRAC_PI_4; 4]
                        .into_iter()
                        .chain([-FRAC_PI_4; 4])
                        .collect(),
                    azimuth: ring.into_iter().chain(ring).collect(),
                }
            }
            Topology::Ring => BaseAngles {
                elevation: vec![0.0; point_count],
                azimuth: (0..point_count)
                    .map(|i| i as f64 * (TAU / point_count as f64))
                    .collect(),
            },
        }
    }

    /// Point-index pairs a renderer connects. Rings have no fixed edges.
    pub fn edges(self) -> &'static [(usize, usize)] {
        match self {
            Topology::Tetrahedron => &TETRAHEDRON_EDGES,
            Topology::Cube => &CUBE_EDGES,
            Topology::Ring => &[],
        }
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Topology::Tetrahedron => "tetrahedron",
            Topology::Cube => "cube",
            Topology::Ring => "ring",
        };
        f.write_str(name)
    }
}

impl FromStr for Topology {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tetrahedron" | "pyramid" => Ok(Topology::Tetrahedron),
            "cube" => Ok(Topology::Cube),
            "ring" => Ok(Topology::Ring),
            other => Err(format!("unknown topology '{other}'")),
        }
    }
}
