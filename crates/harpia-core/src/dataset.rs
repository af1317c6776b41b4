use serde::Serialize;

use crate::geometry::Point3;
use crate::topology::Topology;

/// Summary columns preceding the per-point coordinates in every row.
pub const SUMMARY_COLUMNS: [&str; 5] = [
    "frame_index",
    "time",
    "global_chaos",
    "mean_gain",
    "oracle_flux",
];

/// Full header for a table of `point_count` points.
pub fn column_names(point_count: usize) -> Vec<String> {
    let mut names: Vec<String> = SUMMARY_COLUMNS.iter().map(|s| s.to_string()).collect();
    for i in 0..point_count {
        for axis in ["x", "y", "z"] {
            names.push(format!("point_{i}_{axis}"));
        }
    }
    names
}

/// Per-frame aggregates. `global_chaos` is the unclamped ramp value.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FrameSummary {
    pub frame_index: usize,
    pub time: f64,
    pub global_chaos: f64,
    pub mean_gain: f64,
    pub oracle_flux: f64,
}

/// Immutable output of one generation run: one row per frame, in frame order.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    topology: Topology,
    point_count: usize,
    rows: Vec<FrameSummary>,
    coords: Vec<Point3>,
}

impl Dataset {
    pub(crate) fn assemble(
        topology: Topology,
        point_count: usize,
        rows: Vec<FrameSummary>,
        coords: Vec<Point3>,
    ) -> Self {
        debug_assert_eq!(coords.len(), rows.len() * point_count);
        Self {
            topology,
            point_count,
            rows,
            coords,
        }
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Topology name as embedded in file names (`cube`, `ring6`, ...).
    pub fn label(&self) -> String {
        self.topology.label(self.point_count)
    }

    pub fn frame_count(&self) -> usize {
        self.rows.len()
    }

    pub fn point_count(&self) -> usize {
        self.point_count
    }

    pub fn column_count(&self) -> usize {
        SUMMARY_COLUMNS.len() + 3 * self.point_count
    }

    pub fn column_names(&self) -> Vec<String> {
        column_names(self.point_count)
    }

    pub fn rows(&self) -> &[FrameSummary] {
        &self.rows
    }

    pub fn row(&self, frame: usize) -> Option<&FrameSummary> {
        self.rows.get(frame)
    }

    /// Coordinates of every point in a frame, in point order.
    pub fn points(&self, frame: usize) -> Option<&[Point3]> {
        if frame >= self.rows.len() {
            return None;
        }
        let start = frame * self.point_count;
        Some(&self.coords[start..start + self.point_count])
    }

    /// All coordinates, row-major `[frame, point]`.
    pub fn coords(&self) -> &[Point3] {
        &self.coords
    }
}

/// Run-level diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RunStats {
    /// Frames on which the phoenix clamp held chaos down.
    pub resets_fenix: usize,
    pub mean_coherence: f64,
    /// Throughput diagnostic, not part of the reproducible output.
    pub frames_per_second: f64,
    pub elapsed_secs: f64,
}
