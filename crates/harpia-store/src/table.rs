//! Delimited text table: header row, one row per frame, fixed six-decimal
//! floats. The writer is the byte format the integrity hash covers; the
//! reader rebuilds the `[frame, point, 3]` coordinate tensor a renderer
//! consumes.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use harpia_core::{Dataset, FrameSummary, Point3, SUMMARY_COLUMNS, Topology, column_names};

use crate::error::{Result, StoreError};

pub fn write_table(dataset: &Dataset, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", dataset.column_names().join(","))?;

    let points = dataset.coords().chunks(dataset.point_count());
    for (row, frame_points) in dataset.rows().iter().zip(points) {
        write!(
            out,
            "{},{:.6},{:.6},{:.6},{:.6}",
            row.frame_index, row.time, row.global_chaos, row.mean_gain, row.oracle_flux
        )?;
        for [x, y, z] in frame_points {
            write!(out, ",{x:.6},{y:.6},{z:.6}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Serialize a dataset to the exact bytes that get written and hashed.
pub fn to_table_bytes(dataset: &Dataset) -> io::Result<Vec<u8>> {
    // Row width is bounded by ~12 bytes per value.
    let mut buf = Vec::with_capacity(dataset.frame_count() * dataset.column_count() * 12);
    write_table(dataset, &mut buf)?;
    Ok(buf)
}

/// A table read back from disk.
#[derive(Clone, Debug, PartialEq)]
pub struct Trajectory {
    pub rows: Vec<FrameSummary>,
    pub point_count: usize,
    topology: Topology,
    coords: Vec<Point3>,
}

impl Trajectory {
    pub fn frame_count(&self) -> usize {
        self.rows.len()
    }

    pub fn points(&self, frame: usize) -> Option<&[Point3]> {
        let start = frame.checked_mul(self.point_count)?;
        self.coords.get(start..start.checked_add(self.point_count)?)
    }

    /// Topology the table was written with, or the one its point count
    /// implies when that is unknown.
    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Reinterpret the table under an explicit topology.
    pub fn with_topology(mut self, topology: Topology) -> Result<Self> {
        if !topology.accepts(self.point_count) {
            return Err(StoreError::InvalidData(format!(
                "{topology} topology does not fit {} points",
                self.point_count
            )));
        }
        self.topology = topology;
        Ok(self)
    }

    /// Length of every edge of the topology in one frame.
    pub fn edge_lengths(&self, frame: usize) -> Option<Vec<f64>> {
        let points = self.points(frame)?;
        Some(
            self.topology
                .edges()
                .iter()
                .map(|&(a, b)| distance(points[a], points[b]))
                .collect(),
        )
    }
}

fn distance(a: Point3, b: Point3) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Read a table from disk. The topology comes from the exporter's file name
/// (`dataset_{label}_{N}frames.csv`) when it parses, else from the point count.
pub fn read_table_file(path: &Path) -> Result<Trajectory> {
    let file = File::open(path)?;
    let trajectory = read_table(BufReader::new(file))?;

    let Some((topology, ring_points)) = topology_from_file_name(path) else {
        tracing::debug!("no topology in {}, inferring", path.display());
        return Ok(trajectory);
    };
    if let Some(n) = ring_points
        && n != trajectory.point_count
    {
        return Err(StoreError::InvalidData(format!(
            "file name says ring{n}, table has {} points",
            trajectory.point_count
        )));
    }
    trajectory.with_topology(topology)
}

/// Topology label from an exported file name, plus the ring size it embeds.
fn topology_from_file_name(path: &Path) -> Option<(Topology, Option<usize>)> {
    let stem = path.file_stem()?.to_str()?;
    let (label, frames) = stem.strip_prefix("dataset_")?.rsplit_once('_')?;
    frames.strip_suffix("frames")?.parse::<usize>().ok()?;

    match label.strip_prefix("ring") {
        Some(n) => Some((Topology::Ring, Some(n.parse().ok()?))),
        None => Some((label.parse().ok()?, None)),
    }
}

pub fn read_table(reader: impl BufRead) -> Result<Trajectory> {
    let mut lines = reader.lines();
    let header = lines
        .next()
        .ok_or_else(|| StoreError::InvalidData("empty table".into()))??;
    let point_count = parse_header(&header)?;
    let width = SUMMARY_COLUMNS.len() + 3 * point_count;

    let mut rows = Vec::new();
    let mut coords = Vec::new();

    for (line_no, line) in lines.enumerate() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != width {
            return Err(StoreError::InvalidData(format!(
                "row {}: expected {width} fields, got {}",
                line_no + 1,
                fields.len()
            )));
        }

        let frame_index: usize = fields[0].parse().map_err(|_| {
            StoreError::InvalidData(format!("row {}: bad frame index '{}'", line_no + 1, fields[0]))
        })?;
        if frame_index != rows.len() {
            return Err(StoreError::InvalidData(format!(
                "row {}: frame {frame_index} out of order",
                line_no + 1
            )));
        }

        let values = fields[1..]
            .iter()
            .map(|f| parse_float(f, line_no + 1))
            .collect::<Result<Vec<f64>>>()?;

        rows.push(FrameSummary {
            frame_index,
            time: values[0],
            global_chaos: values[1],
            mean_gain: values[2],
            oracle_flux: values[3],
        });
        coords.extend(values[4..].chunks_exact(3).map(|c| [c[0], c[1], c[2]]));
    }

    if rows.is_empty() {
        return Err(StoreError::InvalidData("table has no frames".into()));
    }

    Ok(Trajectory {
        rows,
        point_count,
        topology: Topology::infer(point_count),
        coords,
    })
}

/// Validate the header and return the point count it declares.
fn parse_header(header: &str) -> Result<usize> {
    let names: Vec<&str> = header.split(',').collect();
    if names.len() < SUMMARY_COLUMNS.len()
        || (names.len() - SUMMARY_COLUMNS.len()) % 3 != 0
    {
        return Err(StoreError::InvalidData(format!(
            "header has {} columns, expected 5 + 3 per point",
            names.len()
        )));
    }
    let point_count = (names.len() - SUMMARY_COLUMNS.len()) / 3;
    if point_count == 0 {
        return Err(StoreError::InvalidData("header declares no points".into()));
    }
    let expected = column_names(point_count);
    if let Some((got, want)) = names.iter().zip(&expected).find(|(g, w)| **g != w.as_str()) {
        return Err(StoreError::InvalidData(format!(
            "unexpected column '{got}', expected '{want}'"
        )));
    }
    Ok(point_count)
}

fn parse_float(field: &str, row: usize) -> Result<f64> {
    field
        .parse()
        .map_err(|_| StoreError::InvalidData(format!("row {row}: bad number '{field}'")))
}
