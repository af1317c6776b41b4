//! Row-major `[frames, points]` matrix shared by every pipeline stage.
//!
//! Stages are element-wise over the whole grid; rows are frames, columns are
//! points. Nothing in the pipeline carries state from one row to the next.

use crate::error::{CoreError, Result};

#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Grid {
    pub fn filled(rows: usize, cols: usize, value: f64) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, 0.0)
    }

    /// Build from `f(row, col)`, visiting cells in row-major order.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                data.push(f(r, c));
            }
        }
        Self { rows, cols, data }
    }

    /// Broadcast a per-row series across every column.
    pub fn broadcast_rows(series: &[f64], cols: usize) -> Self {
        Self::from_fn(series.len(), cols, |r, _| series[r])
    }

    /// Broadcast a per-column series down every row.
    pub fn broadcast_cols(series: &[f64], rows: usize) -> Self {
        Self::from_fn(rows, series.len(), |_, c| series[c])
    }

    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(CoreError::Shape {
                expected: (rows, cols),
                actual: (data.len() / cols.max(1), cols),
            });
        }
        Ok(Self { rows, cols, data })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.data.iter().copied()
    }

    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Element-wise combination of two grids of the same shape.
    pub fn zip_map(&self, other: &Self, f: impl Fn(f64, f64) -> f64) -> Result<Self> {
        self.ensure_shape(other.shape())?;
        Ok(Self {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(&a, &b)| f(a, b))
                .collect(),
        })
    }

    pub fn ensure_shape(&self, expected: (usize, usize)) -> Result<()> {
        if self.shape() != expected {
            return Err(CoreError::Shape {
                expected,
                actual: self.shape(),
            });
        }
        Ok(())
    }

    pub fn row_means(&self) -> Vec<f64> {
        (0..self.rows)
            .map(|r| self.row(r).iter().sum::<f64>() / self.cols as f64)
            .collect()
    }

    pub fn mean(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.data.iter().sum::<f64>() / self.data.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_layout() {
        let g = Grid::from_fn(2, 3, |r, c| (r * 10 + c) as f64);
        assert_eq!(g.as_slice(), &[0.0, 1.0, 2.0, 10.0, 11.0, 12.0]);
        assert_eq!(g.row(1), &[10.0, 11.0, 12.0]);
        assert_eq!(g.get(1, 2), 12.0);
    }

    #[test]
    fn test_broadcast() {
        let rows = Grid::broadcast_rows(&[1.0, 2.0], 3);
        assert_eq!(rows.shape(), (2, 3));
        assert_eq!(rows.row(1), &[2.0, 2.0, 2.0]);

        let cols = Grid::broadcast_cols(&[1.0, 2.0, 3.0], 2);
        assert_eq!(cols.shape(), (2, 3));
        assert_eq!(cols.row(0), cols.row(1));
    }

    #[test]
    fn test_zip_map_rejects_shape_mismatch() {
        let a = Grid::zeros(2, 3);
        let b = Grid::zeros(3, 2);
        assert!(matches!(
            a.zip_map(&b, |x, y| x + y),
            Err(CoreError::Shape { .. })
        ));
    }

    #[test]
    fn test_from_vec_length_checked() {
        assert!(Grid::from_vec(2, 2, vec![0.0; 4]).is_ok());
        assert!(Grid::from_vec(2, 2, vec![0.0; 3]).is_err());
    }

    #[test]
    fn test_means() {
        let g = Grid::from_fn(2, 2, |r, c| (r * 2 + c) as f64);
        assert_eq!(g.row_means(), vec![0.5, 2.5]);
        assert_eq!(g.mean(), 1.5);
        assert_eq!(Grid::zeros(0, 4).mean(), 0.0);
    }
}
