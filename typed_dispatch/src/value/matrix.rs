//! Sparse matrix storage.
//!
//! Dense matrices are plain `nalgebra::DMatrix<f64>`; this module only adds the
//! compressed-column form so the two storage kinds are distinct runtime types.

use std::fmt;

use nalgebra::DMatrix;

/// Compressed sparse column matrix of `f64`.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseMatrix {
    values: Vec<f64>,
    row_indices: Vec<usize>,
    /// `col_ptr[j]..col_ptr[j + 1]` indexes the entries of column `j`.
    col_ptr: Vec<usize>,
    rows: usize,
    cols: usize,
}

impl SparseMatrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            values: Vec::new(),
            row_indices: Vec::new(),
            col_ptr: vec![0; cols + 1],
            rows,
            cols,
        }
    }

    pub fn from_dense(dense: &DMatrix<f64>) -> Self {
        let (rows, cols) = dense.shape();
        let mut values = Vec::new();
        let mut row_indices = Vec::new();
        let mut col_ptr = Vec::with_capacity(cols + 1);
        col_ptr.push(0);
        for c in 0..cols {
            for r in 0..rows {
                let v = dense[(r, c)];
                if v != 0.0 {
                    values.push(v);
                    row_indices.push(r);
                }
            }
            col_ptr.push(values.len());
        }
        Self {
            values,
            row_indices,
            col_ptr,
            rows,
            cols,
        }
    }

    pub fn to_dense(&self) -> DMatrix<f64> {
        let mut dense = DMatrix::zeros(self.rows, self.cols);
        for c in 0..self.cols {
            for k in self.col_ptr[c]..self.col_ptr[c + 1] {
                dense[(self.row_indices[k], c)] = self.values[k];
            }
        }
        dense
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Number of stored (non-zero) entries.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        if row >= self.rows || col >= self.cols {
            return 0.0;
        }
        (self.col_ptr[col]..self.col_ptr[col + 1])
            .find(|&k| self.row_indices[k] == row)
            .map_or(0.0, |k| self.values[k])
    }
}

impl fmt::Display for SparseMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SparseMatrix {}x{} (nnz {})",
            self.rows,
            self.cols,
            self.nnz()
        )
    }
}
