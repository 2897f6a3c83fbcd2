use std::{fmt, ops::Range};

use serde::{Deserialize, Serialize};

use crate::{MatrixError, Result};

/// A rectangular dense matrix, row-major.
///
/// Rectangularity is an invariant of construction: every public
/// constructor (including deserialization) rejects ragged input, so code
/// holding a `Matrix` never re-validates row widths.
///
/// On the wire a matrix is an array of arrays of numbers, which is also
/// why cells are `f64`: JSON numbers arrive as floats, and `f64` keeps
/// small integer products exact so equality checks stay meaningful.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct Matrix {
    rows: Vec<Vec<f64>>,
}

impl Matrix {
    /// Builds a matrix from its rows.
    ///
    /// # Errors
    /// Returns `MatrixError::Ragged` if any row differs in width from the
    /// first one.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let expected = rows.first().map(Vec::len).unwrap_or_default();

        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != expected {
                return Err(MatrixError::Ragged {
                    row,
                    got: cells.len(),
                    expected,
                });
            }
        }

        Ok(Self { rows })
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns. A matrix with no rows has zero columns.
    pub fn cols(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or_default()
    }

    /// Borrows the rows as slices.
    pub fn as_rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Consumes the matrix and returns its rows.
    pub fn into_rows(self) -> Vec<Vec<f64>> {
        self.rows
    }

    /// Clones the rows in `range` into a new matrix.
    ///
    /// # Panics
    /// Panics if `range` is out of bounds, like slice indexing does.
    pub fn slice_rows(&self, range: Range<usize>) -> Matrix {
        Matrix {
            rows: self.rows[range].to_vec(),
        }
    }

    /// Computes the product `self * rhs` by the classic definition:
    /// `C[i][j] = sum(A[i][k] * B[k][j])`.
    ///
    /// # Errors
    /// Returns `MatrixError::DimensionMismatch` if `self.cols() != rhs.rows()`.
    pub fn multiply(&self, rhs: &Matrix) -> Result<Matrix> {
        if self.cols() != rhs.rows() {
            return Err(MatrixError::DimensionMismatch {
                left_cols: self.cols(),
                right_rows: rhs.rows(),
            });
        }

        let n = self.rows();
        let m = self.cols();
        let p = rhs.cols();

        let mut out = vec![vec![0.0; p]; n];

        for i in 0..n {
            for j in 0..p {
                let mut sum = 0.0;
                for k in 0..m {
                    sum += self.rows[i][k] * rhs.rows[k][j];
                }
                out[i][j] = sum;
            }
        }

        Ok(Matrix { rows: out })
    }
}

impl TryFrom<Vec<Vec<f64>>> for Matrix {
    type Error = MatrixError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self> {
        Self::from_rows(rows)
    }
}

impl From<Matrix> for Vec<Vec<f64>> {
    fn from(matrix: Matrix) -> Self {
        matrix.rows
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            writeln!(f, "  {row:?}")?;
        }
        Ok(())
    }
}
