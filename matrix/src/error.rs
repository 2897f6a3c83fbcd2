use std::{error::Error, fmt};

/// Shape failures of the dense matrix model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatrixError {
    /// The left operand's column count does not match the right operand's
    /// row count, so the product is undefined.
    DimensionMismatch { left_cols: usize, right_rows: usize },
    /// A row-block partition cannot be satisfied without producing an
    /// empty block.
    InvalidPartition { rows: usize, parts: usize },
    /// A row does not match the width established by the first row.
    Ragged {
        row: usize,
        got: usize,
        expected: usize,
    },
}

impl fmt::Display for MatrixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixError::DimensionMismatch {
                left_cols,
                right_rows,
            } => write!(
                f,
                "incompatible dimensions: {left_cols} column(s) vs {right_rows} row(s)"
            ),
            MatrixError::InvalidPartition { rows, parts } => write!(
                f,
                "cannot split {rows} row(s) into {parts} non-empty block(s)"
            ),
            MatrixError::Ragged { row, got, expected } => write!(
                f,
                "ragged matrix: row {row} has {got} cell(s), expected {expected}"
            ),
        }
    }
}

impl Error for MatrixError {}
