use std::ops::RangeInclusive;

use rand::Rng;

use crate::Matrix;

/// Generates a `rows` x `cols` matrix of independently sampled
/// integer-valued cells drawn uniformly from `range`.
pub fn generate(rows: usize, cols: usize, range: RangeInclusive<i64>) -> Matrix {
    let mut rng = rand::rng();

    let rows = (0..rows)
        .map(|_| {
            (0..cols)
                .map(|_| rng.random_range(range.clone()) as f64)
                .collect()
        })
        .collect();

    // SAFETY: rows are built with a constant width, so this cannot be ragged.
    Matrix::from_rows(rows).unwrap()
}
