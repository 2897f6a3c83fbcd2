use crate::{Matrix, MatrixError, Result};

/// A contiguous run of a matrix's rows, tagged with its partition index.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub index: usize,
    pub rows: Matrix,
}

/// Splits `a` into `parts` contiguous row blocks, indices `0..parts` in
/// row order.
///
/// The split is deterministic: `block_size = n / parts`, and the first
/// `n % parts` blocks receive one extra row, so block sizes differ by at
/// most one and concatenating the blocks in index order reproduces `a`.
///
/// # Errors
/// Returns `MatrixError::InvalidPartition` when `parts == 0` or
/// `parts > a.rows()`; empty blocks are an error, never silently skipped.
pub fn split(a: &Matrix, parts: usize) -> Result<Vec<Block>> {
    let n = a.rows();

    if parts == 0 || parts > n {
        return Err(MatrixError::InvalidPartition { rows: n, parts });
    }

    let block_size = n / parts;
    let remainder = n % parts;

    let mut blocks = Vec::with_capacity(parts);
    let mut start = 0;

    for index in 0..parts {
        let extra = usize::from(index < remainder);
        let end = start + block_size + extra;
        blocks.push(Block {
            index,
            rows: a.slice_rows(start..end),
        });
        start = end;
    }

    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counting_matrix(rows: usize, cols: usize) -> Matrix {
        let rows = (0..rows)
            .map(|i| (0..cols).map(|j| (i * cols + j) as f64).collect())
            .collect();
        Matrix::from_rows(rows).unwrap()
    }

    #[test]
    fn split_partitions_rows_exactly() {
        for n in 1..=12 {
            let a = counting_matrix(n, 3);
            for parts in 1..=n {
                let blocks = split(&a, parts).unwrap();

                assert_eq!(blocks.len(), parts);
                assert!(blocks.iter().enumerate().all(|(i, b)| b.index == i));

                let sizes: Vec<usize> = blocks.iter().map(|b| b.rows.rows()).collect();
                assert_eq!(sizes.iter().sum::<usize>(), n);

                let min = sizes.iter().min().unwrap();
                let max = sizes.iter().max().unwrap();
                assert!(max - min <= 1, "sizes {sizes:?} differ by more than one");

                let rejoined: Vec<Vec<f64>> = blocks
                    .into_iter()
                    .flat_map(|b| b.rows.into_rows())
                    .collect();
                assert_eq!(rejoined, a.clone().into_rows());
            }
        }
    }

    #[test]
    fn split_is_deterministic() {
        let a = counting_matrix(7, 2);
        assert_eq!(split(&a, 3).unwrap(), split(&a, 3).unwrap());
    }

    #[test]
    fn remainder_rows_go_to_the_first_blocks() {
        let a = counting_matrix(7, 2);
        let sizes: Vec<usize> = split(&a, 3)
            .unwrap()
            .iter()
            .map(|b| b.rows.rows())
            .collect();
        assert_eq!(sizes, vec![3, 2, 2]);
    }

    #[test]
    fn split_rejects_zero_parts() {
        let a = counting_matrix(4, 2);
        assert_eq!(
            split(&a, 0),
            Err(MatrixError::InvalidPartition { rows: 4, parts: 0 })
        );
    }

    #[test]
    fn split_rejects_more_parts_than_rows() {
        let a = counting_matrix(2, 2);
        assert_eq!(
            split(&a, 3),
            Err(MatrixError::InvalidPartition { rows: 2, parts: 3 })
        );
    }
}
