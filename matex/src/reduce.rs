//! Parallel sum reduction over one orientation
//!
//! The primary range is split into contiguous partitions, one per worker
//! thread; each worker drives its own extractor (own cache, consecutive
//! oracle when oracular) and accumulates its lines element-wise into a local
//! vector over the secondary dimension. Partials are merged by addition
//! after the pool joins, so the result is identical across thread counts up
//! to floating-point rounding.

use rayon::prelude::*;

use matex_core::{Backend, MatexError, Result, Subset};

use crate::extract::{DenseExtractor, SparseExtractor};
use crate::oracle::{ConsecutiveOracle, Oracle};

/// Split `[0, total)` into `parts` contiguous ranges of near-equal length
fn partition(total: usize, parts: usize) -> Vec<(usize, usize)> {
    let base = total / parts;
    let extra = total % parts;
    let mut ranges = Vec::with_capacity(parts);
    let mut start = 0;
    for worker in 0..parts {
        let length = base + usize::from(worker < extra);
        ranges.push((start, length));
        start += length;
    }
    ranges
}

fn run_partitions<B, W>(
    backend: &B,
    by_row: bool,
    num_threads: usize,
    worker: W,
) -> Result<Vec<f64>>
where
    B: Backend + Sync,
    W: Fn((usize, usize)) -> Result<Vec<f64>> + Sync,
{
    if num_threads == 0 {
        return Err(MatexError::InvalidThreadCount);
    }
    let iter_dim = backend.primary_dim(by_row);
    let other_dim = backend.secondary_dim(by_row);

    let partials = if num_threads == 1 {
        vec![worker((0, iter_dim))?]
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build()
            .map_err(|_| MatexError::ThreadPool)?;
        let ranges = partition(iter_dim, num_threads);
        pool.install(|| {
            ranges
                .into_par_iter()
                .map(&worker)
                .collect::<Result<Vec<_>>>()
        })?
    };

    let mut output = vec![0.0; other_dim];
    for partial in partials {
        for (slot, value) in output.iter_mut().zip(partial) {
            *slot += value;
        }
    }
    Ok(output)
}

fn range_oracle(oracular: bool, start: usize, length: usize) -> Option<Box<dyn Oracle>> {
    if oracular {
        Some(Box::new(ConsecutiveOracle::new(start, length)))
    } else {
        None
    }
}

/// Sum every line of one orientation into a vector over the other dimension,
/// via the dense extraction path
pub fn dense_sum<B: Backend + Sync>(
    backend: &B,
    cache_bytes: usize,
    by_row: bool,
    oracular: bool,
    num_threads: usize,
) -> Result<Vec<f64>> {
    let other_dim = backend.secondary_dim(by_row);
    run_partitions(backend, by_row, num_threads, |(start, length)| {
        let oracle = range_oracle(oracular, start, length);
        let mut extractor = DenseExtractor::new(backend, by_row, Subset::Full, cache_bytes, oracle)?;
        let mut acc = vec![0.0; other_dim];
        for index in start..start + length {
            let line = extractor.fetch(index)?;
            for (slot, value) in acc.iter_mut().zip(line) {
                *slot += value;
            }
        }
        Ok(acc)
    })
}

/// Sum every line of one orientation into a vector over the other dimension,
/// via the sparse extraction path
pub fn sparse_sum<B: Backend + Sync>(
    backend: &B,
    cache_bytes: usize,
    by_row: bool,
    oracular: bool,
    num_threads: usize,
) -> Result<Vec<f64>> {
    let other_dim = backend.secondary_dim(by_row);
    run_partitions(backend, by_row, num_threads, |(start, length)| {
        let oracle = range_oracle(oracular, start, length);
        let mut extractor = SparseExtractor::new(
            backend,
            by_row,
            Subset::Full,
            cache_bytes,
            oracle,
            true,
            true,
        )?;
        let mut acc = vec![0.0; other_dim];
        for index in start..start + length {
            let out = extractor.fetch(index)?;
            // Full subset, so the relative indices are the absolute ones.
            for (&at, &value) in out.indices.iter().zip(out.values.iter()) {
                acc[at as usize] += value;
            }
        }
        Ok(acc)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{CscMatrix, DenseMatrix, MemoryOrder};

    fn assert_close(observed: &[f64], expected: &[f64]) {
        assert_eq!(observed.len(), expected.len());
        for (o, e) in observed.iter().zip(expected) {
            assert!((o - e).abs() <= 1e-9 * e.abs().max(1.0), "{o} vs {e}");
        }
    }

    #[test]
    fn test_partition_covers_range() {
        assert_eq!(partition(10, 3), vec![(0, 4), (4, 3), (7, 3)]);
        assert_eq!(partition(2, 3), vec![(0, 1), (1, 1), (2, 0)]);
        assert_eq!(partition(0, 2), vec![(0, 0), (0, 0)]);
    }

    #[test]
    fn test_dense_sums_match_reference() {
        let m = DenseMatrix::new(
            4,
            3,
            (0..12).map(|x| x as f64 * 0.25).collect(),
            MemoryOrder::RowMajor,
        )
        .unwrap();
        // Iterating rows accumulates one total per column.
        let col_totals = vec![(0.0 + 3.0 + 6.0 + 9.0) * 0.25, (1.0 + 4.0 + 7.0 + 10.0) * 0.25, (2.0 + 5.0 + 8.0 + 11.0) * 0.25];
        let row_totals: Vec<f64> = (0..4).map(|r| (0..3).map(|c| (r * 3 + c) as f64 * 0.25).sum()).collect();

        for oracular in [false, true] {
            for threads in [1, 3] {
                assert_close(&dense_sum(&m, 1 << 12, true, oracular, threads).unwrap(), &col_totals);
                assert_close(&dense_sum(&m, 0, false, oracular, threads).unwrap(), &row_totals);
            }
        }
    }

    #[test]
    fn test_sparse_sums_match_dense_sums() {
        let m = CscMatrix::new(
            4,
            3,
            vec![1.0, 2.0, 3.0, 4.0, 5.0],
            vec![0, 2, 2, 0, 3],
            vec![0, 2, 3, 5],
        )
        .unwrap();
        for by_row in [true, false] {
            for threads in [1, 3] {
                let dense = dense_sum(&m, 1 << 10, by_row, false, threads).unwrap();
                let sparse = sparse_sum(&m, 1 << 10, by_row, true, threads).unwrap();
                assert_close(&sparse, &dense);
            }
        }
    }

    #[test]
    fn test_zero_threads_is_an_error() {
        let m = DenseMatrix::<f64>::new(1, 1, vec![2.0], MemoryOrder::RowMajor).unwrap();
        assert_eq!(
            dense_sum(&m, 0, true, false, 0).err(),
            Some(MatexError::InvalidThreadCount)
        );
    }

    #[test]
    fn test_more_threads_than_lines() {
        let m = DenseMatrix::new(2, 2, vec![1.0, 2.0, 3.0, 4.0], MemoryOrder::ColumnMajor).unwrap();
        let out = dense_sum(&m, 64, true, true, 5).unwrap();
        assert_close(&out, &[3.0, 7.0]);
    }

    #[test]
    fn test_empty_matrix_reduces_to_empty_or_zero() {
        let m = DenseMatrix::<f64>::new(0, 3, vec![], MemoryOrder::RowMajor).unwrap();
        // No rows to iterate: the column totals are all zero.
        assert_eq!(dense_sum(&m, 0, true, false, 3).unwrap(), vec![0.0; 3]);
        // Iterating columns of width zero gives an empty vector.
        assert_eq!(dense_sum(&m, 0, false, true, 1).unwrap(), Vec::<f64>::new());
    }
}
