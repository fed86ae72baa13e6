//! Dense extraction path

use matex_core::{Backend, MatexError, Result, Subset};

use crate::cache::SlabCache;
use crate::oracle::{Lookahead, Oracle};

/// Cursor producing dense subset-width lines for requested primary indices
///
/// The cache is keyed on the bare primary index and stores the full-width
/// line; the subset is applied on the way out. Repeated requests for the
/// same index are served from the cache when the budget allows.
pub struct DenseExtractor<'a, B: Backend> {
    backend: &'a B,
    by_row: bool,
    subset: Subset,
    cache: SlabCache<Vec<f64>>,
    oracle: Option<Lookahead>,
}

impl<'a, B: Backend> DenseExtractor<'a, B> {
    /// Bind an extractor to one orientation, subset and discipline
    ///
    /// The subset is validated against the secondary dimension up front;
    /// malformed subsets fail here, before any fetch.
    pub fn new(
        backend: &'a B,
        by_row: bool,
        subset: Subset,
        cache_bytes: usize,
        oracle: Option<Box<dyn Oracle>>,
    ) -> Result<Self> {
        subset.validate(backend.secondary_dim(by_row))?;
        Ok(Self {
            backend,
            by_row,
            subset,
            cache: SlabCache::new(cache_bytes),
            oracle: oracle.map(Lookahead::new),
        })
    }

    /// Extract the line for one primary index, restricted to the subset
    ///
    /// The oracle, if any, runs one prediction ahead of the call sequence:
    /// each call resolves the line predicted for the *next* call into the
    /// cache before serving its own. Predictions are only scheduling hints;
    /// the returned values always belong to `index`.
    pub fn fetch(&mut self, index: usize) -> Result<Vec<f64>> {
        let primary = self.backend.primary_dim(self.by_row);
        if index >= primary {
            return Err(MatexError::IndexOutOfBounds);
        }

        let Self { backend, by_row, subset, cache, oracle } = self;
        if let Some(oracle) = oracle.as_mut() {
            if let Some(predicted) = oracle.advance() {
                // Out-of-range predictions are ignored; they can never
                // affect output.
                if predicted != index && predicted < primary {
                    resolve(cache, *backend, *by_row, predicted);
                }
            }
        }

        let line = resolve(cache, *backend, *by_row, index);
        Ok(match subset {
            Subset::Full => line.clone(),
            Subset::Block { start, length } => line[*start..*start + *length].to_vec(),
            Subset::Indexed(indices) => indices.iter().map(|&at| line[at]).collect(),
        })
    }

    /// Bytes currently resident in this extractor's cache
    pub fn cached_bytes(&self) -> usize {
        self.cache.used()
    }
}

/// Resolve one full-width line through the cache
fn resolve<'c, B: Backend>(
    cache: &'c mut SlabCache<Vec<f64>>,
    backend: &B,
    by_row: bool,
    index: usize,
) -> &'c Vec<f64> {
    cache.get_or_fetch(index, || {
        let mut buffer = Vec::new();
        backend.fetch_dense(by_row, index, &mut buffer);
        buffer
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{CscMatrix, DenseMatrix, MemoryOrder};
    use crate::oracle::SequenceOracle;
    use matex_core::SparseLine;
    use std::cell::RefCell;

    /// Delegating backend that records every fetch it receives
    struct Recording {
        inner: DenseMatrix<f64>,
        log: RefCell<Vec<usize>>,
    }

    impl Backend for Recording {
        fn nrow(&self) -> usize {
            self.inner.nrow()
        }
        fn ncol(&self) -> usize {
            self.inner.ncol()
        }
        fn is_sparse(&self) -> bool {
            self.inner.is_sparse()
        }
        fn prefer_rows(&self) -> bool {
            self.inner.prefer_rows()
        }
        fn fetch_dense(&self, by_row: bool, index: usize, buffer: &mut Vec<f64>) {
            self.log.borrow_mut().push(index);
            self.inner.fetch_dense(by_row, index, buffer)
        }
        fn fetch_sparse(&self, by_row: bool, index: usize) -> SparseLine {
            self.log.borrow_mut().push(index);
            self.inner.fetch_sparse(by_row, index)
        }
    }

    fn sample() -> DenseMatrix<f64> {
        DenseMatrix::new(
            3,
            4,
            (0..12).map(|x| x as f64).collect(),
            MemoryOrder::RowMajor,
        )
        .unwrap()
    }

    #[test]
    fn test_full_rows_and_columns() {
        let m = sample();
        let mut rows = DenseExtractor::new(&m, true, Subset::Full, 1024, None).unwrap();
        assert_eq!(rows.fetch(1).unwrap(), vec![4.0, 5.0, 6.0, 7.0]);
        let mut cols = DenseExtractor::new(&m, false, Subset::Full, 1024, None).unwrap();
        assert_eq!(cols.fetch(2).unwrap(), vec![2.0, 6.0, 10.0]);
    }

    #[test]
    fn test_block_and_indexed_subsets() {
        let m = sample();
        let subset = Subset::Block { start: 1, length: 2 };
        let mut ext = DenseExtractor::new(&m, true, subset, 0, None).unwrap();
        assert_eq!(ext.fetch(2).unwrap(), vec![9.0, 10.0]);

        // Unsorted index sets gather in the order given.
        let subset = Subset::Indexed(vec![3, 0]);
        let mut ext = DenseExtractor::new(&m, true, subset, 0, None).unwrap();
        assert_eq!(ext.fetch(0).unwrap(), vec![3.0, 0.0]);
    }

    #[test]
    fn test_malformed_subset_fails_at_construction() {
        let m = sample();
        let bad = Subset::Block { start: 2, length: 3 };
        assert_eq!(
            DenseExtractor::new(&m, true, bad, 0, None).err(),
            Some(MatexError::InvalidBlock)
        );
        let bad = Subset::Indexed(vec![1, 1]);
        assert_eq!(
            DenseExtractor::new(&m, false, bad, 0, None).err(),
            Some(MatexError::DuplicateSubsetIndex)
        );
    }

    #[test]
    fn test_out_of_range_index_fails_fast() {
        let m = sample();
        let mut ext = DenseExtractor::new(&m, true, Subset::Full, 1024, None).unwrap();
        ext.fetch(0).unwrap();
        let before = ext.cached_bytes();
        assert_eq!(ext.fetch(3).err(), Some(MatexError::IndexOutOfBounds));
        // The failed call must not disturb cache state.
        assert_eq!(ext.cached_bytes(), before);
    }

    #[test]
    fn test_sparse_backend_is_densified() {
        let m = CscMatrix::new(3, 2, vec![5.0, 6.0], vec![1, 2], vec![0, 1, 2]).unwrap();
        let mut ext = DenseExtractor::new(&m, false, Subset::Full, 0, None).unwrap();
        assert_eq!(ext.fetch(0).unwrap(), vec![0.0, 5.0, 0.0]);
        assert_eq!(ext.fetch(1).unwrap(), vec![0.0, 0.0, 6.0]);
    }

    #[test]
    fn test_oracle_is_only_a_hint() {
        let m = sample();
        // Predictions deliberately disagree with the literal requests.
        let oracle = SequenceOracle::new(vec![2, 2, 0]);
        let mut ext =
            DenseExtractor::new(&m, true, Subset::Full, 4096, Some(Box::new(oracle))).unwrap();
        assert_eq!(ext.fetch(0).unwrap(), vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(ext.fetch(1).unwrap(), vec![4.0, 5.0, 6.0, 7.0]);
        // Oracle exhausted mid-sequence is fine too.
        assert_eq!(ext.fetch(2).unwrap(), vec![8.0, 9.0, 10.0, 11.0]);
        assert_eq!(ext.fetch(1).unwrap(), vec![4.0, 5.0, 6.0, 7.0]);
    }

    #[test]
    fn test_oracular_schedule_runs_ahead_of_requests() {
        let backend = Recording { inner: sample(), log: RefCell::new(Vec::new()) };
        let oracle = SequenceOracle::new(vec![0, 1, 2]);
        let mut ext =
            DenseExtractor::new(&backend, true, Subset::Full, 4096, Some(Box::new(oracle))).unwrap();
        for index in 0..3 {
            ext.fetch(index).unwrap();
        }
        // Every line after the first is resolved one call early, so each
        // request past the first is a cache hit.
        assert_eq!(*backend.log.borrow(), vec![1, 0, 2]);
    }

    #[test]
    fn test_myopic_schedule_follows_requests() {
        let backend = Recording { inner: sample(), log: RefCell::new(Vec::new()) };
        let mut ext = DenseExtractor::new(&backend, true, Subset::Full, 4096, None).unwrap();
        for index in 0..3 {
            ext.fetch(index).unwrap();
        }
        assert_eq!(*backend.log.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_zero_width_dimension() {
        let m = DenseMatrix::<f64>::new(3, 0, vec![], MemoryOrder::RowMajor).unwrap();
        let mut ext = DenseExtractor::new(&m, true, Subset::Full, 1024, None).unwrap();
        assert!(ext.fetch(1).unwrap().is_empty());
    }
}
