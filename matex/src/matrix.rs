//! Top-level matrix facade
//!
//! `CachedMatrix` wraps one backend together with a cache budget and exposes
//! the full extraction surface: dense and sparse extraction under any subset
//! and either access discipline, plus the parallel sum reductions.

use matex_core::{Backend, Result, Subset};

use crate::extract::{DenseExtractor, SparseExtractor, SparseOutput};
use crate::oracle::{Oracle, SequenceOracle};
use crate::reduce;

/// Cache sizing for the extractors created by a `CachedMatrix`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CacheConfig {
    /// Byte budget per extractor; zero disables caching
    pub max_bytes: usize,
    /// Grow the budget to hold at least one full-width line, so that
    /// consecutive requests for the same index never re-fetch
    pub require_cache: bool,
}

impl CacheConfig {
    /// Create a config with the given byte budget
    pub fn with_max_bytes(max_bytes: usize) -> Self {
        Self {
            max_bytes,
            require_cache: max_bytes > 0,
        }
    }

    /// Pure pass-through: nothing is ever retained
    pub fn disabled() -> Self {
        Self {
            max_bytes: 0,
            require_cache: false,
        }
    }

    /// Set whether the budget is grown to hold at least one line
    pub fn require_cache(mut self, require: bool) -> Self {
        self.require_cache = require;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_bytes: 100_000_000,
            require_cache: true,
        }
    }
}

/// One backend plus the cache policy applied to every extractor derived
/// from it
///
/// The handle is immutable and outlives all of its extractors; extraction
/// methods each build a fresh extractor, so no cache is ever shared across
/// calls, orientations or subsets.
pub struct CachedMatrix<B: Backend> {
    backend: B,
    config: CacheConfig,
}

impl<B: Backend> CachedMatrix<B> {
    pub fn new(backend: B, config: CacheConfig) -> Self {
        Self { backend, config }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> CacheConfig {
        self.config
    }

    pub fn nrow(&self) -> usize {
        self.backend.nrow()
    }

    pub fn ncol(&self) -> usize {
        self.backend.ncol()
    }

    pub fn is_sparse(&self) -> bool {
        self.backend.is_sparse()
    }

    pub fn prefer_rows(&self) -> bool {
        self.backend.prefer_rows()
    }

    fn budget(&self, line_bytes: usize) -> usize {
        if self.config.require_cache {
            self.config.max_bytes.max(line_bytes)
        } else {
            self.config.max_bytes
        }
    }

    fn dense_budget(&self, by_row: bool) -> usize {
        self.budget(self.backend.secondary_dim(by_row) * 8)
    }

    fn sparse_budget(&self, by_row: bool) -> usize {
        // Upper bound: every secondary position stored, value + index each.
        self.budget(self.backend.secondary_dim(by_row) * 12)
    }

    /// Extract dense lines for a sequence of primary indices
    ///
    /// With `oracular` set, the request sequence itself is handed to the
    /// extractor as its prediction sequence, so every fetch resolves the
    /// next requested line ahead of its call; output is unaffected either
    /// way.
    pub fn extract_dense(
        &self,
        by_row: bool,
        indices: &[usize],
        subset: &Subset,
        oracular: bool,
    ) -> Result<Vec<Vec<f64>>> {
        let oracle = request_oracle(oracular, indices);
        let mut extractor = DenseExtractor::new(
            &self.backend,
            by_row,
            subset.clone(),
            self.dense_budget(by_row),
            oracle,
        )?;
        indices.iter().map(|&index| extractor.fetch(index)).collect()
    }

    /// Extract sparse entries for a sequence of primary indices
    #[allow(clippy::too_many_arguments)]
    pub fn extract_sparse(
        &self,
        by_row: bool,
        indices: &[usize],
        subset: &Subset,
        oracular: bool,
        needs_value: bool,
        needs_index: bool,
    ) -> Result<Vec<SparseOutput>> {
        let oracle = request_oracle(oracular, indices);
        let mut extractor = SparseExtractor::new(
            &self.backend,
            by_row,
            subset.clone(),
            self.sparse_budget(by_row),
            oracle,
            needs_value,
            needs_index,
        )?;
        indices.iter().map(|&index| extractor.fetch(index)).collect()
    }

    /// Full reduction vector over the other dimension, dense path
    pub fn dense_sum(&self, by_row: bool, oracular: bool, num_threads: usize) -> Result<Vec<f64>>
    where
        B: Sync,
    {
        reduce::dense_sum(
            &self.backend,
            self.dense_budget(by_row),
            by_row,
            oracular,
            num_threads,
        )
    }

    /// Full reduction vector over the other dimension, sparse path
    pub fn sparse_sum(&self, by_row: bool, oracular: bool, num_threads: usize) -> Result<Vec<f64>>
    where
        B: Sync,
    {
        reduce::sparse_sum(
            &self.backend,
            self.sparse_budget(by_row),
            by_row,
            oracular,
            num_threads,
        )
    }
}

fn request_oracle(oracular: bool, indices: &[usize]) -> Option<Box<dyn Oracle>> {
    if oracular {
        Some(Box::new(SequenceOracle::new(indices.to_vec())))
    } else {
        None
    }
}
