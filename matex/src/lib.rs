//! Matex - Cached Row/Column Extraction Engine
//!
//! This library provides uniform extraction of rows or columns from
//! heterogeneous numeric matrix backends, with bounded LRU caching of
//! previously produced lines and optional prediction-driven prefetching.
//!
//! ## Architecture
//!
//! Matex follows a clean specification/implementation separation:
//!
//! - **matex-core**: Backend capability traits, subset descriptions and validation (no I/O)
//! - **matex**: Concrete backends, the slab cache, oracles, extractors and
//!   the parallel reduction engine
//!
//! ## Quick Start
//!
//! ```rust
//! use matex::{CacheConfig, CachedMatrix, DenseMatrix, MemoryOrder, Subset};
//!
//! fn example() -> matex::Result<()> {
//!     let backend = DenseMatrix::new(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], MemoryOrder::RowMajor)?;
//!     let matrix = CachedMatrix::new(backend, CacheConfig::with_max_bytes(1 << 16));
//!
//!     // Extract both rows in order, with the request sequence doubling as
//!     // the oracle's prediction sequence.
//!     let rows = matrix.extract_dense(true, &[0, 1], &Subset::Full, true)?;
//!     assert_eq!(rows[1], vec![4.0, 5.0, 6.0]);
//!     Ok(())
//! }
//! # example().unwrap();
//! ```
//!
//! ## Guarantees
//!
//! - Extraction results are identical across backends, cache budgets and
//!   access disciplines; the cache and the oracle only affect latency
//! - Results are produced strictly in call order, keyed by the literal
//!   index arguments
//! - Each extractor owns its cache and oracle exclusively; only the backend
//!   is shared across reduction workers

// Re-export core abstractions
pub use matex_core::{
    // Capability contract
    Backend, MatrixElement, SparseLine,
    // Subset selection
    Subset,
    // Error handling
    MatexError, Result,
};

// Implementation modules
pub mod backend;
pub mod cache;
pub mod extract;
pub mod oracle;
pub mod reduce;

mod matrix;

// Public exports
pub use backend::{ChunkedCscMatrix, ChunkedMatrix, CscMatrix, DenseMatrix, MemoryOrder};
pub use cache::{SlabCache, SlabSize};
pub use extract::{DenseExtractor, SparseExtractor, SparseOutput};
pub use matrix::{CacheConfig, CachedMatrix};
pub use oracle::{ConsecutiveOracle, Oracle, SequenceOracle};
