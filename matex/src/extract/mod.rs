//! Stateful extraction cursors
//!
//! An extractor is bound at construction to one backend, one orientation,
//! one validated subset and one access discipline, and owns its cache (and
//! oracle cursor) exclusively. Between calls it holds no other state, so a
//! sequence of fetches always produces results in call order for the literal
//! indices given.

pub mod dense;
pub mod sparse;

pub use dense::DenseExtractor;
pub use sparse::{SparseExtractor, SparseOutput};
