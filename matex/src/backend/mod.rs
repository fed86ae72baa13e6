//! Concrete backend adapters
//!
//! Each adapter implements the `Backend` capability contract for one storage
//! layout. All of them produce byte-identical extraction results for the
//! same logical matrix; only traversal cost differs.

pub mod chunked;
pub mod chunked_csc;
pub mod csc;
pub mod dense;

pub use chunked::ChunkedMatrix;
pub use chunked_csc::ChunkedCscMatrix;
pub use csc::CscMatrix;
pub use dense::{DenseMatrix, MemoryOrder};
