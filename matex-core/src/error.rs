//! Error types for matex operations

/// Errors that can occur during extraction or reduction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatexError {
    /// Requested primary index outside `[0, dim)`
    IndexOutOfBounds,
    /// Block subset extends past the secondary dimension
    InvalidBlock,
    /// Indexed subset contains an out-of-range entry
    InvalidSubsetIndex,
    /// Indexed subset contains a repeated entry
    DuplicateSubsetIndex,
    /// Backend data length does not match the declared shape
    ShapeMismatch,
    /// Chunk boundaries are not strictly increasing or do not cover the extent
    InvalidChunkGrid,
    /// Compressed-sparse layout is internally inconsistent
    InvalidSparseLayout,
    /// Reduction requested with zero threads
    InvalidThreadCount,
    /// Worker thread pool could not be constructed
    ThreadPool,
}

impl core::fmt::Display for MatexError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            MatexError::IndexOutOfBounds => "Index out of bounds",
            MatexError::InvalidBlock => "Block subset out of range",
            MatexError::InvalidSubsetIndex => "Subset index out of range",
            MatexError::DuplicateSubsetIndex => "Subset index duplicated",
            MatexError::ShapeMismatch => "Data length does not match shape",
            MatexError::InvalidChunkGrid => "Invalid chunk boundaries",
            MatexError::InvalidSparseLayout => "Invalid compressed-sparse layout",
            MatexError::InvalidThreadCount => "Thread count must be positive",
            MatexError::ThreadPool => "Failed to build worker thread pool",
        };
        write!(f, "{msg}")
    }
}

/// Result type for matex operations
pub type Result<T> = core::result::Result<T, MatexError>;
