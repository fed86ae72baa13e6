//! Backend capability contract
//!
//! A backend exposes the shape, sparsity flag and preferred traversal
//! orientation of one underlying matrix representation, plus the raw
//! per-index fetch primitives. Backends are stateless accessors: no caching
//! and no threading concerns live here.

extern crate alloc;
use alloc::vec;
use alloc::vec::Vec;

/// Full-width sparse payload for one row or column
///
/// `indices` holds secondary indices in strictly ascending order; `values`
/// is parallel to it. This is the backend's natural ordering and the cache
/// stores it unchanged.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SparseLine {
    pub indices: Vec<u32>,
    pub values: Vec<f64>,
}

impl SparseLine {
    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Scatter the stored entries into a zero-filled dense buffer of the
    /// given width
    pub fn densify(&self, width: usize) -> Vec<f64> {
        let mut buffer = vec![0.0; width];
        for (&idx, &value) in self.indices.iter().zip(self.values.iter()) {
            buffer[idx as usize] = value;
        }
        buffer
    }

    /// Treat every position of a dense line as a stored entry
    pub fn from_dense(line: &[f64]) -> Self {
        Self {
            indices: (0..line.len() as u32).collect(),
            values: line.to_vec(),
        }
    }
}

/// Capability interface for one matrix representation
///
/// `by_row` selects the orientation: `true` extracts rows (secondary
/// dimension = columns), `false` extracts columns. The caller is responsible
/// for bounds-checking `index` against the primary dimension; backends may
/// panic on out-of-range input.
pub trait Backend {
    fn nrow(&self) -> usize;

    fn ncol(&self) -> usize;

    /// Whether the representation stores only nonzero entries
    fn is_sparse(&self) -> bool;

    /// Which orientation is cheaper to traverse given the storage layout
    fn prefer_rows(&self) -> bool;

    /// Write the full-width dense line for one primary index into `buffer`,
    /// resizing it to the secondary dimension
    fn fetch_dense(&self, by_row: bool, index: usize, buffer: &mut Vec<f64>);

    /// Return the stored entries for one primary index, ascending by
    /// secondary index
    ///
    /// Dense backends report every position as stored.
    fn fetch_sparse(&self, by_row: bool, index: usize) -> SparseLine;

    /// Length of the dimension being iterated for the given orientation
    fn primary_dim(&self, by_row: bool) -> usize {
        if by_row {
            self.nrow()
        } else {
            self.ncol()
        }
    }

    /// Length of the dimension orthogonal to the extracted lines
    fn secondary_dim(&self, by_row: bool) -> usize {
        if by_row {
            self.ncol()
        } else {
            self.nrow()
        }
    }
}

impl<B: Backend + ?Sized> Backend for &B {
    fn nrow(&self) -> usize {
        (**self).nrow()
    }

    fn ncol(&self) -> usize {
        (**self).ncol()
    }

    fn is_sparse(&self) -> bool {
        (**self).is_sparse()
    }

    fn prefer_rows(&self) -> bool {
        (**self).prefer_rows()
    }

    fn fetch_dense(&self, by_row: bool, index: usize, buffer: &mut Vec<f64>) {
        (**self).fetch_dense(by_row, index, buffer)
    }

    fn fetch_sparse(&self, by_row: bool, index: usize) -> SparseLine {
        (**self).fetch_sparse(by_row, index)
    }
}
