//! Secondary-dimension subset specifications
//!
//! A subset restricts which elements of the secondary dimension are returned
//! by an extraction. It is fixed per extractor at construction time and is
//! always applied after the full-width fetch, never pushed into the backend.

extern crate alloc;
use alloc::vec::Vec;

use crate::error::{MatexError, Result};

/// Restriction applied to the secondary dimension of every extracted line
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Subset {
    /// Keep the whole secondary dimension
    Full,
    /// Keep a contiguous range `[start, start + length)`
    Block { start: usize, length: usize },
    /// Keep an arbitrary set of secondary indices, in the given order
    ///
    /// The set does not have to be sorted, but it must be duplicate-free.
    Indexed(Vec<usize>),
}

impl Subset {
    /// Validate this subset against the secondary dimension
    ///
    /// Fails fast on a block that extends past `other_dim` or on an indexed
    /// set with out-of-range or repeated entries.
    pub fn validate(&self, other_dim: usize) -> Result<()> {
        match self {
            Subset::Full => Ok(()),
            Subset::Block { start, length } => {
                let end = start.checked_add(*length).ok_or(MatexError::InvalidBlock)?;
                if end > other_dim {
                    return Err(MatexError::InvalidBlock);
                }
                Ok(())
            }
            Subset::Indexed(indices) => {
                for (pos, &idx) in indices.iter().enumerate() {
                    if idx >= other_dim {
                        return Err(MatexError::InvalidSubsetIndex);
                    }
                    if indices[..pos].contains(&idx) {
                        return Err(MatexError::DuplicateSubsetIndex);
                    }
                }
                Ok(())
            }
        }
    }

    /// Number of elements an extraction under this subset will return
    pub fn len(&self, other_dim: usize) -> usize {
        match self {
            Subset::Full => other_dim,
            Subset::Block { length, .. } => *length,
            Subset::Indexed(indices) => indices.len(),
        }
    }

    /// Whether an extraction under this subset returns nothing
    pub fn is_empty(&self, other_dim: usize) -> bool {
        self.len(other_dim) == 0
    }
}
