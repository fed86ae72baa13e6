//! Trait definitions for the matex specification
//!
//! Pure interfaces with no concrete implementations: the backend capability
//! contract and the element type constraint.

#[cfg(feature = "alloc")]
pub mod backend;
pub mod element;

#[cfg(feature = "alloc")]
pub use backend::*;
pub use element::*;
