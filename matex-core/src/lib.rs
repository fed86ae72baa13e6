#![no_std]

//! Matex Core - Matrix Access Trait Definitions
//!
//! This crate provides the core traits, subset specifications and error
//! taxonomy for uniform row/column extraction from numeric matrix backends

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod error;
#[cfg(feature = "alloc")]
pub mod subset;
pub mod traits;

pub use error::*;
#[cfg(feature = "alloc")]
pub use subset::*;
pub use traits::*;
