//! Matrix element type constraints
//!
//! Backends may store values in any of the supported numeric types; every
//! extraction result is reported in double precision regardless of storage.

/// Trait for types that can be stored as matrix elements
pub trait MatrixElement: Copy + Clone + PartialEq + Sized {
    /// Size in bytes of this element type
    fn size_bytes() -> usize {
        core::mem::size_of::<Self>()
    }

    /// Convert from f64 for generic construction
    fn from_f64(value: f64) -> Self;

    /// Convert to f64 for extraction output
    fn to_f64(self) -> f64;
}

macro_rules! impl_matrix_element {
    ($type:ty) => {
        impl MatrixElement for $type {
            fn from_f64(value: f64) -> Self {
                value as $type
            }

            fn to_f64(self) -> f64 {
                self as f64
            }
        }
    };
}

impl_matrix_element!(f32);
impl_matrix_element!(f64);
impl_matrix_element!(i32);
impl_matrix_element!(i64);
impl_matrix_element!(u32);
impl_matrix_element!(u64);
