//! Plain contiguous dense backend

use matex_core::{Backend, MatexError, MatrixElement, Result, SparseLine};

/// Storage order of a contiguous dense array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MemoryOrder {
    /// C order: consecutive elements of a row are adjacent
    RowMajor,
    /// Fortran order: consecutive elements of a column are adjacent
    ColumnMajor,
}

/// Contiguous dense matrix in row- or column-major layout
pub struct DenseMatrix<T: MatrixElement> {
    nrow: usize,
    ncol: usize,
    data: Vec<T>,
    order: MemoryOrder,
}

impl<T: MatrixElement> DenseMatrix<T> {
    /// Wrap a contiguous array with the given shape and storage order
    pub fn new(nrow: usize, ncol: usize, data: Vec<T>, order: MemoryOrder) -> Result<Self> {
        let expected = nrow.checked_mul(ncol).ok_or(MatexError::ShapeMismatch)?;
        if data.len() != expected {
            return Err(MatexError::ShapeMismatch);
        }
        Ok(Self { nrow, ncol, data, order })
    }

    fn get(&self, row: usize, col: usize) -> T {
        let offset = match self.order {
            MemoryOrder::RowMajor => row * self.ncol + col,
            MemoryOrder::ColumnMajor => col * self.nrow + row,
        };
        self.data[offset]
    }
}

impl<T: MatrixElement> Backend for DenseMatrix<T> {
    fn nrow(&self) -> usize {
        self.nrow
    }

    fn ncol(&self) -> usize {
        self.ncol
    }

    fn is_sparse(&self) -> bool {
        false
    }

    fn prefer_rows(&self) -> bool {
        self.order == MemoryOrder::RowMajor
    }

    fn fetch_dense(&self, by_row: bool, index: usize, buffer: &mut Vec<f64>) {
        let width = self.secondary_dim(by_row);
        buffer.clear();
        buffer.reserve(width);
        for other in 0..width {
            let value = if by_row {
                self.get(index, other)
            } else {
                self.get(other, index)
            };
            buffer.push(value.to_f64());
        }
    }

    fn fetch_sparse(&self, by_row: bool, index: usize) -> SparseLine {
        let mut buffer = Vec::new();
        self.fetch_dense(by_row, index, &mut buffer);
        SparseLine::from_dense(&buffer)
    }
}
