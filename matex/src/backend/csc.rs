//! Compressed-sparse-column backend

use matex_core::{Backend, MatexError, MatrixElement, Result, SparseLine};

/// Compressed-sparse-column matrix
///
/// `col_ptrs` has `ncol + 1` entries; column `j` owns the half-open slice
/// `[col_ptrs[j], col_ptrs[j + 1])` of `row_indices` / `values`, with row
/// indices strictly ascending inside each column.
pub struct CscMatrix<T: MatrixElement> {
    nrow: usize,
    ncol: usize,
    values: Vec<T>,
    row_indices: Vec<u32>,
    col_ptrs: Vec<usize>,
}

impl<T: MatrixElement> CscMatrix<T> {
    pub fn new(
        nrow: usize,
        ncol: usize,
        values: Vec<T>,
        row_indices: Vec<u32>,
        col_ptrs: Vec<usize>,
    ) -> Result<Self> {
        if values.len() != row_indices.len() {
            return Err(MatexError::InvalidSparseLayout);
        }
        if col_ptrs.len() != ncol + 1 || col_ptrs[0] != 0 {
            return Err(MatexError::InvalidSparseLayout);
        }
        if *col_ptrs.last().unwrap_or(&0) != values.len() {
            return Err(MatexError::InvalidSparseLayout);
        }
        for j in 0..ncol {
            let (start, end) = (col_ptrs[j], col_ptrs[j + 1]);
            if start > end || end > values.len() {
                return Err(MatexError::InvalidSparseLayout);
            }
            let mut previous: Option<u32> = None;
            for &row in &row_indices[start..end] {
                if row as usize >= nrow || previous.is_some_and(|p| p >= row) {
                    return Err(MatexError::InvalidSparseLayout);
                }
                previous = Some(row);
            }
        }
        Ok(Self { nrow, ncol, values, row_indices, col_ptrs })
    }

    /// Number of stored entries
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    fn column(&self, col: usize) -> (&[u32], &[T]) {
        let (start, end) = (self.col_ptrs[col], self.col_ptrs[col + 1]);
        (&self.row_indices[start..end], &self.values[start..end])
    }
}

impl<T: MatrixElement> Backend for CscMatrix<T> {
    fn nrow(&self) -> usize {
        self.nrow
    }

    fn ncol(&self) -> usize {
        self.ncol
    }

    fn is_sparse(&self) -> bool {
        true
    }

    fn prefer_rows(&self) -> bool {
        // Column slices are contiguous; row access scans every column.
        false
    }

    fn fetch_dense(&self, by_row: bool, index: usize, buffer: &mut Vec<f64>) {
        let line = self.fetch_sparse(by_row, index);
        let width = self.secondary_dim(by_row);
        buffer.clear();
        buffer.resize(width, 0.0);
        for (&idx, &value) in line.indices.iter().zip(line.values.iter()) {
            buffer[idx as usize] = value;
        }
    }

    fn fetch_sparse(&self, by_row: bool, index: usize) -> SparseLine {
        let mut out = SparseLine::default();
        if by_row {
            // Walk every column; output comes out ascending by column.
            let target = index as u32;
            for col in 0..self.ncol {
                let (rows, values) = self.column(col);
                if let Ok(at) = rows.binary_search(&target) {
                    out.indices.push(col as u32);
                    out.values.push(values[at].to_f64());
                }
            }
        } else {
            let (rows, values) = self.column(index);
            out.indices.extend_from_slice(rows);
            out.values.extend(values.iter().map(|v| v.to_f64()));
        }
        out
    }
}
