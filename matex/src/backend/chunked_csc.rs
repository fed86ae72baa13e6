//! Tiled sparse backend
//!
//! Stores the matrix as a grid of independent compressed-sparse-column
//! tiles, sharing the boundary layout rules of `ChunkedMatrix`. A fetched
//! line visits every tile it crosses and offsets each tile's local indices
//! by the tile origin, so concatenated entries stay sorted.

use matex_core::{Backend, MatexError, MatrixElement, Result, SparseLine};

use super::chunked::{check_bounds, locate};
use super::csc::CscMatrix;

/// Sparse matrix split into a grid of CSC tiles
pub struct ChunkedCscMatrix<T: MatrixElement> {
    nrow: usize,
    ncol: usize,
    row_bounds: Vec<usize>,
    col_bounds: Vec<usize>,
    // Row-major grid of tiles; each tile's shape matches its grid cell.
    tiles: Vec<CscMatrix<T>>,
}

impl<T: MatrixElement> ChunkedCscMatrix<T> {
    /// Assemble a matrix from pre-built tiles
    ///
    /// Boundaries follow the `ChunkedMatrix` rules (strictly increasing end
    /// offsets, last one equal to the extent), and every tile's shape must
    /// match its grid cell.
    pub fn new(
        nrow: usize,
        ncol: usize,
        row_bounds: Vec<usize>,
        col_bounds: Vec<usize>,
        tiles: Vec<CscMatrix<T>>,
    ) -> Result<Self> {
        check_bounds(&row_bounds, nrow)?;
        check_bounds(&col_bounds, ncol)?;
        if tiles.len() != row_bounds.len() * col_bounds.len() {
            return Err(MatexError::InvalidChunkGrid);
        }

        let mut at = 0;
        let mut row_start = 0;
        for &row_end in &row_bounds {
            let mut col_start = 0;
            for &col_end in &col_bounds {
                let tile = &tiles[at];
                if tile.nrow() != row_end - row_start || tile.ncol() != col_end - col_start {
                    return Err(MatexError::ShapeMismatch);
                }
                at += 1;
                col_start = col_end;
            }
            row_start = row_end;
        }

        Ok(Self { nrow, ncol, row_bounds, col_bounds, tiles })
    }

    /// Tile a row-major array along the given boundaries, compressing each
    /// tile and dropping its zeros
    pub fn from_dense(
        nrow: usize,
        ncol: usize,
        data: Vec<T>,
        row_bounds: Vec<usize>,
        col_bounds: Vec<usize>,
    ) -> Result<Self> {
        let expected = nrow.checked_mul(ncol).ok_or(MatexError::ShapeMismatch)?;
        if data.len() != expected {
            return Err(MatexError::ShapeMismatch);
        }
        check_bounds(&row_bounds, nrow)?;
        check_bounds(&col_bounds, ncol)?;

        let mut tiles = Vec::with_capacity(row_bounds.len() * col_bounds.len());
        let mut row_start = 0;
        for &row_end in &row_bounds {
            let mut col_start = 0;
            for &col_end in &col_bounds {
                let mut values = Vec::new();
                let mut row_indices = Vec::new();
                let mut col_ptrs = vec![0];
                for c in col_start..col_end {
                    for r in row_start..row_end {
                        let value = data[r * ncol + c];
                        if value.to_f64() != 0.0 {
                            values.push(value);
                            row_indices.push((r - row_start) as u32);
                        }
                    }
                    col_ptrs.push(values.len());
                }
                tiles.push(CscMatrix::new(
                    row_end - row_start,
                    col_end - col_start,
                    values,
                    row_indices,
                    col_ptrs,
                )?);
                col_start = col_end;
            }
            row_start = row_end;
        }

        Ok(Self { nrow, ncol, row_bounds, col_bounds, tiles })
    }

    fn tile_grid_width(&self) -> usize {
        self.col_bounds.len()
    }
}

impl<T: MatrixElement> Backend for ChunkedCscMatrix<T> {
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
        // Fewer tiles crossed per line wins; ties go to columns, the cheap
        // orientation within each CSC tile.
        self.col_bounds.len() < self.row_bounds.len()
    }

    fn fetch_dense(&self, by_row: bool, index: usize, buffer: &mut Vec<f64>) {
        let width = self.secondary_dim(by_row);
        buffer.clear();
        buffer.resize(width, 0.0);
        let line = self.fetch_sparse(by_row, index);
        for (&at, &value) in line.indices.iter().zip(line.values.iter()) {
            buffer[at as usize] = value;
        }
    }

    fn fetch_sparse(&self, by_row: bool, index: usize) -> SparseLine {
        let mut out = SparseLine { indices: Vec::new(), values: Vec::new() };
        let grid_width = self.tile_grid_width();
        if by_row {
            let (tile_row, row_start) = locate(&self.row_bounds, index);
            let mut col_start = 0;
            for tile_col in 0..grid_width {
                let tile = &self.tiles[tile_row * grid_width + tile_col];
                let part = tile.fetch_sparse(true, index - row_start);
                out.indices.extend(part.indices.iter().map(|&c| c + col_start as u32));
                out.values.extend(part.values);
                col_start = self.col_bounds[tile_col];
            }
        } else {
            let (tile_col, col_start) = locate(&self.col_bounds, index);
            let mut row_start = 0;
            for tile_row in 0..self.row_bounds.len() {
                let tile = &self.tiles[tile_row * grid_width + tile_col];
                let part = tile.fetch_sparse(false, index - col_start);
                out.indices.extend(part.indices.iter().map(|&r| r + row_start as u32));
                out.values.extend(part.values);
                row_start = self.row_bounds[tile_row];
            }
        }
        out
    }
}
