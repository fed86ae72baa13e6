//! Tiled dense backend
//!
//! Stores the matrix as a grid of independent row-major tiles whose
//! boundaries may be regular or irregular along either dimension. A fetched
//! line has to visit every tile it crosses, so the preferred orientation is
//! the one crossing fewer tiles per line.

use matex_core::{Backend, MatexError, MatrixElement, Result, SparseLine};

/// Dense matrix split into a grid of tiles
pub struct ChunkedMatrix<T: MatrixElement> {
    nrow: usize,
    ncol: usize,
    // Tile end offsets along each dimension, strictly increasing, last one
    // equal to the extent. Empty when the extent is zero.
    row_bounds: Vec<usize>,
    col_bounds: Vec<usize>,
    // Row-major grid of row-major tiles.
    tiles: Vec<Vec<T>>,
}

/// Validate tile boundaries against one extent
pub(crate) fn check_bounds(bounds: &[usize], extent: usize) -> Result<()> {
    let mut previous = 0;
    for &end in bounds {
        if end <= previous {
            return Err(MatexError::InvalidChunkGrid);
        }
        previous = end;
    }
    if previous != extent {
        return Err(MatexError::InvalidChunkGrid);
    }
    Ok(())
}

/// Tile index and starting offset covering one position
pub(crate) fn locate(bounds: &[usize], at: usize) -> (usize, usize) {
    let tile = bounds.partition_point(|&end| end <= at);
    let start = if tile == 0 { 0 } else { bounds[tile - 1] };
    (tile, start)
}

impl<T: MatrixElement> ChunkedMatrix<T> {
    /// Tile a row-major array along the given boundary offsets
    ///
    /// Boundaries are the end offsets of each tile; they must be strictly
    /// increasing and the last one must equal the extent.
    pub fn new(
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
                let mut tile = Vec::with_capacity((row_end - row_start) * (col_end - col_start));
                for r in row_start..row_end {
                    for c in col_start..col_end {
                        tile.push(data[r * ncol + c]);
                    }
                }
                tiles.push(tile);
                col_start = col_end;
            }
            row_start = row_end;
        }

        Ok(Self { nrow, ncol, row_bounds, col_bounds, tiles })
    }

    /// Split a row-major array into tiles of at most `row_chunk` x `col_chunk`
    pub fn with_regular_tiles(
        nrow: usize,
        ncol: usize,
        data: Vec<T>,
        row_chunk: usize,
        col_chunk: usize,
    ) -> Result<Self> {
        if row_chunk == 0 || col_chunk == 0 {
            return Err(MatexError::InvalidChunkGrid);
        }
        let regular = |extent: usize, step: usize| -> Vec<usize> {
            let mut bounds: Vec<usize> = (1..=extent / step).map(|i| i * step).collect();
            if bounds.last().copied() != Some(extent) && extent > 0 {
                bounds.push(extent);
            }
            bounds
        };
        Self::new(
            nrow,
            ncol,
            data,
            regular(nrow, row_chunk),
            regular(ncol, col_chunk),
        )
    }

    fn tile_grid_width(&self) -> usize {
        self.col_bounds.len()
    }
}

impl<T: MatrixElement> Backend for ChunkedMatrix<T> {
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
        // Fewer tiles crossed per line wins.
        self.col_bounds.len() <= self.row_bounds.len()
    }

    fn fetch_dense(&self, by_row: bool, index: usize, buffer: &mut Vec<f64>) {
        let width = self.secondary_dim(by_row);
        buffer.clear();
        buffer.reserve(width);

        if by_row {
            let (tile_row, row_start) = locate(&self.row_bounds, index);
            let local_row = index - row_start;
            let mut col_start = 0;
            for (tile_col, &col_end) in self.col_bounds.iter().enumerate() {
                let tile = &self.tiles[tile_row * self.tile_grid_width() + tile_col];
                let tile_width = col_end - col_start;
                let offset = local_row * tile_width;
                for &value in &tile[offset..offset + tile_width] {
                    buffer.push(value.to_f64());
                }
                col_start = col_end;
            }
        } else {
            let (tile_col, col_start) = locate(&self.col_bounds, index);
            let local_col = index - col_start;
            let col_end = self.col_bounds[tile_col];
            let tile_width = col_end - col_start;
            let mut row_start = 0;
            for (tile_row, &row_end) in self.row_bounds.iter().enumerate() {
                let tile = &self.tiles[tile_row * self.tile_grid_width() + tile_col];
                for local_row in 0..row_end - row_start {
                    buffer.push(tile[local_row * tile_width + local_col].to_f64());
                }
                row_start = row_end;
            }
        }
    }

    fn fetch_sparse(&self, by_row: bool, index: usize) -> SparseLine {
        let mut buffer = Vec::new();
        self.fetch_dense(by_row, index, &mut buffer);
        SparseLine::from_dense(&buffer)
    }
}
