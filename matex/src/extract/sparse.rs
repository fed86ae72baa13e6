//! Sparse extraction path

use matex_core::{Backend, MatexError, Result, SparseLine, Subset};

use crate::cache::SlabCache;
use crate::oracle::{Lookahead, Oracle};

/// Sparse extraction result for one primary index
///
/// `indices` are positions relative to the extractor's subset (block offset
/// or position within the index set), strictly increasing; they are not the
/// backend's absolute secondary indices. Channels disabled at construction
/// come back empty, but `count` always reports the full entry count.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SparseOutput {
    pub count: usize,
    pub indices: Vec<u32>,
    pub values: Vec<f64>,
}

/// Cursor producing sparse subset-relative entries for requested primary
/// indices
///
/// As with the dense path, the cache is keyed on the bare primary index and
/// stores the backend's full-width entry list; subset restriction and index
/// remapping happen on the way out.
pub struct SparseExtractor<'a, B: Backend> {
    backend: &'a B,
    by_row: bool,
    subset: Subset,
    cache: SlabCache<SparseLine>,
    oracle: Option<Lookahead>,
    needs_value: bool,
    needs_index: bool,
}

impl<'a, B: Backend> SparseExtractor<'a, B> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        backend: &'a B,
        by_row: bool,
        subset: Subset,
        cache_bytes: usize,
        oracle: Option<Box<dyn Oracle>>,
        needs_value: bool,
        needs_index: bool,
    ) -> Result<Self> {
        subset.validate(backend.secondary_dim(by_row))?;
        Ok(Self {
            backend,
            by_row,
            subset,
            cache: SlabCache::new(cache_bytes),
            oracle: oracle.map(Lookahead::new),
            needs_value,
            needs_index,
        })
    }

    /// Extract the stored entries for one primary index within the subset
    ///
    /// A count-only configuration still performs the full resolution; it is
    /// not a cheaper path, it just drops both channels from the output.
    pub fn fetch(&mut self, index: usize) -> Result<SparseOutput> {
        let primary = self.backend.primary_dim(self.by_row);
        if index >= primary {
            return Err(MatexError::IndexOutOfBounds);
        }

        let Self { backend, by_row, subset, cache, oracle, needs_value, needs_index } = self;
        if let Some(oracle) = oracle.as_mut() {
            // One prediction ahead of the call sequence, as on the dense
            // path; the literal index stays authoritative.
            if let Some(predicted) = oracle.advance() {
                if predicted != index && predicted < primary {
                    resolve(cache, *backend, *by_row, predicted);
                }
            }
        }

        let line = resolve(cache, *backend, *by_row, index);
        Ok(restrict(line, subset, *needs_value, *needs_index))
    }
}

/// Resolve one full-width entry list through the cache
fn resolve<'c, B: Backend>(
    cache: &'c mut SlabCache<SparseLine>,
    backend: &B,
    by_row: bool,
    index: usize,
) -> &'c SparseLine {
    cache.get_or_fetch(index, || backend.fetch_sparse(by_row, index))
}

/// Restrict a full-width entry list to the subset, remapping secondary
/// indices to subset-relative positions
fn restrict(
    line: &SparseLine,
    subset: &Subset,
    needs_value: bool,
    needs_index: bool,
) -> SparseOutput {
    let mut out = SparseOutput::default();
    match subset {
        Subset::Full => {
            out.count = line.len();
            if needs_index {
                out.indices = line.indices.clone();
            }
            if needs_value {
                out.values = line.values.clone();
            }
        }
        Subset::Block { start, length } => {
            let lo = line.indices.partition_point(|&i| (i as usize) < *start);
            let hi = line.indices.partition_point(|&i| (i as usize) < start + length);
            out.count = hi - lo;
            if needs_index {
                out.indices = line.indices[lo..hi]
                    .iter()
                    .map(|&i| (i as usize - start) as u32)
                    .collect();
            }
            if needs_value {
                out.values = line.values[lo..hi].to_vec();
            }
        }
        Subset::Indexed(keep) => {
            // Walking subset positions in order keeps the relative indices
            // strictly increasing even for an unsorted index set.
            for (position, &at) in keep.iter().enumerate() {
                if let Ok(found) = line.indices.binary_search(&(at as u32)) {
                    out.count += 1;
                    if needs_index {
                        out.indices.push(position as u32);
                    }
                    if needs_value {
                        out.values.push(line.values[found]);
                    }
                }
            }
        }
    }
    out
}
