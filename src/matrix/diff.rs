use std::ops::Range;

use ndarray::concatenate;
use ndarray::s;
use ndarray::Array2;
use ndarray::Axis;

use crate::fileformat::LoomFile;
use crate::runtime::ScloomError;

pub const DEFAULT_NUM_CHUNKS: usize = 100;
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 10_000;

/// How to split the column axis for the subtraction. Chunking bounds the peak
/// working set; it never changes the result.
#[derive(Clone, Copy, Debug)]
pub struct ChunkPolicy {
    /// Desired number of chunks across the non-reserved columns
    pub num_chunks: usize,
    /// Upper bound on columns per chunk
    pub max_chunk_size: usize,
}

impl Default for ChunkPolicy {
    fn default() -> Self {
        ChunkPolicy {
            num_chunks: DEFAULT_NUM_CHUNKS,
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
        }
    }
}

/// Anything that can serve contiguous column slices of a 2-D count matrix;
/// implemented by the loom container for out-of-core reads and by in-memory
/// arrays.
pub trait ColumnSource {
    fn shape(&self) -> (usize, usize);
    fn read_columns(&self, range: Range<usize>) -> anyhow::Result<Array2<i64>>;
}

impl ColumnSource for Array2<i64> {
    fn shape(&self) -> (usize, usize) {
        self.dim()
    }

    fn read_columns(&self, range: Range<usize>) -> anyhow::Result<Array2<i64>> {
        Ok(self.slice(s![.., range]).to_owned())
    }
}

impl ColumnSource for LoomFile {
    fn shape(&self) -> (usize, usize) {
        LoomFile::shape(self)
    }

    fn read_columns(&self, range: Range<usize>) -> anyhow::Result<Array2<i64>> {
        LoomFile::read_columns(self, range)
    }
}

/// Column ranges covering [0, cols) in order.
///
/// The first two columns hold the ambiguous/no-feature count categories
/// emitted by the upstream counter and always form the initial chunk on their
/// own; the rest is split into `num_chunks` contiguous pieces, each at most
/// `max_chunk_size` columns wide.
pub fn chunk_ranges(cols: usize, policy: &ChunkPolicy) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    if cols == 0 {
        return ranges;
    }
    let reserved = cols.min(2);
    ranges.push(0..reserved);

    if cols > 2 {
        let remaining = cols - 2;
        let mut chunk_size = remaining.div_ceil(policy.num_chunks.max(1));
        chunk_size = chunk_size.min(policy.max_chunk_size).max(1);
        let mut start = 2;
        while start < cols {
            let end = (start + chunk_size).min(cols);
            ranges.push(start..end);
            start = end;
        }
    }
    ranges
}

/// Elementwise `total − component` over two row-aligned matrices of identical
/// shape, computed one column chunk at a time.
///
/// The result is signed and deliberately not clipped: a total count can
/// undercount relative to a component count, and whether such negatives mean
/// anything is a consumer decision.
pub fn chunked_difference<T, C>(
    total: &T,
    component: &C,
    policy: &ChunkPolicy,
) -> anyhow::Result<Array2<i64>>
where
    T: ColumnSource,
    C: ColumnSource,
{
    let shape = total.shape();
    if shape != component.shape() {
        return Err(ScloomError::dimension_mismatch(format!(
            "total matrix is {:?}, component matrix is {:?}",
            shape,
            component.shape()
        ))
        .into());
    }
    let (n_rows, n_cols) = shape;
    if n_cols == 0 {
        return Ok(Array2::zeros((n_rows, 0)));
    }

    let mut pieces = Vec::new();
    for range in chunk_ranges(n_cols, policy) {
        let block = total.read_columns(range.clone())? - component.read_columns(range)?;
        pieces.push(block);
    }
    let views: Vec<_> = pieces.iter().map(|p| p.view()).collect();
    Ok(concatenate(Axis(1), &views)?)
}
