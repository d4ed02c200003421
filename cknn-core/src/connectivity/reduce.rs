//! Cluster-level reduction of a distance matrix (`concat_cluster`).

use tracing::instrument;

use crate::{
    error::{CknnError, Result},
    graph::Partition,
    matrix::{SquareMatrix, map_rows},
};

/// Original point pair behind every entry of a (possibly reduced) matrix.
///
/// Entry `(p, q)` names the point pair `(i, j)` whose distance the matrix
/// holds at `(p, q)`. For an unreduced matrix this is the identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexMap {
    size: usize,
    pairs: Vec<(usize, usize)>,
}

impl IndexMap {
    /// Maps every entry of an `size × size` matrix to itself.
    #[must_use]
    pub fn identity(size: usize) -> Self {
        let pairs = (0..size)
            .flat_map(|row| (0..size).map(move |column| (row, column)))
            .collect();
        Self { size, pairs }
    }

    #[rustfmt::skip]
    #[must_use]
    pub fn size(&self) -> usize { self.size }

    /// Returns the original point pair behind entry (`row`, `column`), or
    /// `None` when either index is outside `0..size`.
    #[must_use]
    pub fn get(&self, row: usize, column: usize) -> Option<(usize, usize)> {
        if row >= self.size || column >= self.size {
            return None;
        }
        self.pairs.get(row * self.size + column).copied()
    }
}

/// Output of [`reduce_clusters`].
#[derive(Clone, Debug, PartialEq)]
pub struct ClusterDistances {
    matrix: SquareMatrix,
    origins: Option<IndexMap>,
}

impl ClusterDistances {
    /// The `C × C` matrix of minimum inter-cluster distances.
    ///
    /// The diagonal holds `f64::INFINITY`.
    #[rustfmt::skip]
    #[must_use]
    pub fn matrix(&self) -> &SquareMatrix { &self.matrix }

    /// Point pairs realising each minimum, when origins were requested.
    #[rustfmt::skip]
    #[must_use]
    pub fn origins(&self) -> Option<&IndexMap> { self.origins.as_ref() }

    /// For each cluster, its nearest other cluster and their distance.
    ///
    /// Ties resolve to the lowest cluster index.
    #[must_use]
    pub fn nearest(&self) -> Vec<(usize, f64)> {
        self.matrix
            .rows()
            .map(|row| {
                row.iter().enumerate().fold(
                    (0, f64::INFINITY),
                    |best, (column, &value)| {
                        if value < best.1 { (column, value) } else { best }
                    },
                )
            })
            .collect()
    }

    /// Splits the reduction into its matrix and origins.
    #[must_use]
    pub fn into_parts(self) -> (SquareMatrix, Option<IndexMap>) {
        (self.matrix, self.origins)
    }
}

#[derive(Clone, Copy)]
struct Block {
    value: f64,
    row: usize,
    column: usize,
}

/// Reduces `matrix` to one entry per ordered pair of clusters.
///
/// Entry `(p, q)` with `p ≠ q` is the minimum of `matrix[i][j]` over `i` in
/// cluster `p` and `j` in cluster `q`; the first minimum in row-major order
/// wins ties. The diagonal is `f64::INFINITY`. When `origins` is supplied
/// the result carries the original point pair behind every minimum, traced
/// through `origins` rather than through the row and column of `matrix`.
///
/// Cluster rows are reduced in parallel when the `parallel` feature is on.
///
/// # Examples
/// ```
/// use cknn_core::{IndexMap, Partition, SquareMatrix, reduce_clusters};
///
/// let matrix = SquareMatrix::from_rows(&[
///     vec![0.0, 1.0, 5.0, 4.0],
///     vec![1.0, 0.0, 3.0, 6.0],
///     vec![5.0, 3.0, 0.0, 1.0],
///     vec![4.0, 6.0, 1.0, 0.0],
/// ])?;
/// let partition = Partition::new(vec![0, 0, 1, 1], 2)?;
/// let reduced = reduce_clusters(&matrix, &partition, Some(&IndexMap::identity(4)))?;
/// assert_eq!(reduced.matrix().get(0, 1), 3.0);
/// assert_eq!(reduced.matrix().get(1, 1), f64::INFINITY);
/// assert_eq!(reduced.origins().and_then(|o| o.get(1, 0)), Some((2, 1)));
/// # Ok::<(), cknn_core::CknnError>(())
/// ```
///
/// # Errors
/// Returns [`CknnError::LabelCountMismatch`] when the partition does not
/// label every row of `matrix`, or when `origins` has a different size.
#[instrument(
    name = "cknn.reduce",
    err,
    skip(matrix, partition, origins),
    fields(size = matrix.size(), clusters = partition.count()),
)]
pub fn reduce_clusters(
    matrix: &SquareMatrix,
    partition: &Partition,
    origins: Option<&IndexMap>,
) -> Result<ClusterDistances> {
    let size = matrix.size();
    if partition.len() != size {
        return Err(CknnError::LabelCountMismatch {
            labels: partition.len(),
            size,
        });
    }
    if let Some(map) = origins.filter(|map| map.size() != size) {
        return Err(CknnError::LabelCountMismatch {
            labels: map.size(),
            size,
        });
    }

    let count = partition.count();
    let labels = partition.labels();
    let members = partition.members();
    let Ok(blocks) = map_rows(count, |cluster| {
        let mut best: Vec<Option<Block>> = vec![None; count];
        for &row in &members[cluster] {
            for (column, &value) in matrix.row(row).iter().enumerate() {
                let target = labels[column];
                if target == cluster {
                    continue;
                }
                if best[target].is_none_or(|block| value < block.value) {
                    best[target] = Some(Block { value, row, column });
                }
            }
        }
        Ok::<_, core::convert::Infallible>(best)
    });

    let mut reduced = SquareMatrix::filled(count, f64::INFINITY);
    let mut pairs = origins.map(|_| vec![(0, 0); count * count]);
    for (p, row) in blocks.into_iter().enumerate() {
        for (q, block) in row.into_iter().enumerate() {
            let Some(block) = block else { continue };
            reduced.set(p, q, block.value);
            if let (Some(pairs), Some(origin)) = (
                pairs.as_mut(),
                origins.and_then(|map| map.get(block.row, block.column)),
            ) {
                pairs[p * count + q] = origin;
            }
        }
    }

    Ok(ClusterDistances {
        matrix: reduced,
        origins: pairs.map(|pairs| IndexMap { size: count, pairs }),
    })
}
