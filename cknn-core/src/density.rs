//! Density normalisation of pairwise distances.
//!
//! Every distance is divided by the geometric mean of its endpoints' local
//! scales, where a point's scale is the distance to its n-th nearest
//! neighbour. Dense regions shrink less than sparse ones, so a single
//! threshold behaves comparably across regions of different density.

use tracing::instrument;

use crate::{
    error::{CknnError, Result},
    matrix::{SquareMatrix, map_rows},
};

/// Returns each point's distance to its `n_neighbors`-th nearest other point.
///
/// The diagonal is skipped, so a non-zero self-distance in a precomputed
/// matrix does not shift the selection.
///
/// # Errors
/// Returns [`CknnError::InvalidNeighborCount`] unless
/// `1 <= n_neighbors <= size - 1`.
pub fn neighbor_scales(distances: &SquareMatrix, n_neighbors: usize) -> Result<Vec<f64>> {
    let size = distances.size();
    if n_neighbors == 0 || n_neighbors >= size {
        return Err(CknnError::InvalidNeighborCount {
            got: n_neighbors,
            samples: size,
        });
    }

    let Ok(scales) = map_rows(size, |row| {
        let mut others: Vec<f64> = distances
            .row(row)
            .iter()
            .enumerate()
            .filter_map(|(column, &value)| (column != row).then_some(value))
            .collect();
        let (_, nth, _) = others.select_nth_unstable_by(n_neighbors - 1, f64::total_cmp);
        Ok::<_, core::convert::Infallible>(*nth)
    });
    Ok(scales)
}

/// Computes the ratio matrix `R[i][j] = D[i][j] / sqrt(a[i] * a[j])`.
///
/// `a` holds the [`neighbor_scales`]; the diagonal of the result is zero.
///
/// # Examples
/// ```
/// use cknn_core::{SquareMatrix, ratio_matrix};
///
/// let distances = SquareMatrix::from_rows(&[
///     vec![0.0, 1.0, 4.0],
///     vec![1.0, 0.0, 2.0],
///     vec![4.0, 2.0, 0.0],
/// ])?;
/// let ratios = ratio_matrix(&distances, 1)?;
/// // a = [1, 1, 2]
/// assert_eq!(ratios.get(0, 1), 1.0);
/// assert_eq!(ratios.get(1, 2), 2.0 / 2.0_f64.sqrt());
/// assert_eq!(ratios.get(2, 2), 0.0);
/// # Ok::<(), cknn_core::CknnError>(())
/// ```
///
/// # Errors
/// Returns [`CknnError::InvalidNeighborCount`] for an out-of-range
/// `n_neighbors` and [`CknnError::DegenerateDensity`] when a point's scale
/// is zero, which happens when it has at least `n_neighbors` duplicates.
#[instrument(
    name = "cknn.ratio",
    err,
    skip(distances),
    fields(size = distances.size())
)]
pub fn ratio_matrix(distances: &SquareMatrix, n_neighbors: usize) -> Result<SquareMatrix> {
    let scales = neighbor_scales(distances, n_neighbors)?;
    if let Some(point) = scales.iter().position(|&scale| scale <= 0.0) {
        return Err(CknnError::DegenerateDensity { point });
    }

    let size = distances.size();
    let mut ratios = SquareMatrix::filled(size, 0.0);
    for row in 0..size {
        for column in 0..size {
            if row != column {
                let scale = (scales[row] * scales[column]).sqrt();
                ratios.set(row, column, distances.get(row, column) / scale);
            }
        }
    }
    Ok(ratios)
}
