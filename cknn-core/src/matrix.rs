//! Dense square matrices used for distances, ratios and cluster reductions.

use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{
    datasource::DataSource,
    error::{CknnError, Result},
};

/// Relative tolerance applied when checking precomputed matrices for symmetry.
pub const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// Dense row-major `n × n` matrix of `f64` values.
///
/// # Examples
/// ```
/// use cknn_core::SquareMatrix;
///
/// let matrix = SquareMatrix::from_rows(&[vec![0.0, 2.0], vec![2.0, 0.0]])?;
/// assert_eq!(matrix.size(), 2);
/// assert_eq!(matrix.get(0, 1), 2.0);
/// # Ok::<(), cknn_core::CknnError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SquareMatrix {
    size: usize,
    values: Vec<f64>,
}

impl SquareMatrix {
    /// Creates a matrix with every entry set to `value`.
    #[must_use]
    pub fn filled(size: usize, value: f64) -> Self {
        Self {
            size,
            values: vec![value; size * size],
        }
    }

    /// Copies `rows` into a matrix, checking only that it is square.
    ///
    /// # Errors
    /// Returns [`CknnError::NonSquareMatrix`] when any row length differs
    /// from the number of rows.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let size = rows.len();
        if let Some(row) = rows.iter().find(|row| row.len() != size) {
            return Err(CknnError::NonSquareMatrix {
                rows: size,
                columns: row.len(),
            });
        }
        Ok(Self {
            size,
            values: rows.iter().flatten().copied().collect(),
        })
    }

    /// Copies a precomputed distance matrix, validating it as one.
    ///
    /// Entries must be finite and non-negative and the matrix symmetric
    /// within [`SYMMETRY_TOLERANCE`] (relative to the larger magnitude, with
    /// an absolute floor of one).
    ///
    /// # Errors
    /// Returns [`CknnError::NonSquareMatrix`], [`CknnError::InvalidDistance`]
    /// or [`CknnError::AsymmetricMatrix`] for the first offending entry.
    pub fn from_distance_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let matrix = Self::from_rows(rows)?;
        for row in 0..matrix.size {
            for column in 0..matrix.size {
                let value = matrix.get(row, column);
                if !value.is_finite() || value < 0.0 {
                    return Err(CknnError::InvalidDistance { row, column, value });
                }
            }
        }
        for row in 0..matrix.size {
            for column in (row + 1)..matrix.size {
                let (upper, lower) = (matrix.get(row, column), matrix.get(column, row));
                let scale = upper.max(lower).max(1.0);
                if (upper - lower).abs() > SYMMETRY_TOLERANCE * scale {
                    return Err(CknnError::AsymmetricMatrix { row, column });
                }
            }
        }
        Ok(matrix)
    }

    /// Computes the full pairwise distance matrix of `source`.
    ///
    /// Only the upper triangle is queried; it is mirrored into the lower
    /// triangle and the diagonal is zero. Rows are evaluated in parallel when
    /// the `parallel` feature is enabled.
    ///
    /// # Errors
    /// Returns [`CknnError::DataSource`] when the source fails and
    /// [`CknnError::InvalidDistance`] when it yields a negative or non-finite
    /// distance.
    pub fn from_data_source<D: DataSource + Sync + ?Sized>(source: &D) -> Result<Self> {
        let size = source.len();
        let upper = map_rows(size, |row| {
            let candidates: Vec<usize> = ((row + 1)..size).collect();
            source.batch_distances(row, &candidates)
        })
        .map_err(|error| CknnError::DataSource {
            data_source: Arc::from(source.name()),
            error,
        })?;

        let mut matrix = Self::filled(size, 0.0);
        for (row, distances) in upper.into_iter().enumerate() {
            for (offset, value) in distances.into_iter().enumerate() {
                let column = row + 1 + offset;
                if !value.is_finite() || value < 0.0 {
                    return Err(CknnError::InvalidDistance { row, column, value });
                }
                matrix.set(row, column, value);
                matrix.set(column, row, value);
            }
        }
        Ok(matrix)
    }

    #[rustfmt::skip]
    #[must_use]
    pub fn size(&self) -> usize { self.size }

    /// Returns the entry at (`row`, `column`).
    ///
    /// # Panics
    /// Panics when either index is outside `0..size`.
    #[must_use]
    pub fn get(&self, row: usize, column: usize) -> f64 {
        self.values[self.offset(row, column)]
    }

    /// Overwrites the entry at (`row`, `column`).
    ///
    /// # Panics
    /// Panics when either index is outside `0..size`.
    pub fn set(&mut self, row: usize, column: usize, value: f64) {
        let offset = self.offset(row, column);
        self.values[offset] = value;
    }

    /// Returns one row as a slice.
    #[must_use]
    pub fn row(&self, row: usize) -> &[f64] {
        let start = row * self.size;
        &self.values[start..start + self.size]
    }

    /// Iterates the rows in order.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks(self.size.max(1)).take(self.size)
    }

    /// Returns whether `M[i][j] == M[j][i]` for every pair.
    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        (0..self.size).all(|i| ((i + 1)..self.size).all(|j| self.get(i, j) == self.get(j, i)))
    }

    /// Copies the matrix into nested rows.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.rows().map(<[f64]>::to_vec).collect()
    }

    fn offset(&self, row: usize, column: usize) -> usize {
        assert!(
            row < self.size && column < self.size,
            "index ({row}, {column}) out of bounds for {n}x{n} matrix",
            n = self.size
        );
        row * self.size + column
    }
}

/// Evaluates `f` for every row index, in parallel when available.
#[cfg(feature = "parallel")]
pub(crate) fn map_rows<T, E, F>(rows: usize, f: F) -> core::result::Result<Vec<T>, E>
where
    T: Send,
    E: Send,
    F: Fn(usize) -> core::result::Result<T, E> + Sync + Send,
{
    (0..rows).into_par_iter().map(f).collect()
}

/// Evaluates `f` for every row index.
#[cfg(not(feature = "parallel"))]
pub(crate) fn map_rows<T, E, F>(rows: usize, f: F) -> core::result::Result<Vec<T>, E>
where
    F: Fn(usize) -> core::result::Result<T, E>,
{
    (0..rows).map(f).collect()
}
