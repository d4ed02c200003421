//! Data source abstractions feeding pairwise distances into graph construction.

use crate::{distance::kernels, error::DataSourceError};

/// Abstraction over a collection of items that can yield pairwise distances.
///
/// # Examples
/// ```
/// use cknn_core::{DataSource, DataSourceError};
///
/// struct Line(Vec<f64>);
///
/// impl DataSource for Line {
///     fn len(&self) -> usize { self.0.len() }
///     fn name(&self) -> &str { "line" }
///     fn distance(&self, i: usize, j: usize) -> Result<f64, DataSourceError> {
///         let a = self.0.get(i).ok_or(DataSourceError::OutOfBounds { index: i })?;
///         let b = self.0.get(j).ok_or(DataSourceError::OutOfBounds { index: j })?;
///         Ok((a - b).abs())
///     }
/// }
///
/// let src = Line(vec![1.0, 2.0, 4.0]);
/// assert_eq!(src.len(), 3);
/// assert_eq!(src.distance(0, 2)?, 3.0);
///
/// let mut out = vec![0.0; 2];
/// src.distance_batch(&[(0, 1), (1, 2)], &mut out)?;
/// assert_eq!(out, [1.0, 2.0]);
///
/// assert_eq!(src.batch_distances(0, &[1, 2])?, [1.0, 3.0]);
/// # Ok::<(), DataSourceError>(())
/// ```
pub trait DataSource {
    /// Returns number of items in the source.
    fn len(&self) -> usize;

    /// Returns whether the source contains no items.
    #[must_use]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a human-readable name.
    fn name(&self) -> &str;

    /// Computes the distance between two items.
    fn distance(&self, i: usize, j: usize) -> Result<f64, DataSourceError>;

    /// Computes the distances from `query` to every entry in `candidates`.
    ///
    /// The default implementation calls [`DataSource::distance`] repeatedly.
    ///
    /// # Errors
    /// Returns any [`DataSourceError`] surfaced by [`DataSource::distance`].
    fn batch_distances(
        &self,
        query: usize,
        candidates: &[usize],
    ) -> Result<Vec<f64>, DataSourceError> {
        candidates
            .iter()
            .map(|&candidate| self.distance(query, candidate))
            .collect()
    }

    /// Computes several distances at once, storing results in `out`.
    ///
    /// # Errors
    /// Returns [`DataSourceError::OutputLengthMismatch`] if
    /// `pairs.len() != out.len()`. If any pair fails, `out` is left unmodified.
    fn distance_batch(
        &self,
        pairs: &[(usize, usize)],
        out: &mut [f64],
    ) -> Result<(), DataSourceError> {
        if pairs.len() != out.len() {
            return Err(DataSourceError::OutputLengthMismatch {
                out: out.len(),
                expected: pairs.len(),
            });
        }
        let computed = pairs
            .iter()
            .map(|&(i, j)| self.distance(i, j))
            .collect::<Result<Vec<_>, _>>()?;
        out.copy_from_slice(&computed);
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Kernel {
    Euclidean,
    /// Row norms, computed once at construction.
    Cosine(Vec<f64>),
}

/// In-memory [`DataSource`] over equal-length coordinate rows.
///
/// Rows are validated once when the set is built, so distance queries only
/// fail for out-of-range indices.
///
/// # Examples
/// ```
/// use cknn_core::{DataSource, PointSet};
///
/// let points = PointSet::euclidean(vec![vec![0.0, 0.0], vec![3.0, 4.0]])?;
/// assert_eq!(points.distance(0, 1)?, 5.0);
/// # Ok::<(), cknn_core::DataSourceError>(())
/// ```
#[derive(Clone, Debug)]
pub struct PointSet {
    rows: Vec<Vec<f64>>,
    kernel: Kernel,
}

impl PointSet {
    /// Wraps `rows` and measures them with the Euclidean metric.
    ///
    /// # Errors
    /// Returns [`DataSourceError::EmptyData`] for no rows,
    /// [`DataSourceError::ZeroDimension`] for empty rows,
    /// [`DataSourceError::DimensionMismatch`] for ragged rows and
    /// [`DataSourceError::NonFiniteValue`] for NaN or infinite coordinates.
    pub fn euclidean(rows: Vec<Vec<f64>>) -> Result<Self, DataSourceError> {
        validate_rows(&rows)?;
        Ok(Self {
            rows,
            kernel: Kernel::Euclidean,
        })
    }

    /// Wraps `rows` and measures them with the cosine metric.
    ///
    /// # Errors
    /// Same as [`PointSet::euclidean`], plus
    /// [`DataSourceError::ZeroMagnitude`] for an all-zero row.
    pub fn cosine(rows: Vec<Vec<f64>>) -> Result<Self, DataSourceError> {
        validate_rows(&rows)?;
        let norms: Vec<f64> = rows.iter().map(|row| kernels::l2_norm(row)).collect();
        if let Some(index) = norms.iter().position(|norm| *norm == 0.0) {
            return Err(DataSourceError::ZeroMagnitude { index });
        }
        Ok(Self {
            rows,
            kernel: Kernel::Cosine(norms),
        })
    }

    #[rustfmt::skip]
    #[must_use]
    pub fn dimension(&self) -> usize { self.rows.first().map_or(0, Vec::len) }

    /// The validated rows, in input order.
    #[rustfmt::skip]
    #[must_use]
    pub fn rows(&self) -> &[Vec<f64>] { &self.rows }

    fn row(&self, index: usize) -> Result<&[f64], DataSourceError> {
        self.rows
            .get(index)
            .map(Vec::as_slice)
            .ok_or(DataSourceError::OutOfBounds { index })
    }
}

fn validate_rows(rows: &[Vec<f64>]) -> Result<(), DataSourceError> {
    let dimension = rows.first().ok_or(DataSourceError::EmptyData)?.len();
    if dimension == 0 {
        return Err(DataSourceError::ZeroDimension);
    }
    for (row, values) in rows.iter().enumerate() {
        if values.len() != dimension {
            return Err(DataSourceError::DimensionMismatch {
                left: dimension,
                right: values.len(),
            });
        }
        if let Some(column) = values.iter().position(|value| !value.is_finite()) {
            return Err(DataSourceError::NonFiniteValue { row, column });
        }
    }
    Ok(())
}

impl DataSource for PointSet {
    fn len(&self) -> usize {
        self.rows.len()
    }

    fn name(&self) -> &str {
        match self.kernel {
            Kernel::Euclidean => "points/euclidean",
            Kernel::Cosine(_) => "points/cosine",
        }
    }

    fn distance(&self, i: usize, j: usize) -> Result<f64, DataSourceError> {
        let (left, right) = (self.row(i)?, self.row(j)?);
        Ok(match &self.kernel {
            Kernel::Euclidean => kernels::euclidean(left, right),
            Kernel::Cosine(norms) => {
                let norm = |index| norms.get(index).copied().ok_or(DataSourceError::OutOfBounds { index });
                kernels::cosine(left, right, norm(i)?, norm(j)?)
            }
        })
    }
}
