//! Distance primitives for built-in numeric metrics.
//!
//! Scalar Euclidean and cosine kernels over `f64` coordinates. Inputs are
//! validated up front so that a malformed row surfaces as a typed error
//! instead of a NaN leaking into the density normalisation.

pub(crate) mod kernels;

use core::fmt;

use thiserror::Error;

/// Which argument of a distance call an error refers to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Operand {
    Left,
    Right,
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Left => "left",
            Self::Right => "right",
        })
    }
}

/// Errors emitted while computing distances.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DistanceError {
    /// An input vector had no coordinates.
    #[error("{operand} vector is empty")]
    Empty { operand: Operand },
    /// Input vectors had different lengths.
    #[error("dimension mismatch: left={left}, right={right}")]
    DimensionMismatch { left: usize, right: usize },
    /// A coordinate was NaN or infinite.
    #[error("{operand} vector has non-finite value {value} at index {index}")]
    NonFinite {
        operand: Operand,
        index: usize,
        value: f64,
    },
    /// Cosine distance is undefined for an all-zero vector.
    #[error("{operand} vector has zero magnitude")]
    ZeroMagnitude { operand: Operand },
}

fn check(values: &[f64], operand: Operand) -> Result<(), DistanceError> {
    if values.is_empty() {
        return Err(DistanceError::Empty { operand });
    }
    match values.iter().position(|value| !value.is_finite()) {
        Some(index) => Err(DistanceError::NonFinite {
            operand,
            index,
            value: values.get(index).copied().unwrap_or(f64::NAN),
        }),
        None => Ok(()),
    }
}

fn check_pair(left: &[f64], right: &[f64]) -> Result<(), DistanceError> {
    check(left, Operand::Left)?;
    check(right, Operand::Right)?;
    if left.len() != right.len() {
        return Err(DistanceError::DimensionMismatch {
            left: left.len(),
            right: right.len(),
        });
    }
    Ok(())
}

/// Euclidean (L2) distance between two vectors.
///
/// ```
/// use cknn_core::euclidean_distance;
///
/// let distance = euclidean_distance(&[1.0, 2.0, 3.0], &[4.0, 6.0, 8.0])?;
/// assert!((distance - 50.0_f64.sqrt()).abs() < 1e-12);
/// # Ok::<(), cknn_core::DistanceError>(())
/// ```
///
/// # Errors
/// Returns [`DistanceError::Empty`], [`DistanceError::NonFinite`] or
/// [`DistanceError::DimensionMismatch`] for malformed input.
pub fn euclidean_distance(left: &[f64], right: &[f64]) -> Result<f64, DistanceError> {
    check_pair(left, right)?;
    Ok(kernels::euclidean(left, right))
}

/// Cosine distance `1 - cos θ`, in `[0, 2]`.
///
/// # Errors
/// Same as [`euclidean_distance`], plus [`DistanceError::ZeroMagnitude`]
/// when either vector is all zeros.
pub fn cosine_distance(left: &[f64], right: &[f64]) -> Result<f64, DistanceError> {
    check_pair(left, right)?;
    let left_norm = kernels::l2_norm(left);
    if left_norm == 0.0 {
        return Err(DistanceError::ZeroMagnitude {
            operand: Operand::Left,
        });
    }
    let right_norm = kernels::l2_norm(right);
    if right_norm == 0.0 {
        return Err(DistanceError::ZeroMagnitude {
            operand: Operand::Right,
        });
    }
    Ok(kernels::cosine(left, right, left_norm, right_norm))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::axis(&[0.0, 0.0], &[3.0, 4.0], 5.0)]
    #[case::identical(&[1.5, -2.0], &[1.5, -2.0], 0.0)]
    #[case::one_dimensional(&[-1.0], &[2.0], 3.0)]
    fn euclidean_matches_closed_form(
        #[case] left: &[f64],
        #[case] right: &[f64],
        #[case] expected: f64,
    ) {
        let distance = euclidean_distance(left, right).expect("valid vectors");
        assert!((distance - expected).abs() < 1e-12);
    }

    #[rstest]
    #[case::parallel(&[1.0, 1.0], &[2.0, 2.0], 0.0)]
    #[case::orthogonal(&[1.0, 0.0], &[0.0, 3.0], 1.0)]
    #[case::opposite(&[1.0, 0.0], &[-4.0, 0.0], 2.0)]
    fn cosine_matches_closed_form(
        #[case] left: &[f64],
        #[case] right: &[f64],
        #[case] expected: f64,
    ) {
        let distance = cosine_distance(left, right).expect("valid vectors");
        assert!((distance - expected).abs() < 1e-12);
    }

    #[rstest]
    #[case::empty_left(&[], &[1.0], DistanceError::Empty { operand: Operand::Left })]
    #[case::mismatch(&[1.0], &[1.0, 2.0], DistanceError::DimensionMismatch { left: 1, right: 2 })]
    #[case::zero_right(&[1.0, 0.0], &[0.0, 0.0], DistanceError::ZeroMagnitude { operand: Operand::Right })]
    fn cosine_rejects_malformed_input(
        #[case] left: &[f64],
        #[case] right: &[f64],
        #[case] expected: DistanceError,
    ) {
        assert_eq!(cosine_distance(left, right), Err(expected));
    }

    #[test]
    fn reports_non_finite_position() {
        let err = euclidean_distance(&[1.0, 2.0], &[1.0, f64::NAN]).expect_err("NaN must be rejected");
        assert!(matches!(
            err,
            DistanceError::NonFinite {
                operand: Operand::Right,
                index: 1,
                ..
            }
        ));
    }
}
