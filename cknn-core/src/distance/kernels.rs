//! Unchecked arithmetic behind the public distance functions.
//!
//! Callers validate inputs first; these routines assume equal-length,
//! finite slices.

pub(crate) fn euclidean(left: &[f64], right: &[f64]) -> f64 {
    left.iter()
        .zip(right)
        .map(|(l, r)| (l - r) * (l - r))
        .sum::<f64>()
        .sqrt()
}

pub(crate) fn l2_norm(values: &[f64]) -> f64 {
    values.iter().map(|value| value * value).sum::<f64>().sqrt()
}

/// Cosine distance from precomputed norms, clamped into `[0, 2]`.
pub(crate) fn cosine(left: &[f64], right: &[f64], left_norm: f64, right_norm: f64) -> f64 {
    let dot: f64 = left.iter().zip(right).map(|(l, r)| l * r).sum();
    1.0 - (dot / (left_norm * right_norm)).clamp(-1.0, 1.0)
}
