//! Random draws for Gaussian blob clouds.

use super::{Anisotropy, GaussianBlobConfig};
use crate::source::SyntheticError;
use rand::{Rng, rngs::SmallRng};
use std::f64::consts::TAU;

pub(super) fn validate(config: &GaussianBlobConfig) -> Result<Vec<f64>, SyntheticError> {
    if config.cluster_count == 0 {
        return Err(SyntheticError::ZeroClusters);
    }
    if config.cluster_count > config.point_count {
        return Err(SyntheticError::ClusterCountExceedsPointCount {
            cluster_count: config.cluster_count,
            point_count: config.point_count,
        });
    }
    if !is_positive(config.separation) {
        return Err(SyntheticError::InvalidFloatParameter {
            parameter: "separation",
        });
    }
    axis_scales(&config.anisotropy, config.dimensions)
}

const fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn axis_scales(anisotropy: &Anisotropy, dimensions: usize) -> Result<Vec<f64>, SyntheticError> {
    match anisotropy {
        Anisotropy::Isotropic(scale) if is_positive(*scale) => Ok(vec![*scale; dimensions]),
        Anisotropy::Isotropic(_) => Err(SyntheticError::InvalidFloatParameter {
            parameter: "anisotropy",
        }),
        Anisotropy::AxisScales(scales) if scales.len() != dimensions => {
            Err(SyntheticError::AxisScaleLengthMismatch {
                expected: dimensions,
                actual: scales.len(),
            })
        }
        Anisotropy::AxisScales(scales) => match scales.iter().position(|scale| !is_positive(*scale)) {
            Some(index) => Err(SyntheticError::InvalidAxisScale { index }),
            None => Ok(scales.clone()),
        },
    }
}

/// Spreads centroids evenly on a circle of radius `separation` in the first
/// two axes and jitters the remaining axes by up to a fifth of it.
#[expect(
    clippy::cast_precision_loss,
    reason = "cluster indices are small and only position centroids"
)]
#[expect(
    clippy::float_arithmetic,
    reason = "centroid placement is trigonometric"
)]
pub(super) fn centroids(config: &GaussianBlobConfig, rng: &mut SmallRng) -> Vec<Vec<f64>> {
    let jitter = 0.2 * config.separation;
    (0..config.cluster_count)
        .map(|cluster| {
            let angle = TAU * cluster as f64 / config.cluster_count as f64;
            let plane = [angle.cos(), angle.sin()];
            (0..config.dimensions)
                .map(|axis| match plane.get(axis) {
                    Some(unit) => config.separation * unit,
                    None => rng.gen_range(-jitter..jitter),
                })
                .collect()
        })
        .collect()
}

/// Box-Muller draw from the standard normal distribution.
#[expect(
    clippy::float_arithmetic,
    reason = "Box-Muller transform is floating-point arithmetic"
)]
pub(super) fn standard_normal(rng: &mut SmallRng) -> f64 {
    let u1 = rng.gen_range(f64::EPSILON..1.0);
    let u2 = rng.gen_range(0.0..1.0);
    (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
}
