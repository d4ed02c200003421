//! Seeded synthetic point clouds for benchmarks.
//!
//! Clouds are validated through [`cknn_core::PointSet`] and measured with
//! the Euclidean metric.

mod blobs;
mod errors;

pub use errors::SyntheticError;

use cknn_core::{DataSource, DataSourceError, PointSet};
use rand::{Rng, SeedableRng, rngs::SmallRng};

/// Uniform cloud in the unit hypercube.
#[derive(Clone, Debug)]
pub struct SyntheticConfig {
    /// Number of points to generate.
    pub point_count: usize,
    /// Coordinates per point.
    pub dimensions: usize,
    /// RNG seed.
    pub seed: u64,
}

/// Per-axis spread of each Gaussian blob.
#[derive(Clone, Debug)]
pub enum Anisotropy {
    /// Same standard deviation on every axis.
    Isotropic(f64),
    /// One standard deviation per axis.
    AxisScales(Vec<f64>),
}

/// Gaussian blobs around centroids spaced `separation` from the origin.
#[derive(Clone, Debug)]
pub struct GaussianBlobConfig {
    /// Number of points to generate.
    pub point_count: usize,
    /// Coordinates per point.
    pub dimensions: usize,
    /// Number of blobs; points are dealt to blobs round-robin.
    pub cluster_count: usize,
    /// Distance of every centroid from the origin in the first two axes.
    pub separation: f64,
    /// Blob spread.
    pub anisotropy: Anisotropy,
    /// RNG seed.
    pub seed: u64,
}

/// Named synthetic point cloud.
#[derive(Clone, Debug)]
pub struct SyntheticSource {
    name: &'static str,
    points: PointSet,
}

impl SyntheticSource {
    /// Draws points uniformly from `[0, 1)` on every axis.
    ///
    /// # Errors
    /// Returns [`SyntheticError`] for zero points or dimensions.
    pub fn generate(config: &SyntheticConfig) -> Result<Self, SyntheticError> {
        check_shape(config.point_count, config.dimensions)?;
        let mut rng = SmallRng::seed_from_u64(config.seed);
        let rows = (0..config.point_count)
            .map(|_| (0..config.dimensions).map(|_| rng.gen_range(0.0..1.0)).collect())
            .collect();
        Self::from_rows("synthetic-uniform", rows)
    }

    /// Draws Gaussian blobs; blob `c` receives points `c`, `c + C`, `c + 2C`...
    ///
    /// # Errors
    /// Returns [`SyntheticError`] when the configuration is invalid.
    #[expect(
        clippy::float_arithmetic,
        reason = "points are centroid plus scaled normal noise"
    )]
    pub fn generate_gaussian_blobs(config: &GaussianBlobConfig) -> Result<Self, SyntheticError> {
        check_shape(config.point_count, config.dimensions)?;
        let scales = blobs::validate(config)?;
        let centroids = blobs::centroids(config, &mut SmallRng::seed_from_u64(config.seed));
        let mut noise = SmallRng::seed_from_u64(config.seed.rotate_left(32));
        let rows = centroids
            .iter()
            .cycle()
            .take(config.point_count)
            .map(|centroid| {
                centroid
                    .iter()
                    .zip(&scales)
                    .map(|(center, scale)| center + scale * blobs::standard_normal(&mut noise))
                    .collect()
            })
            .collect();
        Self::from_rows("synthetic-gaussian-blobs", rows)
    }

    fn from_rows(name: &'static str, rows: Vec<Vec<f64>>) -> Result<Self, SyntheticError> {
        Ok(Self {
            name,
            points: PointSet::euclidean(rows)?,
        })
    }

    /// Coordinates per point.
    #[must_use]
    pub fn dimensions(&self) -> usize {
        self.points.dimension()
    }

    /// Generated coordinates, one row per point.
    #[must_use]
    pub fn rows(&self) -> &[Vec<f64>] {
        self.points.rows()
    }
}

impl DataSource for SyntheticSource {
    fn len(&self) -> usize {
        self.points.len()
    }

    fn name(&self) -> &str {
        self.name
    }

    fn distance(&self, left: usize, right: usize) -> Result<f64, DataSourceError> {
        self.points.distance(left, right)
    }
}

const fn check_shape(point_count: usize, dimensions: usize) -> Result<(), SyntheticError> {
    if point_count == 0 {
        return Err(SyntheticError::ZeroPoints);
    }
    if dimensions == 0 {
        return Err(SyntheticError::ZeroDimensions);
    }
    Ok(())
}

#[cfg(test)]
mod tests;
