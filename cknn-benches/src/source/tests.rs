//! Unit tests for synthetic source generators.

use super::{Anisotropy, GaussianBlobConfig, SyntheticConfig, SyntheticError, SyntheticSource};
use cknn_core::{CknnBuilder, Connectivity, DataSource};
use rstest::{fixture, rstest};

#[fixture]
fn uniform_config() -> SyntheticConfig {
    SyntheticConfig {
        point_count: 32,
        dimensions: 8,
        seed: 7,
    }
}

#[fixture]
fn gaussian_config() -> GaussianBlobConfig {
    GaussianBlobConfig {
        point_count: 60,
        dimensions: 4,
        cluster_count: 3,
        separation: 20.0,
        anisotropy: Anisotropy::Isotropic(0.5),
        seed: 11,
    }
}

#[rstest]
fn uniform_generation_is_deterministic(uniform_config: SyntheticConfig) {
    let first = SyntheticSource::generate(&uniform_config).expect("valid config");
    let second = SyntheticSource::generate(&uniform_config).expect("valid config");
    assert_eq!(first.rows(), second.rows());
    assert_eq!(first.len(), 32);
    assert_eq!(first.dimensions(), 8);
    assert!(
        first
            .rows()
            .iter()
            .flatten()
            .all(|value| (0.0..1.0).contains(value))
    );
}

#[rstest]
fn distance_is_symmetric_and_zero_on_diagonal(gaussian_config: GaussianBlobConfig) {
    let source = SyntheticSource::generate_gaussian_blobs(&gaussian_config).expect("valid config");
    for (i, j) in [(0, 1), (5, 17), (59, 0)] {
        let forward = source.distance(i, j).expect("in bounds");
        let backward = source.distance(j, i).expect("in bounds");
        assert_eq!(forward, backward);
    }
    assert_eq!(source.distance(3, 3).expect("in bounds"), 0.0);
    assert!(source.distance(0, 60).is_err());
}

#[rstest]
fn separated_blobs_need_connecting(gaussian_config: GaussianBlobConfig) {
    let source = SyntheticSource::generate_gaussian_blobs(&gaussian_config).expect("valid config");
    let plain = CknnBuilder::new()
        .with_n_neighbors(5)
        .build()
        .expect("valid options")
        .fit_source(&source)
        .expect("graph");
    let forced = CknnBuilder::new()
        .with_n_neighbors(5)
        .with_connectivity(Connectivity::Force)
        .build()
        .expect("valid options")
        .fit_source(&source)
        .expect("graph");

    assert!(plain.adjacency().component_count() >= 3);
    assert_eq!(forced.adjacency().component_count(), 1);
}

#[rstest]
#[case::zero_points(
    GaussianBlobConfig { point_count: 0, ..gaussian_config() },
    "ZeroPoints",
)]
#[case::zero_clusters(
    GaussianBlobConfig { cluster_count: 0, ..gaussian_config() },
    "ZeroClusters",
)]
#[case::too_many_clusters(
    GaussianBlobConfig { cluster_count: 61, ..gaussian_config() },
    "ClusterCountExceedsPointCount",
)]
#[case::bad_separation(
    GaussianBlobConfig { separation: f64::NAN, ..gaussian_config() },
    "InvalidFloatParameter",
)]
#[case::short_scales(
    GaussianBlobConfig { anisotropy: Anisotropy::AxisScales(vec![1.0]), ..gaussian_config() },
    "AxisScaleLengthMismatch",
)]
#[case::zero_isotropic(
    GaussianBlobConfig { anisotropy: Anisotropy::Isotropic(0.0), ..gaussian_config() },
    "InvalidFloatParameter",
)]
#[case::zero_dimensions(
    GaussianBlobConfig { dimensions: 0, ..gaussian_config() },
    "ZeroDimensions",
)]
#[case::negative_scale(
    GaussianBlobConfig {
        anisotropy: Anisotropy::AxisScales(vec![1.0, -1.0, 1.0, 1.0]),
        ..gaussian_config()
    },
    "InvalidAxisScale",
)]
fn gaussian_blobs_reject_invalid_configs(
    #[case] config: GaussianBlobConfig,
    #[case] expected: &str,
) {
    let err = SyntheticSource::generate_gaussian_blobs(&config).expect_err("invalid config");
    let variant = match err {
        SyntheticError::ZeroPoints => "ZeroPoints",
        SyntheticError::ZeroDimensions => "ZeroDimensions",
        SyntheticError::ZeroClusters => "ZeroClusters",
        SyntheticError::ClusterCountExceedsPointCount { .. } => "ClusterCountExceedsPointCount",
        SyntheticError::InvalidFloatParameter { .. } => "InvalidFloatParameter",
        SyntheticError::InvalidAxisScale { .. } => "InvalidAxisScale",
        SyntheticError::AxisScaleLengthMismatch { .. } => "AxisScaleLengthMismatch",
        SyntheticError::Points(_) => "Points",
    };
    assert_eq!(variant, expected);
}
