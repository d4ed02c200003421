//! Configuration errors for synthetic point clouds.

use cknn_core::DataSourceError;

/// Why a synthetic point cloud could not be generated.
#[derive(Debug, thiserror::Error)]
pub enum SyntheticError {
    /// `point_count` was zero.
    #[error("at least one point is required")]
    ZeroPoints,
    /// `dimensions` was zero.
    #[error("points need at least one dimension")]
    ZeroDimensions,
    /// `cluster_count` was zero.
    #[error("at least one cluster is required")]
    ZeroClusters,
    /// More clusters than points were requested.
    #[error("{cluster_count} clusters cannot be filled from {point_count} points")]
    ClusterCountExceedsPointCount {
        /// Requested clusters.
        cluster_count: usize,
        /// Requested points.
        point_count: usize,
    },
    /// A float setting was non-finite or non-positive.
    #[error("`{parameter}` must be finite and positive")]
    InvalidFloatParameter {
        /// Setting name.
        parameter: &'static str,
    },
    /// A per-axis standard deviation was non-finite or non-positive.
    #[error("axis scale {index} must be finite and positive")]
    InvalidAxisScale {
        /// Axis position.
        index: usize,
    },
    /// The per-axis scale list did not cover every dimension.
    #[error("{actual} axis scales given for {expected} dimensions")]
    AxisScaleLengthMismatch {
        /// Configured dimensions.
        expected: usize,
        /// Scales supplied.
        actual: usize,
    },
    /// Generated coordinates were rejected as points.
    #[error("generated points are invalid: {0}")]
    Points(#[from] DataSourceError),
}
