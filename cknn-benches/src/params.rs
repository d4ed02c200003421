//! Benchmark parameter types.

use std::fmt;

/// Parameters for a graph construction benchmark run.
#[derive(Clone, Debug)]
pub struct GraphBenchParams {
    /// Number of points in the dataset.
    pub point_count: usize,
    /// Number of Gaussian clusters the points are drawn from.
    pub cluster_count: usize,
}

impl fmt::Display for GraphBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},c={}", self.point_count, self.cluster_count)
    }
}
