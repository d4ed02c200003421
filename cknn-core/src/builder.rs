//! Builder for configuring [`CkNearestNeighbors`].
//!
//! Collects the graph options and validates those that do not depend on the
//! input before any distance is computed.

use crate::{
    Result,
    cknn::CkNearestNeighbors,
    error::CknnError,
    options::{Connectivity, EdgeWeight, Metric, NeighborSelection},
};

/// Configures and constructs [`CkNearestNeighbors`] instances.
///
/// # Examples
/// ```
/// use cknn_core::{CknnBuilder, Connectivity, NeighborSelection};
///
/// let cknn = CknnBuilder::new()
///     .with_n_neighbors(7)
///     .with_neighbors(NeighborSelection::Count(3))
///     .with_connectivity(Connectivity::Force)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(cknn.n_neighbors(), 7);
/// assert!(cknn.prune(), "count mode prunes forced edges by default");
/// ```
#[derive(Debug, Clone)]
pub struct CknnBuilder {
    n_neighbors: usize,
    neighbors: NeighborSelection,
    metric: Metric,
    edge_weight: EdgeWeight,
    include_self: bool,
    is_sparse: bool,
    directed: bool,
    connectivity: Connectivity,
    prune: Option<bool>,
}

impl Default for CknnBuilder {
    fn default() -> Self {
        Self {
            n_neighbors: 5,
            neighbors: NeighborSelection::default(),
            metric: Metric::default(),
            edge_weight: EdgeWeight::default(),
            include_self: false,
            is_sparse: true,
            directed: false,
            connectivity: Connectivity::default(),
            prune: None,
        }
    }
}

impl CknnBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use cknn_core::{CknnBuilder, NeighborSelection};
    ///
    /// let builder = CknnBuilder::new();
    /// assert_eq!(builder.n_neighbors(), 5);
    /// assert_eq!(builder.neighbors(), NeighborSelection::Delta(1.0));
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `n`, the neighbour whose distance defines each point's scale.
    #[must_use]
    pub fn with_n_neighbors(mut self, n_neighbors: usize) -> Self {
        self.n_neighbors = n_neighbors;
        self
    }

    #[rustfmt::skip]
    #[must_use]
    pub fn n_neighbors(&self) -> usize { self.n_neighbors }

    /// Chooses radius (`delta`) or count (`k`) neighbour selection.
    #[must_use]
    pub fn with_neighbors(mut self, neighbors: NeighborSelection) -> Self {
        self.neighbors = neighbors;
        self
    }

    #[rustfmt::skip]
    #[must_use]
    pub fn neighbors(&self) -> NeighborSelection { self.neighbors }

    /// Chooses how input rows become distances.
    #[must_use]
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// Chooses binary or kernel-weighted edges.
    #[must_use]
    pub fn with_edge_weight(mut self, edge_weight: EdgeWeight) -> Self {
        self.edge_weight = edge_weight;
        self
    }

    /// Keeps self-loops with weight 1 (or `exp(0)`).
    #[must_use]
    pub fn with_include_self(mut self, include_self: bool) -> Self {
        self.include_self = include_self;
        self
    }

    /// Returns [`crate::Adjacency::Sparse`] when `true`, dense otherwise.
    #[must_use]
    pub fn with_sparse_output(mut self, is_sparse: bool) -> Self {
        self.is_sparse = is_sparse;
        self
    }

    /// Leaves count-mode graphs directed instead of symmetrising them.
    #[must_use]
    pub fn with_directed(mut self, directed: bool) -> Self {
        self.directed = directed;
        self
    }

    #[must_use]
    pub fn with_connectivity(mut self, connectivity: Connectivity) -> Self {
        self.connectivity = connectivity;
        self
    }

    /// Overrides whether forced connections are pruned back.
    ///
    /// Unset, pruning follows the selection: on for count mode, off for
    /// radius mode.
    #[must_use]
    pub fn with_prune(mut self, prune: bool) -> Self {
        self.prune = Some(prune);
        self
    }

    /// Validates the configuration and constructs a [`CkNearestNeighbors`].
    ///
    /// Bounds that depend on the number of samples are checked when the
    /// graph is built.
    ///
    /// # Errors
    /// Returns [`CknnError::InvalidDelta`] for a non-positive or non-finite
    /// radius, [`CknnError::InvalidK`] for `k == 0`, and
    /// [`CknnError::InvalidBandwidth`] for a non-positive or non-finite
    /// kernel bandwidth.
    pub fn build(self) -> Result<CkNearestNeighbors> {
        self.neighbors.validate()?;
        if let NeighborSelection::Count(0) = self.neighbors {
            return Err(CknnError::InvalidK { got: 0, samples: 0 });
        }
        self.edge_weight.validate()?;
        let prune = self
            .prune
            .unwrap_or(matches!(self.neighbors, NeighborSelection::Count(_)));
        Ok(CkNearestNeighbors {
            n_neighbors: self.n_neighbors,
            neighbors: self.neighbors,
            metric: self.metric,
            edge_weight: self.edge_weight,
            include_self: self.include_self,
            is_sparse: self.is_sparse,
            directed: self.directed,
            connectivity: self.connectivity,
            prune,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::delta(NeighborSelection::Delta(1.0), None, false)]
    #[case::count(NeighborSelection::Count(3), None, true)]
    #[case::delta_override(NeighborSelection::Delta(1.0), Some(true), true)]
    #[case::count_override(NeighborSelection::Count(3), Some(false), false)]
    fn prune_defaults_follow_selection(
        #[case] neighbors: NeighborSelection,
        #[case] prune: Option<bool>,
        #[case] expected: bool,
    ) {
        let mut builder = CknnBuilder::new().with_neighbors(neighbors);
        if let Some(prune) = prune {
            builder = builder.with_prune(prune);
        }
        assert_eq!(builder.build().expect("valid").prune(), expected);
    }

    #[rstest]
    #[case::zero_delta(
        CknnBuilder::new().with_neighbors(NeighborSelection::Delta(0.0)),
        CknnError::InvalidDelta { got: 0.0 },
    )]
    #[case::zero_k(
        CknnBuilder::new().with_neighbors(NeighborSelection::Count(0)),
        CknnError::InvalidK { got: 0, samples: 0 },
    )]
    #[case::negative_bandwidth(
        CknnBuilder::new().with_edge_weight(EdgeWeight::Exponential { bandwidth: -1.0 }),
        CknnError::InvalidBandwidth { got: -1.0 },
    )]
    fn build_rejects_invalid_thresholds(#[case] builder: CknnBuilder, #[case] expected: CknnError) {
        assert_eq!(builder.build().expect_err("invalid configuration"), expected);
    }
}
