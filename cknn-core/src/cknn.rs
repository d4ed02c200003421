//! The CkNN graph façade.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::{
    builder::CknnBuilder,
    connectivity::{ConnectionStrategy, ConnectivityReport, enforce_connectivity},
    datasource::{DataSource, PointSet},
    density::ratio_matrix,
    error::{CknnError, DataSourceError, Result},
    graph::{AdjacencyGraph, count_graph, radius_graph, rank_matrix},
    matrix::SquareMatrix,
    options::{Connectivity, EdgeWeight, Metric, NeighborSelection},
    result::{Adjacency, CknnGraph},
};

/// Builds continuous k-nearest-neighbour graphs.
///
/// Distances are normalised by local density, thresholded by radius or
/// count, optionally forced into one component, and finally given their
/// self-loop and weight policy.
///
/// # Examples
/// ```
/// use cknn_core::{CknnBuilder, Connectivity};
///
/// let points = vec![
///     vec![0.0, 0.0],
///     vec![0.0, 1.0],
///     vec![1.0, 0.0],
///     vec![9.0, 9.0],
///     vec![9.0, 10.0],
///     vec![10.0, 9.0],
/// ];
/// let cknn = CknnBuilder::new()
///     .with_n_neighbors(2)
///     .with_connectivity(Connectivity::Nature)
///     .build()?;
/// let graph = cknn.fit(&points)?;
/// assert_eq!(graph.adjacency().component_count(), 1);
/// assert!(graph.connectivity().is_some_and(|report| report.rounds() == 1));
/// # Ok::<(), cknn_core::CknnError>(())
/// ```
#[derive(Debug, Clone)]
pub struct CkNearestNeighbors {
    pub(crate) n_neighbors: usize,
    pub(crate) neighbors: NeighborSelection,
    pub(crate) metric: Metric,
    pub(crate) edge_weight: EdgeWeight,
    pub(crate) include_self: bool,
    pub(crate) is_sparse: bool,
    pub(crate) directed: bool,
    pub(crate) connectivity: Connectivity,
    pub(crate) prune: bool,
}

impl CkNearestNeighbors {
    #[rustfmt::skip]
    #[must_use]
    pub fn n_neighbors(&self) -> usize { self.n_neighbors }

    #[rustfmt::skip]
    #[must_use]
    pub fn neighbors(&self) -> NeighborSelection { self.neighbors }

    #[rustfmt::skip]
    #[must_use]
    pub fn metric(&self) -> Metric { self.metric }

    #[rustfmt::skip]
    #[must_use]
    pub fn edge_weight(&self) -> EdgeWeight { self.edge_weight }

    #[rustfmt::skip]
    #[must_use]
    pub fn connectivity(&self) -> Connectivity { self.connectivity }

    /// Whether forced connections are pruned back.
    #[rustfmt::skip]
    #[must_use]
    pub fn prune(&self) -> bool { self.prune }

    /// Builds the graph over `data`.
    ///
    /// With [`Metric::Precomputed`] the rows are taken as a square distance
    /// matrix; otherwise each row is a point.
    ///
    /// # Errors
    /// Returns an [`crate::ErrorKind::InvalidArgument`] error for too few
    /// samples, an out-of-range `n_neighbors` or `k`, malformed rows or a
    /// malformed precomputed matrix; [`CknnError::DegenerateDensity`] when
    /// duplicates make a density scale zero; and
    /// [`CknnError::GraphInfeasible`] when forced edges cannot be pruned.
    pub fn fit(&self, data: &[Vec<f64>]) -> Result<CknnGraph> {
        self.check_samples(data.len())?;
        let distances = match self.metric {
            Metric::Precomputed => SquareMatrix::from_distance_rows(data)?,
            Metric::Euclidean => {
                SquareMatrix::from_data_source(&self.points(PointSet::euclidean(data.to_vec()))?)?
            }
            Metric::Cosine => {
                SquareMatrix::from_data_source(&self.points(PointSet::cosine(data.to_vec()))?)?
            }
        };
        self.build_from_distances(&distances)
    }

    /// Builds the graph over the items of `source`, ignoring the configured
    /// [`Metric`].
    ///
    /// # Errors
    /// As [`Self::fit`], plus [`CknnError::DataSource`] when the source
    /// fails.
    pub fn fit_source<D: DataSource + Sync + ?Sized>(&self, source: &D) -> Result<CknnGraph> {
        self.check_samples(source.len())?;
        let distances = SquareMatrix::from_data_source(source)?;
        self.build_from_distances(&distances)
    }

    fn points(
        &self,
        points: core::result::Result<PointSet, DataSourceError>,
    ) -> Result<PointSet> {
        points.map_err(|error| CknnError::DataSource {
            data_source: Arc::from(self.metric.to_string()),
            error,
        })
    }

    fn check_samples(&self, samples: usize) -> Result<()> {
        if samples < 2 {
            return Err(CknnError::InsufficientSamples { samples });
        }
        if self.n_neighbors == 0 || self.n_neighbors >= samples {
            return Err(CknnError::InvalidNeighborCount {
                got: self.n_neighbors,
                samples,
            });
        }
        Ok(())
    }

    #[instrument(
        name = "cknn.build",
        err,
        skip(self, distances),
        fields(
            samples = distances.size(),
            n_neighbors = self.n_neighbors,
            neighbors = %self.neighbors,
            connectivity = %self.connectivity,
        ),
    )]
    fn build_from_distances(&self, distances: &SquareMatrix) -> Result<CknnGraph> {
        let samples = distances.size();
        if let NeighborSelection::Count(k) = self.neighbors
            && (k == 0 || k >= samples)
        {
            return Err(CknnError::InvalidK { got: k, samples });
        }

        let ratios = ratio_matrix(distances, self.n_neighbors)?;
        let (mut graph, selection, report) = match self.neighbors {
            NeighborSelection::Delta(delta) => {
                let (graph, report) = self.connect(&ratios, delta)?;
                let threshold = report.and_then(|report| report.threshold());
                (graph, NeighborSelection::Delta(threshold.unwrap_or(delta)), report)
            }
            NeighborSelection::Count(k) => {
                let (graph, report) = match self.connectivity {
                    Connectivity::Disabled => (count_graph(&ratios, k), None),
                    _ => self.connect(&rank_matrix(&ratios), k as f64)?,
                };
                let threshold = report.and_then(|report| report.threshold());
                let graph = if self.directed {
                    graph
                } else {
                    graph.symmetrized()
                };
                let k = threshold.map_or(k, |rank| rank.round() as usize);
                (graph, NeighborSelection::Count(k), report)
            }
        };

        graph.set_diagonal(self.include_self.then_some(1.0));
        if let EdgeWeight::Exponential { bandwidth } = self.edge_weight {
            graph.map_weights(|from, to, _| (distances.get(from, to).powi(2) / bandwidth).exp());
        }
        debug!(edges = graph.edge_count(), selection = %selection, "graph finalised");

        let adjacency = if self.is_sparse {
            Adjacency::Sparse(graph)
        } else {
            Adjacency::Dense(graph.to_dense())
        };
        Ok(CknnGraph::new(adjacency, selection, report))
    }

    fn connect(
        &self,
        matrix: &SquareMatrix,
        threshold: f64,
    ) -> Result<(AdjacencyGraph, Option<ConnectivityReport>)> {
        let strategy = match self.connectivity {
            Connectivity::Disabled => return Ok((radius_graph(matrix, threshold), None)),
            Connectivity::Nature => ConnectionStrategy::Nature,
            Connectivity::Force => ConnectionStrategy::Force { prune: self.prune },
        };
        let (graph, report) = enforce_connectivity(matrix, threshold, strategy)?.into_parts();
        Ok((graph, Some(report)))
    }
}

/// Builds a CkNN graph over `data` in one call.
///
/// `options` supplies everything except `n_neighbors`, which overrides the
/// builder's value.
///
/// # Examples
/// ```
/// use cknn_core::{Adjacency, CknnBuilder, build_cknn_graph};
///
/// let points = vec![vec![0.0], vec![1.0], vec![3.0], vec![6.0]];
/// let graph = build_cknn_graph(&points, 2, CknnBuilder::new())?;
/// assert!(matches!(graph.adjacency(), Adjacency::Sparse(_)));
/// # Ok::<(), cknn_core::CknnError>(())
/// ```
///
/// # Errors
/// See [`CknnBuilder::build`] and [`CkNearestNeighbors::fit`].
pub fn build_cknn_graph(
    data: &[Vec<f64>],
    n_neighbors: usize,
    options: CknnBuilder,
) -> Result<CknnGraph> {
    options.with_n_neighbors(n_neighbors).build()?.fit(data)
}
