//! Connectivity enforcement (`connect_rng`).
//!
//! Starting from a radius graph, components are labelled and the matrix is
//! reduced to one entry per cluster pair until a single component remains.
//! [`ConnectionStrategy::Nature`] grows the radius to the smallest value that
//! links every cluster to its nearest neighbour; [`ConnectionStrategy::Force`]
//! keeps the radius and instead inserts one critical edge per cluster, which
//! may then be pruned back with [`prune_redundant_edges`].

mod prune;
mod reduce;

use std::borrow::Cow;

use tracing::{debug, info, instrument};

pub use self::prune::{PrunedGraph, prune_redundant_edges};
pub use self::reduce::{ClusterDistances, IndexMap, reduce_clusters};
use crate::{
    error::{CknnError, Result},
    graph::{AdjacencyGraph, Partition, radius_graph},
    matrix::SquareMatrix,
};

/// How [`enforce_connectivity`] merges disconnected components.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionStrategy {
    /// Raise the threshold until the radius graph is connected.
    Nature,
    /// Insert the minimal critical edges between components.
    Force {
        /// Trade base edges for critical ones with [`prune_redundant_edges`].
        prune: bool,
    },
}

/// Diagnostics gathered while connecting a graph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConnectivityReport {
    rounds: usize,
    threshold: Option<f64>,
    critical_edges: usize,
    pruned_edges: usize,
}

impl ConnectivityReport {
    /// Number of reduce-and-merge rounds performed.
    #[rustfmt::skip]
    #[must_use]
    pub fn rounds(&self) -> usize { self.rounds }

    /// Final threshold in nature mode; `None` in force mode, which adds
    /// discrete edges instead of growing a uniform threshold.
    #[rustfmt::skip]
    #[must_use]
    pub fn threshold(&self) -> Option<f64> { self.threshold }

    #[rustfmt::skip]
    #[must_use]
    pub fn critical_edges(&self) -> usize { self.critical_edges }

    #[rustfmt::skip]
    #[must_use]
    pub fn pruned_edges(&self) -> usize { self.pruned_edges }
}

/// A connected graph together with how it was obtained.
#[derive(Clone, Debug, PartialEq)]
pub struct ConnectedGraph {
    graph: AdjacencyGraph,
    report: ConnectivityReport,
}

impl ConnectedGraph {
    #[rustfmt::skip]
    #[must_use]
    pub fn graph(&self) -> &AdjacencyGraph { &self.graph }

    #[rustfmt::skip]
    #[must_use]
    pub fn report(&self) -> &ConnectivityReport { &self.report }

    /// Splits into the graph and its report.
    #[must_use]
    pub fn into_parts(self) -> (AdjacencyGraph, ConnectivityReport) {
        (self.graph, self.report)
    }
}

/// Builds the radius graph of `matrix` at `threshold` and connects it.
///
/// Every round strictly reduces the number of components, so at most
/// `C - 1` rounds run for `C` initial components. An already connected
/// radius graph is returned unchanged with the input threshold.
///
/// # Examples
/// ```
/// use cknn_core::{ConnectionStrategy, SquareMatrix, enforce_connectivity};
///
/// // Points 0, 1, 5, 6 on a line: two pairs 4 apart.
/// let points = [0.0_f64, 1.0, 5.0, 6.0];
/// let rows: Vec<Vec<f64>> = points
///     .iter()
///     .map(|a| points.iter().map(|b| (a - b).abs()).collect())
///     .collect();
/// let matrix = SquareMatrix::from_rows(&rows)?;
///
/// let nature = enforce_connectivity(&matrix, 1.0, ConnectionStrategy::Nature)?;
/// assert_eq!(nature.report().threshold(), Some(4.0));
///
/// let force = enforce_connectivity(&matrix, 1.0, ConnectionStrategy::Force { prune: false })?;
/// assert_eq!(force.report().threshold(), None);
/// assert_eq!(force.report().critical_edges(), 2);
/// assert!(force.graph().contains(1, 2) && force.graph().contains(2, 1));
/// # Ok::<(), cknn_core::CknnError>(())
/// ```
///
/// # Errors
/// Returns [`CknnError::InvalidDistance`] for a negative or non-finite
/// off-diagonal entry, and propagates [`CknnError::GraphInfeasible`] from
/// pruning.
#[instrument(
    name = "cknn.connect",
    err,
    skip(matrix),
    fields(size = matrix.size()),
)]
pub fn enforce_connectivity(
    matrix: &SquareMatrix,
    threshold: f64,
    strategy: ConnectionStrategy,
) -> Result<ConnectedGraph> {
    validate_entries(matrix)?;
    let base = radius_graph(matrix, threshold);
    let connected = match strategy {
        ConnectionStrategy::Nature => connect_by_threshold(matrix, base, threshold)?,
        ConnectionStrategy::Force { prune } => connect_by_edges(matrix, base, prune)?,
    };
    record_report(&connected.report);
    Ok(connected)
}

fn validate_entries(matrix: &SquareMatrix) -> Result<()> {
    for (row, values) in matrix.rows().enumerate() {
        for (column, &value) in values.iter().enumerate() {
            if row != column && !(value.is_finite() && value >= 0.0) {
                return Err(CknnError::InvalidDistance { row, column, value });
            }
        }
    }
    Ok(())
}

fn connect_by_threshold(
    matrix: &SquareMatrix,
    base: AdjacencyGraph,
    threshold: f64,
) -> Result<ConnectedGraph> {
    let mut partition = Partition::from_graph(&base);
    if partition.is_connected() {
        info!(threshold, "graph already connected");
        return Ok(ConnectedGraph {
            graph: base,
            report: ConnectivityReport {
                rounds: 0,
                threshold: Some(threshold),
                critical_edges: 0,
                pruned_edges: 0,
            },
        });
    }

    let mut current = Cow::Borrowed(matrix);
    let mut radius = threshold;
    let mut rounds = 0;
    while !partition.is_connected() {
        rounds += 1;
        let (reduced, _) = reduce_clusters(&current, &partition, None)?.into_parts();
        radius = reduced
            .rows()
            .map(row_minimum)
            .fold(radius, f64::max);
        partition = Partition::from_graph(&radius_graph(&reduced, radius));
        debug!(
            round = rounds,
            components = partition.count(),
            threshold = radius,
            "connectivity round"
        );
        current = Cow::Owned(reduced);
    }

    info!(threshold = radius, rounds, "connected by threshold");
    Ok(ConnectedGraph {
        graph: radius_graph(matrix, radius),
        report: ConnectivityReport {
            rounds,
            threshold: Some(radius),
            critical_edges: 0,
            pruned_edges: 0,
        },
    })
}

fn row_minimum(row: &[f64]) -> f64 {
    row.iter().copied().fold(f64::INFINITY, f64::min)
}

fn connect_by_edges(
    matrix: &SquareMatrix,
    base: AdjacencyGraph,
    prune: bool,
) -> Result<ConnectedGraph> {
    let size = matrix.size();
    let mut partition = Partition::from_graph(&base);
    let mut critical = AdjacencyGraph::new(size);
    let mut current = Cow::Borrowed(matrix);
    let mut origins: Option<IndexMap> = None;
    let mut rounds = 0;

    while !partition.is_connected() {
        rounds += 1;
        let map = origins.take().unwrap_or_else(|| IndexMap::identity(size));
        let reduced = reduce_clusters(&current, &partition, Some(&map))?;
        let mut cluster_graph = AdjacencyGraph::new(partition.count());
        for (cluster, (nearest, _)) in reduced.nearest().into_iter().enumerate() {
            cluster_graph.insert(cluster, nearest, 1.0);
            if let Some((from, to)) = reduced.origins().and_then(|map| map.get(cluster, nearest)) {
                critical.insert(from, to, 1.0);
            }
        }
        partition = Partition::from_graph(&cluster_graph);
        debug!(
            round = rounds,
            components = partition.count(),
            critical_edges = critical.edge_count(),
            "connectivity round"
        );
        let (next, next_origins) = reduced.into_parts();
        current = Cow::Owned(next);
        origins = next_origins;
    }

    let critical_edges = critical.edge_count();
    let (graph, pruned_edges) = if prune && critical_edges > 0 {
        let pruned = prune_redundant_edges(&base, &critical, matrix)?;
        let removed = pruned.removed().len();
        (pruned.into_graph(), removed)
    } else {
        let mut graph = base;
        graph.union_with(&critical);
        (graph, 0)
    };

    info!(rounds, critical_edges, pruned_edges, "connected by critical edges");
    Ok(ConnectedGraph {
        graph,
        report: ConnectivityReport {
            rounds,
            threshold: None,
            critical_edges,
            pruned_edges,
        },
    })
}

#[cfg(feature = "metrics")]
fn record_report(report: &ConnectivityReport) {
    metrics::counter!("cknn_connect_rounds_total").increment(report.rounds as u64);
    metrics::counter!("cknn_critical_edges_total").increment(report.critical_edges as u64);
    metrics::counter!("cknn_pruned_edges_total").increment(report.pruned_edges as u64);
}

#[cfg(not(feature = "metrics"))]
fn record_report(_report: &ConnectivityReport) {}
