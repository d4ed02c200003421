//! CkNN core library.
//!
//! Builds continuous k-nearest-neighbour graphs: pairwise distances are
//! normalised by local density, thresholded into a radius or count graph,
//! and optionally forced into a single connected component.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod cknn;
mod connectivity;
mod datasource;
mod density;
mod distance;
mod error;
mod graph;
mod matrix;
mod options;
mod result;
#[cfg(test)]
mod test_utils;

pub use crate::{
    builder::CknnBuilder,
    cknn::{CkNearestNeighbors, build_cknn_graph},
    connectivity::{
        ClusterDistances, ConnectedGraph, ConnectionStrategy, ConnectivityReport, IndexMap,
        PrunedGraph, enforce_connectivity, prune_redundant_edges, reduce_clusters,
    },
    datasource::{DataSource, PointSet},
    density::{neighbor_scales, ratio_matrix},
    distance::{DistanceError, Operand, cosine_distance, euclidean_distance},
    error::{CknnError, CknnErrorCode, DataSourceError, DataSourceErrorCode, ErrorKind, Result},
    graph::{AdjacencyGraph, Partition, count_graph, has_path, radius_graph, rank_matrix},
    matrix::{SYMMETRY_TOLERANCE, SquareMatrix},
    options::{Connectivity, EdgeWeight, Metric, NeighborSelection},
    result::{Adjacency, CknnGraph},
};
