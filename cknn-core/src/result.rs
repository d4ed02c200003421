//! Output of a graph construction.

use crate::{
    connectivity::ConnectivityReport,
    graph::{AdjacencyGraph, Partition},
    matrix::SquareMatrix,
    options::NeighborSelection,
};

/// Adjacency in the representation requested by `is_sparse`.
#[derive(Clone, Debug, PartialEq)]
pub enum Adjacency {
    Sparse(AdjacencyGraph),
    /// Dense matrix with zeros for non-edges.
    Dense(SquareMatrix),
}

impl Adjacency {
    /// Number of nodes.
    #[must_use]
    pub fn size(&self) -> usize {
        match self {
            Self::Sparse(graph) => graph.size(),
            Self::Dense(matrix) => matrix.size(),
        }
    }

    /// Weight of `from → to`, or zero when there is no edge.
    #[must_use]
    pub fn weight(&self, from: usize, to: usize) -> f64 {
        match self {
            Self::Sparse(graph) => graph.weight(from, to).unwrap_or(0.0),
            Self::Dense(matrix) => matrix.get(from, to),
        }
    }

    /// Number of stored (sparse) or non-zero (dense) entries.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        match self {
            Self::Sparse(graph) => graph.edge_count(),
            Self::Dense(matrix) => matrix
                .rows()
                .map(|row| row.iter().filter(|value| **value != 0.0).count())
                .sum(),
        }
    }

    /// Converts to the sparse representation.
    #[must_use]
    pub fn to_sparse(&self) -> AdjacencyGraph {
        match self {
            Self::Sparse(graph) => graph.clone(),
            Self::Dense(matrix) => {
                let mut graph = AdjacencyGraph::new(matrix.size());
                for (from, row) in matrix.rows().enumerate() {
                    for (to, &weight) in row.iter().enumerate() {
                        if weight != 0.0 {
                            graph.insert(from, to, weight);
                        }
                    }
                }
                graph
            }
        }
    }

    /// Converts to the dense representation.
    #[must_use]
    pub fn to_dense(&self) -> SquareMatrix {
        match self {
            Self::Sparse(graph) => graph.to_dense(),
            Self::Dense(matrix) => matrix.clone(),
        }
    }

    /// Number of weakly-connected components.
    #[must_use]
    pub fn component_count(&self) -> usize {
        match self {
            Self::Sparse(graph) => Partition::from_graph(graph).count(),
            Self::Dense(_) => Partition::from_graph(&self.to_sparse()).count(),
        }
    }
}

/// A finished CkNN graph.
///
/// # Examples
/// ```
/// use cknn_core::{CknnBuilder, NeighborSelection};
///
/// let points = vec![vec![0.0], vec![1.0], vec![2.0], vec![10.0]];
/// let cknn = CknnBuilder::new().with_n_neighbors(1).build()?;
/// let graph = cknn.fit(&points)?;
/// assert_eq!(graph.adjacency().size(), 4);
/// assert_eq!(graph.selection(), NeighborSelection::Delta(1.0));
/// assert!(graph.connectivity().is_none());
/// # Ok::<(), cknn_core::CknnError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct CknnGraph {
    adjacency: Adjacency,
    selection: NeighborSelection,
    connectivity: Option<ConnectivityReport>,
}

impl CknnGraph {
    pub(crate) fn new(
        adjacency: Adjacency,
        selection: NeighborSelection,
        connectivity: Option<ConnectivityReport>,
    ) -> Self {
        Self {
            adjacency,
            selection,
            connectivity,
        }
    }

    #[rustfmt::skip]
    #[must_use]
    pub fn adjacency(&self) -> &Adjacency { &self.adjacency }

    /// Effective neighbour selection.
    ///
    /// Nature-mode connectivity replaces the input threshold with the one
    /// that connected the graph; a count threshold is rounded to the nearest
    /// integer.
    #[rustfmt::skip]
    #[must_use]
    pub fn selection(&self) -> NeighborSelection { self.selection }

    /// Connectivity diagnostics, when connectivity was requested.
    #[rustfmt::skip]
    #[must_use]
    pub fn connectivity(&self) -> Option<&ConnectivityReport> { self.connectivity.as_ref() }

    #[rustfmt::skip]
    #[must_use]
    pub fn into_adjacency(self) -> Adjacency { self.adjacency }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sparse() -> Adjacency {
        let mut graph = AdjacencyGraph::new(3);
        graph.insert(0, 1, 0.5);
        graph.insert(2, 2, 1.0);
        Adjacency::Sparse(graph)
    }

    #[test]
    fn sparse_and_dense_agree() {
        let sparse = sparse();
        let dense = Adjacency::Dense(sparse.to_dense());

        assert_eq!(dense.edge_count(), sparse.edge_count());
        assert_eq!(dense.weight(0, 1), 0.5);
        assert_eq!(sparse.weight(1, 0), 0.0);
        assert_eq!(dense.to_sparse(), sparse.to_sparse());
        assert_eq!(dense.component_count(), 2);
    }
}
