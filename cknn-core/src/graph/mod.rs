//! Sparse adjacency graphs and the graph routines the connectivity passes
//! rely on: neighbour graphs, component labelling and reachability.

mod components;
mod neighbors;
mod reachability;

use std::collections::BTreeMap;

use crate::matrix::SquareMatrix;

pub use self::components::Partition;
pub use self::neighbors::{count_graph, radius_graph, rank_matrix};
pub use self::reachability::has_path;

/// Directed sparse graph over `0..size` with `f64` edge weights.
///
/// Rows are kept in column order so iteration is deterministic.
///
/// # Examples
/// ```
/// use cknn_core::AdjacencyGraph;
///
/// let mut graph = AdjacencyGraph::new(3);
/// graph.insert(0, 1, 1.0);
/// graph.insert(2, 1, 1.0);
/// assert_eq!(graph.edge_count(), 2);
/// assert!(graph.contains(0, 1));
/// assert!(!graph.contains(1, 0));
/// assert!(graph.symmetrized().contains(1, 0));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AdjacencyGraph {
    rows: Vec<BTreeMap<usize, f64>>,
}

impl AdjacencyGraph {
    /// Creates a graph with `size` nodes and no edges.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            rows: vec![BTreeMap::new(); size],
        }
    }

    #[rustfmt::skip]
    #[must_use]
    pub fn size(&self) -> usize { self.rows.len() }

    /// Inserts or overwrites the edge `from → to`.
    ///
    /// Returns `false`, leaving the graph untouched, when either endpoint is
    /// outside `0..size`.
    pub fn insert(&mut self, from: usize, to: usize, weight: f64) -> bool {
        let size = self.size();
        match self.rows.get_mut(from) {
            Some(row) if to < size => {
                row.insert(to, weight);
                true
            }
            _ => false,
        }
    }

    /// Removes the edge `from → to`, returning its weight if it existed.
    pub fn remove(&mut self, from: usize, to: usize) -> Option<f64> {
        self.rows.get_mut(from)?.remove(&to)
    }

    /// Returns the weight of `from → to`.
    #[must_use]
    pub fn weight(&self, from: usize, to: usize) -> Option<f64> {
        self.rows.get(from)?.get(&to).copied()
    }

    #[must_use]
    pub fn contains(&self, from: usize, to: usize) -> bool {
        self.weight(from, to).is_some()
    }

    /// Iterates the outgoing edges of `node` in ascending target order.
    pub fn neighbors(&self, node: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.rows
            .get(node)
            .into_iter()
            .flat_map(|row| row.iter().map(|(&to, &weight)| (to, weight)))
    }

    /// Iterates every edge as `(from, to, weight)` in row-major order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.rows.iter().enumerate().flat_map(|(from, row)| {
            row.iter().map(move |(&to, &weight)| (from, to, weight))
        })
    }

    #[rustfmt::skip]
    #[must_use]
    pub fn out_degree(&self, node: usize) -> usize { self.rows.get(node).map_or(0, BTreeMap::len) }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.rows.iter().map(BTreeMap::len).sum()
    }

    /// Adds every edge of `other`; weights from `other` win on overlap.
    pub fn union_with(&mut self, other: &Self) {
        for (from, to, weight) in other.edges() {
            self.insert(from, to, weight);
        }
    }

    /// Returns `self ∪ selfᵀ` with every off-diagonal weight clamped to 1.
    #[must_use]
    pub fn symmetrized(&self) -> Self {
        let mut out = Self::new(self.size());
        for (from, to, weight) in self.edges() {
            if from == to {
                out.insert(from, to, weight);
            } else {
                out.insert(from, to, 1.0);
                out.insert(to, from, 1.0);
            }
        }
        out
    }

    /// Sets every self-loop to `weight`, or clears them when `None`.
    pub fn set_diagonal(&mut self, weight: Option<f64>) {
        for (node, row) in self.rows.iter_mut().enumerate() {
            match weight {
                Some(weight) => {
                    row.insert(node, weight);
                }
                None => {
                    row.remove(&node);
                }
            }
        }
    }

    /// Replaces each edge weight with `f(from, to, weight)`.
    pub fn map_weights(&mut self, mut f: impl FnMut(usize, usize, f64) -> f64) {
        for (from, row) in self.rows.iter_mut().enumerate() {
            for (&to, weight) in row.iter_mut() {
                *weight = f(from, to, *weight);
            }
        }
    }

    /// Returns whether every edge has a reverse edge of equal weight.
    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        self.edges()
            .all(|(from, to, weight)| self.weight(to, from) == Some(weight))
    }

    /// Materialises the graph as a dense matrix with zeros for non-edges.
    #[must_use]
    pub fn to_dense(&self) -> SquareMatrix {
        let mut dense = SquareMatrix::filled(self.size(), 0.0);
        for (from, to, weight) in self.edges() {
            dense.set(from, to, weight);
        }
        dense
    }
}
