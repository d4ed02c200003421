//! Weakly-connected component labelling.
//!
//! Edges are treated as undirected: two nodes share a component when any
//! chain of edges joins them regardless of direction. Membership is tracked
//! with a union-find structure and then compacted into contiguous labels.

use super::AdjacencyGraph;
use crate::error::{CknnError, Result};

#[derive(Clone, Debug)]
struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn find(&mut self, mut node: usize) -> usize {
        let mut root = node;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        while self.parent[node] != node {
            let parent = self.parent[node];
            self.parent[node] = root;
            node = parent;
        }

        root
    }

    fn union(&mut self, left: usize, right: usize) {
        let mut left = self.find(left);
        let mut right = self.find(right);
        if left == right {
            return;
        }
        let left_rank = self.rank[left];
        let right_rank = self.rank[right];
        if left_rank < right_rank {
            std::mem::swap(&mut left, &mut right);
        }
        self.parent[right] = left;
        if left_rank == right_rank {
            self.rank[left] = left_rank.saturating_add(1);
        }
    }
}

/// Assignment of every node to one of `count` clusters.
///
/// Labels are contiguous in `0..count`. A partition is replaced wholesale
/// each connectivity round and never edited in place.
///
/// # Examples
/// ```
/// use cknn_core::{AdjacencyGraph, Partition};
///
/// let mut graph = AdjacencyGraph::new(4);
/// graph.insert(3, 1, 1.0);
/// let partition = Partition::from_graph(&graph);
/// assert_eq!(partition.count(), 3);
/// assert_eq!(partition.labels(), &[0, 1, 2, 1]);
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Partition {
    labels: Vec<usize>,
    count: usize,
}

impl Partition {
    /// Validates an explicit labelling of `labels.len()` items into `count`
    /// clusters.
    ///
    /// # Errors
    /// Returns [`CknnError::LabelOutOfRange`] when a label is not below
    /// `count` and [`CknnError::EmptyCluster`] when a label in `0..count` is
    /// never used.
    pub fn new(labels: Vec<usize>, count: usize) -> Result<Self> {
        let mut used = vec![false; count];
        for (index, &label) in labels.iter().enumerate() {
            let slot = used.get_mut(label).ok_or(CknnError::LabelOutOfRange {
                index,
                label,
                clusters: count,
            })?;
            *slot = true;
        }
        if let Some(cluster) = used.iter().position(|used| !used) {
            return Err(CknnError::EmptyCluster { cluster });
        }
        Ok(Self { labels, count })
    }

    /// Labels the weakly-connected components of `graph`.
    ///
    /// Components are numbered in order of their lowest node index.
    #[must_use]
    pub fn from_graph(graph: &AdjacencyGraph) -> Self {
        let size = graph.size();
        let mut sets = DisjointSet::new(size);
        for (from, to, _) in graph.edges() {
            sets.union(from, to);
        }

        let mut root_labels = vec![usize::MAX; size];
        let mut labels = Vec::with_capacity(size);
        let mut count = 0;
        for node in 0..size {
            let root = sets.find(node);
            if root_labels[root] == usize::MAX {
                root_labels[root] = count;
                count += 1;
            }
            labels.push(root_labels[root]);
        }
        Self { labels, count }
    }

    #[rustfmt::skip]
    #[must_use]
    pub fn count(&self) -> usize { self.count }

    #[rustfmt::skip]
    #[must_use]
    pub fn labels(&self) -> &[usize] { &self.labels }

    #[rustfmt::skip]
    #[must_use]
    pub fn len(&self) -> usize { self.labels.len() }

    #[rustfmt::skip]
    #[must_use]
    pub fn is_empty(&self) -> bool { self.labels.is_empty() }

    /// Returns whether every node sits in a single cluster.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.count <= 1
    }

    /// Returns the members of each cluster in ascending node order.
    #[must_use]
    pub fn members(&self) -> Vec<Vec<usize>> {
        let mut members = vec![Vec::new(); self.count];
        for (node, &label) in self.labels.iter().enumerate() {
            members[label].push(node);
        }
        members
    }
}
