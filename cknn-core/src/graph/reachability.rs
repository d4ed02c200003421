//! Directed path queries.

use std::collections::VecDeque;

use super::AdjacencyGraph;

/// Returns whether `to` can be reached from `from` by following edges in
/// their stored direction.
///
/// A node always reaches itself. Indices outside the graph are unreachable.
///
/// # Examples
/// ```
/// use cknn_core::{AdjacencyGraph, has_path};
///
/// let mut graph = AdjacencyGraph::new(3);
/// graph.insert(0, 1, 1.0);
/// graph.insert(1, 2, 1.0);
/// assert!(has_path(&graph, 0, 2));
/// assert!(!has_path(&graph, 2, 0));
/// ```
#[must_use]
pub fn has_path(graph: &AdjacencyGraph, from: usize, to: usize) -> bool {
    if from >= graph.size() || to >= graph.size() {
        return false;
    }
    if from == to {
        return true;
    }

    let mut context = BfsContext::new(graph.size());
    context.visit(from);
    while let Some(node) = context.queue.pop_front() {
        for (next, _) in graph.neighbors(node) {
            if next == to {
                return true;
            }
            if !context.visited[next] {
                context.visit(next);
            }
        }
    }
    false
}

struct BfsContext {
    visited: Vec<bool>,
    queue: VecDeque<usize>,
}

impl BfsContext {
    fn new(capacity: usize) -> Self {
        Self {
            visited: vec![false; capacity],
            queue: VecDeque::new(),
        }
    }

    fn visit(&mut self, node: usize) {
        self.visited[node] = true;
        self.queue.push_back(node);
    }
}
