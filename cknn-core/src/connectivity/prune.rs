//! Reachability-preserving removal of redundant edges (`cut_rng`).

use tracing::{debug, instrument};

use crate::{
    error::{CknnError, Result},
    graph::{AdjacencyGraph, has_path},
    matrix::SquareMatrix,
};

/// Result of [`prune_redundant_edges`].
#[derive(Clone, Debug, PartialEq)]
pub struct PrunedGraph {
    graph: AdjacencyGraph,
    removed: Vec<(usize, usize)>,
}

impl PrunedGraph {
    #[rustfmt::skip]
    #[must_use]
    pub fn graph(&self) -> &AdjacencyGraph { &self.graph }

    /// Base edges removed, in the order they were accepted.
    #[rustfmt::skip]
    #[must_use]
    pub fn removed(&self) -> &[(usize, usize)] { &self.removed }

    #[rustfmt::skip]
    #[must_use]
    pub fn into_graph(self) -> AdjacencyGraph { self.graph }
}

/// Thins `base ∪ critical` back towards the per-row budget of `base`.
///
/// Every row `i` with `c > 0` critical outgoing edges sheds up to `c` of its
/// non-critical base edges. Candidates are tried from the largest
/// `weights[i][j]` down, ties by ascending column. A removal is kept only if
/// `i` still reaches `j`, or `j` still reaches `i`, in the remaining directed
/// graph; the first rejected removal is restored and ends the row, which
/// then keeps whatever it has not shed. Critical edges are never removed, so
/// weak connectivity is preserved.
///
/// Rows are processed in ascending order, each seeing the removals accepted
/// for earlier rows.
///
/// # Examples
/// ```
/// use cknn_core::{AdjacencyGraph, SquareMatrix, prune_redundant_edges};
///
/// // 0 ↔ 1 in the base graph; the critical edge 0 → 2 joins node 2.
/// let mut base = AdjacencyGraph::new(3);
/// base.insert(0, 1, 1.0);
/// base.insert(1, 0, 1.0);
/// let mut critical = AdjacencyGraph::new(3);
/// critical.insert(0, 2, 1.0);
/// let weights = SquareMatrix::filled(3, 1.0);
///
/// let pruned = prune_redundant_edges(&base, &critical, &weights)?;
/// assert_eq!(pruned.removed(), &[(0, 1)]);
/// assert!(pruned.graph().contains(1, 0));
/// assert!(pruned.graph().contains(0, 2));
/// # Ok::<(), cknn_core::CknnError>(())
/// ```
///
/// # Errors
/// Returns [`CknnError::LabelCountMismatch`] when the graphs and `weights`
/// disagree in size, and [`CknnError::GraphInfeasible`] for the first row
/// that needed pruning but ran out of candidates without shedding an edge.
#[instrument(
    name = "cknn.prune",
    err,
    skip(base, critical, weights),
    fields(size = base.size(), critical_edges = critical.edge_count()),
)]
pub fn prune_redundant_edges(
    base: &AdjacencyGraph,
    critical: &AdjacencyGraph,
    weights: &SquareMatrix,
) -> Result<PrunedGraph> {
    let size = base.size();
    for other in [critical.size(), weights.size()] {
        if other != size {
            return Err(CknnError::LabelCountMismatch {
                labels: other,
                size,
            });
        }
    }

    let mut graph = base.clone();
    graph.union_with(critical);
    let mut removed = Vec::new();

    for row in 0..size {
        let budget = critical.out_degree(row);
        if budget == 0 {
            continue;
        }
        let Some(accepted) = prune_row(&mut graph, base, critical, weights, row, budget) else {
            return Err(CknnError::GraphInfeasible { row });
        };
        debug!(row, budget, removed = accepted.len(), "pruned row");
        removed.extend(accepted.into_iter().map(|column| (row, column)));
    }

    Ok(PrunedGraph { graph, removed })
}

/// Returns `None` when the row runs out of candidates before shedding
/// anything.
fn prune_row(
    graph: &mut AdjacencyGraph,
    base: &AdjacencyGraph,
    critical: &AdjacencyGraph,
    weights: &SquareMatrix,
    row: usize,
    budget: usize,
) -> Option<Vec<usize>> {
    let mut candidates: Vec<usize> = base
        .neighbors(row)
        .map(|(column, _)| column)
        .filter(|&column| column != row && !critical.contains(row, column))
        .collect();
    let values = weights.row(row);
    candidates.sort_by(|&a, &b| values[b].total_cmp(&values[a]).then(a.cmp(&b)));

    let mut accepted = Vec::with_capacity(budget);
    for column in candidates {
        let Some(weight) = graph.remove(row, column) else {
            continue;
        };
        if has_path(graph, row, column) || has_path(graph, column, row) {
            accepted.push(column);
            if accepted.len() == budget {
                return Some(accepted);
            }
        } else {
            graph.insert(row, column, weight);
            return Some(accepted);
        }
    }
    (!accepted.is_empty()).then_some(accepted)
}
