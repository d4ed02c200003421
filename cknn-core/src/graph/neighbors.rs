//! Radius- and count-based neighbour graphs over a square matrix.

use super::AdjacencyGraph;
use crate::matrix::{SquareMatrix, map_rows};

/// Connects `i → j` with weight 1 for every `i ≠ j` where
/// `matrix[i][j] <= radius`.
///
/// # Examples
/// ```
/// use cknn_core::{SquareMatrix, radius_graph};
///
/// let matrix = SquareMatrix::from_rows(&[
///     vec![0.0, 1.0, 3.0],
///     vec![1.0, 0.0, 2.0],
///     vec![3.0, 2.0, 0.0],
/// ])?;
/// let graph = radius_graph(&matrix, 2.0);
/// assert_eq!(graph.edge_count(), 4);
/// assert!(!graph.contains(0, 2));
/// # Ok::<(), cknn_core::CknnError>(())
/// ```
#[must_use]
pub fn radius_graph(matrix: &SquareMatrix, radius: f64) -> AdjacencyGraph {
    let mut graph = AdjacencyGraph::new(matrix.size());
    for (from, row) in matrix.rows().enumerate() {
        for (to, &value) in row.iter().enumerate() {
            if from != to && value <= radius {
                graph.insert(from, to, 1.0);
            }
        }
    }
    graph
}

/// Replaces every entry with its rank inside its row.
///
/// Each row is ordered by `(value, column)`; the row's own index is always
/// rank 0 so that a point is never its own neighbour, even when duplicates
/// share a zero distance.
#[must_use]
pub fn rank_matrix(matrix: &SquareMatrix) -> SquareMatrix {
    let size = matrix.size();
    let Ok(ranked) = map_rows(size, |row| {
        let values = matrix.row(row);
        let mut order: Vec<usize> = (0..size).filter(|&column| column != row).collect();
        order.sort_by(|&a, &b| values[a].total_cmp(&values[b]).then(a.cmp(&b)));
        let mut ranks = vec![0.0; size];
        for (position, column) in order.into_iter().enumerate() {
            ranks[column] = (position + 1) as f64;
        }
        Ok::<_, core::convert::Infallible>(ranks)
    });

    let mut out = SquareMatrix::filled(size, 0.0);
    for (row, ranks) in ranked.into_iter().enumerate() {
        for (column, rank) in ranks.into_iter().enumerate() {
            out.set(row, column, rank);
        }
    }
    out
}

/// Connects every point to its `k` nearest other points (directed).
///
/// Equivalent to `radius_graph(&rank_matrix(matrix), k)`.
#[must_use]
pub fn count_graph(matrix: &SquareMatrix, k: usize) -> AdjacencyGraph {
    radius_graph(&rank_matrix(matrix), k as f64)
}
