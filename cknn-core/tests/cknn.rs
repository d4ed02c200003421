mod common;

use cknn_core::{
    Adjacency, CknnBuilder, CknnError, Connectivity, NeighborSelection, Partition, radius_graph,
};
use cknn_test_support::ci::property_test_profile::ProptestRunProfile;
use common::{seed_points, seed_ratios};
use proptest::{prelude::*, test_runner::Config as ProptestConfig};
use rstest::rstest;

fn sparse(adjacency: &Adjacency) -> &cknn_core::AdjacencyGraph {
    match adjacency {
        Adjacency::Sparse(graph) => graph,
        Adjacency::Dense(_) => panic!("expected sparse output"),
    }
}

#[test]
fn delta_graph_covers_every_point() {
    let cknn = CknnBuilder::new().with_n_neighbors(7).build().expect("valid");
    let graph = cknn.fit(&seed_points()).expect("graph");
    let adjacency = sparse(graph.adjacency());

    assert_eq!(adjacency.size(), 20);
    assert_eq!(adjacency.edge_count(), 118);
    assert!(adjacency.is_symmetric());
    assert!((0..20).all(|node| !adjacency.contains(node, node)));
    assert!((0..20).all(|node| adjacency.out_degree(node) >= 1));
    assert_eq!(graph.selection(), NeighborSelection::Delta(1.0));
    assert!(graph.connectivity().is_none());
}

#[test]
fn nature_mode_finds_the_smallest_connecting_delta() {
    let cknn = CknnBuilder::new()
        .with_n_neighbors(3)
        .with_connectivity(Connectivity::Nature)
        .build()
        .expect("valid");
    let graph = cknn.fit(&seed_points()).expect("graph");

    let report = graph.connectivity().expect("report");
    let threshold = report.threshold().expect("nature threshold");
    assert_eq!(report.rounds(), 1);
    assert!((threshold - 1.053_060_451_490_473_3).abs() < 1e-9);
    assert_eq!(graph.selection(), NeighborSelection::Delta(threshold));
    assert_eq!(graph.adjacency().component_count(), 1);

    let ratios = seed_ratios(3);
    assert_eq!(
        Partition::from_graph(&radius_graph(&ratios, 1.0)).count(),
        3
    );
    assert!(!Partition::from_graph(&radius_graph(&ratios, threshold.next_down())).is_connected());
}

#[test]
fn nature_mode_may_need_several_rounds() {
    let cknn = CknnBuilder::new()
        .with_n_neighbors(5)
        .with_neighbors(NeighborSelection::Delta(0.5))
        .with_connectivity(Connectivity::Nature)
        .build()
        .expect("valid");
    let graph = cknn.fit(&seed_points()).expect("graph");

    let report = graph.connectivity().expect("report");
    assert_eq!(report.rounds(), 2);
    assert!(report.threshold().is_some_and(|delta| delta > 0.5));
    assert_eq!(graph.adjacency().component_count(), 1);
}

#[rstest]
#[case::kept(false, 51, 0)]
#[case::pruned(true, 48, 3)]
fn force_mode_connects_with_critical_edges(
    #[case] prune: bool,
    #[case] edges: usize,
    #[case] pruned: usize,
) {
    let cknn = CknnBuilder::new()
        .with_n_neighbors(3)
        .with_connectivity(Connectivity::Force)
        .with_prune(prune)
        .build()
        .expect("valid");
    let graph = cknn.fit(&seed_points()).expect("graph");

    let report = graph.connectivity().expect("report");
    assert_eq!(report.threshold(), None);
    assert_eq!(report.critical_edges(), 3);
    assert_eq!(report.pruned_edges(), pruned);
    assert_eq!(graph.adjacency().edge_count(), edges);
    assert_eq!(graph.adjacency().component_count(), 1);
    assert_eq!(graph.selection(), NeighborSelection::Delta(1.0));
}

#[test]
fn pruning_never_adds_edges() {
    let builder = CknnBuilder::new()
        .with_n_neighbors(3)
        .with_connectivity(Connectivity::Force);
    let kept = builder
        .clone()
        .with_prune(false)
        .build()
        .expect("valid")
        .fit(&seed_points())
        .expect("graph");
    let pruned = builder
        .with_prune(true)
        .build()
        .expect("valid")
        .fit(&seed_points())
        .expect("graph");

    assert!(pruned.adjacency().edge_count() <= kept.adjacency().edge_count());
    let pruned = pruned.adjacency().to_sparse();
    let kept = kept.adjacency().to_sparse();
    assert!(pruned.edges().all(|(from, to, _)| kept.contains(from, to)));
}

#[rstest]
#[case::undirected(false, 74, true)]
#[case::directed(true, 60, false)]
fn count_mode_links_ranked_neighbours(
    #[case] directed: bool,
    #[case] edges: usize,
    #[case] symmetric: bool,
) {
    let cknn = CknnBuilder::new()
        .with_n_neighbors(5)
        .with_neighbors(NeighborSelection::Count(3))
        .with_directed(directed)
        .build()
        .expect("valid");
    let graph = cknn.fit(&seed_points()).expect("graph");
    let adjacency = sparse(graph.adjacency());

    assert_eq!(adjacency.edge_count(), edges);
    assert_eq!(adjacency.is_symmetric(), symmetric);
    assert!(adjacency.edges().all(|(_, _, weight)| weight == 1.0));
    assert!((0..20).all(|node| adjacency.out_degree(node) >= 3));
    assert_eq!(graph.selection(), NeighborSelection::Count(3));
}

#[rstest]
#[case::undirected(false, 48)]
#[case::directed(true, 40)]
fn count_nature_mode_reports_rounded_k(#[case] directed: bool, #[case] edges: usize) {
    let cknn = CknnBuilder::new()
        .with_n_neighbors(3)
        .with_neighbors(NeighborSelection::Count(1))
        .with_connectivity(Connectivity::Nature)
        .with_directed(directed)
        .build()
        .expect("valid");
    let graph = cknn.fit(&seed_points()).expect("graph");
    let adjacency = sparse(graph.adjacency());

    let report = graph.connectivity().expect("report");
    assert_eq!(report.rounds(), 1);
    assert_eq!(report.threshold(), Some(2.0));
    assert_eq!(graph.selection(), NeighborSelection::Count(2));
    assert_eq!(graph.adjacency().component_count(), 1);
    assert_eq!(adjacency.edge_count(), edges);
    assert_eq!(adjacency.is_symmetric(), !directed);
    assert!(adjacency.edges().all(|(_, _, weight)| weight == 1.0));
    if directed {
        assert!((0..20).all(|node| adjacency.out_degree(node) == 2));
    }
}

#[rstest]
#[case::undirected_kept(false, Some(false), 44, 0)]
#[case::undirected_default(false, None, 44, 9)]
#[case::directed_kept(true, Some(false), 31, 0)]
#[case::directed_default(true, None, 22, 9)]
fn count_force_mode_connects_ranked_neighbours(
    #[case] directed: bool,
    #[case] prune: Option<bool>,
    #[case] edges: usize,
    #[case] pruned: usize,
) {
    let mut builder = CknnBuilder::new()
        .with_n_neighbors(3)
        .with_neighbors(NeighborSelection::Count(1))
        .with_connectivity(Connectivity::Force)
        .with_directed(directed);
    if let Some(prune) = prune {
        builder = builder.with_prune(prune);
    }
    let graph = builder.build().expect("valid").fit(&seed_points()).expect("graph");
    let adjacency = sparse(graph.adjacency());

    let report = graph.connectivity().expect("report");
    assert_eq!(report.threshold(), None);
    assert_eq!(report.rounds(), 2);
    assert_eq!(report.critical_edges(), 11);
    assert_eq!(report.pruned_edges(), pruned);
    assert_eq!(graph.selection(), NeighborSelection::Count(1));
    assert_eq!(graph.adjacency().component_count(), 1);
    assert_eq!(adjacency.edge_count(), edges);
    assert_eq!(adjacency.is_symmetric(), !directed);
    assert!(adjacency.edges().all(|(_, _, weight)| weight == 1.0));
}

#[rstest]
#[case::undirected(false)]
#[case::directed(true)]
fn count_pruning_never_adds_edges(#[case] directed: bool) {
    let builder = CknnBuilder::new()
        .with_n_neighbors(3)
        .with_neighbors(NeighborSelection::Count(1))
        .with_connectivity(Connectivity::Force)
        .with_directed(directed);
    let kept = builder
        .clone()
        .with_prune(false)
        .build()
        .expect("valid")
        .fit(&seed_points())
        .expect("graph")
        .into_adjacency()
        .to_sparse();
    let pruned = builder
        .build()
        .expect("valid")
        .fit(&seed_points())
        .expect("graph")
        .into_adjacency()
        .to_sparse();

    assert!(pruned.edge_count() <= kept.edge_count());
    assert!(pruned.edges().all(|(from, to, _)| kept.contains(from, to)));
}

fn count_suite_config() -> ProptestConfig {
    let profile = ProptestRunProfile::load(32, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// Three well-separated blobs of distinct points.
fn three_blobs() -> impl Strategy<Value = Vec<Vec<f64>>> {
    proptest::collection::vec((0.0f64..0.005, 0.0f64..1.0), 30).prop_map(|jitter| {
        jitter
            .into_iter()
            .enumerate()
            .map(|(index, (dx, dy))| {
                let offset = (index % 3) as f64 * 100.0;
                vec![offset + index as f64 * 0.01 + dx, dy]
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(count_suite_config())]

    #[test]
    fn count_force_defaults_always_connect(
        points in three_blobs(),
        k in 1usize..4,
        directed in any::<bool>(),
    ) {
        let graph = CknnBuilder::new()
            .with_n_neighbors(3)
            .with_neighbors(NeighborSelection::Count(k))
            .with_connectivity(Connectivity::Force)
            .with_directed(directed)
            .build()
            .expect("valid")
            .fit(&points);
        let graph = graph.map_err(|err| TestCaseError::fail(err.to_string()))?;
        prop_assert_eq!(graph.adjacency().component_count(), 1);
        let report = graph.connectivity().expect("report");
        prop_assert!(report.pruned_edges() <= report.critical_edges());
    }
}

#[test]
fn dense_output_matches_sparse_output() {
    let builder = CknnBuilder::new().with_n_neighbors(7);
    let sparse = builder
        .clone()
        .build()
        .expect("valid")
        .fit(&seed_points())
        .expect("graph");
    let dense = builder
        .with_sparse_output(false)
        .build()
        .expect("valid")
        .fit(&seed_points())
        .expect("graph");

    let Adjacency::Dense(matrix) = dense.adjacency() else {
        panic!("expected dense output");
    };
    assert_eq!(matrix, &sparse.adjacency().to_dense());
}

#[test]
fn duplicated_points_have_no_density_scale() {
    let cknn = CknnBuilder::new().with_n_neighbors(1).build().expect("valid");
    let points = vec![vec![0.0], vec![0.0], vec![1.0], vec![2.0]];
    assert_eq!(
        cknn.fit(&points).expect_err("duplicates"),
        CknnError::DegenerateDensity { point: 0 }
    );
}
