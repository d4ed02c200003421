mod common;

use cknn_core::{CknnBuilder, Connectivity, NeighborSelection};
use cknn_test_support::tracing::RecordingLayer;
use common::seed_points;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

#[test]
fn build_emits_stage_spans_and_round_events() {
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    let cknn = CknnBuilder::new()
        .with_n_neighbors(5)
        .with_neighbors(NeighborSelection::Delta(0.5))
        .with_connectivity(Connectivity::Nature)
        .build()
        .expect("valid");

    let graph = tracing::subscriber::with_default(subscriber, || cknn.fit(&seed_points()))
        .expect("graph");
    assert_eq!(graph.adjacency().component_count(), 1);

    let spans = layer.spans();
    let named = |name: &str| spans.iter().filter(|span| span.name == name).count();
    assert_eq!(named("cknn.build"), 1);
    assert_eq!(named("cknn.ratio"), 1);
    assert_eq!(named("cknn.connect"), 1);
    assert_eq!(named("cknn.reduce"), 2);

    let build = spans
        .iter()
        .find(|span| span.name == "cknn.build")
        .expect("build span");
    assert_eq!(build.fields.get("samples").map(String::as_str), Some("20"));
    assert_eq!(
        build.fields.get("neighbors").map(String::as_str),
        Some("delta=0.5")
    );
    assert_eq!(
        build.fields.get("connectivity").map(String::as_str),
        Some("nature")
    );

    let rounds: Vec<_> = layer
        .events()
        .into_iter()
        .filter(|event| {
            event.fields.get("message").map(String::as_str) == Some("connectivity round")
        })
        .collect();
    assert_eq!(rounds.len(), 2);
    assert!(rounds.iter().all(|event| event.level == Level::DEBUG));
    assert_eq!(
        rounds.last().and_then(|event| event.fields.get("components")).map(String::as_str),
        Some("1")
    );
}

#[test]
fn failed_builds_record_errors_on_the_span() {
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    let cknn = CknnBuilder::new().with_n_neighbors(1).build().expect("valid");
    let duplicates = vec![vec![0.0], vec![0.0], vec![1.0]];

    let result = tracing::subscriber::with_default(subscriber, || cknn.fit(&duplicates));
    assert!(result.is_err());

    let errors = layer
        .events()
        .into_iter()
        .filter(|event| event.level == Level::ERROR)
        .count();
    // `cknn.ratio` and `cknn.build` each report the failure.
    assert_eq!(errors, 2);
}
