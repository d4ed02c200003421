mod common;

use std::sync::Arc;

use cknn_core::{
    CknnBuilder, CknnError, DataSource, DataSourceError, DataSourceErrorCode, ErrorKind,
    NeighborSelection,
};
use common::Line;

/// Reports more items than it holds so lookups run past the end.
struct Truncated(Line);

impl DataSource for Truncated {
    fn len(&self) -> usize {
        self.0.len() + 1
    }

    fn name(&self) -> &str {
        "truncated"
    }

    fn distance(&self, i: usize, j: usize) -> Result<f64, DataSourceError> {
        self.0.distance(i, j)
    }
}

#[test]
fn fit_source_matches_precomputed_points() {
    let values = vec![0.0, 1.0, 2.0, 4.0, 8.0];
    let cknn = CknnBuilder::new()
        .with_n_neighbors(2)
        .with_neighbors(NeighborSelection::Count(2))
        .build()
        .expect("valid");

    let from_source = cknn.fit_source(&Line::new(values.clone())).expect("graph");
    let points: Vec<Vec<f64>> = values.iter().map(|&x| vec![x]).collect();
    let from_points = cknn.fit(&points).expect("graph");

    assert_eq!(from_source.adjacency(), from_points.adjacency());
}

#[test]
fn fit_source_reports_source_failures() {
    let cknn = CknnBuilder::new().with_n_neighbors(1).build().expect("valid");
    let err = cknn
        .fit_source(&Truncated(Line::new(vec![0.0, 1.0, 3.0])))
        .expect_err("index past the end");

    assert_eq!(err.kind(), ErrorKind::DataSource);
    assert_eq!(err.data_source_code(), Some(DataSourceErrorCode::OutOfBounds));
    assert!(matches!(
        err,
        CknnError::DataSource { ref data_source, .. } if *data_source == Arc::from("truncated")
    ));
}

#[test]
fn fit_source_requires_two_items() {
    let cknn = CknnBuilder::new().with_n_neighbors(1).build().expect("valid");
    assert_eq!(
        cknn.fit_source(&Line::new(vec![1.0])).expect_err("too small"),
        CknnError::InsufficientSamples { samples: 1 }
    );
}
