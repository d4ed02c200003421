//! Shared test utilities for `cknn-core`.

use cknn_test_support::ci::property_test_profile::ProptestRunProfile;
use proptest::test_runner::Config as ProptestConfig;

use crate::{datasource::DataSource, error::DataSourceError};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

/// Builds a standard proptest configuration from the shared run profile.
///
/// Keeps property suites aligned on the same `PROGTEST_CASES` and
/// `CKNN_PBT_FORK` interpretation.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// One-dimensional [`DataSource`] that records distance invocations.
#[derive(Clone)]
pub(crate) struct CountingSource {
    data: Vec<f64>,
    calls: Arc<AtomicUsize>,
}

impl CountingSource {
    #[must_use]
    pub(crate) fn new(data: Vec<f64>, calls: Arc<AtomicUsize>) -> Self {
        Self { data, calls }
    }

    #[must_use]
    pub(crate) fn calls(&self) -> &Arc<AtomicUsize> {
        &self.calls
    }
}

impl DataSource for CountingSource {
    fn len(&self) -> usize {
        self.data.len()
    }

    fn name(&self) -> &str {
        "counting"
    }

    fn distance(&self, left: usize, right: usize) -> Result<f64, DataSourceError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let a = self
            .data
            .get(left)
            .ok_or(DataSourceError::OutOfBounds { index: left })?;
        let b = self
            .data
            .get(right)
            .ok_or(DataSourceError::OutOfBounds { index: right })?;
        Ok((a - b).abs())
    }
}
