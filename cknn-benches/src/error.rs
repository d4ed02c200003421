//! Benchmark setup error type.
//!
//! Aggregates the errors that may arise during benchmark data preparation
//! so that setup functions can propagate failures with `?` instead of
//! using `.expect()`.

use crate::source::SyntheticError;

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Synthetic data generation failed.
    #[error("synthetic source generation failed: {0}")]
    Synthetic(#[from] SyntheticError),
    /// Graph construction failed.
    #[error("graph construction failed: {0}")]
    Cknn(#[from] cknn_core::CknnError),
}
