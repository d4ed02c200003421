//! Benchmark support crate for cknn.
//!
//! Provides synthetic point clouds and parameter types used by Criterion
//! benchmarks for graph construction and connectivity enforcement.

pub mod error;
pub mod params;
pub mod source;
