//! Dense point clouds loaded from Arrow and Parquet.
//!
//! Points are read from `FixedSizeList<Float32 | Float64, D>` columns,
//! widened to `f64` and validated by [`cknn_core::PointSet`], so a loaded
//! cloud can be handed straight to graph construction.

mod errors;
mod ingest;
mod points;

pub use errors::DenseError;
pub use points::DensePoints;
