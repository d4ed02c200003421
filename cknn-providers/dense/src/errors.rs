use arrow_schema::{ArrowError, DataType};
use cknn_core::DataSourceError;
use thiserror::Error;

/// Errors raised while loading dense point clouds.
#[derive(Debug, Error)]
pub enum DenseError {
    #[error("column `{column}` not found")]
    MissingColumn { column: String },
    #[error("column `{column}` is {actual:?}, expected a FixedSizeList of floats")]
    NotAFloatList { column: String, actual: DataType },
    #[error("list elements must be Float32 or Float64, found {actual:?}")]
    UnsupportedElement { actual: DataType },
    #[error("list width {width} is negative")]
    NegativeWidth { width: i32 },
    #[error("column `{column}` is nullable (element field nullable: {nullable_child})")]
    Nullable {
        column: String,
        nullable_child: bool,
    },
    #[error("point {row} is null")]
    NullRow { row: usize },
    #[error("point {row} has a null coordinate at {coordinate}")]
    NullValue { row: usize, coordinate: usize },
    #[error("batch width changed from {expected} to {actual}")]
    WidthMismatch { expected: usize, actual: usize },
    /// The loaded rows failed point validation, e.g. a NaN coordinate.
    #[error("invalid points: {0}")]
    Points(#[from] DataSourceError),
    #[error("arrow error: {0}")]
    Arrow(#[from] ArrowError),
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
