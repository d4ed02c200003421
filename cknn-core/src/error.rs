//! Error types for the CkNN core library.
//!
//! Defines the error enums exposed by the public API, their stable
//! machine-readable codes, and a convenient result alias.

use std::{fmt, sync::Arc};

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// An error produced by [`crate::DataSource`] operations.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum DataSourceError {
    /// Requested index was outside the source's bounds.
    #[error("index {index} is out of bounds")]
    OutOfBounds {
        /// The requested row that exceeded the source bounds.
        index: usize,
    },
    /// Provided output buffer length did not match number of pairs.
    #[error("output buffer has length {out} but {expected} pairs were given")]
    OutputLengthMismatch {
        /// Caller-provided buffer length.
        out: usize,
        /// Expected number of vector pairs required for the operation.
        expected: usize,
    },
    /// Compared vectors had different dimensions.
    #[error("dimension mismatch: left={left}, right={right}")]
    DimensionMismatch {
        /// Dimensionality of the left-hand vector.
        left: usize,
        /// Dimensionality of the right-hand vector.
        right: usize,
    },
    /// Data source contained no rows.
    #[error("data source contains no rows")]
    EmptyData,
    /// Data source rows must have positive dimension.
    #[error("data source vectors must have positive dimension")]
    ZeroDimension,
    /// A coordinate was NaN or infinite.
    #[error("row {row} contains a non-finite value at position {column}")]
    NonFiniteValue {
        /// Row holding the offending value.
        row: usize,
        /// Position of the offending value inside the row.
        column: usize,
    },
    /// Cosine distance is undefined for a zero-magnitude row.
    #[error("row {index} has zero magnitude")]
    ZeroMagnitude {
        /// Row with zero L2 norm.
        index: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`DataSourceError`] variants.
    enum DataSourceErrorCode for DataSourceError {
        /// Requested index was outside the source's bounds.
        OutOfBounds => OutOfBounds { .. } => "DATA_SOURCE_OUT_OF_BOUNDS",
        /// Provided output buffer length did not match number of pairs.
        OutputLengthMismatch => OutputLengthMismatch { .. } => "DATA_SOURCE_OUTPUT_LENGTH_MISMATCH",
        /// Compared vectors had different dimensions.
        DimensionMismatch => DimensionMismatch { .. } => "DATA_SOURCE_DIMENSION_MISMATCH",
        /// Data source contained no rows.
        EmptyData => EmptyData => "DATA_SOURCE_EMPTY",
        /// Data source rows must have positive dimension.
        ZeroDimension => ZeroDimension => "DATA_SOURCE_ZERO_DIMENSION",
        /// A coordinate was NaN or infinite.
        NonFiniteValue => NonFiniteValue { .. } => "DATA_SOURCE_NON_FINITE_VALUE",
        /// Cosine distance is undefined for a zero-magnitude row.
        ZeroMagnitude => ZeroMagnitude { .. } => "DATA_SOURCE_ZERO_MAGNITUDE",
    }
}

/// Coarse classification of [`CknnError`] values.
///
/// Argument problems are detected before any graph work starts; infeasible
/// graphs are reported by the pruning pass; data source failures bubble up
/// from distance computation.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorKind {
    /// The caller supplied an invalid shape, range, or option value.
    InvalidArgument,
    /// The pruning pass could not keep the graph connected.
    GraphInfeasible,
    /// A [`crate::DataSource`] failed while computing distances.
    DataSource,
}

/// Error type produced when configuring or running [`crate::CkNearestNeighbors`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum CknnError {
    /// Fewer than two samples were supplied.
    #[error("at least 2 data points are required (got {samples})")]
    InsufficientSamples {
        /// Number of samples supplied.
        samples: usize,
    },
    /// `n_neighbors` must lie in `1..=samples - 1`.
    #[error("n_neighbors must be in 1..={max} (got {got})", max = .samples.saturating_sub(1))]
    InvalidNeighborCount {
        /// The rejected neighbour count.
        got: usize,
        /// Number of samples available.
        samples: usize,
    },
    /// The radius threshold must be finite and positive.
    #[error("delta must be finite and greater than zero (got {got})")]
    InvalidDelta {
        /// The rejected radius.
        got: f64,
    },
    /// The count threshold must lie in `1..=samples - 1`.
    #[error("k must be in 1..={max} (got {got})", max = .samples.saturating_sub(1))]
    InvalidK {
        /// The rejected neighbour count.
        got: usize,
        /// Number of samples available.
        samples: usize,
    },
    /// The kernel bandwidth must be finite and positive.
    #[error("bandwidth t must be finite and greater than zero (got {got})")]
    InvalidBandwidth {
        /// The rejected bandwidth.
        got: f64,
    },
    /// A matrix that must be square was not.
    #[error("matrix must be square: {rows} rows but a row has {columns} columns")]
    NonSquareMatrix {
        /// Number of rows in the matrix.
        rows: usize,
        /// Column count of the first row that disagreed.
        columns: usize,
    },
    /// A distance entry was negative or non-finite.
    #[error("distance at ({row}, {column}) must be finite and non-negative (got {value})")]
    InvalidDistance {
        /// Row of the offending entry.
        row: usize,
        /// Column of the offending entry.
        column: usize,
        /// The offending value.
        value: f64,
    },
    /// A precomputed distance matrix was not symmetric.
    #[error("distance matrix is not symmetric at ({row}, {column})")]
    AsymmetricMatrix {
        /// Row of the first asymmetric pair.
        row: usize,
        /// Column of the first asymmetric pair.
        column: usize,
    },
    /// A point's n-th neighbour distance was zero, so its density scale is undefined.
    #[error("point {point} has a zero n-th neighbour distance; density scale is undefined")]
    DegenerateDensity {
        /// Point whose density scale vanished.
        point: usize,
    },
    /// A label array did not cover every row of the matrix.
    #[error("expected {size} labels but got {labels}")]
    LabelCountMismatch {
        /// Number of labels supplied.
        labels: usize,
        /// Number of matrix rows.
        size: usize,
    },
    /// A label referenced a cluster outside `0..clusters`.
    #[error("label {label} at index {index} is outside 0..{clusters}")]
    LabelOutOfRange {
        /// Row carrying the label.
        index: usize,
        /// The offending label.
        label: usize,
        /// Number of clusters requested.
        clusters: usize,
    },
    /// A cluster label in `0..clusters` had no members.
    #[error("cluster {cluster} has no members")]
    EmptyCluster {
        /// The unused label.
        cluster: usize,
    },
    /// A value required by the chosen neighbour selection was not supplied.
    #[error("option `{option}` is required by the selected mode")]
    MissingOption {
        /// Name of the missing option.
        option: &'static str,
    },
    /// An option was given an unrecognised value.
    #[error("invalid value `{value}` for option `{option}`")]
    UnknownOption {
        /// Name of the option.
        option: &'static str,
        /// The rejected value.
        value: Arc<str>,
    },
    /// The pruning pass could not remove any edge from a row that needed it.
    #[error("difficult to find connected graph: no removable edge for row {row}")]
    GraphInfeasible {
        /// Row whose candidate edges were all required for reachability.
        row: usize,
    },
    /// A [`crate::DataSource`] operation failed while building the graph.
    #[error("data source `{data_source}` failed: {error}")]
    DataSource {
        /// Identifier for the data source that produced the error.
        data_source: Arc<str>,
        #[source]
        /// Underlying data source error.
        error: DataSourceError,
    },
}

define_error_codes! {
    /// Stable codes describing [`CknnError`] variants.
    enum CknnErrorCode for CknnError {
        /// Fewer than two samples were supplied.
        InsufficientSamples => InsufficientSamples { .. } => "CKNN_INSUFFICIENT_SAMPLES",
        /// `n_neighbors` was out of range.
        InvalidNeighborCount => InvalidNeighborCount { .. } => "CKNN_INVALID_N_NEIGHBORS",
        /// The radius threshold was invalid.
        InvalidDelta => InvalidDelta { .. } => "CKNN_INVALID_DELTA",
        /// The count threshold was invalid.
        InvalidK => InvalidK { .. } => "CKNN_INVALID_K",
        /// The kernel bandwidth was invalid.
        InvalidBandwidth => InvalidBandwidth { .. } => "CKNN_INVALID_BANDWIDTH",
        /// A matrix that must be square was not.
        NonSquareMatrix => NonSquareMatrix { .. } => "CKNN_NON_SQUARE_MATRIX",
        /// A distance entry was negative or non-finite.
        InvalidDistance => InvalidDistance { .. } => "CKNN_INVALID_DISTANCE",
        /// A precomputed distance matrix was not symmetric.
        AsymmetricMatrix => AsymmetricMatrix { .. } => "CKNN_ASYMMETRIC_MATRIX",
        /// A density scale was zero.
        DegenerateDensity => DegenerateDensity { .. } => "CKNN_DEGENERATE_DENSITY",
        /// Labels did not cover the matrix.
        LabelCountMismatch => LabelCountMismatch { .. } => "CKNN_LABEL_COUNT_MISMATCH",
        /// A label was out of range.
        LabelOutOfRange => LabelOutOfRange { .. } => "CKNN_LABEL_OUT_OF_RANGE",
        /// A cluster had no members.
        EmptyCluster => EmptyCluster { .. } => "CKNN_EMPTY_CLUSTER",
        /// A required option was missing.
        MissingOption => MissingOption { .. } => "CKNN_MISSING_OPTION",
        /// An option was given an unrecognised value.
        UnknownOption => UnknownOption { .. } => "CKNN_UNKNOWN_OPTION",
        /// The pruning pass could not keep the graph connected.
        GraphInfeasible => GraphInfeasible { .. } => "CKNN_GRAPH_INFEASIBLE",
        /// A [`crate::DataSource`] operation failed.
        DataSourceFailure => DataSource { .. } => "CKNN_DATA_SOURCE_FAILURE",
    }
}

impl CknnError {
    /// Classify the error into the argument / feasibility / data-source taxonomy.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::GraphInfeasible { .. } => ErrorKind::GraphInfeasible,
            Self::DataSource { .. } => ErrorKind::DataSource,
            _ => ErrorKind::InvalidArgument,
        }
    }

    /// Retrieve the inner [`DataSourceErrorCode`] when the error originated in a [`crate::DataSource`].
    pub const fn data_source_code(&self) -> Option<DataSourceErrorCode> {
        match self {
            Self::DataSource { error, .. } => Some(error.code()),
            _ => None,
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, CknnError>;
