//! Option types selecting how the CkNN graph is built.
//!
//! Each option is a closed enum chosen once when the builder is configured.
//! String forms are accepted through [`FromStr`] so that command-line and
//! configuration surfaces reject unknown names with
//! [`CknnError::UnknownOption`].

use std::{fmt, str::FromStr, sync::Arc};

use crate::error::{CknnError, Result};

/// How base neighbours are chosen from the ratio matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NeighborSelection {
    /// Connect every pair whose ratio is at most `delta`.
    Delta(f64),
    /// Connect every point to its `k` nearest points by ratio.
    Count(usize),
}

impl Default for NeighborSelection {
    fn default() -> Self {
        Self::Delta(1.0)
    }
}

impl NeighborSelection {
    /// Resolves a selection from its mode name and the matching threshold.
    ///
    /// # Examples
    /// ```
    /// use cknn_core::NeighborSelection;
    ///
    /// let k = NeighborSelection::from_parts("k", None, Some(4))?;
    /// assert_eq!(k, NeighborSelection::Count(4));
    /// assert!(NeighborSelection::from_parts("k", Some(1.0), None).is_err());
    /// # Ok::<(), cknn_core::CknnError>(())
    /// ```
    ///
    /// # Errors
    /// Returns [`CknnError::UnknownOption`] for a mode other than `delta` or
    /// `k`, and [`CknnError::MissingOption`] when the mode's threshold is
    /// absent.
    pub fn from_parts(mode: &str, delta: Option<f64>, k: Option<usize>) -> Result<Self> {
        match mode {
            "delta" => delta
                .map(Self::Delta)
                .ok_or(CknnError::MissingOption { option: "delta" }),
            "k" => k
                .map(Self::Count)
                .ok_or(CknnError::MissingOption { option: "k" }),
            other => Err(unknown("neighbors", other)),
        }
    }

    pub(crate) fn validate(self) -> Result<()> {
        match self {
            Self::Delta(delta) if !(delta.is_finite() && delta > 0.0) => {
                Err(CknnError::InvalidDelta { got: delta })
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for NeighborSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delta(delta) => write!(f, "delta={delta}"),
            Self::Count(k) => write!(f, "k={k}"),
        }
    }
}

/// Distance used to turn input rows into a distance matrix.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Metric {
    /// Straight-line distance.
    #[default]
    Euclidean,
    /// One minus the cosine similarity.
    Cosine,
    /// Rows already hold a square, symmetric distance matrix.
    Precomputed,
}

impl FromStr for Metric {
    type Err = CknnError;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "euclidean" => Ok(Self::Euclidean),
            "cosine" => Ok(Self::Cosine),
            "precomputed" => Ok(Self::Precomputed),
            other => Err(unknown("metric", other)),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Euclidean => "euclidean",
            Self::Cosine => "cosine",
            Self::Precomputed => "precomputed",
        })
    }
}

/// Weight written for every surviving edge.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum EdgeWeight {
    /// Binary adjacency (`t = inf`).
    #[default]
    Connectivity,
    /// `exp(d² / bandwidth)` of the original distance `d`.
    Exponential {
        /// Kernel bandwidth `t`.
        bandwidth: f64,
    },
}

impl EdgeWeight {
    pub(crate) fn validate(self) -> Result<()> {
        match self {
            Self::Exponential { bandwidth } if !(bandwidth.is_finite() && bandwidth > 0.0) => {
                Err(CknnError::InvalidBandwidth { got: bandwidth })
            }
            _ => Ok(()),
        }
    }
}

impl FromStr for EdgeWeight {
    type Err = CknnError;

    /// Parses `inf` or a positive real bandwidth.
    ///
    /// # Examples
    /// ```
    /// use cknn_core::EdgeWeight;
    ///
    /// assert_eq!("inf".parse::<EdgeWeight>()?, EdgeWeight::Connectivity);
    /// assert_eq!(
    ///     "2.5".parse::<EdgeWeight>()?,
    ///     EdgeWeight::Exponential { bandwidth: 2.5 }
    /// );
    /// assert!("-1".parse::<EdgeWeight>().is_err());
    /// # Ok::<(), cknn_core::CknnError>(())
    /// ```
    fn from_str(value: &str) -> Result<Self> {
        if value == "inf" {
            return Ok(Self::Connectivity);
        }
        let bandwidth: f64 = value.parse().map_err(|_| unknown("t", value))?;
        let weight = Self::Exponential { bandwidth };
        weight.validate()?;
        Ok(weight)
    }
}

impl fmt::Display for EdgeWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connectivity => f.write_str("inf"),
            Self::Exponential { bandwidth } => write!(f, "{bandwidth}"),
        }
    }
}

/// Whether and how the graph is forced into a single component.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Connectivity {
    /// Keep the base graph as built.
    #[default]
    Disabled,
    /// Grow the threshold until the graph is connected.
    Nature,
    /// Add minimal critical edges between components.
    Force,
}

impl FromStr for Connectivity {
    type Err = CknnError;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "none" => Ok(Self::Disabled),
            "nature" => Ok(Self::Nature),
            "force" => Ok(Self::Force),
            other => Err(unknown("conn_type", other)),
        }
    }
}

impl fmt::Display for Connectivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Disabled => "none",
            Self::Nature => "nature",
            Self::Force => "force",
        })
    }
}

fn unknown(option: &'static str, value: &str) -> CknnError {
    CknnError::UnknownOption {
        option,
        value: Arc::from(value),
    }
}
