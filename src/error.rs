//! Error types shared by the classifier and evaluation modules.

use std::fmt;

use thiserror::Error;

/// Which collection of examples an offending vector came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExampleSet {
    Reference,
    Query,
}

impl fmt::Display for ExampleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExampleSet::Reference => write!(f, "reference"),
            ExampleSet::Query => write!(f, "query"),
        }
    }
}

/// Errors produced while classifying or evaluating.
///
/// Undefined metrics (a class with no gold or no predicted examples) are not
/// errors; they surface as `NaN` inside the computed metrics.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A vector's dimension differs from the dimension fixed for the run.
    #[error("{set} vector {index} has dimension {found}, expected {expected}")]
    DimensionMismatch {
        set: ExampleSet,
        index: usize,
        expected: usize,
        found: usize,
    },

    /// A vector with zero dimensions was supplied.
    #[error("{set} vector {index} is empty")]
    EmptyVector { set: ExampleSet, index: usize },

    /// A vector component is NaN or infinite.
    #[error("{set} vector {index} has a non-finite value at position {position}")]
    NonFiniteValue {
        set: ExampleSet,
        index: usize,
        position: usize,
    },

    /// The reference set holds no examples.
    #[error("reference set is empty")]
    EmptyReferenceSet,

    /// `k` is zero or larger than the reference set.
    #[error("k = {k} is out of range for a reference set of {reference_size} examples")]
    InvalidK { k: usize, reference_size: usize },

    /// A distance row does not have one entry per reference example.
    #[error("distance row has {found} entries, expected {expected}")]
    EmptyRow { expected: usize, found: usize },

    /// A label outside the three sentiment classes.
    #[error("unknown label: {0:?}")]
    UnknownLabel(String),
}

/// Result type alias for operations that may fail with [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether the error only invalidates a single k of a sweep.
    pub fn is_per_k(&self) -> bool {
        matches!(self, Error::InvalidK { .. } | Error::EmptyRow { .. })
    }
}
