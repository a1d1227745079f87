//! Error types for dataset construction and access.

use thiserror::Error;

use crate::grid::AxisRole;
use crate::style::StyleError;

/// Result type alias using DatasetError.
pub type DatasetResult<T> = Result<T, DatasetError>;

/// Errors raised while building or reading a [`Dataset`](crate::Dataset).
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("no axis plays the {0} role (accepted names: {names})", names = .0.synonyms().join(", "))]
    MissingAxis(AxisRole),

    #[error("axis '{0}' does not match any known role (latitude, longitude, vertical)")]
    UnknownAxis(String),

    #[error("axes '{first}' and '{second}' both resolve to the {role} role")]
    DuplicateAxis {
        role: AxisRole,
        first: String,
        second: String,
    },

    #[error("axis '{0}' is empty")]
    EmptyAxis(String),

    #[error("axis '{0}' is not strictly monotonic")]
    NonMonotonicAxis(String),

    #[error("variable '{name}' holds {actual} values, expected {expected} for shape {shape:?}")]
    ShapeMismatch {
        name: String,
        expected: usize,
        actual: usize,
        shape: [usize; 4],
    },

    #[error("variable '{0}' is defined twice")]
    DuplicateVariable(String),

    #[error("variable not found: {0}")]
    UnknownVariable(String),

    #[error("index {index} out of range for axis '{axis}' of length {len}")]
    IndexOutOfRange {
        axis: String,
        index: usize,
        len: usize,
    },

    #[error(transparent)]
    Style(#[from] StyleError),
}
