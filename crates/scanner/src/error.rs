//! Error types for selection, transect picking and sweep rendering.

use renderer::RenderError;
use scanner_common::DatasetError;
use thiserror::Error;

/// Result type alias using ScannerError.
pub type ScannerResult<T> = Result<T, ScannerError>;

/// Errors raised by the scanner routines.
#[derive(Error, Debug)]
pub enum ScannerError {
    /// A selection parameter does not fit the dataset.
    #[error("selection out of range: {param}: {message}")]
    SelectionOutOfRange { param: String, message: String },

    /// Unsupported combination of slice index and output flag.
    #[error("invalid output mode: {0}")]
    InvalidMode(String),

    /// Step count, slice index, endpoints or dataset shape unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Reading an answer from the user failed (including end of input).
    #[error("prompt failed: {0}")]
    Prompt(#[from] std::io::Error),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl ScannerError {
    pub fn out_of_range(param: &str, message: impl Into<String>) -> Self {
        ScannerError::SelectionOutOfRange {
            param: param.to_string(),
            message: message.into(),
        }
    }

    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        ScannerError::InvalidConfiguration(message.into())
    }
}
