//! Error types for features and data

use std::io;
use thiserror::Error;

/// Result type for pmll operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for pmll operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error while pulling objects from a stream
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The same feature appears more than once in a feature list
    #[error("Duplicated features: {}", .0.join(", "))]
    DuplicateFeatures(Vec<String>),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Invalid operation
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Shapes or feature sets of two data instances are incompatible
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// A value has the wrong type for the requested computation
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    /// Matrix could not be inverted
    #[error("Matrix is singular and cannot be inverted")]
    SingularMatrix,

    /// No working feature equals the requested one
    #[error("Feature not found: {0}")]
    FeatureNotFound(String),

    /// Index out of bounds
    #[error("Index {index} out of bounds for length {len}")]
    IndexOutOfBounds {
        /// Requested index
        index: usize,
        /// Length of the indexed sequence
        len: usize,
    },

    /// A streamed object could not be parsed
    #[error("Parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number in the source
        line: usize,
        /// What went wrong
        message: String,
    },
}

impl Error {
    /// Whether this error rejects the shape or content of an input
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::DuplicateFeatures(_)
                | Error::InvalidArgument(_)
                | Error::InvalidOperation(_)
                | Error::SchemaMismatch(_)
                | Error::TypeMismatch(_)
                | Error::SingularMatrix
                | Error::Parse { .. }
        )
    }

    /// Whether this error is a failed row or column lookup
    pub fn is_lookup(&self) -> bool {
        matches!(self, Error::FeatureNotFound(_) | Error::IndexOutOfBounds { .. })
    }
}
