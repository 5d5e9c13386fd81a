//! Error types for data readers

use thiserror::Error;

/// Error type for data readers
#[derive(Error, Debug)]
pub enum Error {
    /// Core library error
    #[error("Core error: {0}")]
    Core(#[from] pmll_core::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed header line
    #[error("Header error: {0}")]
    Header(String),
}

impl Error {
    /// Whether this error rejects the shape or content of the input
    pub fn is_validation(&self) -> bool {
        match self {
            Error::Core(err) => err.is_validation(),
            Error::Header(_) => true,
            Error::Io(_) => false,
        }
    }
}

/// Result type for data readers
pub type Result<T> = std::result::Result<T, Error>;
