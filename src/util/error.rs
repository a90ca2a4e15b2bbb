//! Error types for the Quarry library.

use thiserror::Error;

/// Main error type for extraction operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The source result database could not be read or iterated.
    /// Always fatal: a partially read source graph cannot be safely
    /// partially extracted.
    #[error("source model fault: {0}")]
    Source(String),

    /// The output store rejected an operation (path exists, parent
    /// missing, backend failure). Always fatal.
    #[error("store fault at {path}: {message}")]
    Store { path: String, message: String },

    /// A link target does not exist in the store.
    #[error("link target not found: {0}")]
    LinkTargetNotFound(String),

    /// An output format that is declared but has no backend.
    #[error("output format not implemented: {0}")]
    UnsupportedFormat(String),

    /// A bulk-data block whose buffer sizes are mutually inconsistent.
    #[error("invalid bulk data block: {0}")]
    InvalidBlock(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a source-access fault from a message.
    pub fn source(msg: impl Into<String>) -> Self {
        Self::Source(msg.into())
    }

    /// Create a store fault for a path.
    pub fn store(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Store { path: path.into(), message: message.into() }
    }

    /// Create an invalid-block error.
    pub fn invalid_block(msg: impl Into<String>) -> Self {
        Self::InvalidBlock(msg.into())
    }

    /// Create an "other" error from a string.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;
