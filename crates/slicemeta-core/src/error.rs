//! Error types for the slicemeta-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the slicemeta library.
#[derive(Error, Debug)]
pub enum SliceMetaError {
    /// The input file could not be opened.
    #[error("source unavailable: {}: {source}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Remote export error.
    #[error("export error: {0}")]
    Export(#[from] ExportError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while pushing a result to a remote record store.
#[derive(Error, Debug)]
pub enum ExportError {
    /// No credential was supplied at runtime.
    #[error("missing credential: set {0}")]
    MissingCredential(&'static str),

    /// The request could not be sent or the response could not be read.
    #[error("request failed: {0}")]
    Request(String),

    /// The remote store answered with a non-success status.
    #[error("remote store returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// Result type for the slicemeta library.
pub type Result<T> = std::result::Result<T, SliceMetaError>;
