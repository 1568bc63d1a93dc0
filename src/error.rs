//! Centralized error types for invoicedrop.

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the invoicedrop library.
#[derive(Error, Debug)]
pub enum DropError {
    /// I/O error with the associated file path.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// IMAP protocol or session error.
    #[error("IMAP error: {0}")]
    Imap(#[from] imap::Error),

    /// TLS connector setup failure.
    #[error("TLS error: {0}")]
    Tls(#[from] native_tls::Error),

    /// HTTP transport failure talking to the Drive API.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The Drive API answered with a non-success status.
    #[error("Drive API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The mail store returned something the protocol does not allow.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// A MIME parsing or decoding error.
    #[error("MIME error: {0}")]
    Mime(String),

    /// Invalid or incomplete configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required credential was not provided.
    #[error("Missing credential: set the {0} environment variable")]
    MissingCredential(&'static str),
}

/// Convenience alias for `Result<T, DropError>`.
pub type Result<T> = std::result::Result<T, DropError>;

impl DropError {
    /// Create an `Io` variant from a path and an `io::Error`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Allow `?` on `std::io::Error` inside functions returning `DropError`
/// when no path context is available (rare — prefer `DropError::io`).
impl From<std::io::Error> for DropError {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            path: PathBuf::from("<unknown>"),
            source,
        }
    }
}
