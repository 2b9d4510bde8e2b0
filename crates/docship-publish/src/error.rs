//! Publish error types.

use std::path::PathBuf;

/// Error from a single file transfer attempt.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    /// HTTP request error.
    #[error("HTTP error: {status} - {body}")]
    Http { status: u16, body: String },

    /// IO error reading the local file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error from publishing the site tree.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// The local site tree could not be enumerated.
    #[error("failed to read site directory {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Fewer files were delivered for a directory batch than were submitted.
    #[error(
        "upload verification failed for '{directory}': {uploaded} of {expected} files delivered"
    )]
    VerificationFailed {
        directory: String,
        expected: usize,
        uploaded: usize,
    },
}
