//! Error types for tubemirror-sync.

use std::path::PathBuf;

use thiserror::Error;

use tubemirror_core::SourceError;

/// All errors that can arise from sync operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The remote source failed; the playlist in progress is abandoned.
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A feed or cache document exists but is not valid JSON of the expected shape.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// JSON serialization error (write path).
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// An item's publish time could not be turned into a timestamp.
    #[error("video {video_id} has unparseable publish time '{published}'")]
    Timestamp { video_id: String, published: String },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
