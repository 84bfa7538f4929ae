//! Error types for tubemirror-core.

use thiserror::Error;

use crate::types::PlaylistId;

/// Errors raised by a [`crate::PlaylistSource`].
///
/// The sync engine never retries these; they abort the playlist in progress.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The source rejected or never received credentials.
    #[error("not authenticated: {0}")]
    NotAuthenticated(String),

    /// The request could not be delivered (DNS, TLS, connection reset, ...).
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// The remote answered with a non-success HTTP status.
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// The response body did not match the expected shape.
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: std::io::Error,
    },

    /// A page was requested for a playlist the source does not know.
    #[error("unknown playlist {0}")]
    UnknownPlaylist(PlaylistId),

    /// The source is temporarily unable to serve the request.
    #[error("source unavailable: {0}")]
    Unavailable(String),
}
