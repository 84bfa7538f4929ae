//! Error types for tubemirror-youtube.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from loading, capturing or saving credentials.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No usable credentials at `path`; run `init` without `-a` first.
    #[error("not authenticated: no access token in {path}")]
    NotAuthenticated { path: PathBuf },

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The credentials file is not valid JSON of the expected shape.
    #[error("failed to parse credentials at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// JSON serialization error (save path).
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// The user entered an empty token.
    #[error("no access token entered")]
    EmptyToken,

    /// A refresh token was entered without the OAuth client that issued it.
    #[error("a refresh token needs the OAuth client id and secret that issued it")]
    IncompleteRefreshGrant,

    /// The platform has no configuration directory to default to.
    #[error("cannot determine configuration directory; pass --credentials")]
    ConfigDirNotFound,
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> AuthError {
    AuthError::Io {
        path: path.into(),
        source,
    }
}
