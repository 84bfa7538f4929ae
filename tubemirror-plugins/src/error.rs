//! Error types for tubemirror-plugins.

use std::path::PathBuf;

use thiserror::Error;
use tubemirror_sync::SyncError;

#[derive(Debug, Error)]
pub enum PluginError {
    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The plugin configuration document could not be parsed.
    #[error("failed to parse plugin config at {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Reading or writing a feed failed.
    #[error(transparent)]
    Store(#[from] SyncError),
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> PluginError {
    PluginError::Io {
        path: path.into(),
        source,
    }
}
