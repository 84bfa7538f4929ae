//! tubemirror core library: domain types, naming rules, the remote source
//! seam and the on-disk layout.
//!
//! Public API surface:
//! - [`types`]: playlists, remote items and the stored [`Record`]
//! - [`naming`]: name normalisation, duration grammar, publish timestamps
//! - [`source`]: the [`PlaylistSource`] trait, plus an in-memory implementation
//!   behind the `testing` feature
//! - [`paths`]: where feeds, the change-tag cache and plugin output live
//! - [`error`]: [`SourceError`]

pub mod error;
pub mod naming;
pub mod paths;
pub mod source;
pub mod types;

pub use error::SourceError;
pub use source::PlaylistSource;
#[cfg(any(test, feature = "testing"))]
pub use source::{MemorySource, SourceRequest};
pub use types::{
    ItemPage, Playlist, PlaylistId, PlaylistItem, PlaylistKind, Record, Status, VideoDuration,
};
