//! # tubemirror-sync
//!
//! Incremental playlist synchronisation into per-playlist feed documents.
//!
//! Call [`pipeline::synchronize`] to bring every local feed up to date, or
//! [`pipeline::initialize`] to rebuild the local store from scratch. The
//! per-playlist algorithm lives in [`engine`].

pub mod durations;
pub mod engine;
pub mod error;
pub mod feed_store;
pub mod pipeline;
pub mod tag_cache;

pub use engine::{
    sync_all, sync_playlist, PlaylistOutcome, PlaylistResult, SkipReason, SyncContext, SyncMode,
    SyncSummary,
};
pub use error::SyncError;
pub use feed_store::{merge_prepend, FeedStore};
pub use tag_cache::ChangeTagCache;
