//! Shared sync entrypoints used by the CLI commands.

use std::path::Path;

use tubemirror_core::PlaylistSource;

use crate::engine::{sync_all, SyncContext, SyncMode, SyncSummary};
use crate::error::{io_err, SyncError};
use crate::feed_store::FeedStore;

/// Result of [`initialize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    /// The caller refused to discard existing data; nothing was touched.
    Declined,
    Initialized(SyncSummary),
}

/// Rebuild the local store from scratch.
///
/// If the output directory already exists, `confirm` is asked first; a `false`
/// answer leaves everything untouched. Otherwise the data directory is wiped
/// and every playlist is pulled in full.
pub fn initialize<S, F>(source: &S, store: &FeedStore, confirm: F) -> Result<InitOutcome, SyncError>
where
    S: PlaylistSource + ?Sized,
    F: FnOnce(&Path) -> std::io::Result<bool>,
{
    let output = store.output_dir();
    if output.is_dir() {
        let accepted = confirm(output).map_err(|e| io_err(output, e))?;
        if !accepted {
            tracing::info!("initialization of {} declined", output.display());
            return Ok(InitOutcome::Declined);
        }
        store.reset()?;
    }

    let mut ctx = SyncContext::load(store, SyncMode::Initialize)?;
    Ok(InitOutcome::Initialized(sync_all(source, &mut ctx)?))
}

/// Extend every local feed with what is new at the source.
pub fn synchronize<S>(source: &S, store: &FeedStore) -> Result<SyncSummary, SyncError>
where
    S: PlaylistSource + ?Sized,
{
    let mut ctx = SyncContext::load(store, SyncMode::Incremental)?;
    sync_all(source, &mut ctx)
}
