//! Incremental playlist sync.
//!
//! ## Per-playlist protocol
//!
//! 1. Fetch page 1. If its etag equals the cached tag, stop: nothing changed.
//! 2. Parse each item's publish time, remembering the last one seen in the
//!    source's native order.
//! 3. With a cursor (newest local timestamp), keep only newer items;
//!    without one, keep everything.
//! 4. Fetch the next page while a token exists and either the playlist is
//!    served oldest-first, there is no cursor, or the last seen item is still
//!    newer than the cursor.
//! 5. Reverse oldest-first playlists so the kept block is newest-first.
//! 6. Resolve durations in batches and build the records.
//! 7. Prepend the block to the local feed and persist it.
//! 8. Commit page 1's etag to the change-tag cache and save the cache.
//!
//! The tag is committed last so that a failure anywhere in steps 2–7 leaves
//! the old tag in place and the next run retries the playlist.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use tubemirror_core::{
    naming, Playlist, PlaylistId, PlaylistItem, PlaylistKind, PlaylistSource, Record,
};

use crate::durations::resolve_durations;
use crate::error::SyncError;
use crate::feed_store::{merge_prepend, FeedStore};
use crate::tag_cache::{self, ChangeTagCache};

// ---------------------------------------------------------------------------
// Run context
// ---------------------------------------------------------------------------

/// Whether local feeds are extended or rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Ignore local feeds and cached tags; pull everything.
    Initialize,
    /// Extend local feeds with whatever is newer.
    Incremental,
}

/// State for one sync run: the store being written and the change-tag cache.
///
/// Owned by the caller and threaded through every playlist of the run.
#[derive(Debug)]
pub struct SyncContext<'a> {
    store: &'a FeedStore,
    tags: ChangeTagCache,
    mode: SyncMode,
}

impl<'a> SyncContext<'a> {
    /// Start a run against `store`. Incremental runs load the persisted
    /// change-tag cache; initialising runs start from an empty one.
    pub fn load(store: &'a FeedStore, mode: SyncMode) -> Result<Self, SyncError> {
        let tags = match mode {
            SyncMode::Initialize => ChangeTagCache::default(),
            SyncMode::Incremental => tag_cache::load_at(store.output_dir())?,
        };
        Ok(Self { store, tags, mode })
    }

    pub fn store(&self) -> &FeedStore {
        self.store
    }

    pub fn tags(&self) -> &ChangeTagCache {
        &self.tags
    }

    pub fn mode(&self) -> SyncMode {
        self.mode
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// What happened to one playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaylistOutcome {
    /// The first page's etag matched the cache; nothing was fetched beyond it.
    Unchanged,
    /// Pages were fetched but nothing was newer than the local feed.
    NoNewItems { existing: usize },
    /// `added` records were prepended to a feed of `previous` records.
    Added { added: usize, previous: usize },
    /// Not synced this run; neither the feed nor the tag was touched.
    Skipped { reason: SkipReason },
}

/// Why a playlist was left out of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The playlist's feed directory is shared with `others`.
    DirectoryCollision {
        directory: String,
        others: Vec<PlaylistId>,
    },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::DirectoryCollision { directory, others } => {
                let others: Vec<String> = others.iter().map(ToString::to_string).collect();
                write!(
                    f,
                    "directory '{directory}' is also claimed by {}",
                    others.join(", ")
                )
            }
        }
    }
}

/// Outcome of syncing a single playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistResult {
    pub playlist: Playlist,
    pub outcome: PlaylistOutcome,
}

impl PlaylistResult {
    /// Number of records added to the local feed.
    pub fn added(&self) -> usize {
        match self.outcome {
            PlaylistOutcome::Added { added, .. } => added,
            PlaylistOutcome::Unchanged
            | PlaylistOutcome::NoNewItems { .. }
            | PlaylistOutcome::Skipped { .. } => 0,
        }
    }
}

/// Outcome of a whole run, one entry per playlist in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub playlists: Vec<PlaylistResult>,
}

impl SyncSummary {
    /// Total records added across all playlists.
    pub fn added(&self) -> usize {
        self.playlists.iter().map(PlaylistResult::added).sum()
    }

    /// Playlists skipped because their etag was unchanged.
    pub fn unchanged(&self) -> usize {
        self.playlists
            .iter()
            .filter(|r| r.outcome == PlaylistOutcome::Unchanged)
            .count()
    }

    /// Playlists left out of the run, with the reason.
    pub fn skipped(&self) -> impl Iterator<Item = (&Playlist, &SkipReason)> {
        self.playlists.iter().filter_map(|r| match &r.outcome {
            PlaylistOutcome::Skipped { reason } => Some((&r.playlist, reason)),
            _ => None,
        })
    }
}

// ---------------------------------------------------------------------------
// Fetch
// ---------------------------------------------------------------------------

/// A kept item together with its parsed publish time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FetchedItem {
    pub(crate) item: PlaylistItem,
    pub(crate) timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Fetch {
    Unchanged,
    /// `items` are newest-first; `etag` is the first page's tag.
    Fetched { etag: String, items: Vec<FetchedItem> },
}

/// Whether another page may still hold items newer than `cursor`.
fn wants_next_page(kind: PlaylistKind, cursor: Option<i64>, last_seen: Option<i64>) -> bool {
    match (kind, cursor) {
        // Oldest-first: the newest items are on the last page.
        (PlaylistKind::Named, _) => true,
        (PlaylistKind::Aggregate, None) => true,
        (PlaylistKind::Aggregate, Some(min)) => last_seen.is_some_and(|t| t > min),
    }
}

/// Fetch the items of `playlist` newer than `cursor`, newest-first.
pub(crate) fn fetch_new_items<S>(
    source: &S,
    playlist: &Playlist,
    cursor: Option<i64>,
    cached_tag: Option<&str>,
) -> Result<Fetch, SyncError>
where
    S: PlaylistSource + ?Sized,
{
    let mut page = source.playlist_page(&playlist.id, None)?;
    if cached_tag == Some(page.etag.as_str()) {
        return Ok(Fetch::Unchanged);
    }
    let etag = page.etag.clone();

    let mut kept = Vec::new();
    let mut last_seen = None;
    loop {
        for item in page.items {
            let timestamp =
                naming::parse_published(&item.published).ok_or_else(|| SyncError::Timestamp {
                    video_id: item.video_id.clone(),
                    published: item.published.clone(),
                })?;
            last_seen = Some(timestamp);
            if cursor.map_or(true, |min| timestamp > min) {
                kept.push(FetchedItem { item, timestamp });
            }
        }

        let token = match page.next_page_token {
            Some(token) if wants_next_page(playlist.kind, cursor, last_seen) => token,
            _ => break,
        };
        page = source.playlist_page(&playlist.id, Some(&token))?;
    }

    match playlist.kind {
        PlaylistKind::Named => kept.reverse(),
        PlaylistKind::Aggregate => {}
    }
    Ok(Fetch::Fetched { etag, items: kept })
}

// ---------------------------------------------------------------------------
// sync_playlist / sync_all
// ---------------------------------------------------------------------------

/// Bring one playlist's local feed up to date.
pub fn sync_playlist<S>(
    source: &S,
    ctx: &mut SyncContext<'_>,
    playlist: &Playlist,
) -> Result<PlaylistResult, SyncError>
where
    S: PlaylistSource + ?Sized,
{
    let existing = match ctx.mode {
        SyncMode::Initialize => Vec::new(),
        SyncMode::Incremental => ctx.store.load(&playlist.directory)?,
    };
    let cursor = existing.first().map(Record::timestamp);

    tracing::info!("Getting playlist \"{}\"", playlist.title);
    let fetched = fetch_new_items(source, playlist, cursor, ctx.tags.get(&playlist.id))?;
    let (etag, items) = match fetched {
        Fetch::Unchanged => {
            tracing::info!("No changes to \"{}\"", playlist.title);
            return Ok(PlaylistResult {
                playlist: playlist.clone(),
                outcome: PlaylistOutcome::Unchanged,
            });
        }
        Fetch::Fetched { etag, items } => (etag, items),
    };

    let outcome = if items.is_empty() {
        tracing::info!(
            "No new elements for \"{}\", has {} elements",
            playlist.title,
            existing.len()
        );
        PlaylistOutcome::NoNewItems {
            existing: existing.len(),
        }
    } else {
        let records = build_records(source, items)?;
        tracing::info!(
            "Adding {} elements to \"{}\", had {} elements",
            records.len(),
            playlist.title,
            existing.len()
        );
        let added = records.len();
        let previous = existing.len();
        ctx.store
            .persist(&playlist.directory, &merge_prepend(existing, records))?;
        PlaylistOutcome::Added { added, previous }
    };

    if ctx.tags.set(playlist.id.clone(), etag) {
        tag_cache::save_at(ctx.store.output_dir(), &ctx.tags)?;
    }

    Ok(PlaylistResult {
        playlist: playlist.clone(),
        outcome,
    })
}

fn build_records<S>(source: &S, items: Vec<FetchedItem>) -> Result<Vec<Record>, SyncError>
where
    S: PlaylistSource + ?Sized,
{
    let ids: Vec<String> = items.iter().map(|f| f.item.video_id.clone()).collect();
    let durations = resolve_durations(source, &ids)?;
    Ok(items
        .into_iter()
        .map(|f| {
            let seconds = durations.get(&f.item.video_id).copied().unwrap_or(0);
            Record::new(f.item, f.timestamp, seconds)
        })
        .collect())
}

/// Sync every playlist the source lists, in source order.
///
/// Playlists whose feed directories collide are skipped and reported in the
/// summary; the rest are synced. Stops at the first error; playlists already
/// synced stay committed.
pub fn sync_all<S>(source: &S, ctx: &mut SyncContext<'_>) -> Result<SyncSummary, SyncError>
where
    S: PlaylistSource + ?Sized,
{
    let playlists = source.playlists()?;
    let mut collisions = directory_collisions(&playlists);

    let mut summary = SyncSummary::default();
    for playlist in &playlists {
        let result = match collisions.remove(&playlist.id) {
            Some(reason) => {
                tracing::warn!("Skipping playlist \"{}\": {reason}", playlist.title);
                PlaylistResult {
                    playlist: playlist.clone(),
                    outcome: PlaylistOutcome::Skipped { reason },
                }
            }
            None => sync_playlist(source, ctx, playlist)?,
        };
        summary.playlists.push(result);
    }
    Ok(summary)
}

/// Every playlist that shares its feed directory with another one.
fn directory_collisions(playlists: &[Playlist]) -> HashMap<PlaylistId, SkipReason> {
    let mut by_directory: BTreeMap<&str, Vec<&PlaylistId>> = BTreeMap::new();
    for playlist in playlists {
        by_directory
            .entry(playlist.directory.as_str())
            .or_default()
            .push(&playlist.id);
    }

    let mut collisions = HashMap::new();
    for (directory, ids) in by_directory.into_iter().filter(|(_, ids)| ids.len() > 1) {
        for id in &ids {
            let others = ids
                .iter()
                .filter(|other| *other != id)
                .map(|other| (*other).clone())
                .collect();
            collisions.insert(
                (*id).clone(),
                SkipReason::DirectoryCollision {
                    directory: directory.to_string(),
                    others,
                },
            );
        }
    }
    collisions
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
