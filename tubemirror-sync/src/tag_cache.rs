//! Change-tag cache: per-playlist etags used to skip unchanged playlists.
//!
//! Persists a flat JSON object `{ "<playlist id>": "<etag>", ... }` at
//! `<output>/data/etags.json`. Writes use the same atomic `.tmp` + rename
//! pattern as feed documents.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use tubemirror_core::{paths, PlaylistId};

use crate::error::SyncError;
use crate::feed_store::{read_if_exists, write_atomic};

/// In-memory change-tag cache: playlist id → last observed first-page etag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeTagCache {
    tags: BTreeMap<PlaylistId, String>,
}

impl ChangeTagCache {
    pub fn get(&self, playlist: &PlaylistId) -> Option<&str> {
        self.tags.get(playlist).map(String::as_str)
    }

    /// Record `tag` for `playlist`. Returns `true` if the stored tag changed.
    pub fn set(&mut self, playlist: PlaylistId, tag: impl Into<String>) -> bool {
        let tag = tag.into();
        if self.tags.get(&playlist) == Some(&tag) {
            return false;
        }
        self.tags.insert(playlist, tag);
        true
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

/// Load the change-tag cache under `output`.
///
/// Returns an empty cache if the file does not yet exist.
pub fn load_at(output: &Path) -> Result<ChangeTagCache, SyncError> {
    let path = paths::tag_cache_path(output);
    let Some(contents) = read_if_exists(&path)? else {
        return Ok(ChangeTagCache::default());
    };
    serde_json::from_str(&contents).map_err(|source| SyncError::Parse { path, source })
}

/// Save the change-tag cache under `output` atomically.
pub fn save_at(output: &Path, cache: &ChangeTagCache) -> Result<(), SyncError> {
    let path = paths::tag_cache_path(output);
    let json = serde_json::to_string_pretty(cache)?;
    write_atomic(&path, &json)
}
