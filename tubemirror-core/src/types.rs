//! Domain types for playlists, remote listing pages and stored records.
//!
//! A [`Record`] is what lands in a playlist's `feed.json`. Its serialized
//! field names (`video_id`, `safename`, `url`, `length`) are the on-disk
//! format and must not change.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::naming;

/// Base of the canonical watch URL stored with every record.
pub const WATCH_URL_PREFIX: &str = "http://youtube.com/watch?v=";

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed remote playlist identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaylistId(pub String);

impl fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for PlaylistId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PlaylistId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// How a playlist orders its items at the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaylistKind {
    /// Favorites-style list, served newest-first.
    Aggregate,
    /// User-created playlist, served oldest-first.
    Named,
}

impl PlaylistKind {
    /// Whether the source already lists items newest-first.
    pub fn is_newest_first(self) -> bool {
        match self {
            PlaylistKind::Aggregate => true,
            PlaylistKind::Named => false,
        }
    }
}

impl fmt::Display for PlaylistKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaylistKind::Aggregate => write!(f, "aggregate"),
            PlaylistKind::Named => write!(f, "named"),
        }
    }
}

/// Outcome recorded by the plugin runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Failed,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Success => write!(f, "success"),
            Status::Failed => write!(f, "failed"),
        }
    }
}

// ---------------------------------------------------------------------------
// Remote listing
// ---------------------------------------------------------------------------

/// A playlist as enumerated from the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    pub id: PlaylistId,
    pub title: String,
    /// Directory name of the playlist's feed under `data/`.
    pub directory: String,
    pub kind: PlaylistKind,
}

impl Playlist {
    /// A playlist whose directory is derived from its title, or from its id
    /// when the title normalizes to nothing (e.g. `"()"`).
    pub fn new(id: impl Into<PlaylistId>, title: impl Into<String>, kind: PlaylistKind) -> Self {
        let id = id.into();
        let title = title.into();
        let mut directory = naming::normalize_name(&title);
        if directory.is_empty() {
            directory = naming::normalize_name(&id.0);
        }
        Self {
            id,
            directory,
            title,
            kind,
        }
    }

    /// The account's favorites list.
    pub fn favorites(id: impl Into<PlaylistId>) -> Self {
        Self {
            id: id.into(),
            title: "Favorites".to_string(),
            directory: "favorites".to_string(),
            kind: PlaylistKind::Aggregate,
        }
    }
}

/// One entry of a playlist page, as served by the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistItem {
    pub video_id: String,
    pub title: String,
    pub description: String,
    /// Source timestamp text, kept verbatim.
    pub published: String,
}

/// One page of a playlist listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemPage {
    /// Opaque change-tag of this page.
    pub etag: String,
    pub items: Vec<PlaylistItem>,
    pub next_page_token: Option<String>,
}

/// Raw duration text for one video, as returned by a duration lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoDuration {
    pub video_id: String,
    pub duration: String,
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// A stored playlist entry.
///
/// Built in one step by [`Record::new`]; the only later change is the plugin
/// outcome attached through [`Record::with_status`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    title: String,
    description: String,
    published: String,
    timestamp: i64,
    #[serde(rename = "video_id")]
    source_id: String,
    #[serde(rename = "safename")]
    safe_name: String,
    #[serde(rename = "url")]
    canonical_url: String,
    #[serde(rename = "length", default, deserialize_with = "zero_if_null")]
    duration_seconds: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status: Option<Status>,
}

impl Record {
    /// Build a record from a fetched item, its parsed timestamp and its
    /// resolved duration.
    pub fn new(item: PlaylistItem, timestamp: i64, duration_seconds: u64) -> Self {
        let safe_name = safe_name(&item.title, &item.video_id);
        let canonical_url = format!("{WATCH_URL_PREFIX}{}", item.video_id);
        Self {
            title: item.title,
            description: item.description,
            published: item.published,
            timestamp,
            source_id: item.video_id,
            safe_name,
            canonical_url,
            duration_seconds,
            status: None,
        }
    }

    /// The same record carrying a plugin outcome.
    pub fn with_status(self, status: Status) -> Self {
        Self {
            status: Some(status),
            ..self
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn published(&self) -> &str {
        &self.published
    }

    /// Seconds since the Unix epoch.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn safe_name(&self) -> &str {
        &self.safe_name
    }

    pub fn canonical_url(&self) -> &str {
        &self.canonical_url
    }

    pub fn duration_seconds(&self) -> u64 {
        self.duration_seconds
    }

    pub fn status(&self) -> Option<Status> {
        self.status
    }

    /// `true` until a plugin has recorded an outcome.
    pub fn is_pending(&self) -> bool {
        self.status.is_none()
    }
}

/// `normalize(title)-<video_id>`.
pub fn safe_name(title: &str, video_id: &str) -> String {
    format!("{}-{video_id}", naming::normalize_name(title))
}

/// Older feeds store `"length": null` for videos whose duration was never
/// resolved.
fn zero_if_null<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.unwrap_or(0))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
