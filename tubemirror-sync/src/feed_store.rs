//! Per-playlist feed documents.
//!
//! Each playlist owns `<output>/data/<directory>/feed.json`, a pretty-printed
//! JSON array of [`Record`]s, newest first.
//!
//! Write flow: serialize → `feed.json.tmp` sibling → `rename`. The `.tmp` is
//! always in the same directory as the target, so the rename never crosses a
//! filesystem boundary.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tubemirror_core::{paths, Record};

use crate::error::{io_err, SyncError};

/// The local store rooted at an output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedStore {
    output: PathBuf,
}

impl FeedStore {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
        }
    }

    /// The output directory this store lives in.
    pub fn output_dir(&self) -> &Path {
        &self.output
    }

    pub fn feed_path(&self, directory: &str) -> PathBuf {
        paths::feed_path(&self.output, directory)
    }

    /// Load the records of one playlist.
    ///
    /// A playlist that was never persisted has an empty feed.
    pub fn load(&self, directory: &str) -> Result<Vec<Record>, SyncError> {
        let path = self.feed_path(directory);
        let Some(contents) = read_if_exists(&path)? else {
            return Ok(vec![]);
        };
        serde_json::from_str(&contents).map_err(|source| SyncError::Parse { path, source })
    }

    /// Replace the records of one playlist in a single atomic write.
    pub fn persist(&self, directory: &str, records: &[Record]) -> Result<(), SyncError> {
        let json = serde_json::to_string_pretty(records)?;
        write_atomic(&self.feed_path(directory), &json)
    }

    /// Directory names of every persisted playlist, sorted.
    ///
    /// Plain files under `data/` (such as the change-tag cache) are skipped.
    pub fn list_playlists(&self) -> Result<Vec<String>, SyncError> {
        let dir = paths::data_dir(&self.output);
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(vec![]),
            Err(err) => return Err(io_err(&dir, err)),
        };
        let mut names: Vec<String> = entries
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        Ok(names)
    }

    /// Delete every feed and the change-tag cache.
    ///
    /// Plugin output under `files/` is left alone.
    pub fn reset(&self) -> Result<(), SyncError> {
        let dir = paths::data_dir(&self.output);
        match std::fs::remove_dir_all(&dir) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(io_err(&dir, err)),
        }
    }
}

/// `new_newest_first ++ existing`.
///
/// No duplicate check: the sync engine's cursor filter already guarantees the
/// two sequences do not overlap.
pub fn merge_prepend(existing: Vec<Record>, new_newest_first: Vec<Record>) -> Vec<Record> {
    let mut merged = new_newest_first;
    merged.extend(existing);
    merged
}

/// Read `path`, or `None` if it does not exist. Any other failure is an error.
pub(crate) fn read_if_exists(path: &Path) -> Result<Option<String>, SyncError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(io_err(path, err)),
    }
}

/// Write `contents` to `<path>.tmp`, then rename over `path`.
pub(crate) fn write_atomic(path: &Path, contents: &str) -> Result<(), SyncError> {
    let Some(dir) = path.parent() else {
        return Err(io_err(path, std::io::Error::other("path has no parent")));
    };
    std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;

    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, contents).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tubemirror_core::{PlaylistItem, Status};

    fn record(id: &str, timestamp: i64) -> Record {
        Record::new(
            PlaylistItem {
                video_id: id.to_string(),
                title: format!("Video {id}"),
                description: String::new(),
                published: String::new(),
            },
            timestamp,
            0,
        )
    }

    fn ids(records: &[Record]) -> Vec<&str> {
        records.iter().map(Record::source_id).collect()
    }

    #[test]
    fn load_missing_feed_is_empty() {
        let tmp = TempDir::new().unwrap();
        let store = FeedStore::new(tmp.path());
        assert!(store.load("nothing-here").unwrap().is_empty());
    }

    #[test]
    fn persist_then_load_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let store = FeedStore::new(tmp.path());
        let records = vec![record("b", 20), record("a", 10).with_status(Status::Success)];

        store.persist("mix", &records).unwrap();
        assert_eq!(store.load("mix").unwrap(), records);
    }

    #[test]
    fn persist_writes_two_space_pretty_json() {
        let tmp = TempDir::new().unwrap();
        let store = FeedStore::new(tmp.path());
        store.persist("one", &[record("x", 1)]).unwrap();

        let disk = std::fs::read_to_string(store.feed_path("one")).unwrap();
        assert!(disk.starts_with("[\n  {\n    \"title\": \"Video x\","), "got: {disk}");
        assert!(disk.ends_with("}\n]"));
    }

    #[test]
    fn merge_prepend_puts_new_block_first() {
        let existing = vec![record("c", 30), record("d", 20)];
        let new = vec![record("a", 50), record("b", 40)];
        let merged = merge_prepend(existing, new);
        assert_eq!(ids(&merged), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn merge_prepend_with_empty_sides() {
        assert_eq!(ids(&merge_prepend(vec![], vec![record("a", 1)])), vec!["a"]);
        assert_eq!(ids(&merge_prepend(vec![record("a", 1)], vec![])), vec!["a"]);
    }

    #[test]
    fn list_playlists_is_sorted_and_skips_files() {
        let tmp = TempDir::new().unwrap();
        let store = FeedStore::new(tmp.path());
        store.persist("carrot", &[]).unwrap();
        store.persist("apple", &[]).unwrap();
        store.persist("banana", &[]).unwrap();
        std::fs::write(paths::tag_cache_path(tmp.path()), "{}").unwrap();

        assert_eq!(
            store.list_playlists().unwrap(),
            vec!["apple", "banana", "carrot"]
        );
    }

    #[test]
    fn list_playlists_without_data_dir_is_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(FeedStore::new(tmp.path().join("absent")).list_playlists().unwrap().is_empty());
    }

    #[test]
    fn reset_removes_feeds_and_keeps_files() {
        let tmp = TempDir::new().unwrap();
        let store = FeedStore::new(tmp.path());
        store.persist("apple", &[record("a", 1)]).unwrap();
        let files = paths::files_dir(tmp.path());
        std::fs::create_dir_all(&files).unwrap();
        std::fs::write(files.join("keep.mp3"), b"x").unwrap();

        store.reset().unwrap();
        assert!(store.list_playlists().unwrap().is_empty());
        assert!(files.join("keep.mp3").exists());
        store.reset().unwrap();
    }

    #[test]
    fn corrupt_feed_is_a_parse_error_with_path() {
        let tmp = TempDir::new().unwrap();
        let store = FeedStore::new(tmp.path());
        let path = store.feed_path("broken");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{ \"not\": \"a list\" }").unwrap();

        let err = store.load("broken").unwrap_err();
        assert!(matches!(err, SyncError::Parse { .. }), "got: {err}");
        assert!(err.to_string().contains("feed.json"));
    }

    #[test]
    #[cfg(unix)]
    fn unreadable_feed_is_fatal() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let store = FeedStore::new(tmp.path());
        store.persist("locked", &[record("a", 1)]).unwrap();
        let path = store.feed_path("locked");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o000)).unwrap();

        let result = store.load("locked");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();
        match result {
            // root ignores permission bits
            Ok(_) => {}
            Err(err) => assert!(matches!(err, SyncError::Io { .. }), "got: {err}"),
        }
    }
}
