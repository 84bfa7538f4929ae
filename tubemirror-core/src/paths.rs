//! On-disk layout under an output directory.
//!
//! ```text
//! <output>/
//!   data/
//!     etags.json          (change-tag cache)
//!     favorites/
//!       feed.json
//!     <playlist-dir>/
//!       feed.json
//!   files/                (plugin output, named after record safenames)
//! ```

use std::path::{Path, PathBuf};

pub const DATA_DIR: &str = "data";
pub const FEED_FILE: &str = "feed.json";
pub const TAG_CACHE_FILE: &str = "etags.json";
pub const FILES_DIR: &str = "files";

pub fn data_dir(output: &Path) -> PathBuf {
    output.join(DATA_DIR)
}

pub fn feed_dir(output: &Path, directory: &str) -> PathBuf {
    data_dir(output).join(directory)
}

pub fn feed_path(output: &Path, directory: &str) -> PathBuf {
    feed_dir(output, directory).join(FEED_FILE)
}

pub fn tag_cache_path(output: &Path) -> PathBuf {
    data_dir(output).join(TAG_CACHE_FILE)
}

pub fn files_dir(output: &Path) -> PathBuf {
    output.join(FILES_DIR)
}
