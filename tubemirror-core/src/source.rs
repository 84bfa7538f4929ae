//! The remote source seam.
//!
//! [`PlaylistSource`] is everything the sync engine needs from the remote
//! service. With the `testing` feature, [`MemorySource`] serves canned pages
//! from memory and records every request it receives, so the engine's fetch
//! decisions can be observed.

use crate::error::SourceError;
use crate::types::{ItemPage, Playlist, PlaylistId, VideoDuration};

#[cfg(any(test, feature = "testing"))]
pub use memory::{MemorySource, SourceRequest};

/// A paginated listing service exposing playlists, their items and video
/// durations.
pub trait PlaylistSource {
    /// Every playlist of the account, each tagged with its [`crate::PlaylistKind`].
    fn playlists(&self) -> Result<Vec<Playlist>, SourceError>;

    /// One page of a playlist. `page_token` is `None` for the first page.
    fn playlist_page(
        &self,
        playlist: &PlaylistId,
        page_token: Option<&str>,
    ) -> Result<ItemPage, SourceError>;

    /// Duration text for the given videos. Unknown ids are simply absent from
    /// the result.
    fn video_durations(&self, video_ids: &[String]) -> Result<Vec<VideoDuration>, SourceError>;
}

impl<S: PlaylistSource + ?Sized> PlaylistSource for &S {
    fn playlists(&self) -> Result<Vec<Playlist>, SourceError> {
        (**self).playlists()
    }

    fn playlist_page(
        &self,
        playlist: &PlaylistId,
        page_token: Option<&str>,
    ) -> Result<ItemPage, SourceError> {
        (**self).playlist_page(playlist, page_token)
    }

    fn video_durations(&self, video_ids: &[String]) -> Result<Vec<VideoDuration>, SourceError> {
        (**self).video_durations(video_ids)
    }
}

// ---------------------------------------------------------------------------
// MemorySource
// ---------------------------------------------------------------------------

#[cfg(any(test, feature = "testing"))]
mod memory {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::PlaylistSource;
    use crate::error::SourceError;
    use crate::types::{ItemPage, Playlist, PlaylistId, PlaylistItem, VideoDuration};

    /// A request observed by [`MemorySource`].
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum SourceRequest {
        Playlists,
        Page { playlist: PlaylistId, index: usize },
        Durations { video_ids: Vec<String> },
    }

    #[derive(Debug, Clone)]
    struct MemoryPage {
        etag: String,
        items: Vec<PlaylistItem>,
    }

    /// In-memory [`PlaylistSource`].
    ///
    /// Page tokens are page indices rendered as strings. A playlist registered
    /// with no pages serves a single empty page.
    #[derive(Debug, Default)]
    pub struct MemorySource {
        playlists: Vec<Playlist>,
        pages: HashMap<PlaylistId, Vec<MemoryPage>>,
        durations: HashMap<String, String>,
        failing_pages: HashMap<PlaylistId, usize>,
        requests: RefCell<Vec<SourceRequest>>,
    }

    impl MemorySource {
        pub fn new() -> Self {
            Self::default()
        }

        /// Register a playlist served as the given `(etag, items)` pages.
        pub fn with_playlist(mut self, playlist: Playlist, pages: Vec<(&str, Vec<PlaylistItem>)>) -> Self {
            self.set_pages(&playlist.id, pages);
            self.playlists.push(playlist);
            self
        }

        /// Register the duration text returned for `video_id`.
        pub fn with_duration(mut self, video_id: &str, duration: &str) -> Self {
            self.durations
                .insert(video_id.to_string(), duration.to_string());
            self
        }

        /// Replace the pages of an already registered playlist.
        pub fn set_pages(&mut self, playlist: &PlaylistId, pages: Vec<(&str, Vec<PlaylistItem>)>) {
            let pages = pages
                .into_iter()
                .map(|(etag, items)| MemoryPage {
                    etag: etag.to_string(),
                    items,
                })
                .collect();
            self.pages.insert(playlist.clone(), pages);
        }

        /// Make the request for page `index` of `playlist` fail.
        pub fn fail_on_page(&mut self, playlist: &PlaylistId, index: usize) {
            self.failing_pages.insert(playlist.clone(), index);
        }

        /// Stop failing requests for `playlist`.
        pub fn clear_failure(&mut self, playlist: &PlaylistId) {
            self.failing_pages.remove(playlist);
        }

        /// Every request received so far, oldest first.
        pub fn requests(&self) -> Vec<SourceRequest> {
            self.requests.borrow().clone()
        }

        /// Page requests received for `playlist`, as page indices.
        pub fn page_requests(&self, playlist: &PlaylistId) -> Vec<usize> {
            self.requests
                .borrow()
                .iter()
                .filter_map(|r| match r {
                    SourceRequest::Page { playlist: p, index } if p == playlist => Some(*index),
                    _ => None,
                })
                .collect()
        }

        pub fn clear_requests(&self) {
            self.requests.borrow_mut().clear();
        }

        fn record(&self, request: SourceRequest) {
            self.requests.borrow_mut().push(request);
        }
    }

    impl PlaylistSource for MemorySource {
        fn playlists(&self) -> Result<Vec<Playlist>, SourceError> {
            self.record(SourceRequest::Playlists);
            Ok(self.playlists.clone())
        }

        fn playlist_page(
            &self,
            playlist: &PlaylistId,
            page_token: Option<&str>,
        ) -> Result<ItemPage, SourceError> {
            let index = match page_token {
                None => 0,
                Some(token) => token
                    .parse::<usize>()
                    .map_err(|_| SourceError::Unavailable(format!("bad page token '{token}'")))?,
            };
            self.record(SourceRequest::Page {
                playlist: playlist.clone(),
                index,
            });

            if self.failing_pages.get(playlist) == Some(&index) {
                return Err(SourceError::Unavailable(format!(
                    "page {index} of {playlist} failed"
                )));
            }

            let pages = self
                .pages
                .get(playlist)
                .ok_or_else(|| SourceError::UnknownPlaylist(playlist.clone()))?;
            if pages.is_empty() && index == 0 {
                return Ok(ItemPage {
                    etag: String::new(),
                    items: vec![],
                    next_page_token: None,
                });
            }
            let page = pages.get(index).ok_or_else(|| {
                SourceError::Unavailable(format!("page {index} of {playlist} does not exist"))
            })?;
            let next_page_token = (index + 1 < pages.len()).then(|| (index + 1).to_string());
            Ok(ItemPage {
                etag: page.etag.clone(),
                items: page.items.clone(),
                next_page_token,
            })
        }

        fn video_durations(&self, video_ids: &[String]) -> Result<Vec<VideoDuration>, SourceError> {
            self.record(SourceRequest::Durations {
                video_ids: video_ids.to_vec(),
            });
            Ok(video_ids
                .iter()
                .filter_map(|id| {
                    self.durations.get(id).map(|duration| VideoDuration {
                        video_id: id.clone(),
                        duration: duration.clone(),
                    })
                })
                .collect())
        }
    }
}
