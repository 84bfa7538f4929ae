//! Blocking YouTube Data API client.
//!
//! A `401` from the API is answered once by trading the stored refresh token
//! for a new access token and repeating the request.

use std::cell::RefCell;
use std::path::PathBuf;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tubemirror_core::{ItemPage, Playlist, PlaylistId, PlaylistSource, SourceError, VideoDuration};

use crate::api::{ChannelList, PlaylistItemList, PlaylistList, TokenResponse, VideoList};
use crate::auth::{self, Credentials, TOKEN_URL};

pub const API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// Items requested per `playlistItems.list` page.
pub const ITEMS_PER_PAGE: u32 = 10;

const PLAYLISTS_PER_PAGE: u32 = 50;
const TIMEOUT: Duration = Duration::from_secs(30);

const REAUTH_HINT: &str = "Add a refresh token to the credentials file, or run \
    `tubemirror init` again and answer anything but Y when asked to delete the \
    feeds; existing feeds are kept";

/// [`PlaylistSource`] backed by the YouTube Data API, authorised with a
/// bearer token.
pub struct YoutubeClient {
    agent: ureq::Agent,
    base_url: String,
    token_url: String,
    credentials: RefCell<Credentials>,
    save_refreshed_to: Option<PathBuf>,
}

impl YoutubeClient {
    pub fn new(credentials: Credentials) -> Self {
        Self::with_base_url(credentials, API_BASE)
    }

    /// Client against an alternative API root, e.g. a local stand-in.
    pub fn with_base_url(credentials: Credentials, base_url: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(TIMEOUT).build();
        Self {
            agent,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token_url: TOKEN_URL.to_string(),
            credentials: RefCell::new(credentials),
            save_refreshed_to: None,
        }
    }

    pub fn with_token_url(self, token_url: impl Into<String>) -> Self {
        Self {
            token_url: token_url.into(),
            ..self
        }
    }

    /// Write refreshed credentials back to `path`.
    pub fn persist_refreshed_to(self, path: impl Into<PathBuf>) -> Self {
        Self {
            save_refreshed_to: Some(path.into()),
            ..self
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn access_token(&self) -> String {
        self.credentials.borrow().access_token.clone()
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        resource: &str,
        query: &[(&str, &str)],
    ) -> Result<T, SourceError> {
        let url = format!("{}/{resource}", self.base_url);
        tracing::debug!("GET {url} {query:?}");

        let can_refresh = self.credentials.borrow().can_refresh();
        let response = match self.send(&url, query) {
            Err(ureq::Error::Status(401, _)) if can_refresh => {
                self.refresh_access_token()?;
                self.send(&url, query)
            }
            other => other,
        };
        let response = response.map_err(|e| match e {
            ureq::Error::Status(401, _) => SourceError::NotAuthenticated(format!(
                "{url} rejected the access token. {REAUTH_HINT}"
            )),
            other => request_error(&url, other),
        })?;
        response
            .into_json::<T>()
            .map_err(|source| SourceError::Decode { url, source })
    }

    fn send(&self, url: &str, query: &[(&str, &str)]) -> Result<ureq::Response, ureq::Error> {
        let bearer = format!("Bearer {}", self.credentials.borrow().access_token);
        let mut request = self
            .agent
            .get(url)
            .set("Authorization", &bearer)
            .set("Accept", "application/json");
        for (key, value) in query {
            request = request.query(key, value);
        }
        request.call()
    }

    fn refresh_access_token(&self) -> Result<(), SourceError> {
        let Some(grant) = self.credentials.borrow().refresh.clone() else {
            return Err(SourceError::NotAuthenticated(format!(
                "no refresh token stored. {REAUTH_HINT}"
            )));
        };
        tracing::info!("access token expired; refreshing it at {}", self.token_url);

        let response = self
            .agent
            .post(&self.token_url)
            .send_form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", grant.refresh_token.as_str()),
                ("client_id", grant.client_id.as_str()),
                ("client_secret", grant.client_secret.as_str()),
            ])
            .map_err(|e| match e {
                ureq::Error::Status(400 | 401, _) => SourceError::NotAuthenticated(format!(
                    "{} refused the refresh token. {REAUTH_HINT}",
                    self.token_url
                )),
                other => request_error(&self.token_url, other),
            })?;
        let token: TokenResponse = response.into_json().map_err(|source| SourceError::Decode {
            url: self.token_url.clone(),
            source,
        })?;

        self.credentials.borrow_mut().access_token = token.access_token;
        if let Some(path) = &self.save_refreshed_to {
            if let Err(e) = auth::save_at(path, &self.credentials.borrow()) {
                tracing::warn!("refreshed access token was not saved: {e}");
            }
        }
        Ok(())
    }
}

fn request_error(url: &str, error: ureq::Error) -> SourceError {
    match error {
        ureq::Error::Status(status, _) => SourceError::Status {
            url: url.to_string(),
            status,
        },
        ureq::Error::Transport(t) => SourceError::Transport {
            url: url.to_string(),
            message: t.to_string(),
        },
    }
}

impl PlaylistSource for YoutubeClient {
    fn playlists(&self) -> Result<Vec<Playlist>, SourceError> {
        let channels: ChannelList =
            self.get_json("channels", &[("part", "contentDetails"), ("mine", "true")])?;
        let mut playlists = Vec::new();
        match channels.favorites() {
            Some(favorites) => playlists.push(favorites),
            None => tracing::warn!("account has no favorites playlist"),
        }

        let per_page = PLAYLISTS_PER_PAGE.to_string();
        let mut page_token: Option<String> = None;
        loop {
            let mut query = vec![
                ("part", "id,snippet"),
                ("mine", "true"),
                ("maxResults", per_page.as_str()),
            ];
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }
            let list: PlaylistList = self.get_json("playlists", &query)?;
            page_token = list.next_page_token.clone().filter(|t| !t.is_empty());
            playlists.extend(list.into_playlists());
            if page_token.is_none() {
                break;
            }
        }
        Ok(playlists)
    }

    fn playlist_page(
        &self,
        playlist: &PlaylistId,
        page_token: Option<&str>,
    ) -> Result<ItemPage, SourceError> {
        let per_page = ITEMS_PER_PAGE.to_string();
        let mut query = vec![
            ("part", "snippet,contentDetails"),
            ("maxResults", per_page.as_str()),
            ("playlistId", playlist.0.as_str()),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }
        let list: PlaylistItemList = self.get_json("playlistItems", &query)?;
        Ok(list.into())
    }

    fn video_durations(&self, video_ids: &[String]) -> Result<Vec<VideoDuration>, SourceError> {
        if video_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids = video_ids.join(",");
        let list: VideoList =
            self.get_json("videos", &[("part", "contentDetails"), ("id", ids.as_str())])?;
        Ok(list.into_durations())
    }
}
