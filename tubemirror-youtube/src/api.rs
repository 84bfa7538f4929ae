//! Wire models for the YouTube Data API v3 responses the client reads, and
//! their mapping onto the source types.

use serde::Deserialize;
use tubemirror_core::{ItemPage, Playlist, PlaylistItem, PlaylistKind, VideoDuration};

// ---------------------------------------------------------------------------
// channels.list
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ChannelList {
    #[serde(default)]
    pub items: Vec<Channel>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub content_details: ChannelContentDetails,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelContentDetails {
    pub related_playlists: RelatedPlaylists,
}

#[derive(Debug, Deserialize)]
pub struct RelatedPlaylists {
    pub favorites: Option<String>,
}

impl ChannelList {
    /// The favorites playlist of the first channel, if the account has one.
    pub fn favorites(&self) -> Option<Playlist> {
        self.items
            .first()
            .and_then(|c| c.content_details.related_playlists.favorites.as_deref())
            .filter(|id| !id.is_empty())
            .map(Playlist::favorites)
    }
}

// ---------------------------------------------------------------------------
// playlists.list
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistList {
    #[serde(default)]
    pub items: Vec<PlaylistResource>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PlaylistResource {
    pub id: String,
    pub snippet: PlaylistSnippet,
}

#[derive(Debug, Deserialize)]
pub struct PlaylistSnippet {
    pub title: String,
}

impl PlaylistList {
    pub fn into_playlists(self) -> Vec<Playlist> {
        self.items
            .into_iter()
            .map(|p| Playlist::new(p.id, p.snippet.title, PlaylistKind::Named))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// playlistItems.list
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemList {
    pub etag: String,
    #[serde(default)]
    pub items: Vec<PlaylistItemResource>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemResource {
    pub snippet: ItemSnippet,
    pub content_details: ItemContentDetails,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSnippet {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub published_at: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemContentDetails {
    pub video_id: String,
}

impl From<PlaylistItemList> for ItemPage {
    fn from(list: PlaylistItemList) -> Self {
        let items = list
            .items
            .into_iter()
            .map(|item| PlaylistItem {
                video_id: item.content_details.video_id,
                title: item.snippet.title,
                description: item.snippet.description,
                published: item.snippet.published_at,
            })
            .collect();
        ItemPage {
            etag: list.etag,
            items,
            next_page_token: list.next_page_token.filter(|t| !t.is_empty()),
        }
    }
}

// ---------------------------------------------------------------------------
// videos.list
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct VideoList {
    #[serde(default)]
    pub items: Vec<VideoResource>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoResource {
    pub id: String,
    pub content_details: VideoContentDetails,
}

#[derive(Debug, Deserialize)]
pub struct VideoContentDetails {
    #[serde(default)]
    pub duration: String,
}

impl VideoList {
    pub fn into_durations(self) -> Vec<VideoDuration> {
        self.items
            .into_iter()
            .map(|v| VideoDuration {
                video_id: v.id,
                duration: v.content_details.duration,
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// OAuth token endpoint
// ---------------------------------------------------------------------------

/// Response to a `grant_type=refresh_token` request.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_list_yields_favorites() {
        let json = r#"{
            "kind": "youtube#channelListResponse",
            "items": [{
                "id": "UC1",
                "contentDetails": {
                    "relatedPlaylists": { "favorites": "FLabc", "uploads": "UUabc" }
                }
            }]
        }"#;
        let list: ChannelList = serde_json::from_str(json).unwrap();
        let favorites = list.favorites().expect("favorites");
        assert_eq!(favorites.id.0, "FLabc");
        assert_eq!(favorites.directory, "favorites");
        assert_eq!(favorites.kind, PlaylistKind::Aggregate);
    }

    #[test]
    fn channel_without_favorites() {
        let json = r#"{ "items": [{ "contentDetails": { "relatedPlaylists": { "uploads": "UU1" } } }] }"#;
        let list: ChannelList = serde_json::from_str(json).unwrap();
        assert_eq!(list.favorites(), None);

        let empty: ChannelList = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.favorites(), None);
    }

    #[test]
    fn playlist_list_maps_to_named_playlists() {
        let json = r#"{
            "nextPageToken": "CAUQAA",
            "items": [
                { "id": "PL1", "snippet": { "title": "Road Trip: 2014" } },
                { "id": "PL2", "snippet": { "title": "Cooking" } }
            ]
        }"#;
        let list: PlaylistList = serde_json::from_str(json).unwrap();
        assert_eq!(list.next_page_token.as_deref(), Some("CAUQAA"));
        let playlists = list.into_playlists();
        assert_eq!(playlists.len(), 2);
        assert_eq!(playlists[0].directory, "road-trip--2014");
        assert!(playlists.iter().all(|p| p.kind == PlaylistKind::Named));
    }

    #[test]
    fn playlist_item_list_maps_to_page() {
        let json = r#"{
            "etag": "\"abc/def\"",
            "items": [{
                "snippet": {
                    "title": "Apple Video",
                    "description": "an apple",
                    "publishedAt": "2009-02-13T23:31:30.000Z"
                },
                "contentDetails": { "videoId": "vA_" }
            }]
        }"#;
        let list: PlaylistItemList = serde_json::from_str(json).unwrap();
        let page = ItemPage::from(list);
        assert_eq!(page.etag, "\"abc/def\"");
        assert_eq!(page.next_page_token, None);
        assert_eq!(
            page.items,
            vec![PlaylistItem {
                video_id: "vA_".to_string(),
                title: "Apple Video".to_string(),
                description: "an apple".to_string(),
                published: "2009-02-13T23:31:30.000Z".to_string(),
            }]
        );
    }

    #[test]
    fn empty_next_page_token_ends_pagination() {
        let json = r#"{ "etag": "e", "items": [], "nextPageToken": "" }"#;
        let list: PlaylistItemList = serde_json::from_str(json).unwrap();
        assert_eq!(ItemPage::from(list).next_page_token, None);
    }

    #[test]
    fn video_list_maps_to_durations() {
        let json = r#"{
            "items": [
                { "id": "v1", "contentDetails": { "duration": "PT4M13S" } },
                { "id": "v2", "contentDetails": {} }
            ]
        }"#;
        let list: VideoList = serde_json::from_str(json).unwrap();
        let durations = list.into_durations();
        assert_eq!(durations[0].duration, "PT4M13S");
        assert_eq!(durations[1].video_id, "v2");
        assert_eq!(durations[1].duration, "");
    }

    #[test]
    fn token_response_ignores_extra_fields() {
        let json = r#"{
            "access_token": "ya29.fresh",
            "expires_in": 3599,
            "scope": "https://www.googleapis.com/auth/youtube.readonly",
            "token_type": "Bearer"
        }"#;
        let token: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(token.access_token, "ya29.fresh");
        assert_eq!(token.expires_in, Some(3599));
    }
}
