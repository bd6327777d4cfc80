//! YouTube Data API v3 client.
//!
//! Pages through the `playlistItems` endpoint and hands the core a complete,
//! already-paginated video sequence. All transport details stay in here; the
//! snapshot builder only ever sees `Vec<Video>` or an opaque error.

pub mod auth;

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::error::ClientError;
use crate::store::Video;
use auth::Authenticator;

const PLAYLIST_ITEMS_URL: &str = "https://www.googleapis.com/youtube/v3/playlistItems";

// API maximum per page
const PAGE_SIZE: &str = "50";

pub struct PlaylistClient {
    http: Client,
    auth: Authenticator,
}

#[derive(Deserialize)]
struct PlaylistItemsPage {
    #[serde(default)]
    items: Vec<PlaylistItem>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
struct PlaylistItem {
    snippet: Snippet,
    #[serde(rename = "contentDetails")]
    content_details: ContentDetails,
}

#[derive(Deserialize)]
struct Snippet {
    title: String,
}

#[derive(Deserialize)]
struct ContentDetails {
    #[serde(rename = "videoId")]
    video_id: String,
}

impl PlaylistClient {
    pub fn new(auth: Authenticator) -> Self {
        PlaylistClient {
            http: Client::new(),
            auth,
        }
    }

    /// Fetch the full current membership of `playlist_id`, following
    /// continuation pages until none remain and concatenating results in
    /// server-returned order.
    pub fn fetch_playlist_items(&self, playlist_id: &str) -> Result<Vec<Video>, ClientError> {
        let access_token = self.auth.access_token()?;

        let mut videos = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .http
                .get(PLAYLIST_ITEMS_URL)
                .bearer_auth(&access_token)
                .query(&[
                    ("part", "snippet,contentDetails"),
                    ("maxResults", PAGE_SIZE),
                    ("playlistId", playlist_id),
                ]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let response = request.send()?;
            if !response.status().is_success() {
                return Err(ClientError::Api {
                    status: response.status().as_u16(),
                    body: response.text().unwrap_or_default(),
                });
            }

            let page: PlaylistItemsPage = response.json()?;
            videos.extend(page.items.into_iter().map(|item| Video {
                id: item.content_details.video_id,
                title: item.snippet.title,
            }));

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(videos)
    }
}
