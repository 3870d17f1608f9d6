use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use crate::{
    config, log_api_result,
    spotify::{ApiError, SpotifyApi, TimeRange},
    types::{
        Artist, CurrentPlayback, CursorPaging, Paging, PlayHistory, SavedAlbum,
        SeveralArtistsResponse, Track,
    },
};

/// HTTP client for the Spotify Web API.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    client: Client,
    base_url: String,
}

impl SpotifyClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config() -> Self {
        Self::new(config::spotify_apiurl())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issues a GET request and decodes the JSON body.
    ///
    /// Returns `Ok(None)` for `204 No Content` and for an empty body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        token: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Option<T>, ApiError> {
        let api_url = format!("{uri}{path}", uri = self.base_url, path = path);
        tracing::debug!(url = %api_url, ?query, "GET");

        let response = self
            .client
            .get(&api_url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status { status, body });
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(None);
        }

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn get_required<T: DeserializeOwned>(
        &self,
        token: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        self.get_json(token, path, query)
            .await?
            .ok_or_else(|| ApiError::Decode(format!("empty response from {}", path)))
    }
}

impl SpotifyApi for SpotifyClient {
    async fn saved_albums(&self, token: &str, limit: u32) -> Result<Paging<SavedAlbum>, ApiError> {
        let res = self
            .get_required(token, "/me/albums", &[("limit", limit.to_string())])
            .await;
        log_api_result!("saved_albums", res);
        res
    }

    async fn recently_played(
        &self,
        token: &str,
        limit: u32,
    ) -> Result<CursorPaging<PlayHistory>, ApiError> {
        let res = self
            .get_required(
                token,
                "/me/player/recently-played",
                &[("limit", limit.to_string())],
            )
            .await;
        log_api_result!("recently_played", res);
        res
    }

    async fn top_tracks(
        &self,
        token: &str,
        limit: u32,
        time_range: TimeRange,
    ) -> Result<Paging<Track>, ApiError> {
        let res = self
            .get_required(
                token,
                "/me/top/tracks",
                &[
                    ("limit", limit.to_string()),
                    ("time_range", time_range.as_str().to_string()),
                ],
            )
            .await;
        log_api_result!("top_tracks", res);
        res
    }

    async fn current_playback(&self, token: &str) -> Result<Option<CurrentPlayback>, ApiError> {
        let res = self.get_json(token, "/me/player", &[]).await;
        log_api_result!("current_playback", res);
        res
    }

    async fn top_artists(&self, token: &str, limit: u32) -> Result<Paging<Artist>, ApiError> {
        let res = self
            .get_required(token, "/me/top/artists", &[("limit", limit.to_string())])
            .await;
        log_api_result!("top_artists", res);
        res
    }

    async fn artists(&self, token: &str, ids: &[String]) -> Result<Vec<Artist>, ApiError> {
        let res = self
            .get_required::<SeveralArtistsResponse>(token, "/artists", &[("ids", ids.join(","))])
            .await
            .map(|res| res.artists.into_iter().flatten().collect::<Vec<Artist>>());
        log_api_result!("artists", res);
        res
    }
}
