#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use chrono::{TimeZone, Utc};
use reqwest::StatusCode;
use spotdash::{
    Res,
    dashboard::Endpoint,
    management::{Authorizer, TokenStore},
    spotify::{
        ApiError, SpotifyApi, TimeRange,
        auth::{CallbackOutcome, CallbackReceiver},
    },
    types::{
        Artist, CurrentPlayback, CursorPaging, ExternalUrls, Image, Paging, PlayHistory,
        SavedAlbum, SimplifiedAlbum, SimplifiedArtist, StoredToken, Track,
    },
};

pub const AUTHORIZE_URL: &str = "https://accounts.example.com/authorize?response_type=token";

// Builders

pub fn simple_artist(id: Option<&str>, name: &str) -> SimplifiedArtist {
    SimplifiedArtist {
        id: id.map(str::to_string),
        name: name.to_string(),
        uri: id.map(|id| format!("spotify:artist:{}", id)),
    }
}

pub fn artist(id: &str) -> Artist {
    Artist {
        id: id.to_string(),
        name: format!("Artist {}", id),
        uri: format!("spotify:artist:{}", id),
        images: vec![Image {
            url: format!("https://img.example.com/{}.jpg", id),
            height: Some(640),
            width: Some(640),
        }],
        genres: vec!["indie".to_string()],
        external_urls: ExternalUrls {
            spotify: Some(format!("https://open.spotify.com/artist/{}", id)),
        },
    }
}

pub fn album(name: &str, artist_id: Option<&str>) -> SimplifiedAlbum {
    SimplifiedAlbum {
        id: Some(format!("{}-id", name)),
        name: name.to_string(),
        uri: Some(format!("spotify:album:{}", name)),
        images: vec![],
        artists: vec![simple_artist(artist_id, "Someone")],
    }
}

pub fn saved_album(name: &str, artist_id: Option<&str>) -> SavedAlbum {
    SavedAlbum {
        added_at: None,
        album: album(name, artist_id),
    }
}

pub fn track(name: &str, artist_id: Option<&str>) -> Track {
    Track {
        id: Some(format!("{}-id", name)),
        name: name.to_string(),
        uri: Some(format!("spotify:track:{}", name)),
        duration_ms: 120_000,
        album: album(&format!("{} album", name), artist_id),
        artists: vec![simple_artist(artist_id, "Someone")],
    }
}

pub fn played(name: &str, artist_id: Option<&str>) -> PlayHistory {
    PlayHistory {
        track: track(name, artist_id),
        played_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap(),
    }
}

pub fn playback(progress_ms: u64) -> CurrentPlayback {
    CurrentPlayback {
        is_playing: true,
        progress_ms: Some(progress_ms),
        item: Some(track("Now", Some("A"))),
    }
}

fn unauthorized() -> ApiError {
    ApiError::Status {
        status: StatusCode::UNAUTHORIZED,
        body: "The access token expired".to_string(),
    }
}

// Spotify API fake

#[derive(Default)]
pub struct FakeSpotify {
    pub saved_albums: Vec<SavedAlbum>,
    pub recently_played: Vec<PlayHistory>,
    pub top_tracks: Vec<Track>,
    pub top_artists: Vec<Artist>,
    pub playback: Option<CurrentPlayback>,
    pub artists: Vec<Artist>,
    pub fail: Option<Endpoint>,
    pub rejected_tokens: Vec<String>,
    pub fail_playback_polls: bool,
    pub playback_delay: Option<Duration>,

    pub tokens: Mutex<Vec<String>>,
    pub limits: Mutex<Vec<(Endpoint, u32)>>,
    pub time_ranges: Mutex<Vec<TimeRange>>,
    pub artist_requests: Mutex<Vec<Vec<String>>>,
    pub playback_calls: AtomicUsize,
}

impl FakeSpotify {
    pub fn failing(endpoint: Endpoint) -> Self {
        Self {
            fail: Some(endpoint),
            ..Default::default()
        }
    }

    pub fn rejecting(token: &str) -> Self {
        Self {
            rejected_tokens: vec![token.to_string()],
            ..Default::default()
        }
    }

    pub fn playback_calls(&self) -> usize {
        self.playback_calls.load(Ordering::SeqCst)
    }

    pub fn artist_requests(&self) -> Vec<Vec<String>> {
        self.artist_requests.lock().unwrap().clone()
    }

    fn record(&self, endpoint: Endpoint, token: &str, limit: Option<u32>) -> Result<(), ApiError> {
        self.tokens.lock().unwrap().push(token.to_string());
        if let Some(limit) = limit {
            self.limits.lock().unwrap().push((endpoint, limit));
        }
        if self.fail == Some(endpoint) || self.rejected_tokens.iter().any(|t| t == token) {
            return Err(unauthorized());
        }
        Ok(())
    }
}

impl SpotifyApi for FakeSpotify {
    async fn saved_albums(&self, token: &str, limit: u32) -> Result<Paging<SavedAlbum>, ApiError> {
        self.record(Endpoint::SavedAlbums, token, Some(limit))?;
        Ok(Paging {
            items: self.saved_albums.clone(),
            ..Default::default()
        })
    }

    async fn recently_played(
        &self,
        token: &str,
        limit: u32,
    ) -> Result<CursorPaging<PlayHistory>, ApiError> {
        self.record(Endpoint::RecentlyPlayed, token, Some(limit))?;
        Ok(CursorPaging {
            items: self.recently_played.clone(),
            ..Default::default()
        })
    }

    async fn top_tracks(
        &self,
        token: &str,
        limit: u32,
        time_range: TimeRange,
    ) -> Result<Paging<Track>, ApiError> {
        self.time_ranges.lock().unwrap().push(time_range);
        self.record(Endpoint::TopTracks, token, Some(limit))?;
        Ok(Paging {
            items: self.top_tracks.clone(),
            ..Default::default()
        })
    }

    async fn current_playback(&self, token: &str) -> Result<Option<CurrentPlayback>, ApiError> {
        self.playback_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.playback_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_playback_polls {
            return Err(unauthorized());
        }
        self.record(Endpoint::CurrentPlayback, token, None)?;
        Ok(self.playback.clone())
    }

    async fn top_artists(&self, token: &str, limit: u32) -> Result<Paging<Artist>, ApiError> {
        self.record(Endpoint::TopArtists, token, Some(limit))?;
        Ok(Paging {
            items: self.top_artists.clone(),
            ..Default::default()
        })
    }

    async fn artists(&self, token: &str, ids: &[String]) -> Result<Vec<Artist>, ApiError> {
        self.artist_requests.lock().unwrap().push(ids.to_vec());
        self.record(Endpoint::Artists, token, None)?;
        Ok(self
            .artists
            .iter()
            .filter(|a| ids.contains(&a.id))
            .cloned()
            .collect())
    }
}

// Token store and authorizer fakes

#[derive(Default)]
pub struct MemoryStore {
    pub stored: Mutex<StoredToken>,
    pub persists: AtomicUsize,
    pub clears: AtomicUsize,
}

impl MemoryStore {
    pub fn with_token(token: &str) -> Self {
        Self {
            stored: Mutex::new(StoredToken {
                token: Some(token.to_string()),
                obtained_at: Some(1_700_000_000),
            }),
            ..Default::default()
        }
    }

    pub fn token(&self) -> Option<String> {
        self.stored.lock().unwrap().token.clone()
    }

    pub fn persists(&self) -> usize {
        self.persists.load(Ordering::SeqCst)
    }

    pub fn clears(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

impl TokenStore for MemoryStore {
    async fn load(&self) -> Res<StoredToken> {
        Ok(self.stored.lock().unwrap().clone())
    }

    async fn persist(&self, token: &str) -> Res<()> {
        self.persists.fetch_add(1, Ordering::SeqCst);
        *self.stored.lock().unwrap() = StoredToken {
            token: Some(token.to_string()),
            obtained_at: Some(Utc::now().timestamp()),
        };
        Ok(())
    }

    async fn clear(&self) -> Res<()> {
        self.clears.fetch_add(1, Ordering::SeqCst);
        *self.stored.lock().unwrap() = StoredToken::default();
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingAuthorizer {
    pub urls: Mutex<Vec<String>>,
}

impl RecordingAuthorizer {
    pub fn redirects(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

impl Authorizer for RecordingAuthorizer {
    fn authorize(&self, url: &str) -> Res<()> {
        self.urls.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

/// Hands out queued callback outcomes; an empty queue behaves like a timeout.
#[derive(Default)]
pub struct QueuedCallbacks {
    pub outcomes: Mutex<VecDeque<CallbackOutcome>>,
    pub receives: AtomicUsize,
}

impl QueuedCallbacks {
    pub fn with_token(token: &str) -> Self {
        Self::with(CallbackOutcome::Token(token.to_string()))
    }

    pub fn with(outcome: CallbackOutcome) -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::from([outcome])),
            ..Default::default()
        }
    }

    pub fn receives(&self) -> usize {
        self.receives.load(Ordering::SeqCst)
    }
}

impl CallbackReceiver for QueuedCallbacks {
    async fn receive(&self) -> Option<CallbackOutcome> {
        self.receives.fetch_add(1, Ordering::SeqCst);
        self.outcomes.lock().unwrap().pop_front()
    }
}
