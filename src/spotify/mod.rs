//! # Spotify Integration Module
//!
//! This module provides the interface to the Spotify Web API used by the
//! dashboard: the implicit-grant authorization flow and the read-only endpoints
//! that make up a dashboard load.
//!
//! ## Architecture
//!
//! ```text
//! Application Layer (CLI, Dashboard)
//!          ↓
//! SpotifyApi trait
//!     ├── SpotifyClient (reqwest, JSON)
//!     └── test doubles
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Core Modules
//!
//! ### Authorization Module
//!
//! [`auth`] - Implicit grant (`response_type=token`):
//! - **Authorization URL**: Builds the redirect with client id, scopes and callback
//! - **Local Callback Server**: Receives the token delivered in the URL fragment
//! - **Browser Integration**: Opens the authorization page in the default browser
//!
//! ### Client Module
//!
//! [`client`] - HTTP implementation of [`SpotifyApi`].
//!
//! ## API Coverage
//!
//! - `GET /me/albums` - Saved albums
//! - `GET /me/player/recently-played` - Recently played tracks
//! - `GET /me/top/tracks` - Top tracks for a time range
//! - `GET /me/top/artists` - Top artists
//! - `GET /me/player` - Current playback state
//! - `GET /artists` - Several artists by id
//!
//! ## Error Handling
//!
//! Every endpoint returns [`ApiError`]. No request is retried; the caller
//! decides what a failure means for the session.

use std::{fmt, future::Future};

use reqwest::StatusCode;
use thiserror::Error;

use crate::types::{Artist, CurrentPlayback, CursorPaging, Paging, PlayHistory, SavedAlbum, Track};

pub mod auth;
pub mod client;

pub use client::SpotifyClient;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Spotify API returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Transport(e) => e.status(),
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Decode(_) => None,
        }
    }
}

/// Time window for the top-items endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum TimeRange {
    #[default]
    ShortTerm,
    MediumTerm,
    LongTerm,
}

impl TimeRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::ShortTerm => "short_term",
            TimeRange::MediumTerm => "medium_term",
            TimeRange::LongTerm => "long_term",
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only Spotify endpoints consumed by the dashboard.
///
/// The bearer token is passed with every call so one client can be shared
/// between the dashboard load and the playback poller.
pub trait SpotifyApi: Send + Sync {
    fn saved_albums(
        &self,
        token: &str,
        limit: u32,
    ) -> impl Future<Output = Result<Paging<SavedAlbum>, ApiError>> + Send;

    fn recently_played(
        &self,
        token: &str,
        limit: u32,
    ) -> impl Future<Output = Result<CursorPaging<PlayHistory>, ApiError>> + Send;

    fn top_tracks(
        &self,
        token: &str,
        limit: u32,
        time_range: TimeRange,
    ) -> impl Future<Output = Result<Paging<Track>, ApiError>> + Send;

    /// `Ok(None)` when nothing is playing.
    fn current_playback(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<Option<CurrentPlayback>, ApiError>> + Send;

    fn top_artists(
        &self,
        token: &str,
        limit: u32,
    ) -> impl Future<Output = Result<Paging<Artist>, ApiError>> + Send;

    /// Full records for `ids`. Ids Spotify does not know are left out.
    fn artists(
        &self,
        token: &str,
        ids: &[String],
    ) -> impl Future<Output = Result<Vec<Artist>, ApiError>> + Send;
}
