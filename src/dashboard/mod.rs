//! # Dashboard Module
//!
//! Aggregates the user's listening data into a [`DashboardSnapshot`].
//!
//! A load issues five requests concurrently (saved albums, recently played,
//! top tracks, current playback, top artists) and joins them at one barrier.
//! The first artist of every album, recent track and top track is collected,
//! de-duplicated and resolved with a single enrichment request. Any failure
//! aborts the load with one [`DashboardError`].
//!
//! Independently, a [`PlaybackPoller`] refreshes the current-playback slice
//! every five seconds until it is shut down.

use std::{collections::HashMap, fmt};

use thiserror::Error;

use crate::{
    spotify::{ApiError, TimeRange},
    types::{Artist, CurrentPlayback, PlayHistory, SavedAlbum, Track},
};

pub mod cards;
mod loader;
mod poller;
mod recovery;

pub use loader::{ARTISTS_PER_REQUEST, DashboardLoader};
pub use poller::{PLAYBACK_POLL_INTERVAL, PlaybackPoller, PollerHandle};
pub use recovery::{LoadError, load_or_reauthorize};

pub const DEFAULT_LIST_LIMIT: u32 = 9;
pub const DEFAULT_TOP_ARTISTS_LIMIT: u32 = 18;

/// Page sizes and time window of a dashboard load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardOptions {
    /// Limit for saved albums, recently played and top tracks.
    pub list_limit: u32,
    pub top_artists_limit: u32,
    pub time_range: TimeRange,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            list_limit: DEFAULT_LIST_LIMIT,
            top_artists_limit: DEFAULT_TOP_ARTISTS_LIMIT,
            time_range: TimeRange::ShortTerm,
        }
    }
}

/// Request of a dashboard load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    SavedAlbums,
    RecentlyPlayed,
    TopTracks,
    CurrentPlayback,
    TopArtists,
    Artists,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Endpoint::SavedAlbums => "saved albums",
            Endpoint::RecentlyPlayed => "recently played",
            Endpoint::TopTracks => "top tracks",
            Endpoint::CurrentPlayback => "current playback",
            Endpoint::TopArtists => "top artists",
            Endpoint::Artists => "artists",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("{endpoint} request failed: {source}")]
    Request {
        endpoint: Endpoint,
        #[source]
        source: ApiError,
    },
}

impl DashboardError {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            DashboardError::Request { endpoint, .. } => *endpoint,
        }
    }
}

/// Listening data of one load.
#[derive(Debug, Clone, Default)]
pub struct DashboardSnapshot {
    pub saved_albums: Vec<SavedAlbum>,
    pub recently_played: Vec<PlayHistory>,
    pub top_tracks: Vec<Track>,
    pub top_artists: Vec<Artist>,
    pub playback: Option<CurrentPlayback>,
    artists: HashMap<String, Artist>,
}

impl DashboardSnapshot {
    /// Replaces the enriched artist records.
    pub fn with_artists(mut self, artists: Vec<Artist>) -> Self {
        self.artists = artists.into_iter().map(|a| (a.id.clone(), a)).collect();
        self
    }

    /// Looks up an enriched artist; a miss is not an error.
    pub fn artist(&self, id: Option<&str>) -> Option<&Artist> {
        id.and_then(|id| self.artists.get(id))
    }

    pub fn enriched_artist_count(&self) -> usize {
        self.artists.len()
    }

    /// Replaces only the playback slice.
    pub fn apply_playback(&mut self, playback: Option<CurrentPlayback>) {
        self.playback = playback;
    }
}
