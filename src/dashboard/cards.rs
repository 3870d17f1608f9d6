//! Card rows rendered from a snapshot.
//!
//! Every album, track and recent card resolves its first artist against the
//! snapshot's enriched records. An unresolved artist leaves the avatar empty.

use crate::{
    dashboard::DashboardSnapshot,
    types::{
        AlbumTableRow, Artist, CurrentPlayback, RecentTableRow, SimplifiedArtist,
        TopArtistTableRow, TrackTableRow,
    },
    utils,
};

/// Now-playing card.
#[derive(Debug, Clone, PartialEq)]
pub struct NowPlayingCard {
    pub name: String,
    pub artists: String,
    pub album: String,
    pub cover: Option<String>,
    pub uri: Option<String>,
    pub is_playing: bool,
    pub progress_percent: Option<f64>,
    pub position: Option<String>,
}

/// `None` when nothing is playing or the playback has no item.
pub fn now_playing(playback: Option<&CurrentPlayback>) -> Option<NowPlayingCard> {
    let playback = playback?;
    let item = playback.item.as_ref()?;

    let position = playback.progress_ms.map(|progress| {
        format!(
            "{} / {}",
            utils::format_duration_ms(progress),
            utils::format_duration_ms(item.duration_ms)
        )
    });

    Some(NowPlayingCard {
        name: item.name.clone(),
        artists: utils::join_artist_names(&item.artists),
        album: item.album.name.clone(),
        cover: utils::first_image_url(&item.album.images).map(str::to_string),
        uri: item.uri.clone(),
        is_playing: playback.is_playing,
        progress_percent: playback.progress_percent(),
        position,
    })
}

pub fn top_artist_rows(snapshot: &DashboardSnapshot) -> Vec<TopArtistTableRow> {
    snapshot
        .top_artists
        .iter()
        .map(|a| TopArtistTableRow {
            name: a.name.clone(),
            genres: a.genres.iter().take(3).cloned().collect::<Vec<_>>().join(","),
            link: artist_link(a),
        })
        .collect()
}

pub fn album_rows(snapshot: &DashboardSnapshot) -> Vec<AlbumTableRow> {
    snapshot
        .saved_albums
        .iter()
        .map(|saved| {
            let album = &saved.album;
            AlbumTableRow {
                name: album.name.clone(),
                artists: utils::join_artist_names(&album.artists),
                avatar: avatar(snapshot, &album.artists),
                link: album.uri.clone().unwrap_or_default(),
            }
        })
        .collect()
}

pub fn top_track_rows(snapshot: &DashboardSnapshot) -> Vec<TrackTableRow> {
    snapshot
        .top_tracks
        .iter()
        .map(|track| TrackTableRow {
            name: track.name.clone(),
            artists: utils::join_artist_names(&track.artists),
            album: track.album.name.clone(),
            avatar: avatar(snapshot, &track.artists),
            link: track.uri.clone().unwrap_or_default(),
        })
        .collect()
}

pub fn recent_rows(snapshot: &DashboardSnapshot) -> Vec<RecentTableRow> {
    snapshot
        .recently_played
        .iter()
        .map(|played| RecentTableRow {
            played_at: played.played_at.format("%Y-%m-%d %H:%M").to_string(),
            name: played.track.name.clone(),
            artists: utils::join_artist_names(&played.track.artists),
            avatar: avatar(snapshot, &played.track.artists),
        })
        .collect()
}

/// Avatar of the first artist, or an empty string when it cannot be resolved.
fn avatar(snapshot: &DashboardSnapshot, artists: &[SimplifiedArtist]) -> String {
    snapshot
        .artist(utils::first_artist_id(artists))
        .and_then(|a| utils::first_image_url(&a.images))
        .unwrap_or_default()
        .to_string()
}

fn artist_link(artist: &Artist) -> String {
    artist
        .external_urls
        .spotify
        .clone()
        .unwrap_or_else(|| artist.uri.clone())
}
