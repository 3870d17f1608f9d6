use std::{collections::HashSet, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};

use crate::types::{Image, PlayHistory, SavedAlbum, SimplifiedArtist, Track};

/// Returns the id of the first artist, if there is one with a non-empty id.
pub fn first_artist_id(artists: &[SimplifiedArtist]) -> Option<&str> {
    artists
        .first()
        .and_then(|a| a.id.as_deref())
        .filter(|id| !id.is_empty())
}

/// Collects the first artist id of every saved album, recently played track
/// and top track, in that order, for the enrichment request.
///
/// Items without an artist id are dropped before de-duplication so no
/// placeholder id is ever sent upstream.
pub fn collect_artist_ids(
    albums: &[SavedAlbum],
    recently_played: &[PlayHistory],
    top_tracks: &[Track],
) -> Vec<String> {
    let mut ids: Vec<String> = albums
        .iter()
        .map(|saved| first_artist_id(&saved.album.artists))
        .chain(
            recently_played
                .iter()
                .map(|played| first_artist_id(&played.track.artists)),
        )
        .chain(top_tracks.iter().map(|track| first_artist_id(&track.artists)))
        .flatten()
        .map(str::to_string)
        .collect();

    remove_duplicate_ids(&mut ids);
    ids
}

/// Removes duplicates in place, keeping the first occurrence of each id.
pub fn remove_duplicate_ids(ids: &mut Vec<String>) {
    let mut seen_ids = HashSet::new();
    ids.retain(|id| seen_ids.insert(id.clone()));
}

pub fn join_artist_names(artists: &[SimplifiedArtist]) -> String {
    artists
        .iter()
        .map(|a| a.name.as_str())
        .collect::<Vec<&str>>()
        .join(", ")
}

pub fn first_image_url(images: &[Image]) -> Option<&str> {
    images.first().map(|i| i.url.as_str())
}

/// Formats milliseconds as `m:ss`.
pub fn format_duration_ms(ms: u64) -> String {
    let total_secs = ms / 1000;
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

/// Text progress bar, e.g. `[#####-----]` for 50% at width 10.
pub fn progress_bar(percent: f64, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

pub fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}
