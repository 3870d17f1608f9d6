use std::sync::Arc;

use crate::{
    dashboard::{DashboardError, DashboardOptions, DashboardSnapshot, Endpoint},
    management::Session,
    spotify::{ApiError, SpotifyApi},
    utils,
};

/// Upper bound of ids in one `/artists` request.
pub const ARTISTS_PER_REQUEST: usize = 50;

/// Loads a [`DashboardSnapshot`] for one session.
pub struct DashboardLoader<C> {
    client: Arc<C>,
    session: Session,
    options: DashboardOptions,
}

impl<C: SpotifyApi> DashboardLoader<C> {
    pub fn new(client: Arc<C>, session: Session, options: DashboardOptions) -> Self {
        Self {
            client,
            session,
            options,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn options(&self) -> &DashboardOptions {
        &self.options
    }

    /// Runs the five list requests concurrently, then enriches the referenced
    /// artists with one more request.
    ///
    /// The first failing request aborts the load; the enrichment request is
    /// never sent in that case. It is also skipped when no item references an
    /// artist, and split when more than [`ARTISTS_PER_REQUEST`] ids are
    /// referenced.
    pub async fn load(&self) -> Result<DashboardSnapshot, DashboardError> {
        let client = self.client.as_ref();
        let token = self.session.token();
        let options = &self.options;

        let (saved_albums, recently_played, top_tracks, playback, top_artists) = tokio::try_join!(
            async {
                client
                    .saved_albums(token, options.list_limit)
                    .await
                    .map_err(failed(Endpoint::SavedAlbums))
            },
            async {
                client
                    .recently_played(token, options.list_limit)
                    .await
                    .map_err(failed(Endpoint::RecentlyPlayed))
            },
            async {
                client
                    .top_tracks(token, options.list_limit, options.time_range)
                    .await
                    .map_err(failed(Endpoint::TopTracks))
            },
            async {
                client
                    .current_playback(token)
                    .await
                    .map_err(failed(Endpoint::CurrentPlayback))
            },
            async {
                client
                    .top_artists(token, options.top_artists_limit)
                    .await
                    .map_err(failed(Endpoint::TopArtists))
            },
        )?;

        let ids = utils::collect_artist_ids(
            &saved_albums.items,
            &recently_played.items,
            &top_tracks.items,
        );
        tracing::debug!(count = ids.len(), "enriching artists");

        let mut artists = Vec::with_capacity(ids.len());
        for batch in ids.chunks(ARTISTS_PER_REQUEST) {
            artists.extend(
                client
                    .artists(token, batch)
                    .await
                    .map_err(failed(Endpoint::Artists))?,
            );
        }

        let snapshot = DashboardSnapshot {
            saved_albums: saved_albums.items,
            recently_played: recently_played.items,
            top_tracks: top_tracks.items,
            top_artists: top_artists.items,
            playback,
            ..Default::default()
        };

        Ok(snapshot.with_artists(artists))
    }
}

fn failed(endpoint: Endpoint) -> impl FnOnce(ApiError) -> DashboardError {
    move |source| DashboardError::Request { endpoint, source }
}
