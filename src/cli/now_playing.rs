use colored::Colorize;
use reqwest::StatusCode;

use crate::{
    dashboard::cards,
    error, info,
    management::TokenManager,
    spotify::{
        SpotifyApi, SpotifyClient,
        auth::{CallbackServer, login},
    },
    utils, warning,
};

/// Prints the current playback once; `open` hands its URI to the system.
pub async fn now_playing(open: bool) {
    let manager = TokenManager::from_config();
    let server = match CallbackServer::start(manager.authorize_url().to_string()) {
        Ok(server) => server,
        Err(e) => error!("Cannot start callback server. Err: {}", e),
    };
    let session = match login(&manager, &server).await {
        Ok(Some(session)) => session,
        Ok(None) => error!("Authorization failed or timed out."),
        Err(e) => error!("Cannot authorize. Err: {}", e),
    };
    drop(server);

    let client = SpotifyClient::from_config();
    let pb = utils::spinner("Fetching current playback...");
    let playback = client.current_playback(session.token()).await;
    pb.finish_and_clear();

    let playback = match playback {
        Ok(playback) => playback,
        Err(e) if e.status() == Some(StatusCode::UNAUTHORIZED) => {
            if let Err(e) = manager.clear().await {
                warning!("Cannot clear stored token. Err: {}", e);
            }
            error!("Session expired. Run spotdash auth.")
        }
        Err(e) => error!("Failed to fetch current playback: {}", e),
    };

    let Some(card) = cards::now_playing(playback.as_ref()) else {
        info!("Nothing is playing right now.");
        return;
    };

    print_card(&card);

    if open {
        match &card.uri {
            Some(uri) => {
                if webbrowser::open(uri).is_err() {
                    warning!("Failed to open {}", uri);
                }
            }
            None => warning!("Current item has no URI to open."),
        }
    }
}

pub(crate) fn print_card(card: &cards::NowPlayingCard) {
    let state = if card.is_playing { "Now playing" } else { "Paused" };
    info!("{}: {}", state, card.name.bold());
    info!("{}", card.artists);
    info!("{}", card.album.dimmed());
    if let Some(percent) = card.progress_percent {
        info!(
            "{} {:.0}% {}",
            utils::progress_bar(percent, 30),
            percent,
            card.position.clone().unwrap_or_default()
        );
    }
    if let Some(cover) = &card.cover {
        info!("Cover: {}", cover);
    }
}
