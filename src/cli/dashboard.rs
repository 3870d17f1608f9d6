use std::sync::Arc;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tabled::{Table, Tabled};

use crate::{
    cli::now_playing::print_card,
    dashboard::{
        DashboardOptions, DashboardSnapshot, PLAYBACK_POLL_INTERVAL, PlaybackPoller, cards,
        load_or_reauthorize,
    },
    error, info,
    management::{Session, TokenManager},
    spotify::{
        SpotifyClient,
        auth::{CallbackServer, login},
    },
    success, utils,
};

/// Loads and prints the dashboard.
///
/// A failed load clears the stored token and sends the user through
/// authorization once; the dashboard is then loaded with the new token. With
/// `watch` the now-playing bar keeps refreshing until Ctrl-C.
pub async fn dashboard(options: DashboardOptions, watch: bool) {
    let manager = TokenManager::from_config();
    let client = Arc::new(SpotifyClient::from_config());

    let server = match CallbackServer::start(manager.authorize_url().to_string()) {
        Ok(server) => server,
        Err(e) => error!("Cannot start callback server. Err: {}", e),
    };

    let session = match login(&manager, &server).await {
        Ok(Some(session)) => session,
        Ok(None) => error!("Authorization failed or timed out."),
        Err(e) => error!("Cannot authorize. Err: {}", e),
    };

    let pb = utils::spinner("Loading your listening data...");
    let result = load_or_reauthorize(Arc::clone(&client), &manager, &server, session, options).await;
    pb.finish_and_clear();
    drop(server);

    let (session, mut snapshot) = match result {
        Ok(loaded) => loaded,
        Err(e) => error!("Failed to load dashboard: {}", e),
    };

    render(&snapshot);

    if watch {
        watch_playback(client, session, &mut snapshot).await;
    }
}

pub fn render(snapshot: &DashboardSnapshot) {
    match cards::now_playing(snapshot.playback.as_ref()) {
        Some(card) => print_card(&card),
        None => info!("Nothing is playing right now."),
    }

    print_section("Your Top Artists", cards::top_artist_rows(snapshot));
    print_section("Your Latest Albums", cards::album_rows(snapshot));
    print_section("Your Top Tracks", cards::top_track_rows(snapshot));
    print_section("Latest Songs", cards::recent_rows(snapshot));

    success!(
        "Loaded {} albums, {} tracks, {} recent songs and {} artists.",
        snapshot.saved_albums.len(),
        snapshot.top_tracks.len(),
        snapshot.recently_played.len(),
        snapshot.enriched_artist_count()
    );
}

fn print_section<T: Tabled>(title: &str, rows: Vec<T>) {
    println!("\n{}", title.bold());
    if rows.is_empty() {
        println!("{}", "Nothing here yet.".dimmed());
        return;
    }
    println!("{}", Table::new(rows));
}

async fn watch_playback(
    client: Arc<SpotifyClient>,
    session: Session,
    snapshot: &mut DashboardSnapshot,
) {
    info!("Watching playback, press Ctrl-C to stop.");

    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::with_template("{msg}\n[{bar:40.green/white}] {pos:>3}%")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    update_bar(&bar, snapshot);

    let mut poller = PlaybackPoller::new(client, session, PLAYBACK_POLL_INTERVAL, None).spawn();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            update = poller.next() => match update {
                Some(playback) => {
                    snapshot.apply_playback(playback);
                    update_bar(&bar, snapshot);
                }
                None => break,
            },
        }
    }

    poller.shutdown().await;
    bar.abandon();
}

fn update_bar(bar: &ProgressBar, snapshot: &DashboardSnapshot) {
    match cards::now_playing(snapshot.playback.as_ref()) {
        Some(card) => {
            let state = if card.is_playing { "▶" } else { "⏸" };
            bar.set_message(format!(
                "{} {} - {} ({}) {}",
                state,
                card.name,
                card.artists,
                card.album,
                card.position.unwrap_or_default()
            ));
            bar.set_position(card.progress_percent.unwrap_or(0.0).round().clamp(0.0, 100.0) as u64);
        }
        None => {
            bar.set_message("Nothing is playing right now.");
            bar.set_position(0);
        }
    }
}
