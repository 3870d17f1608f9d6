mod common;

use std::{sync::Arc, time::Duration};

use common::{FakeSpotify, playback};
use spotdash::{
    dashboard::{DashboardSnapshot, PLAYBACK_POLL_INTERVAL, PlaybackPoller},
    management::Session,
};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

fn poller(fake: &Arc<FakeSpotify>) -> PlaybackPoller<FakeSpotify> {
    PlaybackPoller::new(
        Arc::clone(fake),
        Session::new("poll-token"),
        PLAYBACK_POLL_INTERVAL,
        None,
    )
}

#[test]
fn test_poll_interval() {
    assert_eq!(PLAYBACK_POLL_INTERVAL, Duration::from_secs(5));
}

#[tokio::test(start_paused = true)]
async fn test_polls_once_per_period() {
    let fake = Arc::new(FakeSpotify {
        playback: Some(playback(1_000)),
        ..Default::default()
    });
    let handle = poller(&fake).spawn();

    // nothing before the first period has elapsed
    sleep(Duration::from_millis(4_900)).await;
    assert_eq!(fake.playback_calls(), 0);

    sleep(Duration::from_millis(200)).await;
    assert_eq!(fake.playback_calls(), 1);

    sleep(Duration::from_secs(5)).await;
    assert_eq!(fake.playback_calls(), 2);

    assert!(fake.tokens.lock().unwrap().iter().all(|t| t == "poll-token"));
    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_next_returns_latest_playback() {
    let fake = Arc::new(FakeSpotify {
        playback: Some(playback(60_000)),
        ..Default::default()
    });
    let mut handle = poller(&fake).spawn();

    let update = handle.next().await;

    assert_eq!(update, Some(Some(playback(60_000))));
    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_update_replaces_only_playback() {
    let fake = Arc::new(FakeSpotify::default());
    let mut handle = poller(&fake).spawn();

    let mut snapshot = DashboardSnapshot::default();
    snapshot.playback = Some(playback(10_000));
    snapshot.top_tracks = vec![common::track("kept", Some("A"))];

    // nothing playing any more
    let update = handle.next().await.unwrap();
    snapshot.apply_playback(update);

    assert_eq!(snapshot.playback, None);
    assert_eq!(snapshot.top_tracks.len(), 1);
    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_no_polls_after_shutdown() {
    let fake = Arc::new(FakeSpotify::default());
    let handle = poller(&fake).spawn();

    sleep(Duration::from_millis(5_100)).await;
    assert_eq!(fake.playback_calls(), 1);

    handle.shutdown().await;
    sleep(Duration::from_secs(30)).await;

    assert_eq!(fake.playback_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_in_flight_response_discarded_after_shutdown() {
    let fake = Arc::new(FakeSpotify {
        playback: Some(playback(5_000)),
        playback_delay: Some(Duration::from_secs(2)),
        ..Default::default()
    });
    let handle = poller(&fake).spawn();
    let updates = handle.subscribe();

    // first poll starts at 5s and would answer at 7s
    sleep(Duration::from_secs(6)).await;
    assert_eq!(fake.playback_calls(), 1);

    handle.shutdown().await;
    sleep(Duration::from_secs(5)).await;

    assert!(updates.borrow().is_none());
    assert!(!updates.has_changed().unwrap_or(false));
}

#[tokio::test(start_paused = true)]
async fn test_poll_errors_keep_polling() {
    let fake = Arc::new(FakeSpotify {
        fail_playback_polls: true,
        ..Default::default()
    });
    let handle = poller(&fake).spawn();
    let updates = handle.subscribe();

    sleep(Duration::from_millis(10_100)).await;

    assert_eq!(fake.playback_calls(), 2);
    assert!(handle.is_running());
    assert!(updates.borrow().is_none());
    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_external_cancel_stops_poller() {
    let fake = Arc::new(FakeSpotify::default());
    let cancel = CancellationToken::new();
    let handle = PlaybackPoller::new(
        Arc::clone(&fake),
        Session::new("poll-token"),
        PLAYBACK_POLL_INTERVAL,
        Some(cancel.clone()),
    )
    .spawn();
    let mut updates = handle.subscribe();

    cancel.cancel();
    sleep(Duration::from_secs(20)).await;

    assert_eq!(fake.playback_calls(), 0);
    assert!(!handle.is_running());
    // the sender is gone once the task has finished
    assert!(updates.changed().await.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_drop_cancels_poller() {
    let fake = Arc::new(FakeSpotify::default());
    let handle = poller(&fake).spawn();

    drop(handle);
    sleep(Duration::from_secs(20)).await;

    assert_eq!(fake.playback_calls(), 0);
}
