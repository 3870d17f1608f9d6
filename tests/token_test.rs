mod common;

use common::{AUTHORIZE_URL, MemoryStore, RecordingAuthorizer};
use spotdash::{
    management::{
        FileTokenStore, Session, SessionState, TokenManager, TokenSource, TokenStore,
        resolve_token, token_from_callback_url,
    },
    spotify::auth::{CallbackOutcome, CallbackSlot, CallbackState, authorize_url, wait_for_callback},
};
use std::{sync::Arc, time::Duration};
use tokio::sync::Mutex;

fn manager(store: MemoryStore) -> TokenManager<MemoryStore, RecordingAuthorizer> {
    TokenManager::new(store, RecordingAuthorizer::default(), AUTHORIZE_URL.to_string())
}

#[test]
fn test_token_from_callback_fragment() {
    let url = "http://127.0.0.1:8888/analyze#access_token=BQC123&token_type=Bearer&expires_in=3600";
    assert_eq!(token_from_callback_url(url), Some("BQC123".to_string()));
}

#[test]
fn test_token_from_callback_query_and_relative() {
    assert_eq!(
        token_from_callback_url("/analyze?access_token=abc&expires_in=3600"),
        Some("abc".to_string())
    );
    assert_eq!(
        token_from_callback_url("#access_token=xyz"),
        Some("xyz".to_string())
    );
}

#[test]
fn test_token_from_callback_missing_or_empty() {
    assert_eq!(token_from_callback_url("http://127.0.0.1:8888/analyze"), None);
    assert_eq!(
        token_from_callback_url("http://127.0.0.1:8888/analyze#error=access_denied"),
        None
    );
    assert_eq!(
        token_from_callback_url("http://127.0.0.1:8888/analyze#access_token="),
        None
    );
}

#[test]
fn test_token_from_callback_fragment_after_query() {
    assert_eq!(
        token_from_callback_url("/analyze?source=web#access_token=frag&expires_in=3600"),
        Some("frag".to_string())
    );
}

#[test]
fn test_token_from_callback_decodes_value() {
    assert_eq!(
        token_from_callback_url("/analyze#access_token=a%2Bb"),
        Some("a+b".to_string())
    );
}

#[test]
fn test_resolve_token_prefers_persisted() {
    assert_eq!(
        resolve_token(Some("stored"), Some("/analyze#access_token=fresh")),
        TokenSource::Persisted("stored".to_string())
    );
    assert_eq!(
        resolve_token(None, Some("/analyze#access_token=fresh")),
        TokenSource::Callback("fresh".to_string())
    );
    assert_eq!(
        resolve_token(Some(""), Some("/analyze#access_token=fresh")),
        TokenSource::Callback("fresh".to_string())
    );
    assert_eq!(resolve_token(None, None), TokenSource::Authorize);
    assert_eq!(resolve_token(None, Some("/analyze")), TokenSource::Authorize);
}

#[test]
fn test_authorize_url() {
    let scopes = vec!["user-top-read".to_string(), "user-read-playback-state".to_string()];
    let url = authorize_url(
        "https://accounts.spotify.com/authorize",
        "client123",
        &scopes,
        "http://localhost:3000/analyze",
    );

    assert_eq!(
        url,
        "https://accounts.spotify.com/authorize?response_type=token&client_id=client123\
         &scope=user-top-read%20user-read-playback-state\
         &redirect_uri=http%3A%2F%2Flocalhost%3A3000%2Fanalyze"
    );
}

#[tokio::test]
async fn test_initialize_with_persisted_token() {
    let manager = manager(MemoryStore::with_token("stored"));

    let state = manager.initialize(None).await.unwrap();

    assert_eq!(state, SessionState::Ready(Session::new("stored")));
    assert!(manager.authorizer().redirects().is_empty());
    assert_eq!(manager.store().persists(), 0);
}

#[tokio::test]
async fn test_initialize_with_callback_token_persists_without_redirect() {
    let manager = manager(MemoryStore::default());

    let state = manager
        .initialize(Some("http://127.0.0.1:8888/analyze#access_token=fresh&expires_in=3600"))
        .await
        .unwrap();

    assert_eq!(state, SessionState::Ready(Session::new("fresh")));
    assert_eq!(manager.store().token(), Some("fresh".to_string()));
    assert_eq!(manager.store().persists(), 1);
    assert!(manager.authorizer().redirects().is_empty());
}

#[tokio::test]
async fn test_initialize_without_token_redirects_once() {
    let manager = manager(MemoryStore::default());

    let state = manager
        .initialize(Some("http://127.0.0.1:8888/analyze"))
        .await
        .unwrap();

    assert_eq!(state, SessionState::Redirected);
    assert_eq!(manager.authorizer().redirects(), vec![AUTHORIZE_URL.to_string()]);
    assert_eq!(manager.store().persists(), 0);
}

#[tokio::test]
async fn test_invalidate_clears_and_redirects() {
    let manager = manager(MemoryStore::with_token("stale"));

    manager.invalidate().await.unwrap();

    assert_eq!(manager.store().token(), None);
    assert_eq!(manager.store().clears(), 1);
    assert_eq!(manager.authorizer().redirects().len(), 1);
    assert!(manager.current().await.unwrap().is_none());
}

#[tokio::test]
async fn test_accept_callback() {
    let manager = manager(MemoryStore::default());

    assert!(manager.accept_callback("/analyze").await.unwrap().is_none());
    let session = manager
        .accept_callback("/analyze?access_token=cb")
        .await
        .unwrap();

    assert_eq!(session, Some(Session::new("cb")));
    assert_eq!(manager.store().token(), Some("cb".to_string()));
}

#[tokio::test]
async fn test_status_reports_presence() {
    let manager = manager(MemoryStore::with_token("stored"));
    let status = manager.status().await.unwrap();
    assert!(status.present);
    assert_eq!(status.obtained_at, Some(1_700_000_000));

    manager.clear().await.unwrap();
    let status = manager.status().await.unwrap();
    assert!(!status.present);
    assert_eq!(status.obtained_at, None);
    assert!(manager.authorizer().redirects().is_empty());
}

#[tokio::test]
async fn test_file_token_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache/token.json");
    let store = FileTokenStore::new(path.clone());

    // missing file reads as no token
    assert!(store.load().await.unwrap().token.is_none());

    store.persist("BQC-file").await.unwrap();
    let stored = store.load().await.unwrap();
    assert_eq!(stored.token.as_deref(), Some("BQC-file"));
    assert!(stored.obtained_at.is_some());

    store.clear().await.unwrap();
    let content = std::fs::read_to_string(&path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert!(json["token"].is_null());
    assert!(store.load().await.unwrap().token.is_none());
}

#[test]
fn test_session_debug_redacts_token() {
    let session = Session::new("secret-bearer");
    let debug = format!("{:?}", session);
    assert!(!debug.contains("secret-bearer"));
    assert_eq!(session.token(), "secret-bearer");
}

#[tokio::test(start_paused = true)]
async fn test_wait_for_callback_returns_outcome() {
    let state: CallbackState = Arc::new(Mutex::new(CallbackSlot::default()));

    let writer = Arc::clone(&state);
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(3)).await;
        writer
            .lock()
            .await
            .record(CallbackOutcome::Token("late".to_string()));
    });

    let outcome = wait_for_callback(&state, Duration::from_secs(60)).await;
    assert_eq!(outcome, Some(CallbackOutcome::Token("late".to_string())));

    // taken once, still remembered as received
    let slot = state.lock().await;
    assert!(slot.received());
}

#[tokio::test(start_paused = true)]
async fn test_wait_for_callback_times_out() {
    let state: CallbackState = Arc::new(Mutex::new(CallbackSlot::default()));
    let outcome = wait_for_callback(&state, Duration::from_secs(5)).await;
    assert_eq!(outcome, None);
}
