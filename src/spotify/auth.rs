use std::{future::Future, sync::Arc, time::Duration};

use tokio::{sync::Mutex, task::JoinHandle};

use crate::{
    Res, config,
    management::{Authorizer, Session, SessionState, TokenManager, TokenStore},
    server::start_api_server,
};

const CALLBACK_TIMEOUT: Duration = Duration::from_secs(60);
const CALLBACK_POLL: Duration = Duration::from_secs(1);

/// What the callback route received from the authorization server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    Token(String),
    Denied(String),
}

/// Last outcome recorded by the callback route.
///
/// `received` stays set after the outcome has been taken by the waiting flow.
#[derive(Debug, Default)]
pub struct CallbackSlot {
    outcome: Option<CallbackOutcome>,
    received: bool,
}

impl CallbackSlot {
    pub fn record(&mut self, outcome: CallbackOutcome) {
        self.outcome = Some(outcome);
        self.received = true;
    }

    pub fn take(&mut self) -> Option<CallbackOutcome> {
        self.outcome.take()
    }

    pub fn received(&self) -> bool {
        self.received
    }
}

/// Shared between the callback route and the waiting authorization flow.
pub type CallbackState = Arc<Mutex<CallbackSlot>>;

/// Builds the implicit-grant authorization URL.
///
/// Scopes are joined with `%20` and the callback URL is percent-encoded, so
/// the result is:
///
/// ```text
/// {auth_url}?response_type=token&client_id={id}&scope={a%20b}&redirect_uri={encoded}
/// ```
pub fn authorize_url(auth_url: &str, client_id: &str, scopes: &[String], redirect_uri: &str) -> String {
    let scope = scopes
        .iter()
        .map(|s| urlencoding::encode(s).into_owned())
        .collect::<Vec<String>>()
        .join("%20");

    format!(
        "{auth_url}?response_type=token&client_id={client_id}&scope={scope}&redirect_uri={redirect_uri}",
        auth_url = auth_url,
        client_id = urlencoding::encode(client_id),
        scope = scope,
        redirect_uri = urlencoding::encode(redirect_uri),
    )
}

pub fn authorize_url_from_config() -> String {
    authorize_url(
        &config::spotify_apiauth_url(),
        &config::spotify_client_id(),
        &config::spotify_scopes(),
        &config::spotify_redirect_uri(),
    )
}

/// Delivers the outcome of an authorization redirect.
pub trait CallbackReceiver: Send + Sync {
    /// `None` when nothing arrived in time.
    fn receive(&self) -> impl Future<Output = Option<CallbackOutcome>> + Send;
}

/// Local server receiving the authorization redirect on `/analyze`.
///
/// The server task is aborted when the value is dropped.
pub struct CallbackServer {
    state: CallbackState,
    task: JoinHandle<()>,
}

impl CallbackServer {
    /// Starts the server in a background task.
    ///
    /// Fails when the configured callback URL cannot reach the server, e.g.
    /// the hosted production URL.
    pub fn start(authorize_url: String) -> Res<Self> {
        let redirect_uri = config::spotify_redirect_uri();
        let server_addr = config::server_addr();
        if !config::is_local_callback(&redirect_uri, &server_addr) {
            return Err(format!(
                "callback URL {} does not reach the local server at {}; set SPOTIFY_API_REDIRECT_URI",
                redirect_uri, server_addr
            )
            .into());
        }

        let state: CallbackState = Arc::new(Mutex::new(CallbackSlot::default()));
        let server_state = Arc::clone(&state);
        let task = tokio::spawn(async move {
            if let Err(e) = start_api_server(server_state, authorize_url).await {
                tracing::error!(error = %e, "callback server stopped");
            }
        });

        Ok(Self { state, task })
    }
}

impl CallbackReceiver for CallbackServer {
    async fn receive(&self) -> Option<CallbackOutcome> {
        wait_for_callback(&self.state, CALLBACK_TIMEOUT).await
    }
}

impl Drop for CallbackServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Returns a usable session, authorizing in the browser when none is stored.
///
/// Returns `Ok(None)` if the user denied access or no callback arrived.
pub async fn login<S, A, R>(manager: &TokenManager<S, A>, receiver: &R) -> Res<Option<Session>>
where
    S: TokenStore,
    A: Authorizer,
    R: CallbackReceiver,
{
    match manager.initialize(None).await? {
        SessionState::Ready(session) => Ok(Some(session)),
        SessionState::Redirected => receive_session(manager, receiver).await,
    }
}

/// Clears the stored token, authorizes again and waits for the new token.
pub async fn relogin<S, A, R>(manager: &TokenManager<S, A>, receiver: &R) -> Res<Option<Session>>
where
    S: TokenStore,
    A: Authorizer,
    R: CallbackReceiver,
{
    manager.invalidate().await?;
    receive_session(manager, receiver).await
}

async fn receive_session<S, A, R>(manager: &TokenManager<S, A>, receiver: &R) -> Res<Option<Session>>
where
    S: TokenStore,
    A: Authorizer,
    R: CallbackReceiver,
{
    match receiver.receive().await {
        Some(CallbackOutcome::Token(token)) => manager.accept_token(&token).await.map(Some),
        Some(CallbackOutcome::Denied(reason)) => {
            tracing::warn!(%reason, "authorization denied");
            Ok(None)
        }
        None => Ok(None),
    }
}

/// Waits for the callback route to record an outcome.
///
/// Checks the shared state once per second until `max_wait` elapses.
pub async fn wait_for_callback(state: &CallbackState, max_wait: Duration) -> Option<CallbackOutcome> {
    let start = tokio::time::Instant::now();

    while start.elapsed() < max_wait {
        if let Some(outcome) = state.lock().await.take() {
            return Some(outcome);
        }
        tokio::time::sleep(CALLBACK_POLL).await;
    }

    None
}
