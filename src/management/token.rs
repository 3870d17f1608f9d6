use std::{future::Future, path::PathBuf};

use chrono::Utc;
use reqwest::Url;

use crate::{
    Res, config,
    management::{Session, SessionState},
    spotify::auth::authorize_url_from_config,
    types::StoredToken,
    warning,
};

/// Persistence for the session token.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> impl Future<Output = Res<StoredToken>> + Send;
    fn persist(&self, token: &str) -> impl Future<Output = Res<()>> + Send;
    fn clear(&self) -> impl Future<Output = Res<()>> + Send;
}

/// Sends the user to the authorization endpoint.
pub trait Authorizer: Send + Sync {
    fn authorize(&self, url: &str) -> Res<()>;
}

/// Where the session token comes from on startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSource {
    Persisted(String),
    Callback(String),
    Authorize,
}

/// Picks the token source: a persisted token wins over one in the callback URL.
pub fn resolve_token(persisted: Option<&str>, callback_url: Option<&str>) -> TokenSource {
    if let Some(token) = persisted.filter(|t| !t.is_empty()) {
        return TokenSource::Persisted(token.to_string());
    }

    match callback_url.and_then(token_from_callback_url) {
        Some(token) => TokenSource::Callback(token),
        None => TokenSource::Authorize,
    }
}

/// Reads `access_token` from a callback URL.
///
/// The token arrives in the fragment (`#access_token=...`). The fragment is
/// folded into the query string so the value can be read with regular query
/// parsing. Relative URLs such as `/analyze?access_token=...` are accepted as
/// well.
pub fn token_from_callback_url(url: &str) -> Option<String> {
    let rewritten = match url.split_once('#') {
        Some((head, fragment)) if head.contains('?') => format!("{}&{}", head, fragment),
        Some((head, fragment)) => format!("{}?{}", head, fragment),
        None => url.to_string(),
    };
    let base = Url::parse("http://localhost/").ok()?;
    let parsed = Url::options().base_url(Some(&base)).parse(&rewritten).ok()?;

    parsed
        .query_pairs()
        .find(|(key, _)| key == "access_token")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Whether a token is stored, and since when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenStatus {
    pub present: bool,
    pub obtained_at: Option<i64>,
}

/// Owns the session token.
///
/// Tokens come from the store or from the authorization callback. Without a
/// token, and after any failed dashboard load, the user is redirected to the
/// authorization endpoint exactly once.
pub struct TokenManager<S, A> {
    store: S,
    authorizer: A,
    authorize_url: String,
}

impl TokenManager<FileTokenStore, BrowserAuthorizer> {
    pub fn from_config() -> Self {
        Self::new(
            FileTokenStore::default_location(),
            BrowserAuthorizer,
            authorize_url_from_config(),
        )
    }
}

impl<S: TokenStore, A: Authorizer> TokenManager<S, A> {
    pub fn new(store: S, authorizer: A, authorize_url: String) -> Self {
        Self {
            store,
            authorizer,
            authorize_url,
        }
    }

    pub fn authorize_url(&self) -> &str {
        &self.authorize_url
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn authorizer(&self) -> &A {
        &self.authorizer
    }

    /// The persisted session, if any.
    pub async fn current(&self) -> Res<Option<Session>> {
        let stored = self.store.load().await?;
        Ok(stored.token.filter(|t| !t.is_empty()).map(Session::new))
    }

    /// Resolves the session for one dashboard load.
    ///
    /// A token found only in `callback_url` is persisted first. With no token
    /// anywhere the authorizer is invoked once and `Redirected` is returned.
    pub async fn initialize(&self, callback_url: Option<&str>) -> Res<SessionState> {
        let stored = self.store.load().await?;

        match resolve_token(stored.token.as_deref(), callback_url) {
            TokenSource::Persisted(token) => Ok(SessionState::Ready(Session::new(token))),
            TokenSource::Callback(token) => {
                let session = self.accept_token(&token).await?;
                Ok(SessionState::Ready(session))
            }
            TokenSource::Authorize => {
                tracing::info!("no session token available, redirecting to authorization");
                self.authorizer.authorize(&self.authorize_url)?;
                Ok(SessionState::Redirected)
            }
        }
    }

    /// Persists the token carried by a callback URL.
    pub async fn accept_callback(&self, url: &str) -> Res<Option<Session>> {
        match token_from_callback_url(url) {
            Some(token) => Ok(Some(self.accept_token(&token).await?)),
            None => Ok(None),
        }
    }

    pub async fn accept_token(&self, token: &str) -> Res<Session> {
        self.store.persist(token).await?;
        Ok(Session::new(token))
    }

    /// Clears the token and redirects to authorization once.
    pub async fn invalidate(&self) -> Res<()> {
        tracing::warn!("invalidating session token");
        self.store.clear().await?;
        self.authorizer.authorize(&self.authorize_url)
    }

    /// Clears the token without redirecting.
    pub async fn clear(&self) -> Res<()> {
        self.store.clear().await
    }

    pub async fn status(&self) -> Res<TokenStatus> {
        let stored = self.store.load().await?;
        let present = stored.token.as_deref().is_some_and(|t| !t.is_empty());
        Ok(TokenStatus {
            present,
            obtained_at: stored.obtained_at.filter(|_| present),
        })
    }
}

/// Token persisted as JSON in the local data directory.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn default_location() -> Self {
        let mut path = config::data_dir();
        path.push("cache/token.json");
        Self::new(path)
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    async fn write(&self, stored: &StoredToken) -> Res<()> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(stored)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    async fn load(&self) -> Res<StoredToken> {
        let content = match async_fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(StoredToken::default());
            }
            Err(e) => return Err(e.into()),
        };

        Ok(serde_json::from_str(&content)?)
    }

    async fn persist(&self, token: &str) -> Res<()> {
        self.write(&StoredToken {
            token: Some(token.to_string()),
            obtained_at: Some(Utc::now().timestamp()),
        })
        .await
    }

    async fn clear(&self) -> Res<()> {
        self.write(&StoredToken::default()).await
    }
}

/// Opens the authorization page in the default browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserAuthorizer;

impl Authorizer for BrowserAuthorizer {
    fn authorize(&self, url: &str) -> Res<()> {
        if webbrowser::open(url).is_err() {
            warning!(
                "Failed to open browser. Please navigate to the following URL manually:\n{}",
                url
            )
        }
        Ok(())
    }
}
