use std::fmt;

/// Bearer credential for the Spotify Web API.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

// keep the bearer out of logs
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").field("token", &"<redacted>").finish()
    }
}

/// Outcome of resolving the session on startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Ready(Session),
    /// No token was available; the user was sent to the authorization page.
    Redirected,
}
