use axum::{Extension, response::Redirect};

use crate::{management::TokenStore, server::AppState};

/// Authorize entry point: straight to the dashboard when a token is stored,
/// otherwise to the authorization endpoint.
pub async fn home(Extension(state): Extension<AppState>) -> Redirect {
    let has_token = match state.store.load().await {
        Ok(stored) => stored.token.is_some_and(|t| !t.is_empty()),
        Err(e) => {
            tracing::warn!(error = %e, "cannot read stored token");
            false
        }
    };

    if has_token {
        Redirect::to("/analyze")
    } else {
        Redirect::to(&state.authorize_url)
    }
}
