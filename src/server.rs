use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{Extension, Router, routing::get};

use crate::{
    Res, api, config,
    management::FileTokenStore,
    spotify::auth::CallbackState,
};

/// State handed to the route handlers.
#[derive(Clone)]
pub struct AppState {
    pub callback: CallbackState,
    pub authorize_url: Arc<str>,
    pub store: FileTokenStore,
}

/// Routes of the local server: `/` is the authorize entry point, `/analyze`
/// receives the authorization redirect.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::home))
        .route("/analyze", get(api::callback))
        .route("/analyze/", get(api::callback))
        .route("/health", get(api::health))
        .layer(Extension(state))
}

pub async fn start_api_server(callback: CallbackState, authorize_url: String) -> Res<()> {
    let state = AppState {
        callback,
        authorize_url: Arc::from(authorize_url),
        store: FileTokenStore::default_location(),
    };

    let addr = SocketAddr::from_str(&config::server_addr())?;
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::debug!(%addr, "callback server listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}
