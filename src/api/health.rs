use axum::{Extension, response::Json};
use serde_json::{Value, json};

use crate::server::AppState;

/// Liveness of the callback server and whether it is still waiting for the
/// authorization redirect.
pub async fn health(Extension(state): Extension<AppState>) -> Json<Value> {
    let waiting = !state.callback.lock().await.received();

    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "waiting_for_callback": waiting,
    }))
}
