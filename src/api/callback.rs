use std::collections::HashMap;

use axum::{
    Extension,
    extract::{OriginalUri, Query},
    response::Html,
};

use crate::{
    management::token_from_callback_url, server::AppState, spotify::auth::CallbackOutcome,
    warning,
};

/// Served when the token is still in the fragment, which never reaches the
/// server. The script turns `#` into `?` and reloads.
const FRAGMENT_REWRITE_PAGE: &str = r#"<!doctype html>
<html>
<head><title>spotdash</title></head>
<body>
<p>Completing authorization...</p>
<script>
if (window.location.hash) {
  window.location.replace(window.location.href.replace('#', '?'));
} else {
  document.body.innerHTML = '<h4>Missing access token.</h4>';
}
</script>
</body>
</html>"#;

pub async fn callback(
    OriginalUri(uri): OriginalUri,
    Query(params): Query<HashMap<String, String>>,
    Extension(state): Extension<AppState>,
) -> Html<&'static str> {
    if let Some(reason) = params.get("error") {
        warning!("Authorization was denied: {}", reason);
        state
            .callback
            .lock()
            .await
            .record(CallbackOutcome::Denied(reason.clone()));
        return Html("<h4>Authorization denied.</h4>");
    }

    match token_from_callback_url(&uri.to_string()) {
        Some(token) => {
            state.callback.lock().await.record(CallbackOutcome::Token(token));
            Html("<h2>Authorization successful.</h2><p>Close browser window.</p>")
        }
        None => Html(FRAGMENT_REWRITE_PAGE),
    }
}
