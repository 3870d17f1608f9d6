use chrono::DateTime;

use crate::{config, info, management::TokenManager, warning};

/// Shows where the session token lives and which configuration is in effect.
pub async fn info() {
    let manager = TokenManager::from_config();

    info!("Environment: {:?}", config::environment());
    let redirect_uri = config::spotify_redirect_uri();
    let server_addr = config::server_addr();
    info!("Callback URL: {}", redirect_uri);
    info!("Callback server: {}", server_addr);
    if !config::is_local_callback(&redirect_uri, &server_addr) {
        warning!("Callback URL does not reach the callback server. Set SPOTIFY_API_REDIRECT_URI.");
    }
    info!("Scopes: {}", config::spotify_scopes().join(" "));
    info!("Token file: {}", manager.store().path().display());

    match manager.status().await {
        Ok(status) if status.present => {
            let obtained = status
                .obtained_at
                .and_then(|ts| DateTime::from_timestamp(ts, 0))
                .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                .unwrap_or_else(|| "unknown".to_string());
            info!("Session token: stored (obtained {})", obtained);
        }
        Ok(_) => warning!("Session token: none. Run spotdash auth."),
        Err(e) => warning!("Cannot read stored token. Err: {}", e),
    }
}
