//! Configuration management for the Spotify listening dashboard.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. Every value has a built-in default so the dashboard
//! works without any configuration; the `.env` file and the process environment
//! only override.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults

use std::{
    env,
    net::{IpAddr, SocketAddr},
    path::PathBuf,
};

use reqwest::Url;

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";
pub const DEFAULT_CLIENT_ID: &str = "a676f0966c324aa18b3f4a5fde51446c";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEVELOPMENT_REDIRECT_URI: &str = "http://127.0.0.1:8888/analyze";
pub const PRODUCTION_REDIRECT_URI: &str = "https://main.d35uqst3r5ot6o.amplifyapp.com/analyze";

/// Scopes requested during authorization.
pub const DEFAULT_SCOPES: [&str; 6] = [
    "user-read-private",
    "user-read-email",
    "user-library-read",
    "user-read-recently-played",
    "user-top-read",
    "user-read-playback-state",
];

/// Deployment environment, selects the default callback URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }

    pub fn redirect_uri(&self) -> &'static str {
        match self {
            Environment::Development => DEVELOPMENT_REDIRECT_URI,
            Environment::Production => PRODUCTION_REDIRECT_URI,
        }
    }
}

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the data directory if it doesn't exist and loads environment
/// variables from `spotdash/.env` inside the platform-specific local data
/// directory. A missing `.env` file is not an error since every setting has a
/// default.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/spotdash/.env`
/// - macOS: `~/Library/Application Support/spotdash/.env`
/// - Windows: `%LOCALAPPDATA%/spotdash/.env`
///
/// # Errors
///
/// Returns an error if the data directory cannot be created or if the `.env`
/// file exists but cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path).map_err(|e| e.to_string())
}

/// Returns the application data directory, `<data_local_dir>/spotdash`.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotdash");
    path
}

/// Returns the deployment environment from `SPOTDASH_ENV`.
pub fn environment() -> Environment {
    env::var("SPOTDASH_ENV")
        .map(|v| Environment::from_name(&v))
        .unwrap_or(Environment::Development)
}

/// Returns the address the local callback server binds to.
///
/// Read from `SERVER_ADDRESS`, e.g. `127.0.0.1:8888`.
pub fn server_addr() -> String {
    env_or("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS)
}

/// Returns the Spotify API client ID used in the authorization request.
pub fn spotify_client_id() -> String {
    env_or("SPOTIFY_API_AUTH_CLIENT_ID", DEFAULT_CLIENT_ID)
}

/// Returns the Spotify callback URL.
///
/// `SPOTIFY_API_REDIRECT_URI` wins when set; otherwise the URL is picked by
/// [`environment`]. It must match a redirect URI registered for the client ID.
pub fn spotify_redirect_uri() -> String {
    env::var("SPOTIFY_API_REDIRECT_URI")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| environment().redirect_uri().to_string())
}

/// Whether `redirect_uri` points at the local callback server bound to
/// `server_addr`.
///
/// The hosted production callback is never local.
pub fn is_local_callback(redirect_uri: &str, server_addr: &str) -> bool {
    let (Ok(url), Ok(addr)) = (Url::parse(redirect_uri), server_addr.parse::<SocketAddr>()) else {
        return false;
    };

    if url.port_or_known_default() != Some(addr.port()) {
        return false;
    }

    let ip = match url.host_str() {
        Some("localhost") => return addr.ip().is_loopback() || addr.ip().is_unspecified(),
        Some(host) => match host.trim_matches(|c: char| c == '[' || c == ']').parse::<IpAddr>() {
            Ok(ip) => ip,
            Err(_) => return false,
        },
        None => return false,
    };

    ip == addr.ip() || (addr.ip().is_unspecified() && ip.is_loopback())
}

/// Returns the requested scopes as a list.
///
/// `SPOTIFY_API_AUTH_SCOPE` is a space-delimited list, e.g.
/// `user-top-read user-read-playback-state`.
pub fn spotify_scopes() -> Vec<String> {
    match env::var("SPOTIFY_API_AUTH_SCOPE") {
        Ok(scope) if !scope.trim().is_empty() => {
            scope.split_whitespace().map(str::to_string).collect()
        }
        _ => DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
    }
}

/// Returns the Spotify authorization endpoint.
pub fn spotify_apiauth_url() -> String {
    env_or("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL)
}

/// Returns the Spotify Web API base URL, e.g. `https://api.spotify.com/v1`.
pub fn spotify_apiurl() -> String {
    env_or("SPOTIFY_API_URL", DEFAULT_API_URL)
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
