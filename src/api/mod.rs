//! # API Module
//!
//! HTTP handlers for the local server that stands in for the dashboard's two
//! browser routes while the CLI waits for the authorization redirect.
//!
//! ## Endpoints
//!
//! - [`home`] - `/`, the authorize entry point. Redirects to `/analyze` when a
//!   token is already stored, otherwise to the Spotify authorization page.
//! - [`callback`] - `/analyze`, the redirect target of the implicit grant. The
//!   token arrives in the URL fragment, which browsers never send to a server,
//!   so the first hit returns a page that moves the fragment into the query
//!   string and reloads. The second hit carries `access_token` as a query
//!   parameter and hands it to the waiting CLI.
//! - [`health`] - service, version and whether the callback is still awaited.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use spotdash::server::{router, AppState};
//!
//! let app = router(state);
//! axum::serve(listener, app).await?;
//! ```

mod callback;
mod health;
mod home;

pub use callback::callback;
pub use health::health;
pub use home::home;
