//! # CLI Module
//!
//! This module provides the command-line interface layer for spotdash. It
//! implements all user-facing commands and coordinates between the token
//! manager, the dashboard aggregator and terminal output.
//!
//! ## Command Categories
//!
//! ### Authorization
//!
//! - [`auth`] - Authorizes with the implicit grant unless a token is stored
//! - [`logout`] - Clears the stored token
//!
//! ### Listening Data
//!
//! - [`dashboard`] - Loads and prints the dashboard, optionally watching playback
//! - [`now_playing`] - Prints the current playback once
//!
//! ### Information Commands
//!
//! - [`info`] - Shows configuration in effect and token status
//!
//! ## Architecture Design
//!
//! ```text
//! CLI Layer (User Interface)
//!     ↓
//! Dashboard / Management Layer
//!     ↓
//! Spotify Layer (SpotifyApi)
//!     ↓
//! Network Layer (HTTP Requests)
//! ```
//!
//! ## Error Handling
//!
//! A failed dashboard load is never shown as partial data. The token is
//! cleared and the user is sent through authorization again. Anything else
//! that cannot be recovered ends the process through `error!`.
//!
//! ## Usage Patterns
//!
//! ```bash
//! spotdash auth                            # Authorize with Spotify
//! spotdash dashboard                       # Print the dashboard
//! spotdash dashboard --watch               # Keep the now-playing bar live
//! spotdash dashboard --time-range long_term
//! spotdash now-playing --open              # Open the current track
//! ```

mod auth;
mod dashboard;
mod info;
mod logout;
mod now_playing;

pub use auth::auth;
pub use dashboard::dashboard;
pub use dashboard::render;
pub use info::info;
pub use logout::logout;
pub use now_playing::now_playing;
