//! spotdash: a terminal dashboard of your Spotify listening data.
//!
//! Authorization uses the implicit grant. The token is delivered to a short
//! lived local server, persisted in the data directory and reused until a
//! dashboard load fails. A load shows current playback, top artists, top
//! tracks, recently played tracks and saved albums.
//!
//! # Modules
//!
//! - `api` - Route handlers of the local callback server
//! - `cli` - One function per subcommand
//! - `config` - Settings from the environment and the `.env` file
//! - `dashboard` - Concurrent load, artist enrichment and playback polling
//! - `logging` - `tracing` subscriber setup
//! - `management` - Session token lifecycle and persistence
//! - `server` - Router and listener for the authorization redirect
//! - `spotify` - Web API client and authorization flow
//! - `types` - API payloads and table rows
//! - `utils` - Small helpers shared by the modules above

pub mod api;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod logging;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// Result with a boxed, thread-safe error. Used wherever the caller only
/// reports the failure.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[doc(hidden)]
pub fn print_status(symbol: colored::ColoredString, message: std::fmt::Arguments<'_>) {
    println!("[{}] {}", symbol, message);
}

/// Status line with a blue `o`.
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    $crate::print_status("o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Status line with a green check mark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    $crate::print_status("✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Status line with a red `!`, then exits with code 1.
///
/// ```ignore
/// error!("Cannot authorize. Err: {}", e);
/// // not reached
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    $crate::print_status("!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Status line with a yellow `!` for problems the command recovers from,
/// such as an expired session.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    $crate::print_status("!".yellow().bold(), std::format_args!($($arg)*));
  })
}
