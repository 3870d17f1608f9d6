use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use spotdash::{
    cli, config,
    dashboard::{DEFAULT_LIST_LIMIT, DEFAULT_TOP_ARTISTS_LIMIT, DashboardOptions},
    error, logging,
    spotify::TimeRange,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    /// Show your listening dashboard
    Dashboard(DashboardArgs),

    /// Show what is playing right now
    NowPlaying(NowPlayingArgs),

    /// Forget the stored session token
    Logout,

    /// Show configuration and session status
    Info,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct DashboardArgs {
    /// Number of saved albums, recent songs and top tracks to show
    #[clap(long, default_value_t = DEFAULT_LIST_LIMIT, value_parser = clap::value_parser!(u32).range(1..=16))]
    pub limit: u32,

    /// Number of top artists to show
    #[clap(long, default_value_t = DEFAULT_TOP_ARTISTS_LIMIT, value_parser = clap::value_parser!(u32).range(1..=50))]
    pub top_artists: u32,

    /// Time window for top tracks
    #[clap(long, value_enum, default_value_t = TimeRange::ShortTerm)]
    pub time_range: TimeRange,

    /// Keep refreshing the current playback every 5 seconds
    #[clap(long)]
    pub watch: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct NowPlayingArgs {
    /// Open the current item in Spotify
    #[clap(long)]
    pub open: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    if let Err(e) = logging::init_logging() {
        error!("Cannot initialize logging. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth => cli::auth().await,
        Command::Dashboard(opt) => {
            let options = DashboardOptions {
                list_limit: opt.limit,
                top_artists_limit: opt.top_artists,
                time_range: opt.time_range,
            };
            cli::dashboard(options, opt.watch).await
        }
        Command::NowPlaying(opt) => cli::now_playing(opt.open).await,
        Command::Logout => cli::logout().await,
        Command::Info => cli::info().await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
