//! `rollcall`: live department attendance board for the terminal.
//!
//! Built on [ratatui](https://ratatui.rs). A background data bridge drives a
//! [`LiveFeedClient`](rollcall_core::LiveFeedClient) and forwards its events
//! into the app loop, which folds them into a
//! [`BoardState`](rollcall_core::BoardState) and renders one page at a time.
//!
//! Logs are written to a file (default `/tmp/rollcall.log`) to avoid
//! corrupting the terminal UI.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use secrecy::SecretString;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use rollcall_core::{FeedConfig, LayoutConfig};

use crate::app::App;

/// Live department attendance board.
#[derive(Parser, Debug)]
#[command(name = "rollcall", version, about)]
struct Cli {
    /// Dashboard feed URL (e.g., wss://attendance.example.com/ws/dashboard)
    #[arg(short = 'u', long, env = "ROLLCALL_URL")]
    url: Option<String>,

    /// Bearer token for the feed
    #[arg(short = 't', long, env = "ROLLCALL_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Config profile to use (defaults to `default_profile`)
    #[arg(short = 'p', long)]
    profile: Option<String>,

    /// Columns per page
    #[arg(long)]
    columns: Option<usize>,

    /// Employees per column
    #[arg(long)]
    rows: Option<usize>,

    /// Log file path (defaults to /tmp/rollcall.log)
    #[arg(long, default_value = "/tmp/rollcall.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Default filter directives for a `-v` count, covering the binary and
/// both library crates.
fn log_directives(verbose: u8) -> String {
    let level = ["warn", "info", "debug"]
        .get(usize::from(verbose))
        .copied()
        .unwrap_or("trace");
    ["rollcall", "rollcall_core", "rollcall_api"]
        .map(|target| format!("{target}={level}"))
        .join(",")
}

/// Log to `cli.log_file`, never to the terminal the board draws on.
/// `RUST_LOG` overrides the `-v` level. Keep the guard alive until exit.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_directives(cli.verbose)));

    let dir = cli.log_file.parent().unwrap_or(Path::new("."));
    let file = cli
        .log_file
        .file_name()
        .unwrap_or(OsStr::new("rollcall.log"));
    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false).with_target(true))
        .init();

    guard
}

/// Resolve feed and layout settings.
///
/// Priority: CLI flags > `ROLLCALL_*` env > config profile > defaults.
fn build_settings(cli: &Cli) -> Result<(FeedConfig, LayoutConfig)> {
    let cfg = rollcall_config::load_config().wrap_err("failed to load config")?;

    let (mut feed, layout) = if let Some(url) = cli.url.as_deref() {
        rollcall_config::url_to_feed_config(url, &cfg.defaults)
            .wrap_err_with(|| format!("invalid feed URL: {url}"))?
    } else {
        let (name, profile) = cfg.profile(cli.profile.as_deref()).map_err(|e| {
            eyre!(
                "{e}: pass --url or add a profile to {}",
                rollcall_config::config_path().display()
            )
        })?;
        rollcall_config::profile_to_feed_config(profile, name, &cfg.defaults)?
    };

    if let Some(token) = &cli.token {
        feed = feed.with_token(SecretString::from(token.clone()));
    }

    let layout = rollcall_config::layout_config(
        cli.columns.unwrap_or(layout.max_columns_per_page),
        cli.rows.unwrap_or(layout.max_rows_per_column),
    )?;

    Ok((feed, layout))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tui::install_hooks()?;
    let _log_guard = setup_tracing(&cli);

    let (feed, layout) = build_settings(&cli)?;
    info!(
        url = %feed.url,
        columns = layout.max_columns_per_page,
        rows = layout.max_rows_per_column,
        "starting rollcall"
    );

    App::new(feed, layout).run().await
}
