#![forbid(unsafe_code)]

//! `presence-board-ctl`: operator CLI for `presence-board`.
//!
//! Posts the daily board message (typically from a scheduler on weekday
//! mornings) and runs the maintenance purge without going through HTTP.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use presence_board::config::GlobalConfig;
use presence_board::day::DayKey;
use presence_board::persistence::db;
use presence_board::persistence::status_repo::{PurgeScope, StatusRepo};
use presence_board::slack::client::SlackService;
use presence_board::slack::handlers::board::post_daily_board;
use presence_board::{AppError, Result};

#[derive(Debug, Parser)]
#[command(
    name = "presence-board-ctl",
    about = "Operator CLI for presence-board",
    version,
    long_about = None
)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Post today's board message to the configured channel.
    Post {
        /// Post to this channel instead of the configured one.
        #[arg(long)]
        channel: Option<String>,
    },

    /// Delete status records.
    Purge {
        /// Delete every record, not only those that carry a user.
        #[arg(long)]
        all: bool,
    },
}

fn main() {
    let args = Cli::parse();
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .try_init();

    let result = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::Config(format!("failed to build tokio runtime: {err}")))
        .and_then(|runtime| runtime.block_on(run(args)));

    if let Err(err) = result {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

async fn run(args: Cli) -> Result<()> {
    let mut config = GlobalConfig::load_from_path(&args.config)?;

    match args.command {
        Command::Post { channel } => {
            config.load_credentials().await?;
            let channel = channel.unwrap_or_else(|| config.slack.channel_id.clone());
            let slack = SlackService::new(&config.slack)?;
            let day = DayKey::today(config.utc_offset_hours)?;
            let ts = post_daily_board(&slack, &channel, day).await?;
            println!("{ts}");
        }
        Command::Purge { all } => {
            let scope = if all {
                PurgeScope::All
            } else {
                PurgeScope::WithUser
            };
            let pool = db::connect(&config.database_path).await?;
            let repo = StatusRepo::new(Arc::new(pool));
            let deleted = repo.delete_all(scope).await?;
            if deleted == 0 {
                return Err(AppError::NotFound("no records to delete".into()));
            }
            println!("deleted {deleted} record(s)");
        }
    }

    Ok(())
}
