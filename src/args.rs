//! These structs provide the CLI interface for the kassa bot.

use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::filter::LevelFilter;

/// kassa: a Telegram bookkeeping bot backed by a Google Sheet.
///
/// The bot records income and expense transactions into a "Transactions"
/// worksheet and reports spending against the per-month category caps held in
/// a "Limits" worksheet. There are no subcommands: starting the process
/// starts the long-polling listen loop.
///
/// You will need a Telegram bot token (talk to @BotFather) and a Google
/// service-account key with access to the spreadsheet. Share the spreadsheet
/// with the service account's email address.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The Telegram bot API token.
    #[arg(long, env = "TELEGRAM_TOKEN", hide_env_values = true)]
    bot_token: String,

    /// The path to the Google service-account key JSON file.
    #[arg(long, env = "GOOGLE_CREDENTIALS", default_value = "creds.json")]
    credentials: PathBuf,

    /// The ID of the Google spreadsheet that holds the Transactions and
    /// Limits worksheets. Not needed in test mode.
    #[arg(long, env = "SPREADSHEET_ID", default_value = "")]
    spreadsheet_id: String,
}

impl Args {
    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn bot_token(&self) -> &str {
        &self.bot_token
    }

    pub fn credentials(&self) -> &Path {
        &self.credentials
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }
}
