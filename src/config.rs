//! Runtime configuration for the bot.
//!
//! Configuration is flat: everything arrives through command-line arguments
//! or their environment fallbacks. There is no config file or data
//! directory; the spreadsheet is the only store.

use crate::args::Args;
use std::path::{Path, PathBuf};

/// The `Config` object represents the configuration of the app: the chat
/// credentials and the spreadsheet credentials. Worksheet names are fixed
/// literals and are not configurable.
#[derive(Debug, Clone)]
pub struct Config {
    bot_token: String,
    credentials: PathBuf,
    spreadsheet_id: String,
}

impl Config {
    pub fn new(args: &Args) -> Self {
        Self {
            bot_token: args.bot_token().to_string(),
            credentials: args.credentials().to_path_buf(),
            spreadsheet_id: args.spreadsheet_id().to_string(),
        }
    }

    /// The Telegram bot API token.
    pub fn bot_token(&self) -> &str {
        &self.bot_token
    }

    /// Path to the Google service-account key JSON file.
    pub fn credentials(&self) -> &Path {
        &self.credentials
    }

    /// The ID of the spreadsheet holding the Transactions and Limits sheets.
    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    #[cfg(test)]
    pub fn new_for_test(
        bot_token: impl Into<String>,
        credentials: impl Into<PathBuf>,
        spreadsheet_id: impl Into<String>,
    ) -> Self {
        Self {
            bot_token: bot_token.into(),
            credentials: credentials.into(),
            spreadsheet_id: spreadsheet_id.into(),
        }
    }
}
