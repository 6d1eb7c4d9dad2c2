//! The I/O boundary to the spreadsheet service.
//!
//! The `Sheet` trait is pure I/O (read a worksheet, append a row); all
//! parsing and filtering happens behind the `Ledger` trait in `ledger.rs`.

mod google;
mod ledger;
mod test_sheet;

pub use ledger::{Ledger, LimitFilter, TransactionFilter};
pub(crate) use ledger::LedgerImpl;
pub(crate) use test_sheet::TestSheet;

use crate::{Config, Result};

/// Worksheet names are fixed literals.
pub(crate) const TRANSACTIONS: &str = "Transactions";
pub(crate) const LIMITS: &str = "Limits";

/// Reads and writes one worksheet of the backing spreadsheet. No business
/// logic belongs here.
#[async_trait::async_trait]
pub(crate) trait Sheet {
    /// All rows of the named worksheet, as strings.
    async fn get(&mut self, sheet_name: &str) -> Result<Vec<Vec<String>>>;

    /// Append a single row to the named worksheet.
    async fn append(&mut self, sheet_name: &str, row: &[String]) -> Result<()>;
}

/// Whether to talk to Google Sheets or to the in-memory test sheet.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub enum Mode {
    #[default]
    Google,
    Test,
}

impl Mode {
    /// This allows for running the bot without hitting the Google APIs. When
    /// KASSA_IN_TEST_MODE is set and non-zero in length, then the mode will
    /// be Mode::Test, otherwise it will be Mode::Google.
    pub fn from_env() -> Self {
        match std::env::var("KASSA_IN_TEST_MODE") {
            Ok(value) if !value.is_empty() => Mode::Test,
            _ => Mode::Google,
        }
    }
}

/// Creates the data-access object for the configured mode.
pub async fn create_ledger(config: &Config, mode: Mode) -> Result<Box<dyn Ledger + Send>> {
    let sheet: Box<dyn Sheet + Send> = match mode {
        Mode::Google => Box::new(google::GoogleSheet::new(config).await?),
        Mode::Test => Box::new(TestSheet::default()),
    };
    Ok(Box::new(LedgerImpl::new(sheet)))
}
