pub mod args;
mod bot;
mod config;
mod engine;
mod error;
pub mod model;
mod report;
mod sheets;

pub use bot::run_bot;
pub use config::Config;
pub use engine::{ChatUser, Engine, Reply};
pub use error::Error;
pub use error::Result;
pub use sheets::{create_ledger, Ledger, LimitFilter, Mode, TransactionFilter};
