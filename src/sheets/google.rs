//! Implements the `Sheet` trait using the Google Sheets API.
//!
//! Authentication uses a service-account key file. A bot running unattended
//! has no interactive OAuth flow; the key is created once in the Google
//! console and the spreadsheet is shared with the service account.

use crate::sheets::Sheet;
use crate::{Config, Result};
use anyhow::Context;
use google_sheets4::api::ValueRange;
use google_sheets4::hyper::client::HttpConnector;
use google_sheets4::hyper_rustls::HttpsConnector;
use google_sheets4::{hyper, hyper_rustls, Sheets};
use tracing::{debug, trace};

/// Implements the `Sheet` trait over an authenticated Sheets API hub.
pub(super) struct GoogleSheet {
    spreadsheet_id: String,
    hub: Sheets<HttpsConnector<HttpConnector>>,
}

impl GoogleSheet {
    /// Creates an authenticated Google Sheets API client.
    ///
    /// # Errors
    /// Returns an error if the key file is missing or invalid, or if the
    /// authenticator cannot be created.
    pub(super) async fn new(config: &Config) -> Result<Self> {
        anyhow::ensure!(
            !config.spreadsheet_id().is_empty(),
            "A spreadsheet ID is required when not in test mode"
        );
        debug!("Creating Google Sheets API client");

        let key = yup_oauth2::read_service_account_key(config.credentials())
            .await
            .with_context(|| {
                format!(
                    "Failed to read service account key from {}",
                    config.credentials().display()
                )
            })?;

        let auth = yup_oauth2::ServiceAccountAuthenticator::builder(key)
            .build()
            .await
            .context("Failed to create authenticator")?;

        let https = hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()?
            .https_or_http()
            .enable_http1()
            .build();
        let client = hyper::Client::builder().build(https);
        let hub = Sheets::new(client, auth);

        debug!("Google Sheets API client created successfully");
        Ok(Self {
            spreadsheet_id: config.spreadsheet_id().to_string(),
            hub,
        })
    }
}

#[async_trait::async_trait]
impl Sheet for GoogleSheet {
    async fn get(&mut self, sheet_name: &str) -> Result<Vec<Vec<String>>> {
        trace!("get for {sheet_name}");
        let range = format!("{sheet_name}!A:Z"); // Get all columns
        let (_response, value_range) = self
            .hub
            .spreadsheets()
            .values_get(&self.spreadsheet_id, &range)
            .doit()
            .await
            .with_context(|| format!("Failed to fetch {sheet_name} sheet data"))?;
        let values = value_range.values.unwrap_or_default();
        Ok(values
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect())
    }

    async fn append(&mut self, sheet_name: &str, row: &[String]) -> Result<()> {
        trace!("append to {sheet_name}");
        let values = ValueRange {
            major_dimension: Some("ROWS".to_string()),
            range: None,
            values: Some(vec![row
                .iter()
                .map(|s| serde_json::Value::String(s.clone()))
                .collect()]),
        };
        let range = format!("{sheet_name}!A:Z");
        self.hub
            .spreadsheets()
            .values_append(values, &self.spreadsheet_id, &range)
            .value_input_option("USER_ENTERED")
            .doit()
            .await
            .with_context(|| format!("Failed to append a row to the {sheet_name} sheet"))?;
        Ok(())
    }
}

/// Sheet cells come back as JSON values; everything in this data model is a
/// string.
fn cell_to_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}
