//! Implements the very simple `Sheet` trait using in-memory data for testing purposes.
//!
//! Note: this is compiled even in the "production" version of this app so that we can run the
//! whole bot, top-to-bottom, without using Google Sheets.

use crate::sheets::{Sheet, LIMITS, TRANSACTIONS};
use crate::Result;
use anyhow::Context;
use std::collections::HashMap;
use std::io::Cursor;

/// An implementation of the `Sheet` trait that does not use Google sheets. It can hold any data in
/// memory and, by default, is seeded with some existing data.
pub(crate) struct TestSheet {
    pub(crate) data: HashMap<String, Vec<Vec<String>>>,
}

impl TestSheet {
    /// Create a new `TestSheet` using `data`. The map key is sheet name and the map value is the
    /// rows of the sheet.
    pub(crate) fn new(data: HashMap<String, Vec<Vec<String>>>) -> Self {
        Self { data }
    }
}

#[async_trait::async_trait]
impl Sheet for TestSheet {
    async fn get(&mut self, sheet_name: &str) -> Result<Vec<Vec<String>>> {
        self.data
            .get(sheet_name)
            .with_context(|| format!("Sheet '{sheet_name}' not found"))
            .cloned()
    }

    async fn append(&mut self, sheet_name: &str, row: &[String]) -> Result<()> {
        self.data
            .get_mut(sheet_name)
            .with_context(|| format!("Sheet '{sheet_name}' not found"))?
            .push(row.to_vec());
        Ok(())
    }
}

impl Default for TestSheet {
    /// Loads seed data from this module.
    fn default() -> Self {
        Self::new(default_data())
    }
}

/// Provides the seed data from this module.
fn default_data() -> HashMap<String, Vec<Vec<String>>> {
    let mut map = HashMap::new();
    let transactions = load_csv(TRANSACTION_DATA).unwrap();
    map.insert(TRANSACTIONS.to_string(), transactions);
    let limits = load_csv(LIMIT_DATA).unwrap();
    map.insert(LIMITS.to_string(), limits);
    map
}

/// Loads data from a CSV-formatted string.
fn load_csv(csv_data: &str) -> Result<Vec<Vec<String>>> {
    let bytes = csv_data.as_bytes();
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false) // Ensure headers are treated as part of the data
        .from_reader(Cursor::new(bytes));

    let mut rows: Vec<Vec<String>> = Vec::new();

    for result in rdr.records() {
        let record = result?;
        let row: Vec<String> = record.iter().map(|field| field.to_string()).collect();
        rows.push(row);
    }
    Ok(rows)
}

/// Seed transaction data.
const TRANSACTION_DATA: &str = r##"Date,Type,Category,Amount,User
2025-07-01,Expense,Groceries,640,Anna
2025-07-02,Expense,Transport,180,Pavel
2025-07-03,Expense,Groceries,1215,Anna
2025-07-05,Income,Salary,95000,Pavel
2025-07-08,Expense,Restaurants,2400,Pavel
2025-07-11,Expense,Groceries,890,Anna
2025-07-14,Expense,Transport,220,Anna
2025-07-19,Income,Gift,5000,Anna
2025-07-21,Expense,Restaurants,1750,Pavel
2025-07-25,Expense,Groceries,1430,Pavel
"##;

/// Seed limit data.
const LIMIT_DATA: &str = r##"Category,Month,Limit Amount
Groceries,2025-07,5000
Transport,2025-07,2000
Restaurants,2025-07,6000
Groceries,2025-08,5000
Transport,2025-08,2000
"##;
