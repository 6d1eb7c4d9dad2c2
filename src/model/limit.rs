use crate::model::{Amount, Mapping, MonthKey};
use crate::Result;
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

/// Represents the limit data from the Limits sheet, including the header
/// mapping. Limits are read-only: the sheet is the source of truth for which
/// categories are offered and what each month's cap is.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct Limits {
    mapping: Mapping,
    data: Vec<Limit>,
}

impl Limits {
    /// Parses worksheet rows into limits. The first row must be the header
    /// row; column meaning is taken from the header label.
    pub fn parse<S, R>(sheet_data: impl IntoIterator<Item = R>) -> Result<Self>
    where
        S: Into<String>,
        R: IntoIterator<Item = S>,
    {
        let mut rows = sheet_data.into_iter();
        let mapping = match rows.next() {
            Some(header_row) => Mapping::new(header_row.into_iter())?,
            None => bail!("An empty data set cannot be parsed into a Limits object"),
        };

        let len = mapping.len();
        let mut limits = Vec::new();

        for (row_ix, row) in rows.enumerate() {
            let values: Vec<String> = row.into_iter().map(|s| s.into()).collect();
            if values.is_empty() {
                continue; // Skip empty rows
            }
            if values.len() > len {
                bail!(
                    "A row longer than the headers list was encountered at row {}",
                    row_ix + 2
                );
            }
            limits.push(
                Limit::new_with_sheet_headers(mapping.headers(), values)
                    .with_context(|| format!("Bad limit row {}", row_ix + 2))?,
            );
        }
        Ok(Self {
            mapping,
            data: limits,
        })
    }

    pub fn data(&self) -> &[Limit] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<Limit> {
        self.data
    }
}

/// The distinct categories present in `limits`, deduplicated regardless of
/// month repeats, in sorted order.
pub fn distinct_categories(limits: &[Limit]) -> Vec<String> {
    limits
        .iter()
        .map(|l| l.category.clone())
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect()
}

/// Represents a single row from the Limits sheet.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Limit {
    category: String,
    month: MonthKey,
    amount: Amount,
}

impl Limit {
    pub fn new(category: impl Into<String>, month: MonthKey, amount: Amount) -> Self {
        Self {
            category: category.into(),
            month,
            amount,
        }
    }

    pub fn new_with_sheet_headers<S1, S2, I>(headers: &[S1], values: I) -> Result<Self>
    where
        S1: AsRef<str>,
        S2: Into<String>,
        I: IntoIterator<Item = S2>,
    {
        let mut limit = Limit::default();
        for (ix, value) in values.into_iter().map(|s| s.into()).enumerate() {
            let header = headers
                .get(ix)
                .with_context(|| format!("No header found for column index {ix}"))?
                .as_ref();
            limit.set_with_header(header, value)?;
        }
        Ok(limit)
    }

    /// Given the `header` name and the `value`, set the appropriate struct
    /// field. Unknown headers are ignored.
    pub fn set_with_header<S1, S2>(&mut self, header: S1, value: S2) -> Result<()>
    where
        S1: AsRef<str>,
        S2: Into<String>,
    {
        let value = value.into();
        match header.as_ref() {
            CATEGORY_STR => self.category = value,
            MONTH_STR => {
                self.month = MonthKey::from_str(&value)
                    .with_context(|| format!("Invalid month key '{value}'"))?
            }
            LIMIT_AMOUNT_STR => self.amount = Amount::from_str(&value)?,
            _ => {}
        }
        Ok(())
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn month(&self) -> &MonthKey {
        &self.month
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }
}

pub(super) const CATEGORY_STR: &str = "Category";
pub(super) const MONTH_STR: &str = "Month";
pub(super) const LIMIT_AMOUNT_STR: &str = "Limit Amount";
