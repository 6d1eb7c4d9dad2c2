use crate::model::{Amount, Mapping};
use crate::Result;
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Whether a transaction takes money out of the budget or brings it in.
#[derive(Default, Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    #[default]
    Expense,
    Income,
}

serde_plain::derive_display_from_serialize!(TransactionKind);
serde_plain::derive_fromstr_from_deserialize!(TransactionKind);

/// Represents the transaction data from the Transactions sheet, including the
/// header mapping.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct Transactions {
    mapping: Mapping,
    data: Vec<Transaction>,
}

impl Transactions {
    /// Parses worksheet rows into transactions. The first row must be the
    /// header row; column meaning is taken from the header label, not from
    /// the column position.
    pub fn parse<S, R>(sheet_data: impl IntoIterator<Item = R>) -> Result<Self>
    where
        S: Into<String>,
        R: IntoIterator<Item = S>,
    {
        let mut rows = sheet_data.into_iter();
        let mapping = match rows.next() {
            Some(header_row) => Mapping::new(header_row.into_iter())?,
            None => bail!("An empty data set cannot be parsed into a Transactions object"),
        };

        let len = mapping.len();
        let mut transactions = Vec::new();

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
            transactions.push(
                Transaction::new_with_sheet_headers(mapping.headers(), values)
                    .with_context(|| format!("Bad transaction row {}", row_ix + 2))?,
            );
        }
        Ok(Self {
            mapping,
            data: transactions,
        })
    }

    pub fn data(&self) -> &[Transaction] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<Transaction> {
        self.data
    }
}

/// Represents a single row from the Transactions sheet.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Transaction {
    date: String,
    kind: TransactionKind,
    category: String,
    amount: Amount,
    user: String,
}

impl Transaction {
    pub fn new(
        date: impl Into<String>,
        kind: TransactionKind,
        category: impl Into<String>,
        amount: Amount,
        user: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            kind,
            category: category.into(),
            amount,
            user: user.into(),
        }
    }

    pub fn new_with_sheet_headers<S1, S2, I>(headers: &[S1], values: I) -> Result<Self>
    where
        S1: AsRef<str>,
        S2: Into<String>,
        I: IntoIterator<Item = S2>,
    {
        let mut transaction = Transaction::default();
        for (ix, value) in values.into_iter().map(|s| s.into()).enumerate() {
            let header = headers
                .get(ix)
                .with_context(|| format!("No header found for column index {ix}"))?
                .as_ref();
            transaction.set_with_header(header, value)?;
        }
        Ok(transaction)
    }

    /// Given the `header` name and the `value`, set the appropriate struct
    /// field. Unknown headers are ignored so extra sheet columns are
    /// tolerated.
    pub fn set_with_header<S1, S2>(&mut self, header: S1, value: S2) -> Result<()>
    where
        S1: AsRef<str>,
        S2: Into<String>,
    {
        let value = value.into();
        match header.as_ref() {
            DATE_STR => self.date = value,
            TYPE_STR => {
                self.kind = TransactionKind::from_str(&value)
                    .with_context(|| format!("Invalid transaction type '{value}'"))?
            }
            CATEGORY_STR => self.category = value,
            AMOUNT_STR => self.amount = Amount::from_str(&value)?,
            USER_STR => self.user = value,
            _ => {}
        }
        Ok(())
    }

    /// The values in the canonical append order `[Date, Type, Category,
    /// Amount, User]`.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.date.clone(),
            self.kind.to_string(),
            self.category.clone(),
            self.amount.to_string(),
            self.user.clone(),
        ]
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn user(&self) -> &str {
        &self.user
    }
}

pub(super) const DATE_STR: &str = "Date";
pub(super) const TYPE_STR: &str = "Type";
pub(super) const CATEGORY_STR: &str = "Category";
pub(super) const AMOUNT_STR: &str = "Amount";
pub(super) const USER_STR: &str = "User";
