//! Implements the `Ledger` trait for the bookkeeping data held in the spreadsheet.

use crate::model::{Limit, Limits, MonthKey, Transaction, TransactionKind, Transactions};
use crate::sheets::{Sheet, LIMITS, TRANSACTIONS};
use crate::Result;

/// The data-access interface over the spreadsheet gateway.
///
/// Filtering happens here, in memory, against explicit predicate structs.
/// The `Sheet` implementations stay a pure I/O boundary and the filtering
/// logic is testable without network access. Reads always go back to the
/// sheet; nothing is cached.
#[async_trait::async_trait]
pub trait Ledger {
    /// The transactions matching `filter`.
    async fn transactions(&mut self, filter: &TransactionFilter) -> Result<Vec<Transaction>>;

    /// The limit rows matching `filter`.
    async fn limits(&mut self, filter: &LimitFilter) -> Result<Vec<Limit>>;

    /// Appends one transaction row to the Transactions sheet.
    async fn append_transaction(&mut self, transaction: &Transaction) -> Result<()>;
}

/// Selects transactions. A `None` field matches everything.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct TransactionFilter {
    pub kind: Option<TransactionKind>,
    pub category: Option<String>,
    pub month: Option<MonthKey>,
}

impl TransactionFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn matches(&self, transaction: &Transaction) -> bool {
        self.kind.map_or(true, |k| transaction.kind() == k)
            && self
                .category
                .as_deref()
                .map_or(true, |c| transaction.category() == c)
            && self
                .month
                .as_ref()
                .map_or(true, |m| m.contains_date(transaction.date()))
    }
}

/// Selects limit rows. A `None` field matches everything.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct LimitFilter {
    pub category: Option<String>,
    pub month: Option<MonthKey>,
}

impl LimitFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn matches(&self, limit: &Limit) -> bool {
        self.category
            .as_deref()
            .map_or(true, |c| limit.category() == c)
            && self.month.as_ref().map_or(true, |m| limit.month() == m)
    }
}

/// Implements the `Ledger` trait over a dynamically-dispatched `Sheet`.
pub(crate) struct LedgerImpl {
    sheet: Box<dyn Sheet + Send>,
}

impl LedgerImpl {
    pub(crate) fn new(sheet: Box<dyn Sheet + Send>) -> Self {
        Self { sheet }
    }
}

#[async_trait::async_trait]
impl Ledger for LedgerImpl {
    async fn transactions(&mut self, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
        let values = self.sheet.get(TRANSACTIONS).await?;
        let transactions = Transactions::parse(values)?;
        Ok(transactions
            .into_vec()
            .into_iter()
            .filter(|t| filter.matches(t))
            .collect())
    }

    async fn limits(&mut self, filter: &LimitFilter) -> Result<Vec<Limit>> {
        let values = self.sheet.get(LIMITS).await?;
        let limits = Limits::parse(values)?;
        Ok(limits
            .into_vec()
            .into_iter()
            .filter(|l| filter.matches(l))
            .collect())
    }

    async fn append_transaction(&mut self, transaction: &Transaction) -> Result<()> {
        self.sheet.append(TRANSACTIONS, &transaction.to_row()).await
    }
}
