//! Computes spent/remaining amounts for categories against monthly limits.
//!
//! Everything here is a pure function of the transaction and limit snapshots
//! passed in. The engine re-reads through the `Ledger` before every report,
//! so a summary always reflects the sheet as of the request.

use crate::model::{Limit, MonthKey, Transaction, TransactionKind};
use rust_decimal::Decimal;
use std::fmt;
use std::fmt::{Display, Formatter};

/// Spending against one category's limit for one month.
///
/// `remaining` may be negative when the limit is overspent; it is displayed
/// as-is.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CategorySummary {
    pub category: String,
    pub month: MonthKey,
    pub limit: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
}

/// Sums the Expense transactions for `category` whose date falls in `month`.
/// Category matching is exact case-sensitive string equality.
pub fn spent(transactions: &[Transaction], category: &str, month: &MonthKey) -> Decimal {
    transactions
        .iter()
        .filter(|t| {
            t.kind() == TransactionKind::Expense
                && t.category() == category
                && month.contains_date(t.date())
        })
        .map(|t| t.amount().value())
        .sum()
}

/// The summary for a single limit row.
pub fn category_summary(transactions: &[Transaction], limit: &Limit) -> CategorySummary {
    let spent = spent(transactions, limit.category(), limit.month());
    CategorySummary {
        category: limit.category().to_string(),
        month: limit.month().clone(),
        limit: limit.amount().value(),
        spent,
        remaining: limit.amount().value() - spent,
    }
}

/// One summary per limit row belonging to `month`. Limit rows for other
/// months are skipped.
pub fn month_summary(
    limits: &[Limit],
    transactions: &[Transaction],
    month: &MonthKey,
) -> Vec<CategorySummary> {
    limits
        .iter()
        .filter(|l| l.month() == month)
        .map(|l| category_summary(transactions, l))
        .collect()
}

impl CategorySummary {
    /// One line of a month-wide listing.
    pub fn line(&self) -> String {
        format!(
            "{}: spent {} ₸, remaining {} ₸ of {} ₸",
            self.category,
            self.spent.normalize(),
            self.remaining.normalize(),
            self.limit.normalize()
        )
    }
}

impl Display for CategorySummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "📅 {}:\nSpent on \"{}\": {} ₸\nRemaining: {} ₸ of {} ₸",
            self.month.name(),
            self.category,
            self.spent.normalize(),
            self.remaining.normalize(),
            self.limit.normalize()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, Transactions};
    use std::str::FromStr;

    fn transactions() -> Vec<Transaction> {
        Transactions::parse(vec![
            vec!["Date", "Type", "Category", "Amount", "User"],
            vec!["2025-08-01", "Expense", "Groceries", "1000", "Anna"],
            vec!["2025-08-02", "Expense", "Groceries", "500", "Pavel"],
            vec!["2025-08-03", "Income", "Salary", "90000", "Pavel"],
            vec!["2025-08-04", "Expense", "Transport", "200", "Anna"],
            vec!["2025-07-28", "Expense", "Groceries", "999", "Anna"],
        ])
        .unwrap()
        .into_vec()
    }

    fn limit(category: &str, month: &str, amount: &str) -> Limit {
        Limit::new(
            category,
            MonthKey::from_str(month).unwrap(),
            Amount::from_str(amount).unwrap(),
        )
    }

    #[test]
    fn test_spent_sums_matching_expenses_only() {
        let month = MonthKey::from_str("2025-08").unwrap();
        // Income rows and other months are excluded.
        assert_eq!(
            spent(&transactions(), "Groceries", &month),
            Decimal::from(1500)
        );
        assert_eq!(spent(&transactions(), "Salary", &month), Decimal::ZERO);
    }

    #[test]
    fn test_category_summary_remaining() {
        let summary = category_summary(&transactions(), &limit("Groceries", "2025-08", "5000"));
        assert_eq!(summary.spent, Decimal::from(1500));
        assert_eq!(summary.remaining, Decimal::from(3500));
    }

    #[test]
    fn test_remaining_can_go_negative() {
        let summary = category_summary(&transactions(), &limit("Groceries", "2025-08", "1000"));
        assert_eq!(summary.remaining, Decimal::from(-500));
        assert!(summary.line().contains("-500"));
    }

    #[test]
    fn test_month_summary_skips_other_months() {
        let limits = vec![
            limit("Groceries", "2025-08", "5000"),
            limit("Transport", "2025-08", "2000"),
            limit("Groceries", "2025-07", "4000"),
        ];
        let month = MonthKey::from_str("2025-08").unwrap();
        let summaries = month_summary(&limits, &transactions(), &month);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].category, "Groceries");
        assert_eq!(summaries[1].category, "Transport");
        assert_eq!(summaries[1].spent, Decimal::from(200));
    }

    #[test]
    fn test_display_format() {
        let summary = category_summary(&transactions(), &limit("Groceries", "2025-08", "5000"));
        let text = summary.to_string();
        assert!(text.contains("August 2025"));
        assert!(text.contains("\"Groceries\": 1500 ₸"));
        assert!(text.contains("3500 ₸ of 5000 ₸"));
    }
}
