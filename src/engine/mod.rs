//! The per-user conversational state machine.
//!
//! Each inbound message is classified once into a tagged intent, matched
//! against the sender's current entry state, and turned into a reply plus
//! ledger side effects. The engine knows nothing about Telegram; the
//! transport renders `Reply` values however it likes.

mod intent;
mod reply;
mod state;

pub use intent::{classify, Control, Intent};
pub use reply::Reply;
pub use state::{EntryState, StateStore};

use crate::model::{distinct_categories, today, MonthKey, Transaction, TransactionKind};
use crate::report;
use crate::sheets::{Ledger, LimitFilter, TransactionFilter};
use crate::Result;
use intent::{
    BTN_ADD_CATEGORY, BTN_BACK, BTN_CATEGORIES, BTN_EDIT_CATEGORY, BTN_EXPENSE, BTN_INCOME,
    BTN_LIMITS, BTN_OTHER_CATEGORY, INCOME_CATEGORIES,
};
use tokio::sync::Mutex;
use tracing::debug;

const MSG_GREETING: &str = "Hi! What would you like to add?";
const MSG_CANCELLED: &str = "Okay, back to the main menu.";
const MSG_CHOOSE_CATEGORY: &str = "Choose a category or tap '➕ Other category':";
const MSG_TYPE_NEW_CATEGORY: &str = "Type the new category name:";
const MSG_ENTER_AMOUNT: &str = "Enter the amount:";
const MSG_AMOUNT_INVALID: &str = "Please enter the amount as a number.";
const MSG_RECORDED: &str = "✅ Recorded!";
const MSG_NOT_IMPLEMENTED: &str = "This isn't implemented yet.";
const MSG_CATEGORIES_HEADING: &str = "Known categories:";
const MSG_NO_CATEGORIES: &str = "No categories yet. Add limit rows to the sheet to create some.";

/// A chat user: the stable identity that keys conversation state, plus the
/// display name written into the User column.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ChatUser {
    pub id: u64,
    pub name: String,
}

/// Drives one conversation per user over a shared ledger.
pub struct Engine {
    states: StateStore,
    ledger: Mutex<Box<dyn Ledger + Send>>,
}

impl Engine {
    pub fn new(ledger: Box<dyn Ledger + Send>) -> Self {
        Self {
            states: StateStore::default(),
            ledger: Mutex::new(ledger),
        }
    }

    /// Advances the sender's conversation by one message.
    ///
    /// Returns `Ok(None)` when the message matches nothing and no state
    /// applies; that fall-through is deliberate, not an error. A spreadsheet
    /// fault propagates to the caller, which logs it and drops the in-flight
    /// message.
    pub async fn handle(&self, user: &ChatUser, text: &str) -> Result<Option<Reply>> {
        let state = self.states.get(user.id);
        let intent = classify(text, state.as_ref());
        debug!("user {} message classified as {intent:?}", user.id);

        match intent {
            Intent::Control(control) => self.handle_control(user, control).await,
            Intent::ChooseKind(kind) => self.begin_entry(user, kind).await.map(Some),
            Intent::CategoryChoice(category) => {
                let Some(mut state) = state else {
                    return Ok(None);
                };
                state.category = Some(category);
                self.states.set(user.id, state);
                Ok(Some(Reply::text(MSG_ENTER_AMOUNT)))
            }
            Intent::AmountText(amount) => {
                let Some(EntryState {
                    kind,
                    category: Some(category),
                }) = state
                else {
                    return Ok(None);
                };
                let transaction =
                    Transaction::new(today(), kind, category, amount, user.name.clone());
                self.record_entry(user, transaction).await.map(Some)
            }
            Intent::InvalidAmount => Ok(Some(Reply::text(MSG_AMOUNT_INVALID))),
            Intent::Unrecognized => Ok(None),
        }
    }

    async fn handle_control(&self, user: &ChatUser, control: Control) -> Result<Option<Reply>> {
        match control {
            Control::Start => {
                self.states.clear(user.id);
                Ok(Some(Reply::with_keyboard(MSG_GREETING, main_menu())))
            }
            Control::Exit => {
                self.states.clear(user.id);
                Ok(Some(Reply::with_keyboard(MSG_CANCELLED, main_menu())))
            }
            Control::Categories => {
                self.states.clear(user.id);
                let limits = self.ledger.lock().await.limits(&LimitFilter::all()).await?;
                let categories = distinct_categories(&limits);
                let text = if categories.is_empty() {
                    MSG_NO_CATEGORIES.to_string()
                } else {
                    let lines = categories
                        .iter()
                        .map(|c| format!("• {c}"))
                        .collect::<Vec<_>>()
                        .join("\n");
                    format!("{MSG_CATEGORIES_HEADING}\n{lines}")
                };
                Ok(Some(Reply::with_keyboard(text, main_menu())))
            }
            Control::Limits => {
                self.states.clear(user.id);
                let month = MonthKey::current();
                let mut ledger = self.ledger.lock().await;
                let limits = ledger
                    .limits(&LimitFilter {
                        category: None,
                        month: Some(month.clone()),
                    })
                    .await?;
                let transactions = ledger
                    .transactions(&TransactionFilter {
                        kind: Some(TransactionKind::Expense),
                        category: None,
                        month: Some(month.clone()),
                    })
                    .await?;
                drop(ledger);
                let summaries = report::month_summary(&limits, &transactions, &month);
                let text = if summaries.is_empty() {
                    format!("No limits are set for {}.", month.name())
                } else {
                    let lines = summaries
                        .iter()
                        .map(report::CategorySummary::line)
                        .collect::<Vec<_>>()
                        .join("\n");
                    format!("📅 {}:\n{lines}", month.name())
                };
                Ok(Some(Reply::with_keyboard(text, main_menu())))
            }
            Control::AddCategory | Control::EditCategory => {
                // Static stub; state is untouched.
                Ok(Some(Reply::text(MSG_NOT_IMPLEMENTED)))
            }
            Control::OtherCategory => {
                // Only meaningful while choosing a category; the next free
                // text becomes the category name.
                match self.states.get(user.id) {
                    Some(state) if state.category.is_none() => {
                        Ok(Some(Reply::text(MSG_TYPE_NEW_CATEGORY)))
                    }
                    _ => Ok(None),
                }
            }
        }
    }

    /// Starts an entry of `kind` and offers the category keyboard.
    async fn begin_entry(&self, user: &ChatUser, kind: TransactionKind) -> Result<Reply> {
        let options = self.category_options(kind).await?;
        self.states.set(user.id, EntryState::new(kind));
        Ok(Reply::with_keyboard(MSG_CHOOSE_CATEGORY, options))
    }

    /// Writes the transaction, then reports against the limit when one exists
    /// for the category this month. The entry is consumed and the state
    /// re-seeded to `AwaitingCategory` for the same kind, so the next message
    /// starts the next entry.
    async fn record_entry(&self, user: &ChatUser, transaction: Transaction) -> Result<Reply> {
        let kind = transaction.kind();
        let month = MonthKey::current();

        let mut ledger = self.ledger.lock().await;
        ledger.append_transaction(&transaction).await?;

        let limit = ledger
            .limits(&LimitFilter {
                category: Some(transaction.category().to_string()),
                month: Some(month.clone()),
            })
            .await?
            .into_iter()
            .next();

        let text = match (kind, limit) {
            (TransactionKind::Expense, Some(limit)) => {
                // Re-read so the summary includes the row just written.
                let transactions = ledger
                    .transactions(&TransactionFilter {
                        kind: Some(TransactionKind::Expense),
                        category: Some(transaction.category().to_string()),
                        month: Some(month.clone()),
                    })
                    .await?;
                report::category_summary(&transactions, &limit).to_string()
            }
            _ => MSG_RECORDED.to_string(),
        };
        drop(ledger);

        self.states.set(user.id, EntryState::new(kind));
        let options = self.category_options(kind).await?;
        Ok(Reply::with_keyboard(text, options))
    }

    /// The category keyboard for an entry. Expense offers the distinct
    /// categories present in Limits; Income offers the fixed set. Both get
    /// the "other category" and back buttons appended.
    async fn category_options(&self, kind: TransactionKind) -> Result<Vec<String>> {
        let mut options = match kind {
            TransactionKind::Expense => {
                let limits = self.ledger.lock().await.limits(&LimitFilter::all()).await?;
                distinct_categories(&limits)
            }
            TransactionKind::Income => INCOME_CATEGORIES.iter().map(|s| s.to_string()).collect(),
        };
        options.push(BTN_OTHER_CATEGORY.to_string());
        options.push(BTN_BACK.to_string());
        Ok(options)
    }
}

/// The main menu keyboard.
fn main_menu() -> Vec<String> {
    [
        BTN_EXPENSE,
        BTN_INCOME,
        BTN_CATEGORIES,
        BTN_LIMITS,
        BTN_ADD_CATEGORY,
        BTN_EDIT_CATEGORY,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{engine_seeded, engine_with, user, LIMIT_HEADER, TRANSACTION_HEADER};

    /// The keyboard labels that are category choices (control buttons
    /// stripped).
    fn category_labels(reply: &Reply) -> Vec<String> {
        reply
            .keyboard()
            .unwrap_or_default()
            .iter()
            .filter(|l| l.as_str() != BTN_OTHER_CATEGORY && l.as_str() != BTN_BACK)
            .cloned()
            .collect()
    }

    #[tokio::test]
    async fn test_expense_offers_distinct_limit_categories() {
        let month = MonthKey::current();
        let engine = engine_with(
            vec![
                LIMIT_HEADER.to_vec(),
                vec!["Groceries", month.as_str(), "5000"],
                vec!["Groceries", "2025-01", "4000"],
                vec!["Transport", "2025-01", "2000"],
            ],
            vec![TRANSACTION_HEADER.to_vec()],
        );
        let reply = engine.handle(&user(), "Expense").await.unwrap().unwrap();
        // Deduplicated across months, regardless of repeats.
        assert_eq!(category_labels(&reply), vec!["Groceries", "Transport"]);
    }

    #[tokio::test]
    async fn test_income_offers_fixed_set() {
        let engine = engine_seeded();
        let reply = engine.handle(&user(), "💰 Income").await.unwrap().unwrap();
        // Independent of Limits content.
        assert_eq!(
            category_labels(&reply),
            vec!["Salary", "Debt", "Gift", "Parental"]
        );
    }

    #[tokio::test]
    async fn test_end_to_end_expense_with_limit() {
        let month = MonthKey::current();
        let engine = engine_with(
            vec![
                LIMIT_HEADER.to_vec(),
                vec!["Groceries", month.as_str(), "5000"],
            ],
            vec![TRANSACTION_HEADER.to_vec()],
        );
        let user = user();

        let reply = engine.handle(&user, "Expense").await.unwrap().unwrap();
        assert!(category_labels(&reply).contains(&"Groceries".to_string()));

        let reply = engine.handle(&user, "Groceries").await.unwrap().unwrap();
        assert_eq!(reply.message(), MSG_ENTER_AMOUNT);

        let reply = engine.handle(&user, "1500").await.unwrap().unwrap();
        assert!(reply.message().contains("1500 ₸"));
        assert!(reply.message().contains("3500 ₸ of 5000 ₸"));

        // The appended row is visible to the next entry's summary.
        let reply = engine.handle(&user, "Groceries").await.unwrap().unwrap();
        assert_eq!(reply.message(), MSG_ENTER_AMOUNT);
        let reply = engine.handle(&user, "500").await.unwrap().unwrap();
        assert!(reply.message().contains("2000 ₸"));
        assert!(reply.message().contains("3000 ₸ of 5000 ₸"));
    }

    #[tokio::test]
    async fn test_comma_decimal_amount() {
        let month = MonthKey::current();
        let engine = engine_with(
            vec![
                LIMIT_HEADER.to_vec(),
                vec!["Groceries", month.as_str(), "100"],
            ],
            vec![TRANSACTION_HEADER.to_vec()],
        );
        let user = user();
        engine.handle(&user, "Expense").await.unwrap();
        engine.handle(&user, "Groceries").await.unwrap();
        let reply = engine.handle(&user, "12,50").await.unwrap().unwrap();
        assert!(reply.message().contains("12.5 ₸"));
        assert!(reply.message().contains("87.5 ₸ of 100 ₸"));
    }

    #[tokio::test]
    async fn test_invalid_amount_reprompts_and_preserves_state() {
        let month = MonthKey::current();
        let engine = engine_with(
            vec![
                LIMIT_HEADER.to_vec(),
                vec!["Groceries", month.as_str(), "5000"],
            ],
            vec![TRANSACTION_HEADER.to_vec()],
        );
        let user = user();
        engine.handle(&user, "Expense").await.unwrap();
        engine.handle(&user, "Groceries").await.unwrap();

        let reply = engine.handle(&user, "a lot").await.unwrap().unwrap();
        assert_eq!(reply.message(), MSG_AMOUNT_INVALID);
        let reply = engine.handle(&user, "twelve").await.unwrap().unwrap();
        assert_eq!(reply.message(), MSG_AMOUNT_INVALID);

        // The entry survived both rejections.
        let reply = engine.handle(&user, "1500").await.unwrap().unwrap();
        assert!(reply.message().contains("3500 ₸ of 5000 ₸"));
    }

    #[tokio::test]
    async fn test_entry_without_limit_gets_plain_ack() {
        let engine = engine_seeded();
        let user = user();
        engine.handle(&user, "Expense").await.unwrap();
        engine.handle(&user, "Fireworks").await.unwrap();
        let reply = engine.handle(&user, "900").await.unwrap().unwrap();
        assert_eq!(reply.message(), MSG_RECORDED);
    }

    #[tokio::test]
    async fn test_income_never_gets_budget_summary() {
        let month = MonthKey::current();
        // Even with a limit row matching the category and month.
        let engine = engine_with(
            vec![
                LIMIT_HEADER.to_vec(),
                vec!["Salary", month.as_str(), "100"],
            ],
            vec![TRANSACTION_HEADER.to_vec()],
        );
        let user = user();
        engine.handle(&user, "Income").await.unwrap();
        engine.handle(&user, "Salary").await.unwrap();
        let reply = engine.handle(&user, "90000").await.unwrap().unwrap();
        assert_eq!(reply.message(), MSG_RECORDED);
    }

    #[tokio::test]
    async fn test_completion_reprimes_for_same_kind() {
        let engine = engine_seeded();
        let user = user();
        engine.handle(&user, "Income").await.unwrap();
        engine.handle(&user, "Gift").await.unwrap();
        let reply = engine.handle(&user, "5000").await.unwrap().unwrap();
        // Completion re-offers the category keyboard instead of dropping to
        // the main menu.
        assert_eq!(
            category_labels(&reply),
            vec!["Salary", "Debt", "Gift", "Parental"]
        );
        // Free text is immediately a category for the next entry.
        let reply = engine.handle(&user, "Debt").await.unwrap().unwrap();
        assert_eq!(reply.message(), MSG_ENTER_AMOUNT);
    }

    #[tokio::test]
    async fn test_exit_clears_state_from_any_stage() {
        let engine = engine_seeded();
        let user = user();

        engine.handle(&user, "Expense").await.unwrap();
        engine.handle(&user, "❌ Exit").await.unwrap();
        // Idle again: free text falls through.
        assert!(engine.handle(&user, "Groceries").await.unwrap().is_none());

        engine.handle(&user, "Expense").await.unwrap();
        engine.handle(&user, "Groceries").await.unwrap();
        engine.handle(&user, "Back").await.unwrap();
        assert!(engine.handle(&user, "1500").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unmatched_message_is_silently_ignored() {
        let engine = engine_seeded();
        assert!(engine.handle(&user(), "hello").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unimplemented_stubs_leave_state_alone() {
        let month = MonthKey::current();
        let engine = engine_with(
            vec![
                LIMIT_HEADER.to_vec(),
                vec!["Groceries", month.as_str(), "5000"],
            ],
            vec![TRANSACTION_HEADER.to_vec()],
        );
        let user = user();
        engine.handle(&user, "Expense").await.unwrap();
        engine.handle(&user, "Groceries").await.unwrap();

        let reply = engine
            .handle(&user, "🛠 Add category")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reply.message(), MSG_NOT_IMPLEMENTED);

        // Still awaiting the amount.
        let reply = engine.handle(&user, "1500").await.unwrap().unwrap();
        assert!(reply.message().contains("3500 ₸ of 5000 ₸"));
    }

    #[tokio::test]
    async fn test_other_category_flow() {
        let engine = engine_seeded();
        let user = user();
        engine.handle(&user, "Expense").await.unwrap();
        let reply = engine
            .handle(&user, "➕ Other category")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reply.message(), MSG_TYPE_NEW_CATEGORY);
        let reply = engine.handle(&user, "Books").await.unwrap().unwrap();
        assert_eq!(reply.message(), MSG_ENTER_AMOUNT);
        let reply = engine.handle(&user, "750").await.unwrap().unwrap();
        assert_eq!(reply.message(), MSG_RECORDED);
    }

    #[tokio::test]
    async fn test_overspend_shows_negative_remaining() {
        let month = MonthKey::current();
        let engine = engine_with(
            vec![
                LIMIT_HEADER.to_vec(),
                vec!["Groceries", month.as_str(), "100"],
            ],
            vec![TRANSACTION_HEADER.to_vec()],
        );
        let user = user();
        engine.handle(&user, "Expense").await.unwrap();
        engine.handle(&user, "Groceries").await.unwrap();
        let reply = engine.handle(&user, "150").await.unwrap().unwrap();
        assert!(reply.message().contains("-50 ₸ of 100 ₸"));
    }

    #[tokio::test]
    async fn test_month_wide_limit_summary() {
        let month = MonthKey::current();
        let engine = engine_with(
            vec![
                LIMIT_HEADER.to_vec(),
                vec!["Groceries", month.as_str(), "5000"],
                vec!["Transport", month.as_str(), "2000"],
                vec!["Groceries", "2025-01", "4000"],
            ],
            vec![TRANSACTION_HEADER.to_vec()],
        );
        let user = user();
        engine.handle(&user, "Expense").await.unwrap();
        engine.handle(&user, "Transport").await.unwrap();
        engine.handle(&user, "300").await.unwrap();

        let reply = engine.handle(&user, "/limits").await.unwrap().unwrap();
        // One line per current-month limit; the January row is skipped.
        assert!(reply.message().contains("Groceries: spent 0 ₸"));
        assert!(reply
            .message()
            .contains("Transport: spent 300 ₸, remaining 1700 ₸ of 2000 ₸"));
        assert!(!reply.message().contains("4000"));
    }

    #[tokio::test]
    async fn test_categories_listing() {
        let engine = engine_seeded();
        let reply = engine.handle(&user(), "/categories").await.unwrap().unwrap();
        assert!(reply.message().contains("Groceries"));
        assert!(reply.message().contains("Transport"));
        assert!(reply.message().contains("Restaurants"));
    }

    #[tokio::test]
    async fn test_start_greets_and_clears() {
        let engine = engine_seeded();
        let user = user();
        engine.handle(&user, "Expense").await.unwrap();
        let reply = engine.handle(&user, "/start").await.unwrap().unwrap();
        assert_eq!(reply.message(), MSG_GREETING);
        assert!(reply
            .keyboard()
            .unwrap()
            .contains(&BTN_EXPENSE.to_string()));
        // State cleared: free text falls through.
        assert!(engine.handle(&user, "Groceries").await.unwrap().is_none());
    }
}
