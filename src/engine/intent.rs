//! Classifies each inbound message once into a tagged intent.
//!
//! Dispatch priority, first match wins: reserved control labels regardless of
//! state, then slash commands, then state-dependent predicates, then the
//! type-selection labels when no state exists. Anything else is
//! `Unrecognized` and falls through without a reply.

use crate::engine::EntryState;
use crate::model::{Amount, TransactionKind};
use std::str::FromStr;

/// Button labels. The bare words are accepted alongside the labeled buttons
/// so typed input works the same as a button tap.
pub(crate) const BTN_EXPENSE: &str = "➕ Expense";
pub(crate) const BTN_INCOME: &str = "💰 Income";
pub(crate) const BTN_CATEGORIES: &str = "📋 Categories";
pub(crate) const BTN_LIMITS: &str = "📈 Limits";
pub(crate) const BTN_ADD_CATEGORY: &str = "🛠 Add category";
pub(crate) const BTN_EDIT_CATEGORY: &str = "✏️ Edit category";
pub(crate) const BTN_OTHER_CATEGORY: &str = "➕ Other category";
pub(crate) const BTN_BACK: &str = "⬅️ Back";
pub(crate) const BTN_EXIT: &str = "❌ Exit";

/// The fixed income category set. Income categories never come from Limits.
pub(crate) const INCOME_CATEGORIES: [&str; 4] = ["Salary", "Debt", "Gift", "Parental"];

/// Menu actions reachable from any state.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Control {
    Start,
    Exit,
    Categories,
    Limits,
    AddCategory,
    EditCategory,
    OtherCategory,
}

/// What one inbound message means, given the sender's current state.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Intent {
    Control(Control),
    ChooseKind(TransactionKind),
    CategoryChoice(String),
    AmountText(Amount),
    InvalidAmount,
    Unrecognized,
}

/// The single classification pass. The state machine switches on the result
/// instead of re-deriving intent from text comparisons in every handler.
pub fn classify(text: &str, state: Option<&EntryState>) -> Intent {
    let text = text.trim();

    // 1. Reserved control labels, regardless of state.
    match text {
        BTN_EXIT | "Exit" | BTN_BACK | "Back" => return Intent::Control(Control::Exit),
        BTN_CATEGORIES => return Intent::Control(Control::Categories),
        BTN_LIMITS => return Intent::Control(Control::Limits),
        BTN_ADD_CATEGORY => return Intent::Control(Control::AddCategory),
        BTN_EDIT_CATEGORY => return Intent::Control(Control::EditCategory),
        BTN_OTHER_CATEGORY => return Intent::Control(Control::OtherCategory),
        _ => {}
    }

    // 2. Slash commands.
    match text {
        "/start" | "/restart" => return Intent::Control(Control::Start),
        "/categories" => return Intent::Control(Control::Categories),
        "/limits" => return Intent::Control(Control::Limits),
        _ => {}
    }

    // 3. State-dependent predicates.
    if let Some(state) = state {
        return if state.category.is_none() {
            Intent::CategoryChoice(text.to_string())
        } else {
            match Amount::from_str(text) {
                Ok(amount) => Intent::AmountText(amount),
                Err(_) => Intent::InvalidAmount,
            }
        };
    }

    // 4. Type-selection labels when no state exists.
    if let Some(kind) = parse_kind(text) {
        return Intent::ChooseKind(kind);
    }

    Intent::Unrecognized
}

fn parse_kind(text: &str) -> Option<TransactionKind> {
    match text {
        BTN_EXPENSE | "Expense" => Some(TransactionKind::Expense),
        BTN_INCOME | "Income" => Some(TransactionKind::Income),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn awaiting_category() -> EntryState {
        EntryState::new(TransactionKind::Expense)
    }

    fn awaiting_amount() -> EntryState {
        EntryState {
            kind: TransactionKind::Expense,
            category: Some("Groceries".to_string()),
        }
    }

    #[test]
    fn test_control_labels_win_over_state() {
        // "Exit" while awaiting an amount is a control, not an amount.
        assert_eq!(
            classify("Exit", Some(&awaiting_amount())),
            Intent::Control(Control::Exit)
        );
        assert_eq!(
            classify(BTN_BACK, Some(&awaiting_category())),
            Intent::Control(Control::Exit)
        );
    }

    #[test]
    fn test_slash_commands() {
        assert_eq!(classify("/start", None), Intent::Control(Control::Start));
        assert_eq!(
            classify("/categories", None),
            Intent::Control(Control::Categories)
        );
        assert_eq!(classify("/limits", None), Intent::Control(Control::Limits));
    }

    #[test]
    fn test_kind_labels_without_state() {
        assert_eq!(
            classify("Expense", None),
            Intent::ChooseKind(TransactionKind::Expense)
        );
        assert_eq!(
            classify(BTN_INCOME, None),
            Intent::ChooseKind(TransactionKind::Income)
        );
    }

    #[test]
    fn test_state_predicates_win_over_kind_labels() {
        // Mid-entry, "Expense" is a category choice, not a restart.
        assert_eq!(
            classify("Expense", Some(&awaiting_category())),
            Intent::CategoryChoice("Expense".to_string())
        );
    }

    #[test]
    fn test_category_capture() {
        assert_eq!(
            classify("Groceries", Some(&awaiting_category())),
            Intent::CategoryChoice("Groceries".to_string())
        );
    }

    #[test]
    fn test_amount_capture() {
        let intent = classify("12,50", Some(&awaiting_amount()));
        match intent {
            Intent::AmountText(amount) => {
                assert_eq!(amount.value(), Decimal::new(125, 1));
            }
            other => panic!("expected AmountText, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_amount() {
        assert_eq!(
            classify("a lot", Some(&awaiting_amount())),
            Intent::InvalidAmount
        );
        assert_eq!(
            classify("-5", Some(&awaiting_amount())),
            Intent::InvalidAmount
        );
    }

    #[test]
    fn test_unrecognized_without_state() {
        assert_eq!(classify("hello there", None), Intent::Unrecognized);
        assert_eq!(classify("1500", None), Intent::Unrecognized);
    }
}
