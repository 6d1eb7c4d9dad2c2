//! The per-user conversation state and its keyed store.

use crate::model::TransactionKind;
use std::collections::HashMap;
use std::sync::Mutex;

/// A partially-completed transaction entry.
///
/// `category == None` means the user is choosing a category
/// (`AwaitingCategory`); `Some` means the bot is waiting for an amount
/// (`AwaitingAmount`). There is deliberately no amount field: the moment an
/// amount arrives the entry is consumed and the state re-seeded.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct EntryState {
    pub kind: TransactionKind,
    pub category: Option<String>,
}

impl EntryState {
    /// A fresh entry of `kind`, awaiting a category choice.
    pub fn new(kind: TransactionKind) -> Self {
        Self {
            kind,
            category: None,
        }
    }
}

/// The conversation state store: at most one entry per user at any time.
///
/// This is the only cross-message mutable data in the process. The mutex is
/// held for map operations only, never across an await. Messages from the
/// same user are assumed not to be processed concurrently.
#[derive(Debug, Default)]
pub struct StateStore {
    states: Mutex<HashMap<u64, EntryState>>,
}

impl StateStore {
    pub fn get(&self, user: u64) -> Option<EntryState> {
        self.lock().get(&user).cloned()
    }

    pub fn set(&self, user: u64, state: EntryState) {
        self.lock().insert(user, state);
    }

    /// Removes the user's entry, returning it if one existed.
    pub fn clear(&self, user: u64) -> Option<EntryState> {
        self.lock().remove(&user)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<u64, EntryState>> {
        self.states.lock().expect("state store mutex poisoned")
    }
}
