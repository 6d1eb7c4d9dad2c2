//! Types that represent the core data model, such as `Transaction` and `Limit`.
mod amount;
mod limit;
mod mapping;
mod month;
mod transaction;

pub use amount::{Amount, AmountError};
pub use limit::{distinct_categories, Limit, Limits};
pub use mapping::{Mapping, MappingError};
pub use month::MonthKey;
pub(crate) use month::today;
pub use transaction::{Transaction, TransactionKind, Transactions};
