//! Single-level transactions.
//!
//! A transaction collects writes in an append-only pending log:
//! - **Isolation**: the committed map is untouched until commit
//! - **Read-your-writes**: reads inside the transaction see the log first
//! - **Atomicity**: commit replays the whole log in order, rollback drops it

mod log;
mod scope;
mod state;

pub use log::PendingWrite;
pub use scope::TransactionScope;
pub use state::TransactionState;

pub(crate) use state::Transaction;
