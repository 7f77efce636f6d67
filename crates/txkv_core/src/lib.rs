//! # txkv core
//!
//! An in-memory key-value store with single-level transactions.
//!
//! This crate provides:
//! - [`TransactionalStore`]: committed map plus one pending write log
//! - [`SharedStore`]: a thread-safe handle around one store
//! - Typed errors for illegal state transitions
//! - Read strategy configuration and operation statistics
//!
//! ```rust
//! use txkv_core::{StoreError, TransactionalStore};
//!
//! let mut store = TransactionalStore::new();
//! assert!(matches!(
//!     store.put("A", 5),
//!     Err(StoreError::NoActiveTransaction { .. })
//! ));
//!
//! store.begin_transaction()?;
//! store.put("B", 10)?;
//! store.rollback()?;
//! assert_eq!(store.get("B"), None);
//! # Ok::<(), StoreError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod shared;
mod stats;
mod store;
mod transaction;
mod types;

pub use config::{ReadStrategy, StoreConfig};
pub use error::{Operation, StoreError, StoreResult};
pub use shared::SharedStore;
pub use stats::{StatsSnapshot, StoreStats};
pub use store::TransactionalStore;
pub use transaction::{PendingWrite, TransactionScope, TransactionState};
pub use types::{SequenceNumber, TransactionId};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
