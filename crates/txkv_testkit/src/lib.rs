//! # txkv testkit
//!
//! Test utilities for txkv.
//!
//! This crate provides:
//! - Store fixtures and scenario helpers
//! - Property-based test generators using proptest
//! - A model-checking harness that mirrors operations into a reference model
//! - Concurrency stress helpers for [`SharedStore`](txkv_core::SharedStore)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use txkv_testkit::prelude::*;
//!
//! #[test]
//! fn test_with_store() {
//!     with_store(|store| {
//!         store.begin_transaction().unwrap();
//!         // ... test operations
//!     });
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod harness;
pub mod stress;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::harness::*;
    pub use crate::stress::*;
}

pub use fixtures::*;
pub use generators::*;
pub use harness::*;
pub use stress::*;
