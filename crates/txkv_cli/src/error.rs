//! CLI error type.

use crate::script::ParseError;
use std::io;
use thiserror::Error;
use txkv_core::StoreError;

/// Errors that stop a CLI command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Reading the script or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A script line could not be read.
    #[error("line {line}: {source}")]
    Read {
        /// 1-based line number.
        line: usize,
        /// The underlying read failure.
        source: io::Error,
    },

    /// A script line could not be parsed.
    #[error("line {line}: {source}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// The parse failure.
        source: ParseError,
    },

    /// The store rejected an operation while running with `--fail-fast`.
    #[error("line {line}: {source}")]
    Store {
        /// 1-based line number.
        line: usize,
        /// The rejected operation's error.
        source: StoreError,
    },

    /// JSON output could not be produced.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
