//! Executes script commands against one store.

use crate::script::ScriptCommand;
use std::collections::BTreeMap;
use txkv_core::{StoreResult, TransactionalStore};

/// Printed for keys that are absent.
pub const NIL: &str = "(nil)";

/// A store driven by script commands.
#[derive(Debug, Default)]
pub struct Session {
    store: TransactionalStore<String, String>,
}

impl Session {
    /// Creates a session over an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Executes one command and returns the line to print for it.
    pub fn execute(&mut self, command: &ScriptCommand) -> StoreResult<String> {
        match command {
            ScriptCommand::Begin => {
                let txid = self.store.begin_transaction()?;
                Ok(format!("BEGIN {txid}"))
            }
            ScriptCommand::Put { key, value } => {
                self.store.put(key.clone(), value.clone())?;
                Ok("OK".to_string())
            }
            ScriptCommand::Get { key } => Ok(self
                .store
                .get(key.as_str())
                .cloned()
                .unwrap_or_else(|| NIL.to_string())),
            ScriptCommand::Commit => {
                let seq = self.store.commit()?;
                Ok(format!("COMMIT {seq}"))
            }
            ScriptCommand::Rollback => {
                let discarded = self.store.rollback()?;
                Ok(format!("ROLLBACK ({discarded} pending writes discarded)"))
            }
            ScriptCommand::Stats => {
                let s = self.store.stats().snapshot();
                Ok(format!(
                    "reads={} writes={} started={} committed={} rolled_back={} errors={}",
                    s.reads,
                    s.writes,
                    s.transactions_started,
                    s.transactions_committed,
                    s.transactions_rolled_back,
                    s.errors
                ))
            }
        }
    }

    /// Returns the committed state ordered by key.
    pub fn committed(&self) -> BTreeMap<&str, &str> {
        self.store
            .committed()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &TransactionalStore<String, String> {
        &self.store
    }
}
