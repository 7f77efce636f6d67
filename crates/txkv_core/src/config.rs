//! Store configuration.

/// How reads inside an open transaction are resolved against the pending log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadStrategy {
    /// Scan the log from the newest entry back to the oldest.
    ///
    /// Linear in the number of pending writes; suited to short transactions.
    #[default]
    ReverseScan,
    /// Keep a key -> latest entry position overlay beside the log.
    ///
    /// Constant-time lookups at the cost of one map insert per `put`.
    Indexed,
}

/// Configuration for a [`TransactionalStore`](crate::TransactionalStore).
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Pending-log read resolution.
    pub read_strategy: ReadStrategy,

    /// Capacity to preallocate for the committed map.
    pub initial_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            read_strategy: ReadStrategy::ReverseScan,
            initial_capacity: 0,
        }
    }
}

impl StoreConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the pending-log read strategy.
    #[must_use]
    pub const fn read_strategy(mut self, strategy: ReadStrategy) -> Self {
        self.read_strategy = strategy;
        self
    }

    /// Sets the committed map capacity hint.
    #[must_use]
    pub const fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }
}
