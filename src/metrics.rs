//! Counters the pool reports.

use crate::pool::events::RemovalReason;
use metrics::{describe_counter, register_counter, Counter};

pub(crate) struct TxPoolMetrics {
    pub(crate) inserted_transactions: Counter,
    pub(crate) replaced_transactions: Counter,
    removed_local: RemovalCounters,
    removed_remote: RemovalCounters,
}

impl TxPoolMetrics {
    /// The removal counter for the given source and reason.
    pub(crate) fn removed(&self, local: bool, reason: RemovalReason) -> &Counter {
        let counters = if local { &self.removed_local } else { &self.removed_remote };
        match reason {
            RemovalReason::AddedToBlock => &counters.added_to_block,
            RemovalReason::Invalidated => &counters.invalidated,
            RemovalReason::Evicted => &counters.evicted,
            RemovalReason::Replaced => &counters.replaced,
        }
    }
}

impl Default for TxPoolMetrics {
    /// Registers every counter up front so increments are cheap handle calls.
    fn default() -> Self {
        Self {
            inserted_transactions: register_counter!("transaction_pool.inserted_transactions"),
            replaced_transactions: register_counter!("transaction_pool.replaced_transactions"),
            removed_local: RemovalCounters::register("local"),
            removed_remote: RemovalCounters::register("remote"),
        }
    }
}

/// Removal counters for one transaction source.
struct RemovalCounters {
    added_to_block: Counter,
    invalidated: Counter,
    evicted: Counter,
    replaced: Counter,
}

impl RemovalCounters {
    fn register(source: &'static str) -> Self {
        Self {
            added_to_block: register_counter!(
                "transaction_pool.removed_transactions",
                "source" => source,
                "reason" => "added_to_block"
            ),
            invalidated: register_counter!(
                "transaction_pool.removed_transactions",
                "source" => source,
                "reason" => "invalidated"
            ),
            evicted: register_counter!(
                "transaction_pool.removed_transactions",
                "source" => source,
                "reason" => "evicted"
            ),
            replaced: register_counter!(
                "transaction_pool.removed_transactions",
                "source" => source,
                "reason" => "replaced"
            ),
        }
    }
}

/// Attaches help text to the pool's counters.
pub fn describe() {
    describe_counter!(
        "transaction_pool.inserted_transactions",
        "Number of transactions inserted in the pool"
    );
    describe_counter!(
        "transaction_pool.replaced_transactions",
        "Number of transactions replaced by a higher-fee submission for the same sender and nonce"
    );
    describe_counter!(
        "transaction_pool.removed_transactions",
        "Number of transactions removed from the pool, by source and reason"
    );
}
