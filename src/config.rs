/// The default hard cap on the number of pending transactions held by the pool.
pub const TXPOOL_MAX_PENDING_TRANSACTIONS_DEFAULT: usize = 4096;

/// The default capacity of the announced-transaction-hash cache.
pub const TXPOOL_MAX_POOLED_HASHES_DEFAULT: usize = 4096;

/// The default number of hours a pending transaction is retained before the
/// enclosing pool drops it.
pub const TXPOOL_MAX_RETENTION_HOURS_DEFAULT: u64 = 13;

/// The default percentage a replacement transaction must outbid the incumbent
/// occupying the same (sender, nonce) slot.
pub const TXPOOL_PRICE_BUMP_PERCENT_DEFAULT: u128 = 10;

/// How far ahead of the sender's lowest pooled nonce a transaction may be
/// before admission rejects it as too far in the future.
pub const TXPOOL_MAX_FUTURE_NONCE_DISTANCE: u64 = 1024;

/// Configuration options for the transaction pool.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolConfig {
    /// Hours a pending transaction may stay in the pool.
    ///
    /// Enforced by the enclosing pool, carried here so it is configured in one
    /// place.
    pub max_transaction_retention_hours: u64,
    /// Hard cap on the number of pending transactions.
    ///
    /// Exceeding the cap on insertion triggers eviction of the transaction
    /// with the lowest effective priority fee.
    pub max_pending_transactions: usize,
    /// Capacity of the announced-hash cache.
    pub max_pooled_transaction_hashes: usize,
    /// Percentage bump over the incumbent's fee cap required to replace an
    /// existing (sender, nonce) pair, in the range 0..=100.
    pub price_bump: u128,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_transaction_retention_hours: TXPOOL_MAX_RETENTION_HOURS_DEFAULT,
            max_pending_transactions: TXPOOL_MAX_PENDING_TRANSACTIONS_DEFAULT,
            max_pooled_transaction_hashes: TXPOOL_MAX_POOLED_HASHES_DEFAULT,
            price_bump: TXPOOL_PRICE_BUMP_PERCENT_DEFAULT,
        }
    }
}
