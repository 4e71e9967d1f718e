#![warn(missing_debug_implementations, missing_docs, unreachable_pub)]
#![deny(unused_must_use, rust_2018_idioms)]
#![doc(test(
    no_crate_inject,
    attr(deny(warnings, rust_2018_idioms), allow(dead_code, unused_variables))
))]

//! A priority-ordered pending-transaction pool for EIP-1559 chains.
//!
//! The pool holds the set of transactions received but not yet included in a
//! block and exposes them in the order a block producer should consider them,
//! maximizing priority-fee revenue at the current base fee. Internally every
//! transaction lives in one of two ordered ranges whose keys are independent
//! of the base fee; see the [`pool`] module for the layout and the migration
//! protocol that runs when the base fee changes.
//!
//! [`Pool`] is the shareable entry point: network ingestion calls
//! [`Pool::add_transaction`], the block importer calls [`Pool::on_new_block`]
//! and [`Pool::remove_transaction`], and the block producer drains
//! [`SortedPool::best_transactions`] through [`Pool::pool_data`].

use alloy_primitives::{Address, TxHash};
use futures::channel::mpsc::UnboundedReceiver;
use parking_lot::RwLockReadGuard;
use std::{fmt, sync::Arc};

mod announce;
mod config;
pub mod error;
mod identifier;
pub mod metrics;
mod ordering;
pub mod pool;
mod traits;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use crate::{
    config::{
        PoolConfig, TXPOOL_MAX_FUTURE_NONCE_DISTANCE, TXPOOL_MAX_PENDING_TRANSACTIONS_DEFAULT,
        TXPOOL_MAX_POOLED_HASHES_DEFAULT, TXPOOL_MAX_RETENTION_HOURS_DEFAULT,
        TXPOOL_PRICE_BUMP_PERCENT_DEFAULT,
    },
    error::{PoolError, PoolErrorKind, PoolResult},
    identifier::{SenderId, SenderIdentifiers, TransactionId},
    ordering::is_in_static_range,
    pool::{
        AddedTransaction, BestTransactions, PoolInner, RemovalReason, SortedPool,
        TransactionEvent,
    },
    traits::{
        ChainHeadHeaderSupplier, HeadHeader, PoolTransaction, TransactionInfo, TransactionOrigin,
    },
};

/// A shareable handle to the transaction pool.
///
/// Cloning is cheap; all clones operate on the same pool.
pub struct Pool<T: PoolTransaction> {
    /// Shared pool internals.
    inner: Arc<PoolInner<T>>,
}

// === impl Pool ===

impl<T: PoolTransaction> Pool<T> {
    /// Creates a new pool with the given config, seeding the base fee from
    /// the current chain head.
    pub fn new(config: PoolConfig, chain_head: &impl ChainHeadHeaderSupplier) -> Self {
        let base_fee = chain_head.chain_head_header().base_fee_per_gas;
        Self { inner: Arc::new(PoolInner::new(config, base_fee)) }
    }

    /// Get the config the pool was configured with.
    pub fn config(&self) -> &PoolConfig {
        self.inner.config()
    }

    /// Adds the transaction to the pool.
    ///
    /// Listeners are notified about the admitted transaction, a replaced
    /// incumbent, and an eviction, in that order, after the pool lock has
    /// been released.
    pub fn add_transaction(
        &self,
        origin: TransactionOrigin,
        transaction: T,
    ) -> PoolResult<AddedTransaction<T>> {
        self.inner.add_transaction(origin, transaction)
    }

    /// Removes the transaction with the given hash.
    ///
    /// `added_to_block` is `true` when the removal is due to block inclusion,
    /// `false` when the transaction became invalid.
    pub fn remove_transaction(
        &self,
        hash: &TxHash,
        added_to_block: bool,
    ) -> Option<Arc<TransactionInfo<T>>> {
        self.inner.remove_transaction(hash, added_to_block)
    }

    /// Applies a newly imported block: picks up its base fee if present.
    ///
    /// The block's own transactions are removed by the block importer via
    /// [`Self::remove_transaction`] with `added_to_block = true`.
    pub fn on_new_block(&self, header: &HeadHeader) {
        self.inner.on_new_block(header);
    }

    /// Re-sorts the pool against a new base fee.
    pub fn update_base_fee(&self, new_base_fee: u64) {
        self.inner.update_base_fee(new_base_fee);
    }

    /// Returns a read lock on the pool data.
    ///
    /// Drain [`SortedPool::best_transactions`] through this guard to iterate
    /// the block-producer ordering lazily; mutation is blocked for the
    /// guard's lifetime, so keep per-step work bounded.
    pub fn pool_data(&self) -> RwLockReadGuard<'_, SortedPool<T>> {
        self.inner.get_pool_data()
    }

    /// The pooled transactions in block-producer order, as an owned snapshot.
    pub fn pending_transactions(&self) -> Vec<Arc<TransactionInfo<T>>> {
        self.inner.pending_transactions()
    }

    /// Returns all transactions submitted through a local source.
    pub fn local_transactions(&self) -> Vec<Arc<TransactionInfo<T>>> {
        self.inner.local_transactions()
    }

    /// Number of transactions in the pool.
    pub fn size(&self) -> usize {
        self.inner.size()
    }

    /// Returns `true` if the transaction with the given hash is in the pool.
    pub fn contains(&self, hash: &TxHash) -> bool {
        self.inner.contains(hash)
    }

    /// Returns the transaction for the given hash.
    pub fn get(&self, hash: &TxHash) -> Option<Arc<TransactionInfo<T>>> {
        self.inner.get(hash)
    }

    /// The base fee the pool currently sorts against.
    pub fn base_fee(&self) -> Option<u64> {
        self.inner.base_fee()
    }

    /// Registers a listener for transaction events.
    pub fn add_listener(&self) -> UnboundedReceiver<TransactionEvent<T>> {
        self.inner.add_listener()
    }

    /// Records a transaction hash announced by a peer.
    pub fn mark_announced(&self, hash: TxHash) {
        self.inner.mark_announced(hash);
    }

    /// Whether the given hash was recently announced and is not yet pooled.
    pub fn is_announced(&self, hash: &TxHash) -> bool {
        self.inner.is_announced(hash)
    }

    /// The nonce following the sender's highest pooled transaction, if any.
    pub fn next_nonce_for_sender(&self, sender: Address) -> Option<u64> {
        self.inner.next_nonce_for_sender(sender)
    }
}

impl<T: PoolTransaction> Clone for Pool<T> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<T: PoolTransaction> fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool").field("inner", &self.inner).finish()
    }
}
