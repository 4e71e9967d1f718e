//! Transaction pool internals.
//!
//! The pool holds every pending transaction in exactly one of two ordered
//! ranges and keeps a hash index and a per-sender nonce index alongside:
//!
//!  - _Static range_: EIP-1559 transactions whose fee cap does not bind at
//!    the current base fee. Their effective priority fee equals their
//!    declared tip, so the range's internal order is independent of the base
//!    fee.
//!
//!  - _Dynamic range_: transactions whose cap binds, and all legacy
//!    transactions. Ordered by the fee cap (legacy gas price), which again
//!    keeps the internal order fixed while the base fee moves.
//!
//! The classification of a transaction depends on the current base fee and is
//! re-evaluated whenever a new block moves it: a rising base fee demotes
//! static-range transactions whose effective fee fell below their tip, a
//! falling base fee promotes the other way. The merged
//! [`BestTransactions`] iterator is the only place the two locally-stable
//! orders are combined into the base-fee-aware global ranking.
//!
//! [`PoolInner`] serializes every operation behind one pool-wide lock and
//! delivers observer events strictly after the lock is released.

use crate::{
    config::PoolConfig,
    error::PoolResult,
    pool::listener::PoolEventBroadcast,
    traits::{HeadHeader, PoolTransaction, TransactionInfo, TransactionOrigin},
};
use alloy_primitives::{Address, TxHash};
use futures::channel::mpsc::UnboundedReceiver;
use parking_lot::{Mutex, RwLock, RwLockReadGuard};
use std::{fmt, sync::Arc};

pub use best::BestTransactions;
pub use events::{RemovalReason, TransactionEvent};
pub use txpool::{AddedTransaction, SortedPool};

mod best;
pub(crate) mod events;
mod listener;
pub(crate) mod ranges;
pub(crate) mod senders;
pub(crate) mod txpool;

/// Transaction pool internals: the sorted pool behind the pool-wide lock,
/// plus the event listener registry.
pub struct PoolInner<T: PoolTransaction> {
    /// The sorted pool, behind the pool-wide lock.
    pool: RwLock<SortedPool<T>>,
    /// Registered event sinks.
    event_listener: Mutex<PoolEventBroadcast<T>>,
    /// Settings the pool was built with.
    config: PoolConfig,
}

// === impl PoolInner ===

impl<T: PoolTransaction> PoolInner<T> {
    /// Create a new transaction pool instance seeded with the given base fee.
    pub(crate) fn new(config: PoolConfig, base_fee: Option<u64>) -> Self {
        Self {
            pool: RwLock::new(SortedPool::new(config.clone(), base_fee)),
            event_listener: Default::default(),
            config,
        }
    }

    /// Get the config the pool was configured with.
    pub const fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Returns a read lock on the pool, for consistent-snapshot reads.
    ///
    /// The [`SortedPool::best_transactions`] iterator borrows the guard, so
    /// draining it through this accessor naturally happens under the lock.
    pub fn get_pool_data(&self) -> RwLockReadGuard<'_, SortedPool<T>> {
        self.pool.read()
    }

    /// Registers a listener for transaction events.
    pub fn add_listener(&self) -> UnboundedReceiver<TransactionEvent<T>> {
        self.event_listener.lock().subscribe()
    }

    /// Number of transactions in the pool.
    pub fn size(&self) -> usize {
        self.get_pool_data().len()
    }

    /// Returns `true` if the transaction with the given hash is in the pool.
    pub fn contains(&self, hash: &TxHash) -> bool {
        self.get_pool_data().contains(hash)
    }

    /// Returns the transaction for the given hash.
    pub fn get(&self, hash: &TxHash) -> Option<Arc<TransactionInfo<T>>> {
        self.get_pool_data().get(hash)
    }

    /// The base fee the pool currently sorts against.
    pub fn base_fee(&self) -> Option<u64> {
        self.get_pool_data().base_fee()
    }

    /// Adds the transaction to the pool and notifies listeners.
    pub fn add_transaction(
        &self,
        origin: TransactionOrigin,
        transaction: T,
    ) -> PoolResult<AddedTransaction<T>> {
        let outcome = self.pool.write().add_transaction(origin, transaction)?;

        // notifications go out after the pool lock is released
        let mut listener = self.event_listener.lock();
        listener.added(&outcome.transaction);
        if let Some(replaced) = &outcome.replaced {
            listener.replaced(replaced, *outcome.transaction.hash());
        }
        if let Some(discarded) = &outcome.discarded {
            listener.dropped(discarded);
        }
        Ok(outcome)
    }

    /// Removes the transaction with the given hash and notifies listeners.
    ///
    /// `added_to_block` distinguishes block inclusion from invalidation.
    pub fn remove_transaction(
        &self,
        hash: &TxHash,
        added_to_block: bool,
    ) -> Option<Arc<TransactionInfo<T>>> {
        let removed = self.pool.write().remove_transaction(hash, added_to_block)?;

        let mut listener = self.event_listener.lock();
        if added_to_block {
            listener.included_in_block(&removed);
        } else {
            listener.dropped(&removed);
        }
        Some(removed)
    }

    /// Applies the base fee of a newly imported block.
    pub fn on_new_block(&self, header: &HeadHeader) {
        self.pool.write().on_new_block(header);
    }

    /// Re-sorts the pool against a new base fee.
    pub fn update_base_fee(&self, new_base_fee: u64) {
        self.pool.write().update_base_fee(new_base_fee);
    }

    /// Records a transaction hash announced by a peer.
    pub fn mark_announced(&self, hash: TxHash) {
        self.pool.write().mark_announced(hash);
    }

    /// Whether the given hash was recently announced and is not yet pooled.
    pub fn is_announced(&self, hash: &TxHash) -> bool {
        self.pool.write().is_announced(hash)
    }

    /// The pooled transactions in block-producer order at the current base
    /// fee, as an owned snapshot.
    pub fn pending_transactions(&self) -> Vec<Arc<TransactionInfo<T>>> {
        self.get_pool_data().best_transactions().collect()
    }

    /// Returns all transactions submitted through a local source.
    pub fn local_transactions(&self) -> Vec<Arc<TransactionInfo<T>>> {
        self.get_pool_data().local_transactions()
    }

    /// The nonce following the sender's highest pooled transaction, if any.
    pub fn next_nonce_for_sender(&self, sender: Address) -> Option<u64> {
        self.get_pool_data().next_nonce_for_sender(sender)
    }
}

impl<T: PoolTransaction> fmt::Debug for PoolInner<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolInner").field("pool", &self.pool.read()).finish_non_exhaustive()
    }
}
