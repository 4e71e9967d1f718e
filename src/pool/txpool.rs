//! The internal transaction pool implementation.

use crate::{
    announce::AnnouncedHashCache,
    config::PoolConfig,
    error::{PoolError, PoolErrorKind, PoolResult},
    identifier::{SenderIdentifiers, TransactionId},
    metrics::TxPoolMetrics,
    ordering::is_in_static_range,
    pool::{
        best::BestTransactions,
        events::RemovalReason,
        ranges::{RangeSet, RangeTransaction},
        senders::SenderNonceIndex,
    },
    traits::{HeadHeader, PoolTransaction, TransactionInfo, TransactionOrigin},
};
use alloy_primitives::{Address, TxHash};
use std::{collections::HashMap, fmt, sync::Arc, time::Instant};
use tracing::{debug, error, trace};

/// A pool holding the set of pending transactions, indexed twice by priority.
///
/// Every transaction lives in exactly one of two ordered ranges. The _static_
/// range holds EIP-1559 transactions whose fee cap does not bind at the
/// current base fee; their effective priority fee equals their declared tip,
/// so the range's internal order never moves with the base fee. The _dynamic_
/// range holds everything else, ordered by the fee cap (legacy gas price for
/// pre-1559 transactions), which again keeps the internal order fixed while
/// the base fee moves. Base-fee awareness enters in exactly two places: the
/// merged [`BestTransactions`] iterator, and the migration pass
/// [`Self::update_base_fee`] runs when the chain head changes.
///
/// All mutation happens through `&mut self`; [`PoolInner`](crate::pool::PoolInner)
/// serializes access behind the pool-wide lock.
pub struct SortedPool<T: PoolTransaction> {
    /// Monotonic arrival counter, assigned to each admitted transaction.
    sequence: u64,
    /// Base fee of the current chain head, absent pre-fee-market.
    base_fee: Option<u64>,
    /// All pooled transactions by hash.
    by_hash: HashMap<TxHash, Arc<TransactionInfo<T>>>,
    /// Transactions whose cap does not bind at the current base fee.
    static_range: RangeSet<T>,
    /// Transactions whose cap binds, plus all legacy transactions.
    dynamic_range: RangeSet<T>,
    /// Per-sender nonce index backing replace-by-fee.
    senders: SenderNonceIndex<T>,
    /// Sender address interner.
    identifiers: SenderIdentifiers,
    /// Recently announced hashes not yet pooled.
    announced: AnnouncedHashCache,
    /// Limits and admission settings.
    config: PoolConfig,
    /// Counters for admissions and removals.
    metrics: TxPoolMetrics,
}

// === impl SortedPool ===

impl<T: PoolTransaction> SortedPool<T> {
    /// Create a new pool instance seeded with the chain head's base fee.
    pub(crate) fn new(config: PoolConfig, base_fee: Option<u64>) -> Self {
        Self {
            sequence: 0,
            base_fee,
            by_hash: Default::default(),
            static_range: Default::default(),
            dynamic_range: Default::default(),
            senders: Default::default(),
            identifiers: Default::default(),
            announced: AnnouncedHashCache::new(config.max_pooled_transaction_hashes),
            config,
            metrics: Default::default(),
        }
    }

    /// The base fee the pool currently sorts against.
    pub fn base_fee(&self) -> Option<u64> {
        self.base_fee
    }

    /// Number of transactions in the pool.
    pub fn len(&self) -> usize {
        self.by_hash.len()
    }

    /// Whether the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.by_hash.is_empty()
    }

    /// Returns `true` if the transaction with the given hash is in the pool.
    pub fn contains(&self, hash: &TxHash) -> bool {
        self.by_hash.contains_key(hash)
    }

    /// Returns the transaction for the given hash.
    pub fn get(&self, hash: &TxHash) -> Option<Arc<TransactionInfo<T>>> {
        self.by_hash.get(hash).cloned()
    }

    /// Returns an iterator over all pooled transactions, in no particular
    /// order.
    pub fn all_transactions(&self) -> impl Iterator<Item = Arc<TransactionInfo<T>>> + '_ {
        self.by_hash.values().cloned()
    }

    /// Returns all transactions submitted through a local source.
    pub fn local_transactions(&self) -> Vec<Arc<TransactionInfo<T>>> {
        self.by_hash.values().filter(|tx| tx.is_local()).cloned().collect()
    }

    /// The nonce following the sender's highest pooled transaction, if the
    /// sender has any transactions pooled.
    pub fn next_nonce_for_sender(&self, sender: Address) -> Option<u64> {
        let id = self.identifiers.get(&sender)?;
        self.senders.next_nonce_for_sender(&id)
    }

    /// Returns an iterator yielding the pooled transactions in the order a
    /// block producer should consider them at the current base fee.
    ///
    /// Must be consumed while no mutation can interleave; see
    /// [`BestTransactions`].
    pub fn best_transactions(&self) -> BestTransactions<'_, T> {
        BestTransactions::new(&self.static_range, &self.dynamic_range, self.base_fee)
    }

    /// Records a transaction hash announced by a peer.
    pub(crate) fn mark_announced(&mut self, hash: TxHash) {
        self.announced.insert(hash);
    }

    /// Whether the given hash was recently announced and is not yet pooled.
    pub(crate) fn is_announced(&mut self, hash: &TxHash) -> bool {
        self.announced.contains(hash)
    }

    /// Adds the transaction to the pool.
    ///
    /// Admission runs the replace-by-fee gate for the (sender, nonce) slot,
    /// classifies the transaction into one of the two ranges, and evicts the
    /// transaction with the lowest effective priority fee if the pool
    /// overflows its cap. The returned outcome names the replaced and
    /// discarded transactions so the caller can notify observers after
    /// releasing the pool lock.
    pub(crate) fn add_transaction(
        &mut self,
        origin: TransactionOrigin,
        transaction: T,
    ) -> PoolResult<AddedTransaction<T>> {
        let hash = *transaction.hash();
        if self.by_hash.contains_key(&hash) {
            return Err(PoolError::new(hash, PoolErrorKind::AlreadyKnown));
        }

        let sender_id = self.identifiers.intern(transaction.sender());
        let transaction_id = TransactionId::new(sender_id, transaction.nonce());

        let incumbent = self
            .senders
            .admit(&transaction_id, &transaction, self.config.price_bump)
            .map_err(|kind| PoolError::new(hash, kind))?;

        let replaced = incumbent.and_then(|incumbent| {
            let removed = self.remove_with_reason(&incumbent.hash, RemovalReason::Replaced);
            self.metrics.replaced_transactions.increment(1);
            removed
        });

        let sequence = self.next_sequence();
        let nonce_distance = self.senders.distance_from_next_nonce(&transaction_id);
        let info = Arc::new(TransactionInfo {
            transaction,
            hash,
            transaction_id,
            origin,
            sequence,
            nonce_distance,
            timestamp: Instant::now(),
        });

        if is_in_static_range(&info.transaction, self.base_fee) {
            self.static_range.insert(RangeTransaction::static_range(Arc::clone(&info)));
        } else {
            self.dynamic_range.insert(RangeTransaction::dynamic_range(Arc::clone(&info)));
        }
        self.by_hash.insert(hash, Arc::clone(&info));
        self.senders.insert(Arc::clone(&info));
        self.announced.evict(&hash);
        self.metrics.inserted_transactions.increment(1);
        trace!(target: "txpool", hash = %hash, "added transaction to pending pool");

        let mut discarded = None;
        if self.by_hash.len() > self.config.max_pending_transactions {
            discarded = self.evict_worst();
        }

        debug_assert_eq!(
            self.by_hash.len(),
            self.static_range.len() + self.dynamic_range.len(),
            "range sets out of sync with hash index"
        );
        debug_assert!(self.by_hash.len() <= self.config.max_pending_transactions);

        Ok(AddedTransaction { transaction: info, replaced, discarded })
    }

    /// Removes the transaction with the given hash from the pool.
    ///
    /// `added_to_block` distinguishes block inclusion from invalidation for
    /// the removal counters.
    pub(crate) fn remove_transaction(
        &mut self,
        hash: &TxHash,
        added_to_block: bool,
    ) -> Option<Arc<TransactionInfo<T>>> {
        let reason =
            if added_to_block { RemovalReason::AddedToBlock } else { RemovalReason::Invalidated };
        self.remove_with_reason(hash, reason)
    }

    fn remove_with_reason(
        &mut self,
        hash: &TxHash,
        reason: RemovalReason,
    ) -> Option<Arc<TransactionInfo<T>>> {
        let info = self.by_hash.remove(hash)?;
        // dynamic range first: it holds the bulk of the transactions
        if !self.dynamic_range.remove(&RangeTransaction::dynamic_range(Arc::clone(&info))) &&
            !self.static_range.remove(&RangeTransaction::static_range(Arc::clone(&info)))
        {
            error!(
                target: "txpool",
                hash = %info.hash(),
                "transaction missing from both ranges, rebuilding range sets"
            );
            self.rebuild_ranges();
        }
        self.senders.remove(&info.transaction_id);
        self.metrics.removed(info.is_local(), reason).increment(1);
        trace!(target: "txpool", hash = %info.hash(), ?reason, "removed transaction");
        Some(info)
    }

    /// Applies the base fee of a newly imported block.
    ///
    /// Removal of the block's own transactions is the caller's job, via
    /// [`Self::remove_transaction`] with `added_to_block = true`.
    pub(crate) fn on_new_block(&mut self, header: &HeadHeader) {
        if let Some(base_fee) = header.base_fee_per_gas {
            self.update_base_fee(base_fee);
        }
    }

    /// Re-sorts the pool against a new base fee.
    ///
    /// A rising base fee can only demote transactions from the static to the
    /// dynamic range (effective fees fall toward the cap); a falling one can
    /// only promote the other way. Migrants are collected first and moved
    /// after the scan, never while iterating the set being drained.
    pub(crate) fn update_base_fee(&mut self, new_base_fee: u64) {
        if self.base_fee.unwrap_or_default() == new_base_fee {
            return;
        }
        let increased = new_base_fee > self.base_fee.unwrap_or_default();
        debug!(
            target: "txpool",
            old = ?self.base_fee,
            new = new_base_fee,
            "updating base fee"
        );
        self.base_fee = Some(new_base_fee);

        if increased {
            let demoted: Vec<RangeTransaction<T>> = self
                .static_range
                .ascending()
                .filter(|tx| !is_in_static_range(&tx.transaction.transaction, self.base_fee))
                .cloned()
                .collect();
            for tx in demoted {
                trace!(target: "txpool", hash = %tx.transaction.hash(), "demoting to dynamic range");
                self.static_range.remove(&tx);
                self.dynamic_range.insert(RangeTransaction::dynamic_range(tx.transaction));
            }
        } else {
            let promoted: Vec<RangeTransaction<T>> = self
                .dynamic_range
                .ascending()
                .filter(|tx| is_in_static_range(&tx.transaction.transaction, self.base_fee))
                .cloned()
                .collect();
            for tx in promoted {
                trace!(target: "txpool", hash = %tx.transaction.hash(), "promoting to static range");
                self.dynamic_range.remove(&tx);
                self.static_range.insert(RangeTransaction::static_range(tx.transaction));
            }
        }

        debug_assert_eq!(
            self.by_hash.len(),
            self.static_range.len() + self.dynamic_range.len(),
            "range sets out of sync after base fee update"
        );
    }

    /// Evicts the transaction with the smallest effective priority fee among
    /// the two range tails. Exactly one transaction is removed.
    fn evict_worst(&mut self) -> Option<Arc<TransactionInfo<T>>> {
        let tail_of = |tx: &RangeTransaction<T>| {
            (tx.effective_priority_fee_per_gas(self.base_fee), *tx.transaction.hash())
        };
        let static_tail = self.static_range.worst().map(tail_of);
        let dynamic_tail = self.dynamic_range.worst().map(tail_of);

        let victim = match (dynamic_tail, static_tail) {
            (None, None) => return None,
            (Some((_, hash)), None) | (None, Some((_, hash))) => hash,
            (Some((dynamic_fee, dynamic_hash)), Some((static_fee, static_hash))) => {
                // ties evict the dynamic tail
                if static_fee < dynamic_fee {
                    static_hash
                } else {
                    dynamic_hash
                }
            }
        };
        let evicted = self.remove_with_reason(&victim, RemovalReason::Evicted);
        if let Some(ref tx) = evicted {
            trace!(target: "txpool", hash = %tx.hash(), "evicted transaction over pool size cap");
        }
        evicted
    }

    /// Reclassifies every pooled transaction from the hash index.
    ///
    /// Recovery path for a broken range invariant observed in release builds.
    fn rebuild_ranges(&mut self) {
        self.static_range.clear();
        self.dynamic_range.clear();
        for info in self.by_hash.values() {
            if is_in_static_range(&info.transaction, self.base_fee) {
                self.static_range.insert(RangeTransaction::static_range(Arc::clone(info)));
            } else {
                self.dynamic_range.insert(RangeTransaction::dynamic_range(Arc::clone(info)));
            }
        }
    }

    fn next_sequence(&mut self) -> u64 {
        let sequence = self.sequence;
        self.sequence = self.sequence.wrapping_add(1);
        sequence
    }

    /// Asserts the pool-wide invariants: the hash index, the two ranges and
    /// the sender index agree, and every range member is correctly
    /// classified.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn assert_invariants(&self) {
        assert_eq!(
            self.by_hash.len(),
            self.static_range.len() + self.dynamic_range.len(),
            "by_hash.len() != static.len() + dynamic.len()"
        );
        assert_eq!(self.by_hash.len(), self.senders.len(), "sender index out of sync");
        assert!(
            self.by_hash.len() <= self.config.max_pending_transactions,
            "pool exceeds max_pending_transactions"
        );
        for tx in self.static_range.ascending() {
            assert!(
                is_in_static_range(&tx.transaction.transaction, self.base_fee),
                "static range member outside static range"
            );
            assert!(self.by_hash.contains_key(tx.transaction.hash()));
        }
        for tx in self.dynamic_range.ascending() {
            assert!(
                !is_in_static_range(&tx.transaction.transaction, self.base_fee),
                "dynamic range member inside static range"
            );
            assert!(self.by_hash.contains_key(tx.transaction.hash()));
        }
    }

    /// Hashes of the static range, best first.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn static_range_hashes(&self) -> Vec<TxHash> {
        self.static_range.descending().map(|tx| *tx.transaction.hash()).collect()
    }

    /// Hashes of the dynamic range, best first.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn dynamic_range_hashes(&self) -> Vec<TxHash> {
        self.dynamic_range.descending().map(|tx| *tx.transaction.hash()).collect()
    }
}

impl<T: PoolTransaction> fmt::Debug for SortedPool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortedPool")
            .field("base_fee", &self.base_fee)
            .field("pending", &self.by_hash.len())
            .field("static_range", &self.static_range.len())
            .field("dynamic_range", &self.dynamic_range.len())
            .field("announced", &self.announced.len())
            .finish_non_exhaustive()
    }
}

/// The outcome of a successful [`SortedPool::add_transaction`] call.
#[derive(Debug)]
pub struct AddedTransaction<T: PoolTransaction> {
    /// The admitted transaction.
    pub transaction: Arc<TransactionInfo<T>>,
    /// The incumbent of the (sender, nonce) slot this admission replaced.
    pub replaced: Option<Arc<TransactionInfo<T>>>,
    /// The transaction evicted to keep the pool under its size cap.
    ///
    /// Can be the admitted transaction itself if it immediately became the
    /// worst candidate.
    pub discarded: Option<Arc<TransactionInfo<T>>>,
}
