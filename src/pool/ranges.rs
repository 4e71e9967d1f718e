use crate::{
    ordering::RangePriority,
    traits::{PoolTransaction, TransactionInfo},
};
use std::{
    cmp::Ordering,
    collections::{btree_set, BTreeSet},
    iter,
    sync::Arc,
};

/// An entry of one of the two priority ranges.
///
/// The sort key is computed from fields frozen in [`TransactionInfo`], so the
/// same entry can be reconstructed at any time to probe the set, and keys
/// never shift while an entry is in a set.
pub(crate) struct RangeTransaction<T: PoolTransaction> {
    /// The composite priority of this entry within its range.
    pub(crate) priority: RangePriority,
    /// The pooled transaction record.
    pub(crate) transaction: Arc<TransactionInfo<T>>,
}

// === impl RangeTransaction ===

impl<T: PoolTransaction> RangeTransaction<T> {
    /// An entry keyed for the static range.
    pub(crate) fn static_range(transaction: Arc<TransactionInfo<T>>) -> Self {
        Self { priority: RangePriority::static_range(&transaction), transaction }
    }

    /// An entry keyed for the dynamic range.
    pub(crate) fn dynamic_range(transaction: Arc<TransactionInfo<T>>) -> Self {
        Self { priority: RangePriority::dynamic_range(&transaction), transaction }
    }

    /// The producer tip per gas at the given base fee.
    pub(crate) fn effective_priority_fee_per_gas(&self, base_fee: Option<u64>) -> u128 {
        self.transaction.effective_priority_fee_per_gas(base_fee)
    }
}

impl<T: PoolTransaction> Clone for RangeTransaction<T> {
    fn clone(&self) -> Self {
        Self { priority: self.priority, transaction: Arc::clone(&self.transaction) }
    }
}

impl<T: PoolTransaction> Eq for RangeTransaction<T> {}

impl<T: PoolTransaction> PartialEq<Self> for RangeTransaction<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T: PoolTransaction> PartialOrd<Self> for RangeTransaction<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: PoolTransaction> Ord for RangeTransaction<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // The sequence tie-break keeps this a total order: no two live
        // entries share a sequence number, so `BTreeSet::insert` can never
        // treat a new entry as a duplicate of one with an equal priority.
        // The comparison is flipped so that between equal priorities the
        // earlier arrival sorts closer to the best end.
        self.priority
            .cmp(&other.priority)
            .then_with(|| other.transaction.sequence.cmp(&self.transaction.sequence))
    }
}

/// One of the two priority ranges: an ordered set of pooled transactions.
///
/// Iteration order ascends the composite key, so the best candidate is the
/// last element and the worst candidate, the eviction tail, is the first.
pub(crate) struct RangeSet<T: PoolTransaction> {
    set: BTreeSet<RangeTransaction<T>>,
}

// === impl RangeSet ===

impl<T: PoolTransaction> RangeSet<T> {
    pub(crate) fn insert(&mut self, tx: RangeTransaction<T>) -> bool {
        self.set.insert(tx)
    }

    pub(crate) fn remove(&mut self, tx: &RangeTransaction<T>) -> bool {
        self.set.remove(tx)
    }

    /// The worst entry of this range by its own key, the eviction candidate.
    pub(crate) fn worst(&self) -> Option<&RangeTransaction<T>> {
        self.set.iter().next()
    }

    /// Iterates the range from best to worst.
    pub(crate) fn descending(&self) -> iter::Rev<btree_set::Iter<'_, RangeTransaction<T>>> {
        self.set.iter().rev()
    }

    /// Iterates the range from worst to best.
    pub(crate) fn ascending(&self) -> btree_set::Iter<'_, RangeTransaction<T>> {
        self.set.iter()
    }

    pub(crate) fn len(&self) -> usize {
        self.set.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.set.clear()
    }
}

impl<T: PoolTransaction> Default for RangeSet<T> {
    fn default() -> Self {
        Self { set: Default::default() }
    }
}
