use crate::{
    pool::ranges::{RangeSet, RangeTransaction},
    traits::{PoolTransaction, TransactionInfo},
};
use std::{collections::btree_set, iter, sync::Arc};

/// An iterator over the pool's transactions in the order a block producer
/// should consider them, given the current base fee.
///
/// Walks both priority ranges best-first with one look-ahead element per
/// cursor and yields whichever head has the higher effective priority fee.
/// Within each range the composite key is a refinement of the effective-fee
/// order that is exact at the head: the static head carries the highest live
/// tip (the cap does not bind) and the dynamic head carries the highest live
/// cap (the cap binds), so the global maximum is always at one of the two
/// heads. Equal effective fees resolve to the static candidate.
///
/// The iterator borrows the pool, so the caller drains it while holding the
/// pool's read guard; it is fused and allocation-free per step.
pub struct BestTransactions<'a, T: PoolTransaction> {
    base_fee: Option<u64>,
    static_range: iter::Rev<btree_set::Iter<'a, RangeTransaction<T>>>,
    dynamic_range: iter::Rev<btree_set::Iter<'a, RangeTransaction<T>>>,
    next_static: Option<&'a RangeTransaction<T>>,
    next_dynamic: Option<&'a RangeTransaction<T>>,
}

// === impl BestTransactions ===

impl<'a, T: PoolTransaction> BestTransactions<'a, T> {
    pub(crate) fn new(
        static_range: &'a RangeSet<T>,
        dynamic_range: &'a RangeSet<T>,
        base_fee: Option<u64>,
    ) -> Self {
        let mut static_range = static_range.descending();
        let mut dynamic_range = dynamic_range.descending();
        let next_static = static_range.next();
        let next_dynamic = dynamic_range.next();
        Self { base_fee, static_range, dynamic_range, next_static, next_dynamic }
    }
}

impl<T: PoolTransaction> Iterator for BestTransactions<'_, T> {
    type Item = Arc<TransactionInfo<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        let best = match (self.next_static, self.next_dynamic) {
            (None, None) => return None,
            (Some(tx), None) => {
                self.next_static = self.static_range.next();
                tx
            }
            (None, Some(tx)) => {
                self.next_dynamic = self.dynamic_range.next();
                tx
            }
            (Some(static_tx), Some(dynamic_tx)) => {
                let static_fee = static_tx.effective_priority_fee_per_gas(self.base_fee);
                let dynamic_fee = dynamic_tx.effective_priority_fee_per_gas(self.base_fee);
                // ties go to the static candidate
                if dynamic_fee > static_fee {
                    self.next_dynamic = self.dynamic_range.next();
                    dynamic_tx
                } else {
                    self.next_static = self.static_range.next();
                    static_tx
                }
            }
        };
        Some(Arc::clone(&best.transaction))
    }
}

impl<T: PoolTransaction> iter::FusedIterator for BestTransactions<'_, T> {}

impl<T: PoolTransaction> std::fmt::Debug for BestTransactions<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BestTransactions").field("base_fee", &self.base_fee).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockTransaction, MockTransactionFactory};

    fn ranges(
        f: &mut MockTransactionFactory,
        base_fee: Option<u64>,
        txs: Vec<MockTransaction>,
    ) -> (RangeSet<MockTransaction>, RangeSet<MockTransaction>) {
        let mut static_range = RangeSet::default();
        let mut dynamic_range = RangeSet::default();
        for tx in txs {
            let info = f.create(tx);
            if crate::ordering::is_in_static_range(&info.transaction, base_fee) {
                static_range.insert(RangeTransaction::static_range(info));
            } else {
                dynamic_range.insert(RangeTransaction::dynamic_range(info));
            }
        }
        (static_range, dynamic_range)
    }

    #[test]
    fn yields_static_only_in_tip_order() {
        let mut f = MockTransactionFactory::default();
        let base_fee = Some(100);
        let a = MockTransaction::eip1559().with_max_fee(200).with_priority_fee(10);
        let b = MockTransaction::eip1559().with_max_fee(150).with_priority_fee(5);
        let (s, d) = ranges(&mut f, base_fee, vec![b, a]);
        assert!(d.is_empty());

        let fees: Vec<_> = BestTransactions::new(&s, &d, base_fee)
            .map(|tx| tx.effective_priority_fee_per_gas(base_fee))
            .collect();
        assert_eq!(fees, vec![10, 5]);
    }

    #[test]
    fn merges_across_ranges_by_effective_fee() {
        let mut f = MockTransactionFactory::default();
        let base_fee = Some(100);
        // dynamic: effective = min(50, 120 - 100) = 20
        let c = MockTransaction::eip1559().with_max_fee(120).with_priority_fee(50);
        // static: effective = 10
        let a = MockTransaction::eip1559().with_max_fee(200).with_priority_fee(10);
        let (s, d) = ranges(&mut f, base_fee, vec![a, c]);
        assert_eq!(s.len(), 1);
        assert_eq!(d.len(), 1);

        let fees: Vec<_> = BestTransactions::new(&s, &d, base_fee)
            .map(|tx| tx.effective_priority_fee_per_gas(base_fee))
            .collect();
        assert_eq!(fees, vec![20, 10]);
    }

    #[test]
    fn equal_fees_resolve_to_static() {
        let mut f = MockTransactionFactory::default();
        let base_fee = Some(100);
        // dynamic: effective = min(99, 110 - 100) = 10
        let dynamic = MockTransaction::eip1559().with_max_fee(110).with_priority_fee(99);
        // static: effective = 10
        let static_tx = MockTransaction::eip1559().with_max_fee(300).with_priority_fee(10);
        let (s, d) = ranges(&mut f, base_fee, vec![dynamic, static_tx.clone()]);

        let first = BestTransactions::new(&s, &d, base_fee).next().unwrap();
        assert_eq!(first.hash(), static_tx.hash());
    }

    #[test]
    fn exhausted_iterator_stays_empty() {
        let (s, d) = (RangeSet::<MockTransaction>::default(), RangeSet::default());
        let mut best = BestTransactions::new(&s, &d, None);
        assert!(best.next().is_none());
        assert!(best.next().is_none());
    }
}
