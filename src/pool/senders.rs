use crate::{
    config::TXPOOL_MAX_FUTURE_NONCE_DISTANCE,
    error::PoolErrorKind,
    identifier::{SenderId, TransactionId},
    traits::{PoolTransaction, TransactionInfo},
};
use fnv::FnvHashMap;
use std::{collections::BTreeMap, sync::Arc};

/// Per-sender index of pooled transactions, ordered by nonce.
///
/// Backs replace-by-fee admission and the distance-from-next-nonce queries the
/// range comparators use.
pub(crate) struct SenderNonceIndex<T: PoolTransaction> {
    transactions: FnvHashMap<SenderId, BTreeMap<u64, Arc<TransactionInfo<T>>>>,
}

// === impl SenderNonceIndex ===

impl<T: PoolTransaction> SenderNonceIndex<T> {
    /// Gatekeeps a submission for its (sender, nonce) slot.
    ///
    /// Returns the incumbent that must be removed first when the submission
    /// replaces an existing transaction, `None` when the slot is free.
    ///
    /// A replacement must exceed the incumbent's fee cap by at least
    /// `price_bump` percent; a submission for a free slot must not be more
    /// than [`TXPOOL_MAX_FUTURE_NONCE_DISTANCE`] ahead of the sender's lowest
    /// pooled nonce.
    pub(crate) fn admit(
        &self,
        id: &TransactionId,
        transaction: &T,
        price_bump: u128,
    ) -> Result<Option<Arc<TransactionInfo<T>>>, PoolErrorKind> {
        let by_nonce = self.transactions.get(&id.sender);

        if let Some(incumbent) = by_nonce.and_then(|txs| txs.get(&id.nonce)) {
            let incumbent_cap = incumbent.transaction.fee_cap();
            let threshold = incumbent_cap.saturating_mul(100 + price_bump);
            if transaction.fee_cap().saturating_mul(100) < threshold {
                return Err(PoolErrorKind::ReplacementUnderpriced);
            }
            return Ok(Some(Arc::clone(incumbent)));
        }

        if let Some(lowest) = by_nonce.and_then(|txs| txs.keys().next()) {
            if id.nonce.saturating_sub(*lowest) > TXPOOL_MAX_FUTURE_NONCE_DISTANCE {
                return Err(PoolErrorKind::NonceTooFarInFuture);
            }
        }
        Ok(None)
    }

    /// Tracks an admitted transaction.
    pub(crate) fn insert(&mut self, info: Arc<TransactionInfo<T>>) {
        let id = *info.id();
        self.transactions.entry(id.sender).or_default().insert(id.nonce, info);
    }

    /// Stops tracking the transaction occupying the given slot.
    pub(crate) fn remove(&mut self, id: &TransactionId) -> Option<Arc<TransactionInfo<T>>> {
        let by_nonce = self.transactions.get_mut(&id.sender)?;
        let removed = by_nonce.remove(&id.nonce);
        if by_nonce.is_empty() {
            self.transactions.remove(&id.sender);
        }
        removed
    }

    /// Distance of the given slot from the sender's lowest pooled nonce,
    /// clamped at zero. A sender with no pooled transactions has distance
    /// zero.
    pub(crate) fn distance_from_next_nonce(&self, id: &TransactionId) -> u64 {
        self.transactions
            .get(&id.sender)
            .and_then(|txs| txs.keys().next())
            .map(|lowest| id.nonce.saturating_sub(*lowest))
            .unwrap_or_default()
    }

    /// The nonce following the sender's highest pooled transaction, if any.
    pub(crate) fn next_nonce_for_sender(&self, sender: &SenderId) -> Option<u64> {
        self.transactions
            .get(sender)
            .and_then(|txs| txs.keys().next_back())
            .map(|highest| highest.saturating_add(1))
    }

    /// Total number of tracked transactions across all senders.
    pub(crate) fn len(&self) -> usize {
        self.transactions.values().map(BTreeMap::len).sum()
    }
}

impl<T: PoolTransaction> Default for SenderNonceIndex<T> {
    fn default() -> Self {
        Self { transactions: Default::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockTransaction, MockTransactionFactory};
    use alloy_primitives::Address;

    #[test]
    fn replacement_requires_price_bump() {
        let mut f = MockTransactionFactory::default();
        let mut index = SenderNonceIndex::default();
        let sender = Address::with_last_byte(1);

        let incumbent =
            f.create(MockTransaction::legacy().with_sender(sender).with_gas_price(100));
        let id = *incumbent.id();
        index.insert(Arc::clone(&incumbent));

        // 105 < 100 + 10% bump
        let low = MockTransaction::legacy().with_sender(sender).with_gas_price(105);
        assert!(matches!(
            index.admit(&id, &low, 10),
            Err(PoolErrorKind::ReplacementUnderpriced)
        ));

        // 115 clears the threshold and names the incumbent
        let high = MockTransaction::legacy().with_sender(sender).with_gas_price(115);
        let replaced = index.admit(&id, &high, 10).unwrap().unwrap();
        assert_eq!(replaced.hash(), incumbent.hash());

        // exactly the threshold is accepted
        let exact = MockTransaction::legacy().with_sender(sender).with_gas_price(110);
        assert!(index.admit(&id, &exact, 10).unwrap().is_some());
    }

    #[test]
    fn rejects_nonce_too_far_in_future() {
        let mut f = MockTransactionFactory::default();
        let mut index = SenderNonceIndex::default();
        let sender = Address::with_last_byte(2);

        let first = f.create(MockTransaction::eip1559().with_sender(sender).with_nonce(5));
        index.insert(first);

        let near = MockTransaction::eip1559().with_sender(sender).with_nonce(6);
        assert!(matches!(index.admit(&f.tx_id(&near), &near, 10), Ok(None)));

        let far = MockTransaction::eip1559()
            .with_sender(sender)
            .with_nonce(5 + TXPOOL_MAX_FUTURE_NONCE_DISTANCE + 1);
        assert!(matches!(
            index.admit(&f.tx_id(&far), &far, 10),
            Err(PoolErrorKind::NonceTooFarInFuture)
        ));
    }

    #[test]
    fn tracks_nonce_distance() {
        let mut f = MockTransactionFactory::default();
        let mut index = SenderNonceIndex::default();
        let sender = Address::with_last_byte(3);

        let base = f.create(MockTransaction::eip1559().with_sender(sender).with_nonce(10));
        let sender_id = base.id().sender;
        index.insert(base);

        assert_eq!(index.distance_from_next_nonce(&TransactionId::new(sender_id, 10)), 0);
        assert_eq!(index.distance_from_next_nonce(&TransactionId::new(sender_id, 13)), 3);
        assert_eq!(index.next_nonce_for_sender(&sender_id), Some(11));

        index.remove(&TransactionId::new(sender_id, 10));
        assert_eq!(index.len(), 0);
        assert_eq!(index.distance_from_next_nonce(&TransactionId::new(sender_id, 13)), 0);
        assert_eq!(index.next_nonce_for_sender(&sender_id), None);
    }
}
