//! Event fan-out to pool observers.

use crate::{
    pool::events::TransactionEvent,
    traits::{PoolTransaction, TransactionInfo},
};
use alloy_primitives::TxHash;
use futures::channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use std::sync::Arc;

type EventSink<T> = UnboundedSender<TransactionEvent<T>>;

/// Fans transaction events out to all registered listeners.
///
/// Senders whose receiving half is gone are pruned on the next broadcast.
pub(crate) struct PoolEventBroadcast<T: PoolTransaction> {
    /// All listeners for transaction events.
    senders: Vec<EventSink<T>>,
}

// === impl PoolEventBroadcast ===

impl<T: PoolTransaction> PoolEventBroadcast<T> {
    /// Registers a new listener and returns its receiving half.
    pub(crate) fn subscribe(&mut self) -> UnboundedReceiver<TransactionEvent<T>> {
        let (sender, receiver) = unbounded();
        self.senders.push(sender);
        receiver
    }

    fn broadcast(&mut self, event: TransactionEvent<T>) {
        self.senders.retain(|sender| sender.unbounded_send(event.clone()).is_ok());
    }

    /// Notify listeners about a transaction that was admitted.
    pub(crate) fn added(&mut self, tx: &Arc<TransactionInfo<T>>) {
        self.broadcast(TransactionEvent::Added(Arc::clone(tx)));
    }

    /// Notify listeners about a transaction that was replaced.
    pub(crate) fn replaced(&mut self, tx: &Arc<TransactionInfo<T>>, replaced_by: TxHash) {
        self.broadcast(TransactionEvent::Replaced { transaction: Arc::clone(tx), replaced_by });
    }

    /// Notify listeners about a transaction that was dropped.
    pub(crate) fn dropped(&mut self, tx: &Arc<TransactionInfo<T>>) {
        self.broadcast(TransactionEvent::Dropped(Arc::clone(tx)));
    }

    /// Notify listeners that the transaction was included in a block.
    pub(crate) fn included_in_block(&mut self, tx: &Arc<TransactionInfo<T>>) {
        self.broadcast(TransactionEvent::IncludedInBlock(Arc::clone(tx)));
    }
}

impl<T: PoolTransaction> Default for PoolEventBroadcast<T> {
    fn default() -> Self {
        Self { senders: Vec::new() }
    }
}
