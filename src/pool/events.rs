use crate::traits::{PoolTransaction, TransactionInfo};
use alloy_primitives::TxHash;
use std::sync::Arc;

/// Status changes of a pooled transaction, delivered to registered listeners.
///
/// Events carry the transaction record so observers need not re-query the
/// pool.
#[derive(Debug)]
pub enum TransactionEvent<T: PoolTransaction> {
    /// The transaction was admitted to the pool.
    Added(Arc<TransactionInfo<T>>),
    /// A later submission took over the transaction's (sender, nonce) slot.
    Replaced {
        /// The replaced transaction.
        transaction: Arc<TransactionInfo<T>>,
        /// Hash of the replacement.
        replaced_by: TxHash,
    },
    /// The transaction was dropped: evicted on overflow or invalidated.
    Dropped(Arc<TransactionInfo<T>>),
    /// The transaction was removed because a block including it was imported.
    IncludedInBlock(Arc<TransactionInfo<T>>),
}

impl<T: PoolTransaction> TransactionEvent<T> {
    /// The hash of the transaction this event is about.
    pub fn hash(&self) -> &TxHash {
        match self {
            Self::Added(tx) |
            Self::Dropped(tx) |
            Self::IncludedInBlock(tx) |
            Self::Replaced { transaction: tx, .. } => tx.hash(),
        }
    }
}

impl<T: PoolTransaction> Clone for TransactionEvent<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Added(tx) => Self::Added(Arc::clone(tx)),
            Self::Replaced { transaction, replaced_by } => Self::Replaced {
                transaction: Arc::clone(transaction),
                replaced_by: *replaced_by,
            },
            Self::Dropped(tx) => Self::Dropped(Arc::clone(tx)),
            Self::IncludedInBlock(tx) => Self::IncludedInBlock(Arc::clone(tx)),
        }
    }
}

/// Why a transaction left the pool.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RemovalReason {
    /// A block including the transaction was imported.
    AddedToBlock,
    /// The transaction became invalid and was removed explicitly.
    Invalidated,
    /// The transaction was evicted to keep the pool under its size cap.
    Evicted,
    /// A higher-fee transaction took over the (sender, nonce) slot.
    Replaced,
}
