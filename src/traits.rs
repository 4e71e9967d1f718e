use crate::identifier::TransactionId;
use alloy_primitives::{Address, TxHash};
use std::{fmt, time::Instant};

/// The abstract view the pool needs of a transaction.
///
/// Fee quantities are per-gas values in wei. A transaction is in EIP-1559 form
/// when it declares both a fee cap and a priority fee; otherwise its legacy
/// `gas_price` is used wherever the cap would be.
pub trait PoolTransaction: fmt::Debug + Clone + Send + Sync + 'static {
    /// Hash of the transaction.
    fn hash(&self) -> &TxHash;

    /// The sender of the transaction.
    fn sender(&self) -> Address;

    /// The nonce of the transaction.
    fn nonce(&self) -> u64;

    /// The legacy gas price.
    fn gas_price(&self) -> u128;

    /// EIP-1559 cap on the total per-gas payment (base fee + tip), if any.
    fn max_fee_per_gas(&self) -> Option<u128>;

    /// EIP-1559 cap on the per-gas tip paid to the block producer, if any.
    fn max_priority_fee_per_gas(&self) -> Option<u128>;

    /// Returns `true` if this is an EIP-1559 transaction.
    fn is_eip1559(&self) -> bool {
        self.max_fee_per_gas().is_some() && self.max_priority_fee_per_gas().is_some()
    }

    /// The cap the sender committed to pay per gas: `max_fee_per_gas` for
    /// EIP-1559 transactions, the gas price otherwise.
    fn fee_cap(&self) -> u128 {
        self.max_fee_per_gas().unwrap_or_else(|| self.gas_price())
    }

    /// The per-gas tip the block producer earns from this transaction at the
    /// given base fee.
    ///
    /// For EIP-1559 transactions this is `min(max_priority_fee, max_fee -
    /// base_fee)`; when the base fee exceeds the cap the transaction is not
    /// executable and the fee saturates to zero, the minimum. For legacy
    /// transactions it is `gas_price - base_fee`, also saturating at zero.
    /// An absent base fee counts as zero.
    fn effective_priority_fee_per_gas(&self, base_fee: Option<u64>) -> u128 {
        let base_fee = base_fee.unwrap_or_default() as u128;
        match (self.max_fee_per_gas(), self.max_priority_fee_per_gas()) {
            (Some(max_fee), Some(max_priority_fee)) => {
                max_priority_fee.min(max_fee.saturating_sub(base_fee))
            }
            _ => self.gas_price().saturating_sub(base_fee),
        }
    }
}

/// Where the transaction entered the node.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransactionOrigin {
    /// Submitted directly to this node, e.g. over RPC.
    Local,
    /// Received from the network.
    #[default]
    External,
}

// === impl TransactionOrigin ===

impl TransactionOrigin {
    /// Whether the transaction originates from a local source.
    pub const fn is_local(&self) -> bool {
        matches!(self, Self::Local)
    }
}

/// The slice of a block header the pool cares about.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeadHeader {
    /// The block number.
    pub number: u64,
    /// The block's base fee, absent before the fee-market rule activated.
    pub base_fee_per_gas: Option<u64>,
}

/// Supplies the current chain head header.
///
/// Queried once at pool construction to seed the base fee.
pub trait ChainHeadHeaderSupplier {
    /// Returns the header of the current chain head.
    fn chain_head_header(&self) -> HeadHeader;
}

impl<F> ChainHeadHeaderSupplier for F
where
    F: Fn() -> HeadHeader,
{
    fn chain_head_header(&self) -> HeadHeader {
        (self)()
    }
}

/// An immutable record of a transaction resident in the pool.
///
/// Created when the transaction is admitted and destroyed when it is removed.
/// `sequence` is assigned under the pool lock and provides a deterministic
/// first-in tie-break; `nonce_distance` is frozen at insertion so the
/// ordered-set keys derived from this record never shift while it is in a set.
#[derive(Debug)]
pub struct TransactionInfo<T: PoolTransaction> {
    /// The actual transaction.
    pub transaction: T,
    /// Cached hash of the transaction.
    pub(crate) hash: TxHash,
    /// The (sender, nonce) slot this transaction occupies.
    pub(crate) transaction_id: TransactionId,
    /// Where the transaction entered the node.
    pub(crate) origin: TransactionOrigin,
    /// Monotonic arrival counter.
    pub(crate) sequence: u64,
    /// Distance from the sender's lowest pooled nonce at insertion time.
    pub(crate) nonce_distance: u64,
    /// When the transaction was admitted.
    pub(crate) timestamp: Instant,
}

// === impl TransactionInfo ===

impl<T: PoolTransaction> TransactionInfo<T> {
    /// Hash of the transaction.
    pub const fn hash(&self) -> &TxHash {
        &self.hash
    }

    /// The (sender, nonce) slot identifier.
    pub const fn id(&self) -> &TransactionId {
        &self.transaction_id
    }

    /// The sender of the transaction.
    pub fn sender(&self) -> Address {
        self.transaction.sender()
    }

    /// The nonce of the transaction.
    pub fn nonce(&self) -> u64 {
        self.transaction.nonce()
    }

    /// Where the transaction entered the node.
    pub const fn origin(&self) -> TransactionOrigin {
        self.origin
    }

    /// Whether the transaction originates from a local source.
    pub const fn is_local(&self) -> bool {
        self.origin.is_local()
    }

    /// The arrival sequence number assigned at admission.
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    /// When the transaction was admitted.
    pub const fn timestamp(&self) -> Instant {
        self.timestamp
    }

    /// The producer tip per gas at the given base fee.
    pub fn effective_priority_fee_per_gas(&self, base_fee: Option<u64>) -> u128 {
        self.transaction.effective_priority_fee_per_gas(base_fee)
    }
}
