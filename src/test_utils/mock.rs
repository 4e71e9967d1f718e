//! Mock transactions for tests.

use crate::{
    identifier::{SenderIdentifiers, TransactionId},
    traits::{
        ChainHeadHeaderSupplier, HeadHeader, PoolTransaction, TransactionInfo, TransactionOrigin,
    },
};
use alloy_primitives::{Address, TxHash, B256};
use std::{sync::Arc, time::Instant};

/// A bare transaction type used for testing.
///
/// Constructors assign a random hash and sender; the fluent `with_*` setters
/// override individual fields. A setter that does not apply to the variant is
/// a no-op, mirroring how absent fields read as `None`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum MockTransaction {
    /// A pre-1559 transaction priced by a single gas price.
    Legacy {
        /// Transaction hash.
        hash: B256,
        /// Sender address.
        sender: Address,
        /// Nonce.
        nonce: u64,
        /// Gas price.
        gas_price: u128,
    },
    /// A fee-market transaction with a cap and a tip.
    Eip1559 {
        /// Transaction hash.
        hash: B256,
        /// Sender address.
        sender: Address,
        /// Nonce.
        nonce: u64,
        /// Total per-gas fee cap.
        max_fee_per_gas: u128,
        /// Per-gas tip cap.
        max_priority_fee_per_gas: u128,
    },
}

// === impl MockTransaction ===

impl MockTransaction {
    /// Returns a new legacy transaction with a random hash and sender.
    pub fn legacy() -> Self {
        Self::Legacy {
            hash: B256::random(),
            sender: Address::random(),
            nonce: 0,
            gas_price: 100,
        }
    }

    /// Returns a new EIP-1559 transaction with a random hash and sender.
    pub fn eip1559() -> Self {
        Self::Eip1559 {
            hash: B256::random(),
            sender: Address::random(),
            nonce: 0,
            max_fee_per_gas: 120,
            max_priority_fee_per_gas: 10,
        }
    }

    /// Sets the hash.
    pub fn with_hash(mut self, new: B256) -> Self {
        match &mut self {
            Self::Legacy { hash, .. } | Self::Eip1559 { hash, .. } => *hash = new,
        }
        self
    }

    /// Sets the sender.
    pub fn with_sender(mut self, new: Address) -> Self {
        match &mut self {
            Self::Legacy { sender, .. } | Self::Eip1559 { sender, .. } => *sender = new,
        }
        self
    }

    /// Sets the nonce.
    pub fn with_nonce(mut self, new: u64) -> Self {
        match &mut self {
            Self::Legacy { nonce, .. } | Self::Eip1559 { nonce, .. } => *nonce = new,
        }
        self
    }

    /// Sets the gas price of a legacy transaction.
    pub fn with_gas_price(mut self, new: u128) -> Self {
        if let Self::Legacy { gas_price, .. } = &mut self {
            *gas_price = new;
        }
        self
    }

    /// Sets the fee cap of an EIP-1559 transaction.
    pub fn with_max_fee(mut self, new: u128) -> Self {
        if let Self::Eip1559 { max_fee_per_gas, .. } = &mut self {
            *max_fee_per_gas = new;
        }
        self
    }

    /// Sets the priority fee of an EIP-1559 transaction.
    pub fn with_priority_fee(mut self, new: u128) -> Self {
        if let Self::Eip1559 { max_priority_fee_per_gas, .. } = &mut self {
            *max_priority_fee_per_gas = new;
        }
        self
    }
}

impl PoolTransaction for MockTransaction {
    fn hash(&self) -> &TxHash {
        match self {
            Self::Legacy { hash, .. } | Self::Eip1559 { hash, .. } => hash,
        }
    }

    fn sender(&self) -> Address {
        match self {
            Self::Legacy { sender, .. } | Self::Eip1559 { sender, .. } => *sender,
        }
    }

    fn nonce(&self) -> u64 {
        match self {
            Self::Legacy { nonce, .. } | Self::Eip1559 { nonce, .. } => *nonce,
        }
    }

    fn gas_price(&self) -> u128 {
        match self {
            Self::Legacy { gas_price, .. } => *gas_price,
            Self::Eip1559 { max_fee_per_gas, .. } => *max_fee_per_gas,
        }
    }

    fn max_fee_per_gas(&self) -> Option<u128> {
        match self {
            Self::Legacy { .. } => None,
            Self::Eip1559 { max_fee_per_gas, .. } => Some(*max_fee_per_gas),
        }
    }

    fn max_priority_fee_per_gas(&self) -> Option<u128> {
        match self {
            Self::Legacy { .. } => None,
            Self::Eip1559 { max_priority_fee_per_gas, .. } => Some(*max_priority_fee_per_gas),
        }
    }
}

/// Wraps [`MockTransaction`]s into pool records the way the pool does on
/// admission, with its own sequence counter and sender interning.
#[derive(Debug, Default)]
pub struct MockTransactionFactory {
    ids: SenderIdentifiers,
    sequence: u64,
}

// === impl MockTransactionFactory ===

impl MockTransactionFactory {
    /// The (sender, nonce) identifier the factory assigns the transaction.
    pub fn tx_id(&mut self, tx: &MockTransaction) -> TransactionId {
        TransactionId::new(self.ids.intern(tx.sender()), tx.nonce())
    }

    /// Wraps a remote transaction.
    pub fn create(&mut self, transaction: MockTransaction) -> Arc<TransactionInfo<MockTransaction>> {
        self.create_with_origin(transaction, TransactionOrigin::External)
    }

    /// Wraps a locally-submitted transaction.
    pub fn create_local(
        &mut self,
        transaction: MockTransaction,
    ) -> Arc<TransactionInfo<MockTransaction>> {
        self.create_with_origin(transaction, TransactionOrigin::Local)
    }

    /// Wraps a transaction with the given origin.
    pub fn create_with_origin(
        &mut self,
        transaction: MockTransaction,
        origin: TransactionOrigin,
    ) -> Arc<TransactionInfo<MockTransaction>> {
        let transaction_id = self.tx_id(&transaction);
        let sequence = self.sequence;
        self.sequence += 1;
        Arc::new(TransactionInfo {
            hash: *transaction.hash(),
            transaction_id,
            origin,
            sequence,
            nonce_distance: 0,
            timestamp: Instant::now(),
            transaction,
        })
    }
}

/// A [`ChainHeadHeaderSupplier`] returning a fixed header.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockHeadSupplier {
    header: HeadHeader,
}

// === impl MockHeadSupplier ===

impl MockHeadSupplier {
    /// Supplies the given header.
    pub const fn new(header: HeadHeader) -> Self {
        Self { header }
    }

    /// Supplies a header with the given base fee.
    pub fn with_base_fee(base_fee: u64) -> Self {
        Self { header: HeadHeader { number: 0, base_fee_per_gas: Some(base_fee) } }
    }
}

impl ChainHeadHeaderSupplier for MockHeadSupplier {
    fn chain_head_header(&self) -> HeadHeader {
        self.header
    }
}
