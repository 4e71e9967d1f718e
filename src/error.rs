//! Admission errors.

use alloy_primitives::TxHash;

/// Transaction pool result type.
pub type PoolResult<T> = Result<T, PoolError>;

/// An error that occurred while admitting a transaction, tagged with the hash
/// of the offending transaction.
///
/// Every admission error is local to the submission: the pool state is never
/// left partial.
#[derive(Debug, Clone, thiserror::Error)]
#[error("[{hash}]: {kind}")]
pub struct PoolError {
    /// Hash of the transaction the error concerns.
    pub hash: TxHash,
    /// What went wrong.
    pub kind: PoolErrorKind,
}

impl PoolError {
    /// Creates a new error for the given transaction hash.
    pub const fn new(hash: TxHash, kind: PoolErrorKind) -> Self {
        Self { hash, kind }
    }

    /// Returns `true` if admission failed because the transaction is already
    /// in the pool.
    pub const fn is_already_known(&self) -> bool {
        matches!(self.kind, PoolErrorKind::AlreadyKnown)
    }
}

/// All admission failures the pool can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PoolErrorKind {
    /// A transaction with the same hash is already in the pool.
    #[error("already known")]
    AlreadyKnown,
    /// A transaction already occupies the (sender, nonce) slot and the
    /// replacement does not exceed its fee cap by the configured bump.
    #[error("insufficient fee cap to replace existing transaction")]
    ReplacementUnderpriced,
    /// The nonce is too far ahead of the sender's lowest pooled nonce.
    #[error("nonce too far in the future")]
    NonceTooFarInFuture,
}
