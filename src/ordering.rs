//! Composite ordering keys for the two priority ranges.

use crate::traits::{PoolTransaction, TransactionInfo};
use std::cmp::Reverse;

/// The composite sort key of a range-set entry.
///
/// Lexicographic, highest first when iterated descending: locals rank above
/// remotes, then the per-range fee key, then the smaller distance from the
/// sender's next pooled nonce. The final arrival-sequence tie-break lives in
/// the set entry itself so the composite stays a total order.
///
/// The base fee is deliberately not part of the key: both ranges keep a
/// base-fee-independent internal order, and the merge step is what introduces
/// base-fee awareness.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct RangePriority {
    /// Locals outrank remotes.
    local: bool,
    /// Declared max priority fee in the static range, fee cap (or legacy gas
    /// price) in the dynamic range.
    fee: u128,
    /// Smaller distance ranks higher.
    nonce_distance: Reverse<u64>,
}

// === impl RangePriority ===

impl RangePriority {
    /// Key for a static-range member: the cap does not bind, so the declared
    /// tip is both the sort key and the effective fee.
    pub(crate) fn static_range<T: PoolTransaction>(info: &TransactionInfo<T>) -> Self {
        Self {
            local: info.is_local(),
            // static-range members are EIP-1559 by construction
            fee: info.transaction.max_priority_fee_per_gas().unwrap_or_default(),
            nonce_distance: Reverse(info.nonce_distance),
        }
    }

    /// Key for a dynamic-range member: ordered by the fee cap itself, which
    /// equals the effective fee at the head where the cap binds.
    pub(crate) fn dynamic_range<T: PoolTransaction>(info: &TransactionInfo<T>) -> Self {
        Self {
            local: info.is_local(),
            fee: info.transaction.fee_cap(),
            nonce_distance: Reverse(info.nonce_distance),
        }
    }
}

/// Returns `true` if the transaction belongs to the static range at the given
/// base fee: it declares a max priority fee and the base fee is low enough
/// that the fee cap does not bind.
///
/// Static-range ordering is stable under base-fee changes; legacy
/// transactions are never in static range.
pub fn is_in_static_range<T: PoolTransaction>(transaction: &T, base_fee: Option<u64>) -> bool {
    transaction
        .max_priority_fee_per_gas()
        .map(|max_priority_fee| {
            transaction.effective_priority_fee_per_gas(base_fee) >= max_priority_fee
        })
        .unwrap_or(false)
}
