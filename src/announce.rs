//! Cache of recently announced transaction hashes.

use alloy_primitives::TxHash;
use schnellru::{ByLength, LruMap};

/// A bounded LRU of transaction hashes announced by peers but not yet pooled.
///
/// The pool evicts the hash of every transaction it admits, so the cache only
/// tracks hashes the node knows about without holding the transaction.
pub(crate) struct AnnouncedHashCache {
    hashes: LruMap<TxHash, ()>,
}

// === impl AnnouncedHashCache ===

impl AnnouncedHashCache {
    pub(crate) fn new(capacity: usize) -> Self {
        Self { hashes: LruMap::new(ByLength::new(capacity.min(u32::MAX as usize) as u32)) }
    }

    /// Records an announced hash.
    pub(crate) fn insert(&mut self, hash: TxHash) {
        self.hashes.insert(hash, ());
    }

    /// Drops the hash from the cache, returning whether it was present.
    pub(crate) fn evict(&mut self, hash: &TxHash) -> bool {
        self.hashes.remove(hash).is_some()
    }

    pub(crate) fn contains(&mut self, hash: &TxHash) -> bool {
        self.hashes.get(hash).is_some()
    }

    pub(crate) fn len(&self) -> usize {
        self.hashes.len()
    }
}
