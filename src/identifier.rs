use alloy_primitives::Address;
use fnv::FnvHashMap;
use std::collections::{hash_map::Entry, HashMap};

/// Compact stand-in for a sender address, unique within one pool instance.
///
/// The per-sender indices key on this instead of the raw 20-byte address.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SenderId(u64);

/// Interns sender addresses.
///
/// Hands out one [`SenderId`] per distinct address and keeps the reverse
/// direction for lookups. Ids are never reused for the lifetime of the pool,
/// even after a sender's last transaction leaves.
#[derive(Debug, Default)]
pub struct SenderIdentifiers {
    /// Id handed out for the next unseen address.
    next: u64,
    /// Address to its interned id.
    by_address: HashMap<Address, SenderId>,
    /// Interned id back to the address.
    by_id: FnvHashMap<SenderId, Address>,
}

// === impl SenderIdentifiers ===

impl SenderIdentifiers {
    /// The id interned for the address, interning it now if it is new.
    pub fn intern(&mut self, addr: Address) -> SenderId {
        match self.by_address.entry(addr) {
            Entry::Occupied(occupied) => *occupied.get(),
            Entry::Vacant(vacant) => {
                let id = SenderId(self.next);
                self.next = self.next.wrapping_add(1);
                self.by_id.insert(id, addr);
                *vacant.insert(id)
            }
        }
    }

    /// The id interned for the address, if the pool has seen it before.
    pub fn get(&self, addr: &Address) -> Option<SenderId> {
        self.by_address.get(addr).copied()
    }

    /// The address behind an interned id.
    pub fn address_of(&self, id: &SenderId) -> Option<&Address> {
        self.by_id.get(id)
    }
}

/// The (sender, nonce) slot a transaction occupies.
///
/// At most one pooled transaction holds a slot at a time; a second submission
/// for an occupied slot goes through replace-by-fee admission.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct TransactionId {
    /// Interned sender.
    pub sender: SenderId,
    /// Transaction nonce.
    pub nonce: u64,
}

impl TransactionId {
    /// Pairs an interned sender with a nonce.
    pub const fn new(sender: SenderId, nonce: u64) -> Self {
        Self { sender, nonce }
    }
}
