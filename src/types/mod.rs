use std::fmt;

use serde::{Deserialize, Serialize};

pub mod error;
pub mod row;
pub mod value;

// Common type aliases
pub type TransactionId = u64;

// Tuple layout constants
pub const TUPLE_GROUP_SIZE: usize = 100;
pub const TUPLE_HEADER_SIZE: usize = 9; // live flag (1 byte) + owner transaction (8 bytes)
pub const INVALID_TRANSACTION_ID: TransactionId = 0;

pub const DEFAULT_SCHEMA: &str = "main";

/// Process-unique identity of a table store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StoreId(pub u64);

/// Stable handle to a tuple slot.
///
/// `index` addresses the slot across all groups of the store
/// (`group * group_size + slot`). Groups never move, so a handle stays
/// addressable for the store's whole lifetime; whether it still names a live
/// row is checked on every use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TupleId {
    pub store_id: StoreId,
    pub index: usize,
}

impl TupleId {
    pub fn new(store_id: StoreId, index: usize) -> Self {
        Self { store_id, index }
    }
}

impl fmt::Display for TupleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.store_id.0, self.index)
    }
}
