//! # Inbound Ports (Driving Ports)
//!
//! API the Block Log exposes to the rest of the node.

use crate::domain::{BlockLogResult, ChainEntry};
use shared_types::Hash;

/// Block log API.
///
/// Implemented by [`crate::BlockLog`].
pub trait BlockLogApi: Send + Sync {
    /// Hash of the current tail.
    fn get_last_hash(&self) -> Hash;

    /// Number of entries, genesis included.
    fn get_count(&self) -> u64;

    fn get_entry(&self, sequence: u64) -> Option<ChainEntry>;

    fn is_halted(&self) -> bool;

    /// Append `H(data)` after the tail.
    fn add_block(&self, data: &[u8]) -> BlockLogResult<Hash>;

    /// Append `H(data)` if `declared_parent` is the tail; a mismatch halts the log.
    fn append(&self, declared_parent: Hash, data: &[u8]) -> BlockLogResult<Hash>;

    /// Encoded snapshot of the chain.
    fn snapshot(&self) -> BlockLogResult<Vec<u8>>;
}
