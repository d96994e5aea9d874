//! # Domain Entities
//!
//! Log entries and configuration.

use serde::{Deserialize, Serialize};
use shared_types::Hash;

/// Data hashed to produce the genesis entry. Fixed for every network.
pub const GENESIS_DATA: &[u8] = b"USDTgVerse Genesis Block - Quantum Safe Blockchain";

/// One link in the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainEntry {
    /// Position, genesis is 0.
    pub sequence: u64,
    /// Hash of the previous entry (`ZERO_HASH` for genesis).
    pub parent_hash: Hash,
    /// `H(data)` for the appended block.
    pub hash: Hash,
}

/// Halt marker recorded on a chain integrity violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HaltRecord {
    /// Tail at the time of the violation.
    pub expected: Hash,
    /// Parent the rejected block declared.
    pub declared: Hash,
}

/// Block log configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BlockLogConfig {
    /// Largest block data accepted by `add_block`/`append`.
    pub max_block_bytes: usize,
}

impl Default for BlockLogConfig {
    fn default() -> Self {
        Self {
            max_block_bytes: 1024 * 1024,
        }
    }
}
