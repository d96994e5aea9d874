//! # Hash Chain
//!
//! Pure, lock-free chain of [`ChainEntry`] values. The service wraps it in a
//! lock and supplies the hash function.
//!
//! ## Invariants
//!
//! - `entries[0]` is genesis: sequence 0, parent `ZERO_HASH`.
//! - `entries[i].parent_hash == entries[i - 1].hash` and `entries[i].sequence == i`.
//! - Entries are only ever pushed, never replaced or removed.
//! - While `halt` is set, no entry is pushed.

use super::{BlockLogError, BlockLogResult, ChainEntry, HaltRecord, GENESIS_DATA};
use serde::{Deserialize, Serialize};
use shared_types::{decode_snapshot, encode_snapshot, CodecError, Hash, Hasher, Persistable, ZERO_HASH};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashChain {
    entries: Vec<ChainEntry>,
    halt: Option<HaltRecord>,
    /// hash -> sequence of its first occurrence. Rebuilt on load.
    #[serde(skip)]
    index: HashMap<Hash, u64>,
}

impl PartialEq for HashChain {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries && self.halt == other.halt
    }
}

impl Eq for HashChain {}

impl HashChain {
    /// Chain holding only the genesis entry.
    pub fn genesis(hasher: &dyn Hasher) -> Self {
        let entry = ChainEntry {
            sequence: 0,
            parent_hash: ZERO_HASH,
            hash: hasher.hash(GENESIS_DATA),
        };
        let mut index = HashMap::new();
        index.insert(entry.hash, 0);
        Self {
            entries: vec![entry],
            halt: None,
            index,
        }
    }

    /// Build a chain from entries, checking every link.
    pub fn from_entries(entries: Vec<ChainEntry>) -> BlockLogResult<Self> {
        let mut chain = Self {
            entries,
            halt: None,
            index: HashMap::new(),
        };
        chain.verify_links()?;
        chain.rebuild_index();
        Ok(chain)
    }

    pub fn genesis_hash(&self) -> Hash {
        self.entries.first().map(|e| e.hash).unwrap_or(ZERO_HASH)
    }

    pub fn last_hash(&self) -> Hash {
        self.entries.last().map(|e| e.hash).unwrap_or(ZERO_HASH)
    }

    /// Number of entries, genesis included.
    pub fn len(&self) -> u64 {
        self.entries.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, sequence: u64) -> Option<&ChainEntry> {
        usize::try_from(sequence)
            .ok()
            .and_then(|i| self.entries.get(i))
    }

    pub fn contains(&self, hash: &Hash) -> bool {
        self.index.contains_key(hash)
    }

    pub fn sequence_of(&self, hash: &Hash) -> Option<u64> {
        self.index.get(hash).copied()
    }

    pub fn entries(&self) -> &[ChainEntry] {
        &self.entries
    }

    pub fn halt(&self) -> Option<HaltRecord> {
        self.halt
    }

    pub fn is_halted(&self) -> bool {
        self.halt.is_some()
    }

    /// Push `hash` after the tail if `declared_parent` is the tail.
    ///
    /// A mismatch records a halt and returns `ChainIntegrity`; later calls
    /// return `Halted` until [`HashChain::clear_halt`].
    pub fn push(&mut self, declared_parent: Hash, hash: Hash) -> BlockLogResult<ChainEntry> {
        if let Some(halt) = self.halt {
            return Err(BlockLogError::Halted {
                expected: halt.expected,
                declared: halt.declared,
            });
        }
        let expected = self.last_hash();
        if declared_parent != expected {
            self.halt = Some(HaltRecord {
                expected,
                declared: declared_parent,
            });
            return Err(BlockLogError::ChainIntegrity {
                expected,
                declared: declared_parent,
            });
        }

        let entry = ChainEntry {
            sequence: self.len(),
            parent_hash: expected,
            hash,
        };
        self.entries.push(entry);
        self.index.entry(hash).or_insert(entry.sequence);
        Ok(entry)
    }

    /// Clear a halt. Returns the cleared record.
    pub fn clear_halt(&mut self) -> Option<HaltRecord> {
        self.halt.take()
    }

    /// Re-check sequence numbers and parent links.
    pub fn verify_links(&self) -> BlockLogResult<()> {
        let Some(first) = self.entries.first() else {
            return Err(BlockLogError::BrokenLink { sequence: 0 });
        };
        if first.sequence != 0 || first.parent_hash != ZERO_HASH {
            return Err(BlockLogError::BrokenLink { sequence: 0 });
        }
        for (i, pair) in self.entries.windows(2).enumerate() {
            let sequence = (i + 1) as u64;
            if pair[1].sequence != sequence || pair[1].parent_hash != pair[0].hash {
                return Err(BlockLogError::BrokenLink { sequence });
            }
        }
        Ok(())
    }

    /// Links plus the genesis hash under `hasher`.
    pub fn verify(&self, hasher: &dyn Hasher) -> BlockLogResult<()> {
        self.verify_links()?;
        let expected = hasher.hash(GENESIS_DATA);
        let found = self.genesis_hash();
        if found != expected {
            return Err(BlockLogError::GenesisMismatch { expected, found });
        }
        Ok(())
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for entry in &self.entries {
            self.index.entry(entry.hash).or_insert(entry.sequence);
        }
    }
}

impl Persistable for HashChain {
    fn save(&self) -> Result<Vec<u8>, CodecError> {
        encode_snapshot(self)
    }

    fn load(blob: &[u8]) -> Result<Self, CodecError> {
        let mut chain: HashChain = decode_snapshot(blob)?;
        chain
            .verify_links()
            .map_err(|e| CodecError::Corrupt(e.to_string()))?;
        chain.rebuild_index();
        Ok(chain)
    }
}
