//! # Block Log Service
//!
//! The main service implementing the Block Log API.
//!
//! ## Architecture
//!
//! This service:
//! 1. Owns one [`HashChain`] behind a `RwLock`
//! 2. Hashes block data with the injected `Hasher`
//! 3. Halts on the first chain integrity violation
//! 4. Resumes only through `resync` (verified replacement) or `repair`


use crate::domain::{
    BlockLogConfig, BlockLogError, BlockLogResult, ChainEntry, HaltRecord, HashChain,
};
use crate::ports::inbound::BlockLogApi;
use parking_lot::RwLock;
use shared_types::{Hash, Hasher, Persistable};
use std::sync::Arc;

pub struct BlockLog {
    chain: RwLock<HashChain>,
    hasher: Arc<dyn Hasher>,
    config: BlockLogConfig,
}

impl BlockLog {
    /// New log holding only the genesis entry.
    pub fn new(hasher: Arc<dyn Hasher>, config: BlockLogConfig) -> Self {
        let chain = HashChain::genesis(hasher.as_ref());
        #[cfg(feature = "tracing-log")]
        tracing::info!(
            "[qc-02] Genesis: 0x{}",
            shared_types::short_hex(&chain.genesis_hash())
        );
        Self {
            chain: RwLock::new(chain),
            hasher,
            config,
        }
    }

    /// Rebuild a log from a [`BlockLog::snapshot`] blob.
    ///
    /// The genesis entry must match `hasher`'s genesis. A halt recorded in the
    /// snapshot is kept.
    pub fn restore(
        blob: &[u8],
        hasher: Arc<dyn Hasher>,
        config: BlockLogConfig,
    ) -> BlockLogResult<Self> {
        let chain = HashChain::load(blob)?;
        chain.verify(hasher.as_ref())?;
        #[cfg(feature = "tracing-log")]
        tracing::info!(
            "[qc-02] Restored block log: {} entries, halted: {}",
            chain.len(),
            chain.is_halted()
        );
        Ok(Self {
            chain: RwLock::new(chain),
            hasher,
            config,
        })
    }

    // === Reads ===

    pub fn genesis_hash(&self) -> Hash {
        self.chain.read().genesis_hash()
    }

    pub fn get_last_hash(&self) -> Hash {
        self.chain.read().last_hash()
    }

    pub fn get_count(&self) -> u64 {
        self.chain.read().len()
    }

    pub fn get_entry(&self, sequence: u64) -> Option<ChainEntry> {
        self.chain.read().get(sequence).copied()
    }

    pub fn contains(&self, hash: &Hash) -> bool {
        self.chain.read().contains(hash)
    }

    pub fn entries(&self) -> Vec<ChainEntry> {
        self.chain.read().entries().to_vec()
    }

    pub fn is_halted(&self) -> bool {
        self.chain.read().is_halted()
    }

    pub fn halt_record(&self) -> Option<HaltRecord> {
        self.chain.read().halt()
    }

    /// Re-check every link and the genesis hash.
    pub fn verify(&self) -> BlockLogResult<()> {
        self.chain.read().verify(self.hasher.as_ref())
    }

    pub fn snapshot(&self) -> BlockLogResult<Vec<u8>> {
        Ok(self.chain.read().save()?)
    }

    // === Writes ===

    /// Append `H(data)` with the current tail as parent.
    pub fn add_block(&self, data: &[u8]) -> BlockLogResult<Hash> {
        self.validate_data(data)?;
        let hash = self.hasher.hash(data);
        let mut chain = self.chain.write();
        let parent = chain.last_hash();
        let entry = chain.push(parent, hash)?;
        Self::log_appended(&entry);
        Ok(entry.hash)
    }

    /// Append `H(data)` only if `declared_parent` is the current tail.
    pub fn append(&self, declared_parent: Hash, data: &[u8]) -> BlockLogResult<Hash> {
        self.validate_data(data)?;
        let hash = self.hasher.hash(data);
        let result = self.chain.write().push(declared_parent, hash);
        match result {
            Ok(entry) => {
                Self::log_appended(&entry);
                Ok(entry.hash)
            }
            Err(e) => {
                if matches!(e, BlockLogError::ChainIntegrity { .. }) {
                    #[cfg(feature = "tracing-log")]
                    tracing::error!("[qc-02] {} - appends halted until resync or repair", e);
                }
                Err(e)
            }
        }
    }

    /// Replace the chain with `entries` from a peer or snapshot.
    ///
    /// The entries must link correctly and start at this log's genesis. On
    /// success the halt is cleared.
    pub fn resync(&self, entries: Vec<ChainEntry>) -> BlockLogResult<()> {
        let replacement = HashChain::from_entries(entries)?;
        replacement.verify(self.hasher.as_ref())?;
        *self.chain.write() = replacement;
        #[cfg(feature = "tracing-log")]
        tracing::info!("[qc-02] Resynced block log: {} entries", self.get_count());
        Ok(())
    }

    /// Clear a halt after operator inspection. Entries are not touched.
    pub fn repair(&self) -> Option<HaltRecord> {
        let cleared = self.chain.write().clear_halt();
        if cleared.is_some() {
            #[cfg(feature = "tracing-log")]
            tracing::warn!("[qc-02] Halt cleared by repair");
        }
        cleared
    }

    fn validate_data(&self, data: &[u8]) -> BlockLogResult<()> {
        if data.is_empty() {
            return Err(BlockLogError::InvalidBlockData("empty block data".into()));
        }
        if data.len() > self.config.max_block_bytes {
            return Err(BlockLogError::InvalidBlockData(format!(
                "{} bytes exceeds limit of {}",
                data.len(),
                self.config.max_block_bytes
            )));
        }
        Ok(())
    }

    #[cfg_attr(not(feature = "tracing-log"), allow(unused_variables))]
    fn log_appended(entry: &ChainEntry) {
        #[cfg(feature = "tracing-log")]
        tracing::info!(
            "[qc-02] ✓ Appended #{} hash 0x{} (parent 0x{})",
            entry.sequence,
            shared_types::short_hex(&entry.hash),
            shared_types::short_hex(&entry.parent_hash)
        );
    }
}

impl BlockLogApi for BlockLog {
    fn get_last_hash(&self) -> Hash {
        BlockLog::get_last_hash(self)
    }

    fn get_count(&self) -> u64 {
        BlockLog::get_count(self)
    }

    fn get_entry(&self, sequence: u64) -> Option<ChainEntry> {
        BlockLog::get_entry(self, sequence)
    }

    fn is_halted(&self) -> bool {
        BlockLog::is_halted(self)
    }

    fn add_block(&self, data: &[u8]) -> BlockLogResult<Hash> {
        BlockLog::add_block(self, data)
    }

    fn append(&self, declared_parent: Hash, data: &[u8]) -> BlockLogResult<Hash> {
        BlockLog::append(self, declared_parent, data)
    }

    fn snapshot(&self) -> BlockLogResult<Vec<u8>> {
        BlockLog::snapshot(self)
    }
}
