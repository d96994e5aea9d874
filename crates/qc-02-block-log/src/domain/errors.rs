//! # Domain Errors
//!
//! Error types for the Block Log subsystem.
//!
//! `ChainIntegrity` is the only error that changes state: it halts the log.
//! Everything else is reported to the caller and the log carries on.

use shared_types::{CodecError, Hash};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockLogError {
    /// Block data is empty or exceeds the configured bound.
    #[error("Invalid block data: {0}")]
    InvalidBlockData(String),

    /// Declared parent is not the current tail. The log is now halted.
    #[error(
        "Chain integrity violation: expected parent 0x{}, declared 0x{}",
        hex::encode(.expected),
        hex::encode(.declared)
    )]
    ChainIntegrity { expected: Hash, declared: Hash },

    /// Appends are refused until `resync` or `repair`.
    #[error(
        "Block log halted after integrity violation (tail 0x{}, declared 0x{})",
        hex::encode(.expected),
        hex::encode(.declared)
    )]
    Halted { expected: Hash, declared: Hash },

    /// Entry at `sequence` does not link to its predecessor.
    #[error("Broken link at sequence {sequence}")]
    BrokenLink { sequence: u64 },

    /// First entry is not this log's genesis.
    #[error("Genesis mismatch: expected 0x{}, found 0x{}", hex::encode(.expected), hex::encode(.found))]
    GenesisMismatch { expected: Hash, found: Hash },

    #[error("Snapshot error: {0}")]
    Codec(#[from] CodecError),
}

pub type BlockLogResult<T> = Result<T, BlockLogError>;
