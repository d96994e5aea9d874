//! Error types for block production subsystem

use qc_02_block_log::BlockLogError;
use qc_04_ledger::LedgerError;
use qc_08_consensus::ConsensusError;
use shared_types::CodecError;
use thiserror::Error;

/// Result type alias for block production operations
pub type Result<T> = std::result::Result<T, ProductionError>;

/// Errors that can occur while applying finalized blocks
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductionError {
    /// Ledger failure other than an aborted block
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Block log refused the append
    #[error("Block log error: {0}")]
    BlockLog(#[from] BlockLogError),

    /// Consensus call failed
    #[error("Consensus error: {0}")]
    Consensus(#[from] ConsensusError),

    /// Snapshot encoding or storage failed
    #[error("Snapshot error: {0}")]
    Codec(#[from] CodecError),

    /// Block log is halted; nothing is applied until it is repaired
    #[error("Block log halted; application paused")]
    LogHalted,

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
