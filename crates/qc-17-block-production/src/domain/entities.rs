//! Domain entities for block production

use qc_04_ledger::{BatchReceipt, LedgerError};
use shared_types::{Block, Hash};

/// Outcome of replaying one finalized proposal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppliedBlock {
    /// Ledger updated and the block appended to the log
    Applied {
        /// Header recorded in the log
        block: Block,
        /// `H(block.encode())`, the new log tail
        log_hash: Hash,
        /// Per-transaction results
        receipt: BatchReceipt,
    },
    /// A transaction failed under `AbortBlock`, or the payload did not
    /// decode. Ledger and log are untouched.
    Aborted {
        /// Consensus hash of the proposal
        proposal_hash: Hash,
        /// Why the block was aborted
        error: LedgerError,
    },
}

impl AppliedBlock {
    /// Whether the block reached the log
    pub fn is_applied(&self) -> bool {
        matches!(self, AppliedBlock::Applied { .. })
    }
}

/// What one driver tick did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Proposals moved to TIMED_OUT
    pub expired: usize,
    /// Closed proposals dropped from consensus after the retention window
    pub pruned: usize,
    /// Blocks applied and appended
    pub applied: usize,
    /// Blocks aborted
    pub aborted: usize,
    /// Finalized proposals still waiting after this tick
    pub backlog: usize,
    /// Application stopped because the log is halted
    pub halted: bool,
}
