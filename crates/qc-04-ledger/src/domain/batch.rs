//! Batch application policy and receipts.

use super::{LedgerError, TxReceipt};
use serde::{Deserialize, Serialize};

/// What to do when a transaction in a finalized block fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Discard every change from the block; the block is not applied.
    #[default]
    AbortBlock,
    /// Skip failing transactions and keep applying the rest.
    SkipAndContinue,
}

/// Result of applying an ordered batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReceipt {
    /// Accepted transactions, in batch order.
    pub applied: Vec<TxReceipt>,
    /// Skipped transactions with their errors (only under `SkipAndContinue`).
    pub skipped: Vec<(usize, LedgerError)>,
}

impl BatchReceipt {
    /// Whether every transaction was accepted.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}
