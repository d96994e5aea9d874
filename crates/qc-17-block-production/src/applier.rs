//! # Transaction Applier
//!
//! Replays a finalized proposal into the ledger, then appends the resulting
//! block header to the block log. One ledger replay and one log append per
//! finalized proposal.
//!
//! ## Ordering
//!
//! Transactions are applied in exactly the order they appear in the
//! payload, at the payload's timestamp. Every replica that starts from the
//! same ledger state reaches the same state root.

use crate::domain::AppliedBlock;
use crate::error::{ProductionError, Result};
use qc_02_block_log::BlockLogApi;
use qc_04_ledger::{FailurePolicy, LedgerApi, LedgerError};
use qc_08_consensus::Proposal;
use shared_types::{short_hex, Block, BlockPayload};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Glue between consensus finality, the ledger and the block log
pub struct TransactionApplier {
    ledger: Arc<dyn LedgerApi>,
    block_log: Arc<dyn BlockLogApi>,
    policy: FailurePolicy,
}

impl TransactionApplier {
    /// Create an applier over the given ledger and log
    pub fn new(
        ledger: Arc<dyn LedgerApi>,
        block_log: Arc<dyn BlockLogApi>,
        policy: FailurePolicy,
    ) -> Self {
        Self {
            ledger,
            block_log,
            policy,
        }
    }

    /// Ledger this applier writes to
    pub fn ledger(&self) -> &Arc<dyn LedgerApi> {
        &self.ledger
    }

    /// Block log this applier appends to
    pub fn block_log(&self) -> &Arc<dyn BlockLogApi> {
        &self.block_log
    }

    /// Mid-block failure policy in force
    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Whether the block log refuses appends
    pub fn is_halted(&self) -> bool {
        self.block_log.is_halted()
    }

    /// Replay `proposal` and append its block.
    ///
    /// Returns `LogHalted` without touching the ledger when the log is
    /// halted. An aborted block is `Ok(AppliedBlock::Aborted)`, not an error.
    pub fn apply_finalized(&self, proposal: &Proposal) -> Result<AppliedBlock> {
        if self.block_log.is_halted() {
            return Err(ProductionError::LogHalted);
        }

        let payload = match BlockPayload::decode(&proposal.payload) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(
                    "[qc-17] Finalized block 0x{} has an undecodable payload: {}",
                    short_hex(&proposal.hash),
                    e
                );
                return Ok(AppliedBlock::Aborted {
                    proposal_hash: proposal.hash,
                    error: LedgerError::Codec(e),
                });
            }
        };

        let receipt = match self.ledger.apply_batch(
            &payload.transactions,
            payload.timestamp_ms,
            self.policy,
        ) {
            Ok(receipt) => receipt,
            Err(e @ LedgerError::BlockAborted { .. }) => {
                warn!(
                    "[qc-17] Block 0x{} aborted: {}",
                    short_hex(&proposal.hash),
                    e
                );
                return Ok(AppliedBlock::Aborted {
                    proposal_hash: proposal.hash,
                    error: e,
                });
            }
            Err(e) => return Err(e.into()),
        };

        let state_root = self.ledger.state_root()?;
        let parent_hash = self.block_log.get_last_hash();
        let block = Block {
            sequence: self.block_log.get_count(),
            parent_hash,
            tx_list_hash: proposal.hash,
            state_root,
        };

        let log_hash = self
            .block_log
            .append(parent_hash, &block.encode())
            .map_err(|e| {
                error!(
                    "[qc-17] Ledger updated but block #{} was not logged: {}",
                    block.sequence, e
                );
                e
            })?;

        info!(
            "[qc-17] ✓ Block #{} applied: {} txs ({} skipped), state root 0x{}",
            block.sequence,
            receipt.applied.len(),
            receipt.skipped.len(),
            short_hex(&state_root)
        );

        Ok(AppliedBlock::Applied {
            block,
            log_hash,
            receipt,
        })
    }
}
