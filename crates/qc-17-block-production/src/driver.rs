//! # Finalization Driver
//!
//! One `tick` per interval:
//!
//! 1. Time out stale proposals, prune those closed past the retention window
//! 2. Drain newly finalized proposals into the backlog
//! 3. Apply up to `max_finalized_per_tick` of them, oldest first
//! 4. Checkpoint ledger and log after every applied block
//!
//! A halted log stops step 3; the backlog is kept until the log is repaired.

use crate::applier::TransactionApplier;
use crate::config::ProductionConfig;
use crate::domain::{AppliedBlock, TickReport};
use crate::error::{ProductionError, Result};
use qc_08_consensus::{ConsensusApi, Proposal};
use shared_types::{short_hex, SnapshotStore, TimeSource};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Snapshot key for the ledger checkpoint
pub const LEDGER_SNAPSHOT_KEY: &str = "ledger";

/// Snapshot key for the block log checkpoint
pub const BLOCK_LOG_SNAPSHOT_KEY: &str = "block_log";

/// Moves finalized proposals from consensus into the ledger and block log
pub struct ProductionDriver {
    consensus: Arc<dyn ConsensusApi>,
    applier: TransactionApplier,
    time_source: Arc<dyn TimeSource>,
    snapshots: Option<Arc<dyn SnapshotStore>>,
    config: ProductionConfig,
    pending: VecDeque<Proposal>,
}

impl ProductionDriver {
    /// Create a driver without checkpointing
    pub fn new(
        consensus: Arc<dyn ConsensusApi>,
        applier: TransactionApplier,
        time_source: Arc<dyn TimeSource>,
        config: ProductionConfig,
    ) -> Self {
        Self {
            consensus,
            applier,
            time_source,
            snapshots: None,
            config,
            pending: VecDeque::new(),
        }
    }

    /// Checkpoint ledger and log into `store` after every applied block
    pub fn with_snapshots(mut self, store: Arc<dyn SnapshotStore>) -> Self {
        self.snapshots = Some(store);
        self
    }

    /// Driver configuration
    pub fn config(&self) -> &ProductionConfig {
        &self.config
    }

    /// Finalized proposals waiting to be applied
    pub fn backlog(&self) -> usize {
        self.pending.len()
    }

    /// Applier used for each finalized proposal
    pub fn applier(&self) -> &TransactionApplier {
        &self.applier
    }

    /// Run one driver step at the clock's current time
    pub fn tick(&mut self) -> TickReport {
        let now = self.time_source.now_ms();
        let mut report = TickReport {
            expired: self.consensus.expire_stale(now).len(),
            ..TickReport::default()
        };
        report.pruned = self
            .consensus
            .prune_closed(now.saturating_sub(self.config.closed_retention_ms));

        self.pending.extend(self.consensus.take_finalized());

        if self.applier.is_halted() {
            error!(
                "[qc-17] Block log halted; {} finalized blocks waiting for repair",
                self.pending.len()
            );
            report.halted = true;
            report.backlog = self.pending.len();
            return report;
        }

        let mut processed = 0;
        while processed < self.config.max_finalized_per_tick {
            let Some(proposal) = self.pending.pop_front() else {
                break;
            };
            match self.applier.apply_finalized(&proposal) {
                Ok(AppliedBlock::Applied { .. }) => {
                    report.applied += 1;
                    if let Err(e) = self.checkpoint() {
                        warn!("[qc-17] Checkpoint failed: {}", e);
                    }
                }
                Ok(AppliedBlock::Aborted { .. }) => report.aborted += 1,
                Err(ProductionError::LogHalted) => {
                    self.pending.push_front(proposal);
                    report.halted = true;
                    break;
                }
                Err(e) => {
                    error!(
                        "[qc-17] Applying block 0x{} failed: {}",
                        short_hex(&proposal.hash),
                        e
                    );
                    // An append failure halts the log; the next tick reports it.
                    report.halted = self.applier.is_halted();
                    break;
                }
            }
            processed += 1;
        }

        report.backlog = self.pending.len();
        if report.applied + report.aborted + report.expired > 0 {
            info!(
                "[qc-17] Tick: {} applied, {} aborted, {} timed out, {} waiting",
                report.applied, report.aborted, report.expired, report.backlog
            );
        } else {
            debug!("[qc-17] Tick: idle");
        }
        report
    }

    /// Write ledger and log snapshots to the configured store
    pub fn checkpoint(&self) -> Result<()> {
        let Some(store) = &self.snapshots else {
            return Ok(());
        };
        store.put(LEDGER_SNAPSHOT_KEY, self.applier.ledger().snapshot()?)?;
        store.put(BLOCK_LOG_SNAPSHOT_KEY, self.applier.block_log().snapshot()?)?;
        Ok(())
    }
}
