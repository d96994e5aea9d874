//! Background block production service
//!
//! Runs [`ProductionDriver::tick`] on a fixed interval inside a tokio task
//! until shutdown is signalled.

use crate::config::ProductionConfig;
use crate::domain::TickReport;
use crate::driver::ProductionDriver;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

/// Running totals across all ticks
#[derive(Debug, Default)]
pub struct ProductionStats {
    ticks: AtomicU64,
    applied: AtomicU64,
    aborted: AtomicU64,
    expired: AtomicU64,
    halted: AtomicBool,
}

impl ProductionStats {
    fn record(&self, report: &TickReport) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
        self.applied.fetch_add(report.applied as u64, Ordering::Relaxed);
        self.aborted.fetch_add(report.aborted as u64, Ordering::Relaxed);
        self.expired.fetch_add(report.expired as u64, Ordering::Relaxed);
        self.halted.store(report.halted, Ordering::Relaxed);
    }

    /// Ticks run so far
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    /// Blocks applied and logged
    pub fn applied(&self) -> u64 {
        self.applied.load(Ordering::Relaxed)
    }

    /// Blocks aborted by the ledger
    pub fn aborted(&self) -> u64 {
        self.aborted.load(Ordering::Relaxed)
    }

    /// Proposals timed out
    pub fn expired(&self) -> u64 {
        self.expired.load(Ordering::Relaxed)
    }

    /// Whether the last tick found the log halted
    pub fn is_halted(&self) -> bool {
        self.halted.load(Ordering::Relaxed)
    }
}

/// Handle to the spawned driver task
pub struct BlockProductionService {
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
    stats: Arc<ProductionStats>,
}

impl BlockProductionService {
    /// Spawn the driver loop on the current tokio runtime.
    ///
    /// The first tick runs immediately, then every `tick_interval`.
    pub fn spawn(mut driver: ProductionDriver, config: &ProductionConfig) -> Self {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let stats = Arc::new(ProductionStats::default());
        let task_stats = Arc::clone(&stats);
        let period = config.tick_interval();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!("[qc-17] Block production started ({:?} interval)", period);

            loop {
                if *shutdown_rx.borrow() {
                    break;
                }
                tokio::select! {
                    _ = ticker.tick() => {
                        let report = driver.tick();
                        task_stats.record(&report);
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() {
                            warn!("[qc-17] Shutdown handle dropped");
                            break;
                        }
                    }
                }
            }
            info!("[qc-17] Block production stopped");
        });

        Self {
            shutdown_tx,
            handle,
            stats,
        }
    }

    /// Counters updated after every tick
    pub fn stats(&self) -> Arc<ProductionStats> {
        Arc::clone(&self.stats)
    }

    /// Signal the loop and wait for it to finish its current tick
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.handle.await {
            warn!("[qc-17] Production task ended abnormally: {}", e);
        }
    }
}
