//! # Quantum-Ledger Node Runtime
//!
//! The main entry point for a Quantum-Ledger node.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (defaults, `QC_CONFIG` file, `QC_*` environment)
//! 2. Install the tracing subscriber
//! 3. Seed or restore the ledger and block log
//! 4. Start the finalization driver
//! 5. Propose a heartbeat block every few ticks until Ctrl+C
//!
//! ```text
//! Proposer ──propose/vote──→ Consensus(8) ──finalized──→ Applier(17)
//!                                                          │      │
//!                                                   Ledger(4)  BlockLog(2)
//! ```

use anyhow::{Context, Result};
use node_runtime::{logging, NodeConfig, NodeRuntime};
use std::time::Duration;
use tracing::{info, warn};

/// Heartbeat blocks are proposed every this many driver ticks.
const HEARTBEAT_TICKS: u32 = 5;

#[tokio::main]
async fn main() -> Result<()> {
    let config = NodeConfig::load().context("failed to load configuration")?;
    logging::init(&config)?;

    info!("===========================================");
    info!("  Quantum-Ledger Node Runtime v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "  {} validators, tick {} ms, policy {:?}",
        config.validators, config.production.tick_interval_ms, config.production.failure_policy
    );
    info!("===========================================");

    let heartbeat = config.production.tick_interval() * HEARTBEAT_TICKS;
    let mut node = NodeRuntime::new(config)?;
    node.start();

    let mut ticker = tokio::time::interval(heartbeat);
    ticker.tick().await;
    info!("Node is running. Press Ctrl+C to stop.");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match node.submit_block(Vec::new()) {
                    Ok((hash, outcome)) => info!(
                        "[node] Heartbeat 0x{} {:?}",
                        shared_types::short_hex(&hash),
                        outcome
                    ),
                    Err(e) => warn!("[node] Heartbeat failed: {:#}", e),
                }
            }
            signal = tokio::signal::ctrl_c() => {
                signal.context("failed to listen for Ctrl+C")?;
                break;
            }
        }
    }

    tokio::time::timeout(Duration::from_secs(10), node.shutdown())
        .await
        .context("shutdown timed out")??;
    Ok(())
}
