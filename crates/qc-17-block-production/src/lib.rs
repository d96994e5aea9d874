//! # Quantum-Ledger - Block Production (Subsystem 17)
//!
//! **Bounded Context:** Finalized Block Application
//!
//! ## Purpose
//!
//! Consensus decides which payloads are final; this crate makes them real.
//! Every finalized proposal is decoded, its transactions are replayed into
//! the ledger in payload order, and a block header carrying the new state
//! root is appended to the block log.
//!
//! ```text
//! Consensus (8) ──take_finalized──→ ProductionDriver ──→ TransactionApplier
//!                                                             │
//!                                   Ledger (4) ←──apply_batch─┤
//!                                Block Log (2) ←──append──────┘
//! ```
//!
//! ## Critical Invariants
//!
//! 1. **Finality Order**: blocks are applied in the order they finalized
//! 2. **Payload Order**: transactions are applied in the order they appear
//! 3. **Halt Stops Application**: nothing touches the ledger while the log is halted
//! 4. **All or Nothing**: under `AbortBlock`, a failing block changes nothing
//!
//! ## Module Structure
//!
//! - [`applier`]: one finalized proposal into ledger and log
//! - [`driver`]: per-tick expiry, draining, backlog and checkpoints
//! - [`service`]: tokio task running the driver on an interval
//! - [`domain`]: outcome types
//! - [`config`]: driver configuration

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod applier;
pub mod config;
pub mod domain;
pub mod driver;
pub mod error;
pub mod service;

pub use applier::TransactionApplier;
pub use config::ProductionConfig;
pub use domain::{AppliedBlock, TickReport};
pub use driver::{ProductionDriver, BLOCK_LOG_SNAPSHOT_KEY, LEDGER_SNAPSHOT_KEY};
pub use error::{ProductionError, Result};
pub use service::{BlockProductionService, ProductionStats};
