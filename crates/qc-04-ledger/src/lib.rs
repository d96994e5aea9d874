//! # qc-04-ledger
//!
//! Ledger subsystem for Quantum-Ledger: the authoritative account state.
//!
//! ## Role in System
//!
//! - **Single Source of Truth**: balances, nonces, spending limits and roles
//! - **Replay Target**: the block-production applier replays every finalized
//!   block's transactions here, in payload order
//! - **State Root**: a hash over the canonical encoding of all accounts
//!
//! ```text
//! [Consensus (8)] ──finalized──→ [Applier (17)] ──apply_batch──→ [Ledger (4)]
//!                                      │                              │
//!                                      └────────── state_root ←───────┘
//! ```
//!
//! ## Invariants
//!
//! - Per asset, the sum of all balances changes only through mint and burn.
//! - Balances are unsigned; a debit larger than the balance is rejected.
//! - A transaction is accepted only when `tx.nonce == account.nonce + 1`.
//! - A failed call leaves no partial mutation behind.

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::*;
pub use ports::*;
pub use service::Ledger;
