//! # Block Log (qc-02)
//!
//! Append-only chain of block hashes. Each entry records `H(data)` and the
//! hash of the entry before it.
//!
//! ## Role in System
//!
//! ```text
//! Consensus (8) ──finalized──→ Applier (17) ──append(parent, block)──→ Block Log (2)
//! ```
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | Fixed Genesis | Entry 0 hashes `GENESIS_DATA`, parent is all zeros |
//! | 2 | Append Only | Entries are never replaced or removed |
//! | 3 | Linked | Every entry's parent is the previous entry's hash |
//! | 4 | Halt on Violation | A declared-parent mismatch halts all appends |
//!
//! A halted log accepts appends again after `resync` (verified replacement
//! chain) or `repair` (operator clears the halt).
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Pure chain logic, entities, errors
//! - `ports/` - Inbound API trait
//! - `service/` - Locked service implementing the API
//!
//! ## Usage
//!
//! ```ignore
//! use qc_02_block_log::{BlockLog, BlockLogConfig};
//!
//! let log = BlockLog::new(Arc::new(Sha256Hasher), BlockLogConfig::default());
//! let h1 = log.add_block(b"data1")?;
//! log.append(h1, b"data2")?;
//! ```

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::{
    BlockLogConfig, BlockLogError, BlockLogResult, ChainEntry, HaltRecord, HashChain, GENESIS_DATA,
};
pub use ports::BlockLogApi;
pub use service::BlockLog;
