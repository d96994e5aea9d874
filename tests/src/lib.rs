//! # Quantum-Ledger Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/          # criterion benchmarks per subsystem
//! └── src/integration/  # cross-subsystem flows
//!     ├── harness.rs               # a full node in memory
//!     ├── e2e_finalization.rs      # propose → vote → apply → log
//!     ├── replica_determinism.rs   # independent replicas agree
//!     └── failure_handling.rs      # abort, skip, halt, timeout
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p qc-tests
//! cargo test -p qc-tests integration::replica_determinism
//! cargo bench -p qc-tests
//! ```

pub mod integration;
