//! Ports layer for Consensus subsystem
//!
//! Driven dependencies (hashing, signatures, clock) are the shared-types
//! ports injected at construction.

pub mod inbound;

pub use inbound::*;
