//! # Shared Types Crate
//!
//! Value types, transactions, and the ports every subsystem is handed at
//! construction time.
//!
//! ## Design Principles
//!
//! - **Value identifiers**: addresses, hashes and validator ids are fixed-size
//!   byte arrays, stored in maps by value.
//! - **Injected collaborators**: hashing, signing, wall-clock time and snapshot
//!   storage are traits; concrete algorithms live outside the core.
//! - **No process-wide state**: every ledger, engine and log is an owned value.

pub mod entities;
pub mod errors;
pub mod persistence;
pub mod ports;
pub mod roles;

pub use entities::*;
pub use errors::*;
pub use persistence::*;
pub use ports::*;
pub use roles::*;
