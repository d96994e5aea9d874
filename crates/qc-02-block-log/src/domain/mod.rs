//! # Block Log Domain
//!
//! Pure chain logic. No locks, no I/O; the hash function is passed in.

pub mod chain;
pub mod entities;
pub mod errors;

pub use chain::*;
pub use entities::*;
pub use errors::*;
