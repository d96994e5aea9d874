//! # Ports
//!
//! - `inbound` - API exposed to the block-production applier
//!
//! The only driven dependency is the `Hasher` port from `shared-types`.

pub mod inbound;

pub use inbound::*;
