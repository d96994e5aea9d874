//! Domain layer for Consensus subsystem
//!
//! Pure state machine and quorum arithmetic. No locks, no clocks.

pub mod error;
pub mod proposal;
pub mod quorum;
pub mod validator;
pub mod vote;

pub use error::*;
pub use proposal::*;
pub use quorum::*;
pub use validator::*;
pub use vote::*;
