//! # Node Runtime Library
//!
//! Configuration, logging setup and subsystem wiring for the `node-runtime`
//! binary, exposed as a library so the wiring can be tested.

#![warn(missing_docs)]

pub mod config;
pub mod logging;
pub mod node;

pub use config::{ConfigError, GenesisConfig, NodeConfig};
pub use node::{validator_seed, LocalValidator, NodeRuntime};
