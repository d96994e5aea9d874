//! Configuration types for the consensus engine

use crate::domain::MIN_VALIDATORS;
use serde::Deserialize;

/// Runtime configuration for the consensus engine
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConsensusConfig {
    /// Largest accepted block data in bytes
    pub max_payload_bytes: usize,

    /// VOTING proposals older than this are timed out (seconds)
    pub proposal_timeout_secs: u64,

    /// Smallest validator set accepted; never below 3
    pub min_validators: usize,
}

impl ConsensusConfig {
    pub fn proposal_timeout_ms(&self) -> u64 {
        self.proposal_timeout_secs.saturating_mul(1_000)
    }

    /// Effective minimum, clamped to the protocol floor.
    pub fn effective_min_validators(&self) -> usize {
        self.min_validators.max(MIN_VALIDATORS)
    }
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            max_payload_bytes: 4096,
            proposal_timeout_secs: 30,
            min_validators: MIN_VALIDATORS,
        }
    }
}
