//! Configuration types for block production

use qc_04_ledger::FailurePolicy;
use serde::Deserialize;
use std::time::Duration;

/// Runtime configuration for the finalization driver
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProductionConfig {
    /// Driver cadence in milliseconds (default: 1000)
    pub tick_interval_ms: u64,

    /// What to do when a transaction in a finalized block fails
    pub failure_policy: FailurePolicy,

    /// Finalized blocks applied per tick; the rest wait for the next tick
    pub max_finalized_per_tick: usize,

    /// How long closed proposals stay queryable in consensus before the
    /// driver prunes them (default: 60000)
    pub closed_retention_ms: u64,
}

impl ProductionConfig {
    /// Tick interval as a `Duration`
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Closed-proposal retention as a `Duration`
    pub fn closed_retention(&self) -> Duration {
        Duration::from_millis(self.closed_retention_ms)
    }

    /// Reject values the driver cannot run with
    pub fn validate(&self) -> crate::Result<()> {
        if self.tick_interval_ms == 0 {
            return Err(crate::ProductionError::InvalidConfig(
                "tick_interval_ms must be positive".into(),
            ));
        }
        if self.max_finalized_per_tick == 0 {
            return Err(crate::ProductionError::InvalidConfig(
                "max_finalized_per_tick must be positive".into(),
            ));
        }
        Ok(())
    }
}

impl Default for ProductionConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1_000,
            failure_policy: FailurePolicy::AbortBlock,
            max_finalized_per_tick: 64,
            closed_retention_ms: 60_000,
        }
    }
}
