//! # Consensus Metrics
//!
//! Prometheus metrics for monitoring proposal outcomes.
//!
//! ## Usage
//!
//! Enable with the `metrics` feature:
//! ```toml
//! qc-08-consensus = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `consensus_proposals_finalized_total` - Proposals that reached quorum
//! - `consensus_proposals_rejected_total` - Proposals that can no longer reach quorum
//! - `consensus_proposals_timed_out_total` - Proposals expired while voting
//! - `consensus_votes_refused_total` - Votes refused, labeled by reason

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec};

#[cfg(feature = "metrics")]
lazy_static! {
    /// Total proposals finalized
    pub static ref PROPOSALS_FINALIZED: IntCounter = register_int_counter!(
        "consensus_proposals_finalized_total",
        "Total number of proposals finalized"
    )
    .expect("Failed to create PROPOSALS_FINALIZED metric");

    /// Total proposals rejected
    pub static ref PROPOSALS_REJECTED: IntCounter = register_int_counter!(
        "consensus_proposals_rejected_total",
        "Total number of proposals rejected"
    )
    .expect("Failed to create PROPOSALS_REJECTED metric");

    /// Total proposals timed out
    pub static ref PROPOSALS_TIMED_OUT: IntCounter = register_int_counter!(
        "consensus_proposals_timed_out_total",
        "Total number of proposals timed out"
    )
    .expect("Failed to create PROPOSALS_TIMED_OUT metric");

    /// Refused votes, labeled by reason
    pub static ref VOTES_REFUSED: IntCounterVec = register_int_counter_vec!(
        "consensus_votes_refused_total",
        "Total number of votes refused",
        &["reason"]
    )
    .expect("Failed to create VOTES_REFUSED metric");
}

#[cfg(feature = "metrics")]
pub fn record_proposal_finalized() {
    PROPOSALS_FINALIZED.inc();
}

#[cfg(feature = "metrics")]
pub fn record_proposal_rejected() {
    PROPOSALS_REJECTED.inc();
}

#[cfg(feature = "metrics")]
pub fn record_proposals_timed_out(count: usize) {
    PROPOSALS_TIMED_OUT.inc_by(count as u64);
}

#[cfg(feature = "metrics")]
pub fn record_vote_refused(reason: &str) {
    VOTES_REFUSED.with_label_values(&[reason]).inc();
}

// No-op implementations when metrics feature is disabled
#[cfg(not(feature = "metrics"))]
pub fn record_proposal_finalized() {}

#[cfg(not(feature = "metrics"))]
pub fn record_proposal_rejected() {}

#[cfg(not(feature = "metrics"))]
pub fn record_proposals_timed_out(_count: usize) {}

#[cfg(not(feature = "metrics"))]
pub fn record_vote_refused(_reason: &str) {}
