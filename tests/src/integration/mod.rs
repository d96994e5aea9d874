//! Cross-subsystem integration tests

#[cfg(test)]
mod harness;

mod e2e_finalization;
mod failure_handling;
mod replica_determinism;
