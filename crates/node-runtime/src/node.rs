//! # Node Wiring
//!
//! Builds every subsystem from a [`NodeConfig`] and owns them for the
//! lifetime of the process.
//!
//! ## Startup Sequence
//!
//! 1. Shared infrastructure: clock, crypto, snapshot store
//! 2. Ledger (4), restored from the last checkpoint or seeded from genesis
//! 3. Block log (2), restored from the last checkpoint or fresh
//! 4. Consensus (8) over the locally held validator keys
//! 5. Block production (17) driver task
//!
//! Local validators use deterministic Ed25519 seeds; a single process
//! therefore plays every validator. That is a development topology, not a
//! network one.

use crate::config::NodeConfig;
use anyhow::{Context, Result};
use qc_02_block_log::BlockLog;
use qc_04_ledger::Ledger;
use qc_08_consensus::{ConsensusEngine, SignedVote, ValidatorInfo, VoteOutcome};
use qc_17_block_production::{
    BlockProductionService, ProductionDriver, ProductionStats, TransactionApplier,
    BLOCK_LOG_SNAPSHOT_KEY, LEDGER_SNAPSHOT_KEY,
};
use shared_crypto::{DefaultCrypto, Ed25519KeyPair, Ed25519Scheme};
use shared_types::{
    short_hex, BlockPayload, Hash, InMemorySnapshotStore, Role, SnapshotStore, SystemTimeSource,
    TimeSource, Transaction, ValidatorId, NATIVE_ASSET,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Deterministic seed for local validator `index`.
pub fn validator_seed(index: usize) -> [u8; 32] {
    let mut seed = [0u8; 32];
    seed[..8].copy_from_slice(&(index as u64 + 1).to_be_bytes());
    seed[31] = 0x51;
    seed
}

/// A validator whose key this process holds.
pub struct LocalValidator {
    /// Validator id (the Ed25519 public key bytes).
    pub id: ValidatorId,
    keypair: Ed25519KeyPair,
}

impl LocalValidator {
    fn from_seed(seed: [u8; 32]) -> Self {
        let keypair = Ed25519KeyPair::from_seed(seed);
        Self {
            id: *keypair.public_key().as_bytes(),
            keypair,
        }
    }

    fn info(&self) -> ValidatorInfo {
        ValidatorInfo::new(self.id, self.keypair.public_key().as_bytes().to_vec())
    }

    fn sign_vote(&self, block_hash: Hash, approve: bool) -> Result<SignedVote> {
        SignedVote::sign(
            &Ed25519Scheme,
            &self.keypair.to_seed(),
            block_hash,
            self.id,
            approve,
        )
        .context("vote signing failed")
    }
}

/// The main node runtime orchestrating all subsystems.
pub struct NodeRuntime {
    config: NodeConfig,
    clock: Arc<dyn TimeSource>,
    ledger: Arc<Ledger>,
    block_log: Arc<BlockLog>,
    consensus: Arc<ConsensusEngine>,
    snapshots: Arc<dyn SnapshotStore>,
    validators: Vec<LocalValidator>,
    production: Option<BlockProductionService>,
}

impl NodeRuntime {
    /// Build a node with the system clock and an in-memory snapshot store.
    pub fn new(config: NodeConfig) -> Result<Self> {
        Self::with_parts(
            config,
            Arc::new(SystemTimeSource),
            Arc::new(InMemorySnapshotStore::new()),
        )
    }

    /// Build a node over an explicit clock and snapshot store.
    ///
    /// Checkpoints present in `snapshots` are restored instead of genesis.
    pub fn with_parts(
        config: NodeConfig,
        clock: Arc<dyn TimeSource>,
        snapshots: Arc<dyn SnapshotStore>,
    ) -> Result<Self> {
        config.validate().context("invalid node configuration")?;
        let crypto = Arc::new(DefaultCrypto);

        let ledger = match snapshots.get(LEDGER_SNAPSHOT_KEY)? {
            Some(blob) => Ledger::restore(&blob, crypto.clone(), clock.clone())
                .context("ledger checkpoint is unreadable")?,
            None => {
                let ledger = Ledger::new(crypto.clone(), clock.clone());
                let owner = config.genesis.owner_address()?;
                ledger.grant_role(owner, Role::Owner);
                ledger.mint_genesis(owner, NATIVE_ASSET, config.genesis.supply_base_units())?;
                ledger
            }
        };

        let block_log = match snapshots.get(BLOCK_LOG_SNAPSHOT_KEY)? {
            Some(blob) => BlockLog::restore(&blob, crypto.clone(), config.block_log.clone())
                .context("block log checkpoint is unreadable")?,
            None => BlockLog::new(crypto.clone(), config.block_log.clone()),
        };

        let validators: Vec<LocalValidator> = (0..config.validators)
            .map(|i| LocalValidator::from_seed(validator_seed(i)))
            .collect();
        let consensus = ConsensusEngine::initialize(
            validators.iter().map(LocalValidator::info).collect(),
            config.consensus.clone(),
            crypto,
            clock.clone(),
        )?;

        info!(
            "[node] Subsystems ready: {} validators, {} log entries, state root 0x{}",
            validators.len(),
            block_log.get_count(),
            short_hex(&ledger.state_root()?)
        );

        Ok(Self {
            config,
            clock,
            ledger: Arc::new(ledger),
            block_log: Arc::new(block_log),
            consensus: Arc::new(consensus),
            snapshots,
            validators,
            production: None,
        })
    }

    /// Spawn the finalization driver. Must run inside a tokio runtime.
    pub fn start(&mut self) {
        if self.production.is_some() {
            warn!("[node] Block production already running");
            return;
        }
        let applier = TransactionApplier::new(
            self.ledger.clone(),
            self.block_log.clone(),
            self.config.production.failure_policy,
        );
        let driver = ProductionDriver::new(
            self.consensus.clone(),
            applier,
            self.clock.clone(),
            self.config.production.clone(),
        )
        .with_snapshots(self.snapshots.clone());
        self.production = Some(BlockProductionService::spawn(
            driver,
            &self.config.production,
        ));
    }

    /// Propose `transactions` from the first local validator, then cast a
    /// signed approval from every local validator until the proposal closes.
    pub fn submit_block(&self, transactions: Vec<Transaction>) -> Result<(Hash, VoteOutcome)> {
        let proposer = self
            .validators
            .first()
            .context("no local validators")?;
        let payload = BlockPayload::new(self.clock.now_ms(), transactions).encode()?;
        let hash = self.consensus.propose_block(&proposer.id, &payload)?;

        let mut outcome = VoteOutcome::Pending;
        for validator in &self.validators {
            outcome = self
                .consensus
                .vote_signed(&validator.sign_vote(hash, true)?)?;
            if outcome != VoteOutcome::Pending {
                break;
            }
        }
        Ok((hash, outcome))
    }

    /// Ledger handle.
    pub fn ledger(&self) -> &Arc<Ledger> {
        &self.ledger
    }

    /// Block log handle.
    pub fn block_log(&self) -> &Arc<BlockLog> {
        &self.block_log
    }

    /// Consensus engine handle.
    pub fn consensus(&self) -> &Arc<ConsensusEngine> {
        &self.consensus
    }

    /// Production counters, once started.
    pub fn stats(&self) -> Option<Arc<ProductionStats>> {
        self.production.as_ref().map(BlockProductionService::stats)
    }

    /// Stop the driver and write a final checkpoint.
    pub async fn shutdown(mut self) -> Result<()> {
        info!("[node] Initiating graceful shutdown...");
        if let Some(production) = self.production.take() {
            production.shutdown().await;
        }
        self.snapshots
            .put(LEDGER_SNAPSHOT_KEY, self.ledger.snapshot()?)?;
        self.snapshots
            .put(BLOCK_LOG_SNAPSHOT_KEY, self.block_log.snapshot()?)?;
        info!(
            "[node] Shutdown complete: {} log entries, tail 0x{}",
            self.block_log.get_count(),
            short_hex(&self.block_log.get_last_hash())
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{Address, ManualTimeSource};
    use std::time::Duration;

    const T0: u64 = 1_736_935_200_000;

    fn owner(config: &NodeConfig) -> Address {
        config.genesis.owner_address().unwrap()
    }

    #[test]
    fn test_genesis_seeding() {
        let config = NodeConfig::default();
        let node = NodeRuntime::with_parts(
            config.clone(),
            Arc::new(ManualTimeSource::new(T0)),
            Arc::new(InMemorySnapshotStore::new()),
        )
        .unwrap();
        assert_eq!(
            node.ledger().get_balance(&owner(&config), NATIVE_ASSET),
            config.genesis.supply_base_units()
        );
        assert_eq!(node.ledger().role(&owner(&config)), Some(Role::Owner));
        assert_eq!(node.block_log().get_count(), 1);
        assert_eq!(node.consensus().validator_count(), 4);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = NodeConfig {
            validators: 2,
            ..Default::default()
        };
        assert!(NodeRuntime::new(config).is_err());
    }

    #[test]
    fn test_submit_block_finalizes_with_signed_votes() {
        let node = NodeRuntime::with_parts(
            NodeConfig::default(),
            Arc::new(ManualTimeSource::new(T0)),
            Arc::new(InMemorySnapshotStore::new()),
        )
        .unwrap();
        let (hash, outcome) = node.submit_block(Vec::new()).unwrap();
        assert_eq!(outcome, VoteOutcome::Finalized);
        assert_eq!(node.consensus().tally(&hash), Some((3, 0, 3)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_shutdown_and_restore() {
        let config = NodeConfig::default();
        let store = Arc::new(InMemorySnapshotStore::new());
        let clock = Arc::new(ManualTimeSource::new(T0));
        let recipient: Address = [0x77; 20];

        let mut node =
            NodeRuntime::with_parts(config.clone(), clock.clone(), store.clone()).unwrap();
        node.start();
        node.submit_block(vec![Transaction::transfer(
            owner(&config),
            recipient,
            NATIVE_ASSET,
            42,
            1,
        )])
        .unwrap();
        tokio::time::sleep(Duration::from_millis(1_500)).await;
        assert_eq!(node.stats().unwrap().applied(), 1);
        let tail = node.block_log().get_last_hash();
        node.shutdown().await.unwrap();

        let restored = NodeRuntime::with_parts(config, clock, store).unwrap();
        assert_eq!(restored.ledger().get_balance(&recipient, NATIVE_ASSET), 42);
        assert_eq!(restored.block_log().get_last_hash(), tail);
        assert_eq!(restored.block_log().get_count(), 2);
    }
}
