//! A complete node held in memory: consensus, ledger, block log and a
//! driver ticked by hand.

use qc_02_block_log::{BlockLog, BlockLogConfig};
use qc_04_ledger::{FailurePolicy, Ledger};
use qc_08_consensus::{
    ConsensusConfig, ConsensusEngine, SignedVote, ValidatorInfo, VoteOutcome,
};
use qc_17_block_production::{ProductionConfig, ProductionDriver, TickReport, TransactionApplier};
use shared_crypto::{DefaultCrypto, Ed25519KeyPair, Ed25519Scheme, Sha256Hasher};
use shared_types::{
    Address, BlockPayload, Hash, InMemorySnapshotStore, ManualTimeSource, Role, TimeSource,
    Transaction, ValidatorId, NATIVE_ASSET,
};
use std::sync::Arc;

pub const T0: u64 = 1_736_935_200_000;
pub const OWNER: Address = [0x01; 20];
pub const ALICE: Address = [0xA1; 20];
pub const BOB: Address = [0xB0; 20];
pub const GENESIS_SUPPLY: u128 = 1_000_000;

pub struct Validator {
    pub id: ValidatorId,
    seed: [u8; 32],
}

impl Validator {
    pub fn sign(&self, hash: Hash, approve: bool) -> SignedVote {
        SignedVote::sign(&Ed25519Scheme, &self.seed, hash, self.id, approve).unwrap()
    }
}

pub fn validators(n: u8) -> Vec<Validator> {
    (1..=n)
        .map(|i| {
            let seed = [i; 32];
            Validator {
                id: *Ed25519KeyPair::from_seed(seed).public_key().as_bytes(),
                seed,
            }
        })
        .collect()
}

pub struct TestNode {
    pub clock: Arc<ManualTimeSource>,
    pub validators: Vec<Validator>,
    pub engine: Arc<ConsensusEngine>,
    pub ledger: Arc<Ledger>,
    pub log: Arc<BlockLog>,
    pub store: Arc<InMemorySnapshotStore>,
    pub driver: ProductionDriver,
}

impl TestNode {
    pub fn new(n: u8, policy: FailurePolicy) -> Self {
        let clock = Arc::new(ManualTimeSource::new(T0));
        let validators = validators(n);
        let engine = Arc::new(
            ConsensusEngine::initialize(
                validators
                    .iter()
                    .map(|v| ValidatorInfo::new(v.id, v.id.to_vec()))
                    .collect(),
                ConsensusConfig::default(),
                Arc::new(DefaultCrypto),
                clock.clone(),
            )
            .unwrap(),
        );

        let ledger = Arc::new(Ledger::new(Arc::new(Sha256Hasher), clock.clone()));
        ledger.grant_role(OWNER, Role::Owner);
        ledger
            .mint_genesis(OWNER, NATIVE_ASSET, GENESIS_SUPPLY)
            .unwrap();
        let log = Arc::new(BlockLog::new(
            Arc::new(Sha256Hasher),
            BlockLogConfig::default(),
        ));
        let store = Arc::new(InMemorySnapshotStore::new());

        let config = ProductionConfig {
            failure_policy: policy,
            ..Default::default()
        };
        let applier = TransactionApplier::new(ledger.clone(), log.clone(), policy);
        let driver = ProductionDriver::new(engine.clone(), applier, clock.clone(), config)
            .with_snapshots(store.clone());

        Self {
            clock,
            validators,
            engine,
            ledger,
            log,
            store,
            driver,
        }
    }

    pub fn payload(&self, txs: Vec<Transaction>) -> Vec<u8> {
        BlockPayload::new(self.clock.now_ms(), txs).encode().unwrap()
    }

    /// Propose from the first validator and vote with the given approvals
    /// until the proposal closes.
    pub fn run_round(&self, data: &[u8], approvals: &[bool]) -> (Hash, VoteOutcome) {
        let hash = self
            .engine
            .propose_block(&self.validators[0].id, data)
            .unwrap();
        let mut outcome = VoteOutcome::Pending;
        for (validator, approve) in self.validators.iter().zip(approvals) {
            outcome = self
                .engine
                .vote_signed(&validator.sign(hash, *approve))
                .unwrap();
            if outcome != VoteOutcome::Pending {
                break;
            }
        }
        (hash, outcome)
    }

    /// Finalize `txs` with unanimous approval and run one driver tick.
    pub fn commit(&mut self, txs: Vec<Transaction>) -> TickReport {
        let data = self.payload(txs);
        let (_, outcome) = self.run_round(&data, &vec![true; self.validators.len()]);
        assert_eq!(outcome, VoteOutcome::Finalized);
        self.driver.tick()
    }
}
