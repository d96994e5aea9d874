//! # End-to-End Finalization
//!
//! ```text
//! propose_block ──→ vote_signed × quorum ──→ take_finalized
//!                                                 │
//!                          apply_batch (Ledger) ←─┤
//!                          append (Block Log)  ←──┘
//! ```

#[cfg(test)]
mod tests {
    use crate::integration::harness::*;
    use qc_02_block_log::{BlockLog, BlockLogConfig};
    use qc_04_ledger::{FailurePolicy, Ledger};
    use qc_08_consensus::{ProposalStatus, VoteOutcome};
    use qc_17_block_production::{BLOCK_LOG_SNAPSHOT_KEY, LEDGER_SNAPSHOT_KEY};
    use shared_crypto::Sha256Hasher;
    use shared_types::{Block, Hasher, SnapshotStore, Transaction, NATIVE_ASSET};
    use std::sync::Arc;

    #[test]
    fn test_funds_flow_through_consensus_into_ledger_and_log() {
        let mut node = TestNode::new(4, FailurePolicy::AbortBlock);
        let genesis = node.log.get_last_hash();

        let report = node.commit(vec![
            Transaction::transfer(OWNER, ALICE, NATIVE_ASSET, 500, 1),
            Transaction::transfer(OWNER, BOB, NATIVE_ASSET, 250, 2),
        ]);
        assert_eq!(report.applied, 1);

        node.clock.advance(1_000);
        let report = node.commit(vec![Transaction::transfer(ALICE, BOB, NATIVE_ASSET, 100, 1)]);
        assert_eq!(report.applied, 1);

        assert_eq!(node.ledger.get_balance(&ALICE, NATIVE_ASSET), 400);
        assert_eq!(node.ledger.get_balance(&BOB, NATIVE_ASSET), 350);
        assert_eq!(node.ledger.total_supply(NATIVE_ASSET), GENESIS_SUPPLY);

        assert_eq!(node.log.get_count(), 3);
        assert_eq!(node.log.get_entry(1).unwrap().parent_hash, genesis);
        assert!(node.log.verify().is_ok());
    }

    #[test]
    fn test_logged_hash_commits_to_payload_and_state_root() {
        let mut node = TestNode::new(3, FailurePolicy::AbortBlock);
        let data = node.payload(vec![Transaction::transfer(OWNER, ALICE, NATIVE_ASSET, 7, 1)]);
        let (hash, outcome) = node.run_round(&data, &[true, true, true]);
        assert_eq!(outcome, VoteOutcome::Finalized);
        let parent = node.log.get_last_hash();

        node.driver.tick();

        let expected = Block {
            sequence: 1,
            parent_hash: parent,
            tx_list_hash: hash,
            state_root: node.ledger.state_root().unwrap(),
        };
        assert_eq!(hash, Sha256Hasher.hash(&data));
        assert_eq!(node.log.get_last_hash(), Sha256Hasher.hash(&expected.encode()));
    }

    #[test]
    fn test_rejected_and_pending_blocks_never_apply() {
        let mut node = TestNode::new(4, FailurePolicy::AbortBlock);
        let rejected = node.payload(vec![Transaction::transfer(OWNER, ALICE, NATIVE_ASSET, 1, 1)]);
        let (hash, outcome) = node.run_round(&rejected, &[true, false, false]);
        assert_eq!(outcome, VoteOutcome::Rejected);
        assert_eq!(node.engine.status(&hash), Some(ProposalStatus::Rejected));

        node.clock.advance(1);
        let pending = node.payload(vec![Transaction::transfer(OWNER, BOB, NATIVE_ASSET, 1, 1)]);
        let (hash, outcome) = node.run_round(&pending, &[true, true]);
        assert_eq!(outcome, VoteOutcome::Pending);

        let report = node.driver.tick();
        assert_eq!(report.applied, 0);
        assert_eq!(node.ledger.get_nonce(&OWNER), 0);
        assert_eq!(node.log.get_count(), 1);
        assert_eq!(node.engine.status(&hash), Some(ProposalStatus::Voting));
    }

    #[test]
    fn test_restart_from_checkpoint() {
        let mut node = TestNode::new(4, FailurePolicy::AbortBlock);
        node.commit(vec![Transaction::transfer(OWNER, ALICE, NATIVE_ASSET, 900, 1)]);

        let ledger_blob = node.store.get(LEDGER_SNAPSHOT_KEY).unwrap().unwrap();
        let log_blob = node.store.get(BLOCK_LOG_SNAPSHOT_KEY).unwrap().unwrap();
        let ledger = Ledger::restore(&ledger_blob, Arc::new(Sha256Hasher), node.clock.clone()).unwrap();
        let log = BlockLog::restore(&log_blob, Arc::new(Sha256Hasher), BlockLogConfig::default()).unwrap();

        assert_eq!(ledger.state_root().unwrap(), node.ledger.state_root().unwrap());
        assert_eq!(ledger.get_nonce(&OWNER), 1);
        assert_eq!(log.get_last_hash(), node.log.get_last_hash());
    }

    #[tokio::test(start_paused = true)]
    async fn test_node_runtime_end_to_end() {
        use node_runtime::{NodeConfig, NodeRuntime};
        use shared_types::{InMemorySnapshotStore, ManualTimeSource};
        use std::time::Duration;

        let config = NodeConfig {
            validators: 5,
            ..Default::default()
        };
        let owner = config.genesis.owner_address().unwrap();
        let mut runtime = NodeRuntime::with_parts(
            config,
            Arc::new(ManualTimeSource::new(T0)),
            Arc::new(InMemorySnapshotStore::new()),
        )
        .unwrap();
        runtime.start();

        let (_, outcome) = runtime
            .submit_block(vec![Transaction::transfer(owner, ALICE, NATIVE_ASSET, 5, 1)])
            .unwrap();
        assert_eq!(outcome, VoteOutcome::Finalized);

        tokio::time::sleep(Duration::from_millis(1_100)).await;
        assert_eq!(runtime.ledger().get_balance(&ALICE, NATIVE_ASSET), 5);
        assert_eq!(runtime.block_log().get_count(), 2);
        runtime.shutdown().await.unwrap();
    }
}
