//! # Failure Handling
//!
//! Aborted blocks, skipped transactions, a halted block log and proposals
//! that never reach quorum.

#[cfg(test)]
mod tests {
    use crate::integration::harness::*;
    use qc_02_block_log::BlockLogError;
    use qc_04_ledger::FailurePolicy;
    use qc_08_consensus::{ConsensusError, ProposalStatus, VoteOutcome};
    use shared_types::{Transaction, TxAction, NATIVE_ASSET, ZERO_HASH};

    const DAY_MS: u64 = 24 * 60 * 60 * 1_000;

    fn set_limit(from: shared_types::Address, daily: u128, nonce: u64) -> Transaction {
        Transaction {
            from,
            nonce,
            action: TxAction::SetSpendingLimit {
                daily_limit: daily,
                monthly_limit: 0,
            },
        }
    }

    #[test]
    fn test_abort_block_leaves_no_trace() {
        let mut node = TestNode::new(4, FailurePolicy::AbortBlock);
        let root = node.ledger.state_root().unwrap();

        let report = node.commit(vec![
            Transaction::transfer(OWNER, ALICE, NATIVE_ASSET, 10, 1),
            Transaction::transfer(ALICE, BOB, NATIVE_ASSET, 11, 1),
        ]);
        assert_eq!(report.aborted, 1);
        assert_eq!(node.ledger.state_root().unwrap(), root);
        assert_eq!(node.ledger.get_nonce(&OWNER), 0);
        assert_eq!(node.log.get_count(), 1);

        node.clock.advance(1);
        let report = node.commit(vec![Transaction::transfer(OWNER, ALICE, NATIVE_ASSET, 10, 1)]);
        assert_eq!(report.applied, 1);
        assert_eq!(node.ledger.get_balance(&ALICE, NATIVE_ASSET), 10);
    }

    #[test]
    fn test_skip_and_continue_applies_the_rest() {
        let mut node = TestNode::new(4, FailurePolicy::SkipAndContinue);
        let report = node.commit(vec![
            Transaction::transfer(OWNER, ALICE, NATIVE_ASSET, 10, 1),
            Transaction::mint(ALICE, ALICE, NATIVE_ASSET, 1_000, 1),
            Transaction::transfer(ALICE, BOB, NATIVE_ASSET, 4, 1),
        ]);
        assert_eq!(report.applied, 1);
        assert_eq!(node.ledger.get_balance(&BOB, NATIVE_ASSET), 4);
        assert_eq!(node.ledger.total_supply(NATIVE_ASSET), GENESIS_SUPPLY);
        assert_eq!(node.log.get_count(), 2);
    }

    #[test]
    fn test_daily_limit_uses_block_time() {
        let mut node = TestNode::new(4, FailurePolicy::AbortBlock);
        node.commit(vec![Transaction::transfer(OWNER, ALICE, NATIVE_ASSET, 1_000, 1)]);

        node.clock.advance(1);
        node.commit(vec![
            set_limit(ALICE, 100, 1),
            Transaction::transfer(ALICE, BOB, NATIVE_ASSET, 80, 2),
        ]);
        assert_eq!(node.ledger.get_balance(&BOB, NATIVE_ASSET), 80);

        node.clock.advance(1);
        let report = node.commit(vec![Transaction::transfer(ALICE, BOB, NATIVE_ASSET, 30, 3)]);
        assert_eq!(report.aborted, 1);

        node.clock.advance(DAY_MS);
        let report = node.commit(vec![Transaction::transfer(ALICE, BOB, NATIVE_ASSET, 30, 3)]);
        assert_eq!(report.applied, 1);
        assert_eq!(node.ledger.get_balance(&BOB, NATIVE_ASSET), 110);
    }

    #[test]
    fn test_halted_log_pauses_then_resyncs() {
        let mut node = TestNode::new(4, FailurePolicy::AbortBlock);
        assert!(matches!(
            node.log.append(ZERO_HASH, b"foreign"),
            Err(BlockLogError::ChainIntegrity { .. })
        ));
        assert!(matches!(
            node.log.add_block(b"next"),
            Err(BlockLogError::Halted { .. })
        ));

        let report = node.commit(vec![Transaction::transfer(OWNER, ALICE, NATIVE_ASSET, 5, 1)]);
        assert!(report.halted);
        assert_eq!(report.backlog, 1);
        assert_eq!(node.ledger.get_nonce(&OWNER), 0);

        node.log.resync(node.log.entries()).unwrap();
        assert!(!node.log.is_halted());

        let report = node.driver.tick();
        assert!(!report.halted);
        assert_eq!(report.applied, 1);
        assert_eq!(node.ledger.get_balance(&ALICE, NATIVE_ASSET), 5);
    }

    #[test]
    fn test_stalled_proposal_times_out_and_can_be_reproposed() {
        let mut node = TestNode::new(4, FailurePolicy::AbortBlock);
        let data = node.payload(vec![Transaction::transfer(OWNER, ALICE, NATIVE_ASSET, 5, 1)]);
        let (hash, outcome) = node.run_round(&data, &[true]);
        assert_eq!(outcome, VoteOutcome::Pending);

        node.clock.advance(29_999);
        assert_eq!(node.driver.tick().expired, 0);
        node.clock.advance(1);
        assert_eq!(node.driver.tick().expired, 1);
        assert_eq!(node.engine.status(&hash), Some(ProposalStatus::TimedOut));

        let late = node.validators[1].sign(hash, true);
        assert_eq!(
            node.engine.vote_signed(&late),
            Err(ConsensusError::ProposalClosed {
                status: ProposalStatus::TimedOut
            })
        );

        let (again, outcome) = node.run_round(&data, &[true, true, true]);
        assert_eq!(again, hash);
        assert_eq!(outcome, VoteOutcome::Finalized);
        assert_eq!(node.driver.tick().applied, 1);
    }

    #[test]
    fn test_forged_vote_is_refused() {
        let node = TestNode::new(4, FailurePolicy::AbortBlock);
        let data = node.payload(Vec::new());
        let hash = node.engine.propose_block(&node.validators[0].id, &data).unwrap();

        let mut forged = node.validators[0].sign(hash, true);
        forged.validator = node.validators[1].id;
        assert_eq!(
            node.engine.vote_signed(&forged),
            Err(ConsensusError::InvalidSignature(node.validators[1].id))
        );
        assert_eq!(node.engine.tally(&hash), Some((0, 0, 0)));
    }
}
