//! # Replica Determinism
//!
//! Replicas that start from the same genesis and apply the same finalized
//! payloads in the same order must agree on every state root and log hash,
//! whatever the transactions do.

#[cfg(test)]
mod tests {
    use crate::integration::harness::*;
    use proptest::prelude::*;
    use qc_04_ledger::FailurePolicy;
    use qc_08_consensus::VoteOutcome;
    use qc_17_block_production::AppliedBlock;
    use shared_types::{Address, Transaction, NATIVE_ASSET};

    const ACCOUNTS: [Address; 3] = [OWNER, ALICE, BOB];

    fn arb_tx() -> impl Strategy<Value = Transaction> {
        (0..3usize, 0..3usize, 0u128..2_000, 1u64..6).prop_map(|(from, to, amount, nonce)| {
            Transaction::transfer(ACCOUNTS[from], ACCOUNTS[to], NATIVE_ASSET, amount, nonce)
        })
    }

    fn arb_blocks() -> impl Strategy<Value = Vec<Vec<Transaction>>> {
        prop::collection::vec(prop::collection::vec(arb_tx(), 1..6), 1..6)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn replicas_agree_on_every_block(
            blocks in arb_blocks(),
            skip in any::<bool>(),
        ) {
            let policy = if skip {
                FailurePolicy::SkipAndContinue
            } else {
                FailurePolicy::AbortBlock
            };
            let mut leader = TestNode::new(4, policy);
            let mut follower = TestNode::new(4, policy);

            for txs in blocks {
                // Both replicas see the identical finalized payload.
                let data = leader.payload(txs);
                let (_, outcome) = leader.run_round(&data, &[true, true, true]);
                prop_assert_eq!(outcome, VoteOutcome::Finalized);
                let (_, outcome) = follower.run_round(&data, &[true, true, true]);
                prop_assert_eq!(outcome, VoteOutcome::Finalized);

                let a = leader.driver.tick();
                let b = follower.driver.tick();
                prop_assert_eq!(a, b);
                prop_assert_eq!(
                    leader.ledger.state_root().unwrap(),
                    follower.ledger.state_root().unwrap()
                );
                prop_assert_eq!(leader.log.get_last_hash(), follower.log.get_last_hash());

                leader.clock.advance(1_000);
                follower.clock.advance(1_000);
            }

            prop_assert_eq!(leader.ledger.total_supply(NATIVE_ASSET), GENESIS_SUPPLY);
        }
    }

    #[test]
    fn test_applier_outcomes_match_across_replicas() {
        let left = TestNode::new(3, FailurePolicy::SkipAndContinue);
        let right = TestNode::new(3, FailurePolicy::SkipAndContinue);
        let data = left.payload(vec![
            Transaction::transfer(OWNER, ALICE, NATIVE_ASSET, 10, 1),
            Transaction::transfer(ALICE, BOB, NATIVE_ASSET, 50, 1),
            Transaction::transfer(OWNER, BOB, NATIVE_ASSET, 10, 2),
        ]);
        left.run_round(&data, &[true, true]);
        right.run_round(&data, &[true, true]);

        let l = left.engine.take_finalized();
        let r = right.engine.take_finalized();
        let l = left.driver.applier().apply_finalized(&l[0]).unwrap();
        let r = right.driver.applier().apply_finalized(&r[0]).unwrap();

        let AppliedBlock::Applied { receipt, .. } = &l else {
            panic!("expected applied block");
        };
        assert_eq!(receipt.applied.len(), 2);
        assert_eq!(receipt.skipped[0].0, 1);
        assert_eq!(l, r);
    }
}
