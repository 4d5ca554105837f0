//! Property tests over random operation sequences.

mod common;

use proptest::prelude::*;

use burnstake_core::{Clock, ReceiptId};
use burnstake_ledger::TriggeredSweepPolicy;

use common::{account, asset, assert_conserved, harness};

const NAMES: [&str; 3] = ["alice", "bob", "carol"];

#[derive(Debug, Clone)]
enum Op {
    Deposit { who: usize, amount: u128 },
    Advance(u64),
    Sweep(u32),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..NAMES.len(), 1u128..50).prop_map(|(who, amount)| Op::Deposit { who, amount }),
        2 => (0u64..8).prop_map(Op::Advance),
        2 => (0u32..5).prop_map(Op::Sweep),
    ]
}

proptest! {
    /// Ids stay dense, settlement stays a prefix, the cursor never moves
    /// backwards, sweeps respect their budget, and reward entitlement always
    /// matches pending weight.
    #[test]
    fn ledger_invariants_hold(
        cooldown in 1u64..10,
        batch in 1u32..4,
        ops in prop::collection::vec(op(), 1..60),
    ) {
        let mut h = harness(cooldown, batch, TriggeredSweepPolicy::Atomic);
        let mut cursor = ReceiptId(0);
        let mut issued = 0u64;
        let mut weights = Vec::new();

        for op in ops {
            match op {
                Op::Deposit { who, amount } => {
                    let id = h.ledger.deposit(&account(NAMES[who]), &asset("A"), amount).unwrap();
                    prop_assert_eq!(id, ReceiptId(issued));
                    issued += 1;
                    weights.push(amount * 2);
                }
                Op::Advance(secs) => {
                    h.clock.advance_secs(secs).unwrap();
                }
                Op::Sweep(n) => {
                    let report = h.ledger.sweep(n).unwrap();
                    prop_assert!(report.examined <= n);
                    let now = h.clock.now();
                    for id in &report.settled {
                        prop_assert!(h.ledger.receipt(*id).unwrap().is_due_at(now));
                    }
                }
            }

            prop_assert!(h.ledger.cursor() >= cursor);
            cursor = h.ledger.cursor();
            prop_assert_eq!(h.ledger.next_id(), ReceiptId(issued));
            let stored: Vec<u128> = h.ledger.receipts().iter().map(|r| r.weight).collect();
            prop_assert_eq!(&stored, &weights);
            assert_conserved(&h.ledger);
        }
    }

    /// Each receipt is settled at most once: the settled sets of successive
    /// sweeps are disjoint and ascending.
    #[test]
    fn receipts_settle_once_in_order(
        deposits in 1usize..20,
        budgets in prop::collection::vec(1u32..6, 1..10),
    ) {
        let mut h = harness(5, 1, TriggeredSweepPolicy::Atomic);
        for i in 0..deposits {
            h.ledger.deposit(&account(NAMES[i % NAMES.len()]), &asset("A"), 1).unwrap();
        }
        h.clock.advance_secs(6).unwrap();

        let mut seen: Vec<ReceiptId> = Vec::new();
        for n in budgets {
            let report = h.ledger.sweep(n).unwrap();
            for id in report.settled {
                if let Some(last) = seen.last() {
                    prop_assert!(id > *last);
                }
                seen.push(id);
            }
        }
        prop_assert!(seen.len() <= deposits);
        prop_assert_eq!(h.ledger.cursor().as_u64() as usize, seen.len());
        assert_conserved(&h.ledger);
    }
}
