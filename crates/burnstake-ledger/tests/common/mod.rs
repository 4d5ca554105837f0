//! Shared fixtures for ledger integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use burnstake_core::{AccountId, AssetId, ManualClock, WeightRate};
use burnstake_ledger::{
    EventLog, InMemoryCustody, InMemoryRewards, Ledger, LedgerConfig, StaticAdmins,
    TriggeredSweepPolicy,
};

pub type TestLedger = Ledger<InMemoryCustody, InMemoryRewards, StaticAdmins>;

pub struct Harness {
    pub ledger: TestLedger,
    pub clock: ManualClock,
    pub events: Arc<EventLog>,
}

pub fn account(name: &str) -> AccountId {
    AccountId::new(name).unwrap()
}

pub fn asset(symbol: &str) -> AssetId {
    AssetId::new(symbol).unwrap()
}

pub fn admin() -> AccountId {
    account("admin")
}

/// A ledger supporting asset `A` at weight 2 (scale 1), with `alice`, `bob`
/// and `carol` each holding 10_000 of it, the clock at epoch zero.
pub fn harness(cooldown_secs: u64, batch_limit: u32, policy: TriggeredSweepPolicy) -> Harness {
    let clock = ManualClock::at_epoch_secs(0).unwrap();
    let events = Arc::new(EventLog::new());
    let mut custody = InMemoryCustody::new();
    for name in ["alice", "bob", "carol"] {
        custody.fund(&account(name), &asset("A"), 10_000).unwrap();
    }
    let config = LedgerConfig::new(cooldown_secs, batch_limit)
        .unwrap()
        .with_asset(asset("A"), WeightRate(2))
        .with_triggered_sweep(policy);
    let ledger = Ledger::new(
        config,
        custody,
        InMemoryRewards::new(),
        StaticAdmins::new([admin()]),
        Arc::new(clock.clone()),
    )
    .unwrap()
    .with_event_sink(events.clone());
    Harness {
        ledger,
        clock,
        events,
    }
}

pub fn default_harness() -> Harness {
    harness(10, 10, TriggeredSweepPolicy::Atomic)
}

/// Entitlement held by reward distribution must equal the ledger's pending
/// weight for every account, and the book must be internally consistent.
pub fn assert_conserved(ledger: &TestLedger) {
    ledger.book().check_invariants().unwrap();
    for name in ["alice", "bob", "carol"] {
        let who = account(name);
        assert_eq!(
            ledger.rewards().entitlement_of(&who),
            ledger.pending_weight_of(&who),
            "entitlement mismatch for {who}"
        );
    }
}
