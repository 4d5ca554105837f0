//! Failure atomicity: every failed operation leaves the ledger, the
//! collaborators, and the event stream as they were.

mod common;

use burnstake_core::ReceiptId;
use burnstake_ledger::{Collaborator, LedgerError, TriggeredSweepPolicy};

use common::{account, asset, assert_conserved, default_harness, harness};

fn collaborator_of(err: &LedgerError) -> Option<Collaborator> {
    match err {
        LedgerError::CollaboratorFailure(e) => Some(e.collaborator),
        _ => None,
    }
}

#[test]
fn failed_transfer_leaves_no_trace() {
    let mut h = default_harness();
    h.ledger.custody_mut().fail_transfers(true);
    let before = h.ledger.snapshot();

    let err = h.ledger.deposit(&account("alice"), &asset("A"), 100).unwrap_err();

    assert_eq!(collaborator_of(&err), Some(Collaborator::AssetCustody));
    assert_eq!(h.ledger.snapshot(), before);
    assert_eq!(h.ledger.rewards().total(), 0);
    assert!(h.events.is_empty());
}

#[test]
fn insufficient_balance_fails_in_custody() {
    let mut h = default_harness();
    let err = h
        .ledger
        .deposit(&account("alice"), &asset("A"), 10_001)
        .unwrap_err();
    assert_eq!(collaborator_of(&err), Some(Collaborator::AssetCustody));
    assert_eq!(h.ledger.next_id(), ReceiptId(0));
}

#[test]
fn failed_stake_restores_the_transfer() {
    let mut h = default_harness();
    h.ledger.rewards_mut().fail_stakes(true);

    let err = h.ledger.deposit(&account("alice"), &asset("A"), 100).unwrap_err();

    assert_eq!(collaborator_of(&err), Some(Collaborator::RewardDistribution));
    assert_eq!(h.ledger.custody().balance_of(&account("alice"), &asset("A")), 10_000);
    assert_eq!(h.ledger.custody().burned(&asset("A")), 0);
    assert_eq!(h.ledger.next_id(), ReceiptId(0));
    assert!(h.events.is_empty());
    assert!(err.compensation_failures().is_empty());
}

#[test]
fn atomic_deposit_aborts_when_triggered_sweep_fails() {
    let mut h = default_harness();
    h.ledger.deposit(&account("alice"), &asset("A"), 100).unwrap();
    h.ledger.deposit(&account("bob"), &asset("A"), 100).unwrap();
    h.clock.advance_secs(11).unwrap();
    h.ledger.rewards_mut().fail_withdrawals_for(account("bob"));
    h.events.drain();
    let before = h.ledger.snapshot();

    // Receipt 0 settles inside the triggered sweep, then receipt 1 fails.
    let err = h.ledger.deposit(&account("carol"), &asset("A"), 100).unwrap_err();

    assert_eq!(collaborator_of(&err), Some(Collaborator::RewardDistribution));
    assert_eq!(h.ledger.snapshot(), before);
    assert_eq!(h.ledger.rewards().entitlement_of(&account("alice")), 200);
    assert_eq!(h.ledger.rewards().entitlement_of(&account("carol")), 0);
    assert_eq!(h.ledger.custody().balance_of(&account("carol"), &asset("A")), 10_000);
    assert!(h.events.is_empty());
    assert_conserved(&h.ledger);
}

#[test]
fn best_effort_deposit_survives_failed_triggered_sweep() {
    let mut h = harness(10, 10, TriggeredSweepPolicy::BestEffort);
    h.ledger.deposit(&account("alice"), &asset("A"), 100).unwrap();
    h.ledger.deposit(&account("bob"), &asset("A"), 100).unwrap();
    h.clock.advance_secs(11).unwrap();
    h.ledger.rewards_mut().fail_withdrawals_for(account("bob"));
    h.events.drain();

    let id = h.ledger.deposit(&account("carol"), &asset("A"), 100).unwrap();

    assert_eq!(id, ReceiptId(2));
    // The whole triggered sweep is undone, including receipt 0.
    assert_eq!(h.ledger.cursor(), ReceiptId(0));
    assert!(!h.ledger.receipt(ReceiptId(0)).unwrap().is_settled());
    assert_eq!(h.ledger.rewards().entitlement_of(&account("alice")), 200);
    assert_eq!(h.ledger.rewards().entitlement_of(&account("carol")), 200);
    assert_eq!(h.events.len(), 1);
    assert_conserved(&h.ledger);
}

#[test]
fn failed_sweep_keeps_cursor_and_retries_cleanly() {
    let mut h = default_harness();
    for name in ["alice", "bob", "carol"] {
        h.ledger.deposit(&account(name), &asset("A"), 10).unwrap();
    }
    h.clock.advance_secs(11).unwrap();
    h.ledger.rewards_mut().fail_withdrawals_for(account("carol"));
    h.events.drain();

    let err = h.ledger.sweep(10).unwrap_err();
    assert!(err.compensation_failures().is_empty());
    assert_eq!(h.ledger.cursor(), ReceiptId(0));
    assert!(h.events.is_empty());
    assert_conserved(&h.ledger);

    // A smaller batch that stops before the failing receipt succeeds.
    let report = h.ledger.sweep(2).unwrap();
    assert_eq!(report.settled, vec![ReceiptId(0), ReceiptId(1)]);
    assert_eq!(h.events.len(), 2);

    h.ledger.rewards_mut().clear_faults();
    let report = h.ledger.sweep(2).unwrap();
    assert_eq!(report.settled, vec![ReceiptId(2)]);
    assert!(h.ledger.is_drained());
    assert_conserved(&h.ledger);
}

#[test]
fn failed_compensation_reports_the_divergence() {
    let mut h = default_harness();
    h.ledger.deposit(&account("alice"), &asset("A"), 10).unwrap();
    h.clock.advance_secs(11).unwrap();
    // Withdrawal fails, so the sweep has nothing to compensate; the stake of
    // the new deposit is compensated by a withdrawal that also fails.
    h.ledger.rewards_mut().fail_withdrawals(true);

    let err = h.ledger.deposit(&account("bob"), &asset("A"), 10).unwrap_err();

    assert_eq!(collaborator_of(&err), Some(Collaborator::RewardDistribution));
    assert_eq!(h.ledger.next_id(), ReceiptId(1));
    assert_eq!(h.ledger.cursor(), ReceiptId(0));
    // Custody was restored even though the stake reversal failed.
    assert_eq!(h.ledger.custody().balance_of(&account("bob"), &asset("A")), 10_000);

    // Bob still holds the entitlement of a deposit the ledger never kept,
    // and the error says so.
    assert_eq!(h.ledger.rewards().entitlement_of(&account("bob")), 20);
    assert_eq!(h.ledger.pending_weight_of(&account("bob")), 0);
    assert!(matches!(&err, LedgerError::CollaboratorFailure(e) if e.diverged()));
    let failures = err.compensation_failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].collaborator, Collaborator::RewardDistribution);
    assert!(failures[0].reason.contains("bob"));
    assert!(err.to_string().contains("compensation(s) also failed"));
}
