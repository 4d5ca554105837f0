//! # Operation Journal
//!
//! Every public ledger mutator runs inside a [`Journal`]. The journal
//! remembers where the receipt book stood when the operation began, every
//! collaborator call that completed, and every notification raised. On
//! success the notifications are published; on failure the journal walks
//! its effects backwards, issuing the compensating collaborator call for
//! each and restoring the book.
//!
//! Savepoints let a nested unit (the sweep a best-effort deposit triggers)
//! roll back on its own without discarding the enclosing deposit.

use burnstake_core::{AccountId, AssetId, ReceiptId};

use crate::collaborator::{AssetCustody, CollaboratorError, RewardDistribution};
use crate::event::{EventSink, LedgerEvent};
use crate::receipt::ReceiptBook;

/// A collaborator call that completed inside the current operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Effect {
    /// Asset custody took `amount` of `asset` from `from`.
    TransferredIn {
        from: AccountId,
        asset: AssetId,
        amount: u128,
    },
    /// Reward distribution credited `weight` to `owner`.
    Staked { owner: AccountId, weight: u128 },
    /// Reward distribution debited `weight` from `owner` to settle a receipt.
    Withdrew {
        receipt_id: ReceiptId,
        owner: AccountId,
        weight: u128,
    },
}

/// A point a journal can roll back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Savepoint {
    next_id: ReceiptId,
    cursor: ReceiptId,
    effects: usize,
    events: usize,
}

/// Staged effects of one ledger operation.
#[derive(Debug)]
pub(crate) struct Journal {
    start: Savepoint,
    effects: Vec<Effect>,
    events: Vec<LedgerEvent>,
}

impl Journal {
    /// Start an operation against `book`.
    pub(crate) fn begin(book: &ReceiptBook) -> Self {
        Self {
            start: Savepoint {
                next_id: book.next_id(),
                cursor: book.cursor(),
                effects: 0,
                events: 0,
            },
            effects: Vec::new(),
            events: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    pub(crate) fn emit(&mut self, event: LedgerEvent) {
        self.events.push(event);
    }

    /// Mark the current position for a nested rollback.
    pub(crate) fn savepoint(&self, book: &ReceiptBook) -> Savepoint {
        Savepoint {
            next_id: book.next_id(),
            cursor: book.cursor(),
            effects: self.effects.len(),
            events: self.events.len(),
        }
    }

    /// Publish buffered events. Consumes the journal.
    pub(crate) fn commit(self, sink: &dyn EventSink) {
        for event in &self.events {
            sink.publish(event);
        }
    }

    /// Undo the whole operation. Returns the compensations that failed.
    #[must_use]
    pub(crate) fn rollback<C, R>(
        mut self,
        book: &mut ReceiptBook,
        custody: &mut C,
        rewards: &mut R,
    ) -> Vec<CollaboratorError>
    where
        C: AssetCustody,
        R: RewardDistribution,
    {
        let start = self.start;
        self.rollback_to(start, book, custody, rewards)
    }

    /// Undo everything recorded after `savepoint`.
    ///
    /// Every compensation is attempted even after one fails. The failures
    /// are returned in the order they occurred.
    #[must_use]
    pub(crate) fn rollback_to<C, R>(
        &mut self,
        savepoint: Savepoint,
        book: &mut ReceiptBook,
        custody: &mut C,
        rewards: &mut R,
    ) -> Vec<CollaboratorError>
    where
        C: AssetCustody,
        R: RewardDistribution,
    {
        let undone: Vec<Effect> = self.effects.drain(savepoint.effects..).rev().collect();
        let mut failures = Vec::new();
        for effect in undone {
            if let Err(e) = compensate(&effect, book, custody, rewards) {
                tracing::error!(
                    error = %e,
                    effect = ?effect,
                    "compensating collaborator call failed; external state diverges from ledger"
                );
                failures.push(e);
            }
        }
        book.restore(savepoint.next_id, savepoint.cursor);
        self.events.truncate(savepoint.events);
        failures
    }
}

fn compensate<C, R>(
    effect: &Effect,
    book: &mut ReceiptBook,
    custody: &mut C,
    rewards: &mut R,
) -> Result<(), CollaboratorError>
where
    C: AssetCustody,
    R: RewardDistribution,
{
    match effect {
        Effect::TransferredIn {
            from,
            asset,
            amount,
        } => custody.restore(from, asset, *amount),
        Effect::Staked { owner, weight } => rewards.delegate_withdraw(owner, *weight),
        Effect::Withdrew {
            receipt_id,
            owner,
            weight,
        } => {
            book.unsettle(*receipt_id);
            rewards.delegate_stake(owner, *weight)
        }
    }
}
