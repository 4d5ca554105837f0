//! # Receipts and the Receipt Sequence
//!
//! A [`Receipt`] records one deposit: who gets settlement credit, which
//! asset was deposited, the weight forwarded to reward distribution, and
//! when the receipt unlocks. Everything except the status is fixed at
//! creation.
//!
//! ## States
//!
//! ```text
//! Pending ──settle()──▶ Settled (terminal)
//! ```
//!
//! The [`ReceiptBook`] is the append-only sequence of receipts plus the
//! sweep cursor.
//!
//! ## Invariants
//!
//! - Receipt ids are dense over `[0, next_id)`; `next_id` only grows.
//! - `cursor <= next_id`.
//! - Every receipt below the cursor is settled and every receipt at or above
//!   it is pending. The sweeper settles strictly in id order and only
//!   advances past a receipt once it is settled, so settlement is a prefix
//!   of the sequence.
//! - `weight` and `unlock_at` never change after creation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use burnstake_core::{AccountId, ArithmeticError, AssetId, ReceiptId, Timestamp};

/// Lifecycle state of a receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReceiptStatus {
    /// Entitlement is held by the owner.
    Pending,
    /// Entitlement has been reversed (terminal).
    Settled,
}

impl ReceiptStatus {
    /// Whether this state is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Settled)
    }
}

impl std::fmt::Display for ReceiptStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Settled => "SETTLED",
        };
        f.write_str(s)
    }
}

/// One deposit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Position in the sequence.
    pub id: ReceiptId,
    /// Who receives settlement credit.
    pub owner: AccountId,
    /// The deposited asset.
    pub asset: AssetId,
    /// The deposited amount.
    pub amount: u128,
    /// Entitlement forwarded to reward distribution at creation.
    pub weight: u128,
    /// When the deposit was recorded.
    pub created_at: Timestamp,
    /// `created_at` plus the cooldown in force at creation.
    pub unlock_at: Timestamp,
    /// Current lifecycle state.
    pub status: ReceiptStatus,
}

impl Receipt {
    /// Whether the entitlement has been reversed.
    pub fn is_settled(&self) -> bool {
        self.status.is_terminal()
    }

    /// Whether the receipt may be settled at `now`.
    ///
    /// The unlock instant itself is still locked: settlement requires
    /// `now > unlock_at`.
    pub fn is_due_at(&self, now: Timestamp) -> bool {
        now > self.unlock_at
    }
}

/// A broken sequence invariant, found when loading or checking a book.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A receipt's id does not match its position.
    #[error("receipt at position {position} carries id {id}")]
    NotDense {
        /// Position in the sequence.
        position: u64,
        /// The id found there.
        id: ReceiptId,
    },

    /// The recorded `next_id` disagrees with the number of receipts.
    #[error("next_id {next_id} does not match {count} receipts")]
    NextIdMismatch {
        /// The recorded next id.
        next_id: u64,
        /// The number of receipts present.
        count: u64,
    },

    /// The cursor points past the end of the sequence.
    #[error("cursor {cursor} is beyond next_id {next_id}")]
    CursorOutOfRange {
        /// The cursor.
        cursor: ReceiptId,
        /// The next id.
        next_id: u64,
    },

    /// A receipt's status disagrees with its side of the cursor.
    #[error("{id} is {status} but the cursor is at {cursor}")]
    OutOfOrder {
        /// The offending receipt.
        id: ReceiptId,
        /// Its status.
        status: ReceiptStatus,
        /// The cursor.
        cursor: ReceiptId,
    },

    /// A receipt unlocks before it was created.
    #[error("{id} unlocks before it was created")]
    UnlockBeforeCreation {
        /// The offending receipt.
        id: ReceiptId,
    },
}

/// Persisted layout of a [`ReceiptBook`].
#[derive(Serialize, Deserialize)]
struct BookRecord {
    next_id: u64,
    cursor: ReceiptId,
    receipts: Vec<Receipt>,
}

/// The append-only receipt sequence and the sweep cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BookRecord", into = "BookRecord")]
pub struct ReceiptBook {
    receipts: Vec<Receipt>,
    cursor: ReceiptId,
}

impl ReceiptBook {
    /// An empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// The id the next appended receipt will get.
    pub fn next_id(&self) -> ReceiptId {
        ReceiptId(self.receipts.len() as u64)
    }

    /// The next receipt the sweeper will examine.
    pub fn cursor(&self) -> ReceiptId {
        self.cursor
    }

    /// Whether every receipt has been settled.
    pub fn is_drained(&self) -> bool {
        self.cursor == self.next_id()
    }

    /// Number of receipts ever issued.
    pub fn len(&self) -> usize {
        self.receipts.len()
    }

    /// Whether no receipt was ever issued.
    pub fn is_empty(&self) -> bool {
        self.receipts.is_empty()
    }

    /// Look up a receipt.
    pub fn get(&self, id: ReceiptId) -> Option<&Receipt> {
        self.receipts.get(id.index())
    }

    /// All receipts in id order.
    pub fn receipts(&self) -> &[Receipt] {
        &self.receipts
    }

    /// Receipts at or after the cursor, i.e. those still pending.
    pub fn pending(&self) -> &[Receipt] {
        &self.receipts[self.cursor.index()..]
    }

    /// Pending receipts owned by `owner`, in id order.
    pub fn pending_of<'a>(&'a self, owner: &'a AccountId) -> impl Iterator<Item = &'a Receipt> {
        self.pending().iter().filter(move |r| &r.owner == owner)
    }

    /// Total pending weight owned by `owner`.
    ///
    /// This equals the entitlement reward distribution holds for `owner`
    /// on behalf of this ledger.
    pub fn pending_weight_of(&self, owner: &AccountId) -> u128 {
        self.pending_of(owner)
            .fold(0u128, |sum, r| sum.saturating_add(r.weight))
    }

    /// Append a pending receipt and return its id.
    pub(crate) fn append(
        &mut self,
        owner: AccountId,
        asset: AssetId,
        amount: u128,
        weight: u128,
        created_at: Timestamp,
        unlock_at: Timestamp,
    ) -> Result<ReceiptId, ArithmeticError> {
        let id = self.next_id();
        id.checked_next()
            .ok_or_else(|| ArithmeticError::overflow("receipt id"))?;
        self.receipts.push(Receipt {
            id,
            owner,
            asset,
            amount,
            weight,
            created_at,
            unlock_at,
            status: ReceiptStatus::Pending,
        });
        Ok(id)
    }

    /// Mark the receipt at the cursor settled and step past it.
    ///
    /// Returns the settled receipt, or `None` if the book is drained.
    pub(crate) fn settle_at_cursor(&mut self) -> Option<&Receipt> {
        let index = self.cursor.index();
        let receipt = self.receipts.get_mut(index)?;
        receipt.status = ReceiptStatus::Settled;
        self.cursor = ReceiptId(self.cursor.0 + 1);
        self.receipts.get(index)
    }

    /// Step past an already-settled receipt at the cursor.
    pub(crate) fn skip_at_cursor(&mut self) {
        if self.cursor < self.next_id() {
            self.cursor = ReceiptId(self.cursor.0 + 1);
        }
    }

    /// Rollback: return a receipt settled in the aborted operation to pending.
    pub(crate) fn unsettle(&mut self, id: ReceiptId) {
        if let Some(receipt) = self.receipts.get_mut(id.index()) {
            receipt.status = ReceiptStatus::Pending;
        }
    }

    /// Rollback: drop receipts appended in the aborted operation and restore
    /// the cursor it started from.
    pub(crate) fn restore(&mut self, next_id: ReceiptId, cursor: ReceiptId) {
        self.receipts.truncate(next_id.index());
        self.cursor = cursor;
    }

    /// Verify every sequence invariant.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let next_id = self.next_id();
        if self.cursor > next_id {
            return Err(InvariantViolation::CursorOutOfRange {
                cursor: self.cursor,
                next_id: next_id.0,
            });
        }
        for (position, receipt) in self.receipts.iter().enumerate() {
            let position = position as u64;
            if receipt.id != ReceiptId(position) {
                return Err(InvariantViolation::NotDense {
                    position,
                    id: receipt.id,
                });
            }
            if receipt.unlock_at < receipt.created_at {
                return Err(InvariantViolation::UnlockBeforeCreation { id: receipt.id });
            }
            let below_cursor = receipt.id < self.cursor;
            if below_cursor != receipt.is_settled() {
                return Err(InvariantViolation::OutOfOrder {
                    id: receipt.id,
                    status: receipt.status,
                    cursor: self.cursor,
                });
            }
        }
        Ok(())
    }
}

impl TryFrom<BookRecord> for ReceiptBook {
    type Error = InvariantViolation;

    fn try_from(record: BookRecord) -> Result<Self, Self::Error> {
        let count = record.receipts.len() as u64;
        if record.next_id != count {
            return Err(InvariantViolation::NextIdMismatch {
                next_id: record.next_id,
                count,
            });
        }
        let book = Self {
            receipts: record.receipts,
            cursor: record.cursor,
        };
        book.check_invariants()?;
        Ok(book)
    }
}

impl From<ReceiptBook> for BookRecord {
    fn from(book: ReceiptBook) -> Self {
        Self {
            next_id: book.next_id().0,
            cursor: book.cursor,
            receipts: book.receipts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(name: &str) -> AccountId {
        AccountId::new(name).unwrap()
    }

    fn at(secs: i64) -> Timestamp {
        Timestamp::from_epoch_secs(secs).unwrap()
    }

    fn make_book(owners: &[&str]) -> ReceiptBook {
        let mut book = ReceiptBook::new();
        for (i, owner) in owners.iter().enumerate() {
            book.append(
                account(owner),
                AssetId::new("STK").unwrap(),
                10,
                20,
                at(i as i64),
                at(i as i64 + 10),
            )
            .unwrap();
        }
        book
    }

    #[test]
    fn test_append_assigns_dense_ids() {
        let book = make_book(&["alice", "bob", "alice"]);
        let ids: Vec<u64> = book.receipts().iter().map(|r| r.id.0).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(book.next_id(), ReceiptId(3));
        assert_eq!(book.cursor(), ReceiptId(0));
        assert!(book.check_invariants().is_ok());
    }

    #[test]
    fn test_unlock_instant_is_still_locked() {
        let book = make_book(&["alice"]);
        let receipt = book.get(ReceiptId(0)).unwrap();
        assert!(!receipt.is_due_at(at(10)));
        assert!(receipt.is_due_at(at(11)));
    }

    #[test]
    fn test_settle_advances_cursor() {
        let mut book = make_book(&["alice", "bob"]);
        let settled = book.settle_at_cursor().unwrap().clone();
        assert_eq!(settled.id, ReceiptId(0));
        assert_eq!(settled.status, ReceiptStatus::Settled);
        assert_eq!(book.cursor(), ReceiptId(1));
        assert!(book.check_invariants().is_ok());
    }

    #[test]
    fn test_settle_on_drained_book_is_none() {
        let mut book = make_book(&["alice"]);
        book.settle_at_cursor().unwrap();
        assert!(book.is_drained());
        assert!(book.settle_at_cursor().is_none());
    }

    #[test]
    fn test_pending_weight_excludes_settled() {
        let mut book = make_book(&["alice", "bob", "alice"]);
        assert_eq!(book.pending_weight_of(&account("alice")), 40);
        book.settle_at_cursor();
        assert_eq!(book.pending_weight_of(&account("alice")), 20);
        assert_eq!(book.pending_weight_of(&account("bob")), 20);
    }

    #[test]
    fn test_restore_undoes_append_and_settle() {
        let mut book = make_book(&["alice"]);
        let (next_id, cursor) = (book.next_id(), book.cursor());
        book.append(
            account("bob"),
            AssetId::new("STK").unwrap(),
            1,
            1,
            at(1),
            at(2),
        )
        .unwrap();
        book.settle_at_cursor();
        book.unsettle(ReceiptId(0));
        book.restore(next_id, cursor);
        assert_eq!(book, make_book(&["alice"]));
    }

    #[test]
    fn test_serde_roundtrip_validates() {
        let mut book = make_book(&["alice", "bob"]);
        book.settle_at_cursor();
        let json = serde_json::to_value(&book).unwrap();
        assert_eq!(json["next_id"], 2);
        assert_eq!(json["cursor"], 1);
        let back: ReceiptBook = serde_json::from_value(json).unwrap();
        assert_eq!(back, book);
    }

    #[test]
    fn test_deserialize_rejects_settled_above_cursor() {
        let mut book = make_book(&["alice", "bob"]);
        book.settle_at_cursor();
        let mut json = serde_json::to_value(&book).unwrap();
        json["cursor"] = serde_json::json!(0);
        assert!(serde_json::from_value::<ReceiptBook>(json).is_err());
    }

    #[test]
    fn test_deserialize_rejects_gap() {
        let book = make_book(&["alice", "bob"]);
        let mut json = serde_json::to_value(&book).unwrap();
        json["receipts"][1]["id"] = serde_json::json!(5);
        assert!(serde_json::from_value::<ReceiptBook>(json).is_err());
    }
}
