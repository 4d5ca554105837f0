//! # Expiry Sweeper
//!
//! Walks the receipt sequence from the cursor, settling every receipt whose
//! unlock time has passed, in strict id order.
//!
//! ## Termination
//!
//! A sweep stops at the first of:
//!
//! 1. **Drained**: the cursor reached `next_id`.
//! 2. **Budget exhausted**: `max_count` receipts were examined.
//! 3. **Blocked**: the receipt at the cursor is not yet due. The sweep stops
//!    there even if later receipts are already due. Settlement is FIFO, so a
//!    locked receipt holds back everything behind it.
//!
//! `max_count = 0` examines nothing and changes nothing.
//!
//! ## Failure
//!
//! The settle callback (the reward reversal) runs *before* the receipt is
//! marked settled. If it fails, the receipt stays pending, the cursor stays
//! on it, and the error propagates so the caller can roll back whatever the
//! sweep already settled.

use serde::{Deserialize, Serialize};

use burnstake_core::{ReceiptId, Timestamp};

use crate::error::LedgerError;
use crate::receipt::{Receipt, ReceiptBook};

/// Why a sweep stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepStop {
    /// Every receipt is settled.
    Drained,
    /// The batch limit was reached with receipts still pending.
    BudgetExhausted,
    /// The receipt at the cursor is still locked.
    Blocked {
        /// The locked receipt.
        receipt_id: ReceiptId,
        /// When it unlocks.
        unlock_at: Timestamp,
    },
}

impl std::fmt::Display for SweepStop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Drained => f.write_str("drained"),
            Self::BudgetExhausted => f.write_str("budget exhausted"),
            Self::Blocked {
                receipt_id,
                unlock_at,
            } => write!(f, "blocked by {receipt_id} until {unlock_at}"),
        }
    }
}

/// What one sweep did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    /// Receipts examined (settled or skipped).
    pub examined: u32,
    /// Receipts settled, in order.
    pub settled: Vec<ReceiptId>,
    /// The cursor after the sweep.
    pub cursor: ReceiptId,
    /// Why the sweep stopped.
    pub stop: SweepStop,
}

impl SweepReport {
    /// Number of receipts settled.
    pub fn settled_count(&self) -> usize {
        self.settled.len()
    }
}

/// Sweep `book` at `now`, examining at most `max_count` receipts.
///
/// `settle` is called with each due receipt before it is marked settled.
pub(crate) fn sweep<F>(
    book: &mut ReceiptBook,
    now: Timestamp,
    max_count: u32,
    mut settle: F,
) -> Result<SweepReport, LedgerError>
where
    F: FnMut(&Receipt) -> Result<(), LedgerError>,
{
    let mut examined = 0u32;
    let mut settled = Vec::new();

    let stop = loop {
        let Some(receipt) = book.get(book.cursor()) else {
            break SweepStop::Drained;
        };
        if examined >= max_count {
            break SweepStop::BudgetExhausted;
        }
        if receipt.is_settled() {
            book.skip_at_cursor();
            examined += 1;
            continue;
        }
        if !receipt.is_due_at(now) {
            break SweepStop::Blocked {
                receipt_id: receipt.id,
                unlock_at: receipt.unlock_at,
            };
        }

        settle(receipt)?;
        if let Some(receipt) = book.settle_at_cursor() {
            settled.push(receipt.id);
        }
        examined += 1;
    };

    Ok(SweepReport {
        examined,
        settled,
        cursor: book.cursor(),
        stop,
    })
}
