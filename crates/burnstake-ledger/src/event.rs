//! # Ledger Notifications
//!
//! Notifications for external indexers. They are not needed for
//! correctness, but they are only ever published for work that committed:
//! events raised inside an operation are buffered and discarded if the
//! operation rolls back.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use burnstake_core::{AccountId, AssetId, ReceiptId, WeightRate};

/// A committed ledger change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerEvent {
    /// An asset weight was set. A weight of zero means the asset was removed.
    AssetWeightChanged {
        /// The asset.
        asset: AssetId,
        /// The new weight.
        weight: WeightRate,
    },
    /// The cooldown for future receipts changed.
    CooldownChanged {
        /// The new cooldown.
        cooldown_secs: u64,
    },
    /// The default sweep batch size changed.
    CleanupCountChanged {
        /// The new batch size.
        count: u32,
    },
    /// A deposit was recorded.
    DepositRecorded {
        /// Who deposited.
        depositor: AccountId,
        /// What was deposited.
        asset: AssetId,
        /// How much was deposited.
        amount: u128,
        /// The receipt issued for it.
        receipt_id: ReceiptId,
    },
    /// A receipt's entitlement was reversed.
    ReceiptSettled {
        /// The settled receipt.
        receipt_id: ReceiptId,
        /// Whose entitlement was debited.
        owner: AccountId,
        /// How much entitlement was debited.
        weight: u128,
    },
}

impl LedgerEvent {
    /// Short name for log lines.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AssetWeightChanged { .. } => "asset_weight_changed",
            Self::CooldownChanged { .. } => "cooldown_changed",
            Self::CleanupCountChanged { .. } => "cleanup_count_changed",
            Self::DepositRecorded { .. } => "deposit_recorded",
            Self::ReceiptSettled { .. } => "receipt_settled",
        }
    }
}

/// Destination for committed notifications.
pub trait EventSink: Send + Sync {
    /// Deliver one committed event.
    fn publish(&self, event: &LedgerEvent);
}

/// Logs every event at `info` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn publish(&self, event: &LedgerEvent) {
        tracing::info!(event = event.name(), detail = ?event, "ledger event");
    }
}

/// Buffers events in memory for indexers and tests.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Mutex<Vec<LedgerEvent>>,
}

impl EventLog {
    /// An empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of every event published so far.
    pub fn events(&self) -> Vec<LedgerEvent> {
        self.events.lock().clone()
    }

    /// Remove and return every buffered event.
    pub fn drain(&self) -> Vec<LedgerEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    /// Number of buffered events.
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Whether nothing has been published.
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl EventSink for EventLog {
    fn publish(&self, event: &LedgerEvent) {
        self.events.lock().push(event.clone());
    }
}
