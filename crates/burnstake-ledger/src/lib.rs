//! # burnstake-ledger — Receipt-Backed Staking Ledger
//!
//! Accepts deposits of supported assets, hands the asset to an external
//! custody service, credits a weighted entitlement to an external reward
//! distribution service, and reverses that entitlement once each deposit's
//! cooldown has passed.
//!
//! ## Components
//!
//! - **Configuration store** (`config.rs`): asset weight table, cooldown,
//!   default sweep batch size. Changes require the administrative
//!   capability.
//!
//! - **Receipt sequencer** (`receipt.rs`): append-only receipts with dense
//!   ids and a sweep cursor. Settlement is always a prefix of the sequence.
//!
//! - **Expiry sweeper** (`sweep.rs`): FIFO, bounded-batch settlement from
//!   the cursor. A locked receipt blocks everything behind it.
//!
//! - **Ledger** (`ledger.rs`): composes the above around the collaborator
//!   traits (`collaborator.rs`). Every operation is atomic: a failure
//!   compensates completed collaborator calls and discards staged events.
//!
//! - **Snapshots** (`snapshot.rs`) and a mutex-guarded handle for
//!   multi-threaded hosts (`shared.rs`).
//!
//! ## Entitlement Conservation
//!
//! For every account, the entitlement this ledger has credited and not yet
//! reversed equals the sum of weights of that account's pending receipts.
//! [`Ledger::pending_weight_of`] reports the left-hand side from the
//! ledger's own records.

#![warn(missing_docs)]

pub mod collaborator;
pub mod config;
pub mod error;
pub mod event;
mod journal;
pub mod ledger;
pub mod memory;
pub mod receipt;
pub mod shared;
pub mod snapshot;
pub mod sweep;

// ─── Ledger re-exports ──────────────────────────────────────────────

pub use ledger::Ledger;
pub use shared::SharedLedger;
pub use snapshot::{LedgerSnapshot, StoreError};

// ─── Configuration re-exports ───────────────────────────────────────

pub use config::{LedgerConfig, TriggeredSweepPolicy};

// ─── Receipt and sweep re-exports ───────────────────────────────────

pub use receipt::{InvariantViolation, Receipt, ReceiptBook, ReceiptStatus};
pub use sweep::{SweepReport, SweepStop};

// ─── Collaborator re-exports ────────────────────────────────────────

pub use collaborator::{
    AdminCapability, AssetCustody, Collaborator, CollaboratorError, RewardDistribution,
};
pub use memory::{InMemoryCustody, InMemoryRewards, StaticAdmins};

// ─── Error and event re-exports ─────────────────────────────────────

pub use error::LedgerError;
pub use event::{EventLog, EventSink, LedgerEvent, TracingSink};
