//! # Settlement Ledger
//!
//! Composes the configuration store, the receipt sequencer, and the expiry
//! sweeper into one component with three kinds of operation:
//!
//! - **Configuration** (`set_asset_weight`, `remove_asset`,
//!   `set_cooldown_secs`, `set_default_batch_limit`): gated by the injected
//!   [`AdminCapability`].
//! - **Deposit**: takes the asset, credits weight to reward distribution,
//!   appends a receipt, then runs one bounded sweep with the default batch
//!   limit.
//! - **Sweep**: callable by anyone; settles due receipts from the cursor.
//!
//! ## Atomicity
//!
//! Each operation either commits completely or leaves no trace. Ledger
//! state changes and collaborator calls are staged in a
//! [`Journal`](crate::journal); any error rolls the book back and
//! compensates completed collaborator calls in reverse order. Notifications
//! are published only on commit.
//!
//! Operations take `&mut self`, so one ledger value is mutated by one
//! operation at a time. Use [`SharedLedger`](crate::SharedLedger) to share
//! a ledger across threads.

use std::sync::Arc;

use burnstake_core::{
    compute_weight, AccountId, ArithmeticError, AssetId, Clock, ReceiptId, Timestamp, WeightRate,
};

use crate::collaborator::{AdminCapability, AssetCustody, RewardDistribution};
use crate::config::{LedgerConfig, TriggeredSweepPolicy};
use crate::error::LedgerError;
use crate::event::{EventSink, LedgerEvent, TracingSink};
use crate::journal::{Effect, Journal};
use crate::receipt::{Receipt, ReceiptBook};
use crate::snapshot::LedgerSnapshot;
use crate::sweep::{self, SweepReport};

/// The settlement ledger.
pub struct Ledger<C, R, A> {
    config: LedgerConfig,
    book: ReceiptBook,
    custody: C,
    rewards: R,
    admin: A,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn EventSink>,
}

impl<C, R, A> std::fmt::Debug for Ledger<C, R, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger")
            .field("config", &self.config)
            .field("next_id", &self.book.next_id())
            .field("cursor", &self.book.cursor())
            .finish_non_exhaustive()
    }
}

impl<C, R, A> Ledger<C, R, A>
where
    C: AssetCustody,
    R: RewardDistribution,
    A: AdminCapability,
{
    /// Create an empty ledger from a genesis configuration.
    ///
    /// Genesis configuration is not capability-checked; later changes are.
    pub fn new(
        config: LedgerConfig,
        custody: C,
        rewards: R,
        admin: A,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, LedgerError> {
        Self::from_snapshot(
            LedgerSnapshot {
                config,
                book: ReceiptBook::new(),
            },
            custody,
            rewards,
            admin,
            clock,
        )
    }

    /// Resume a ledger from a snapshot.
    ///
    /// The collaborators must be the ones the snapshot's receipts were
    /// credited to.
    pub fn from_snapshot(
        snapshot: LedgerSnapshot,
        custody: C,
        rewards: R,
        admin: A,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, LedgerError> {
        Ok(Self {
            config: snapshot.config.normalize()?,
            book: snapshot.book,
            custody,
            rewards,
            admin,
            clock,
            sink: Arc::new(TracingSink),
        })
    }

    /// Replace the notification sink (defaults to [`TracingSink`]).
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Capture the persisted state.
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            config: self.config.clone(),
            book: self.book.clone(),
        }
    }

    /// Split the ledger into its snapshot and collaborators.
    pub fn into_parts(self) -> (LedgerSnapshot, C, R, A) {
        let snapshot = LedgerSnapshot {
            config: self.config,
            book: self.book,
        };
        (snapshot, self.custody, self.rewards, self.admin)
    }

    // ── Configuration store ──────────────────────────────────────────

    /// Set or overwrite the weight of `asset`. Zero marks it unsupported.
    pub fn set_asset_weight(
        &mut self,
        caller: &AccountId,
        asset: AssetId,
        weight: WeightRate,
    ) -> Result<(), LedgerError> {
        self.require_admin(caller, "set asset weight")?;
        tracing::info!(%caller, %asset, %weight, "asset weight changed");
        let event = self.config.set_asset_weight(asset, weight);
        self.sink.publish(&event);
        Ok(())
    }

    /// Stop accepting `asset`. Equivalent to a weight of zero.
    pub fn remove_asset(&mut self, caller: &AccountId, asset: AssetId) -> Result<(), LedgerError> {
        self.set_asset_weight(caller, asset, WeightRate::UNSUPPORTED)
    }

    /// Replace the cooldown for receipts created from now on.
    pub fn set_cooldown_secs(
        &mut self,
        caller: &AccountId,
        cooldown_secs: u64,
    ) -> Result<(), LedgerError> {
        self.require_admin(caller, "set cooldown duration")?;
        let event = self.config.set_cooldown_secs(cooldown_secs)?;
        tracing::info!(%caller, cooldown_secs, "cooldown changed");
        self.sink.publish(&event);
        Ok(())
    }

    /// Replace the batch size of deposit-triggered sweeps.
    pub fn set_default_batch_limit(
        &mut self,
        caller: &AccountId,
        count: u32,
    ) -> Result<(), LedgerError> {
        self.require_admin(caller, "set default batch limit")?;
        let event = self.config.set_default_batch_limit(count)?;
        tracing::info!(%caller, count, "default batch limit changed");
        self.sink.publish(&event);
        Ok(())
    }

    fn require_admin(&self, caller: &AccountId, operation: &'static str) -> Result<(), LedgerError> {
        if self.admin.has_admin_capability(caller) {
            Ok(())
        } else {
            tracing::warn!(%caller, operation, "configuration change rejected");
            Err(LedgerError::Unauthorized {
                caller: caller.clone(),
                operation,
            })
        }
    }

    // ── Receipt sequencer ────────────────────────────────────────────

    /// The weight a deposit of `amount` of `asset` would receive now.
    pub fn preview_weight(&self, asset: &AssetId, amount: u128) -> Result<u128, LedgerError> {
        if amount == 0 {
            return Err(LedgerError::invalid("deposit amount must be non-zero"));
        }
        let rate = self.config.weight_of(asset);
        if !rate.is_supported() {
            return Err(LedgerError::UnsupportedAsset {
                asset: asset.clone(),
            });
        }
        let weight = compute_weight(amount, rate, self.config.rate_scale)?;
        if weight == 0 {
            return Err(LedgerError::invalid(format!(
                "deposit of {amount} {asset} carries no weight"
            )));
        }
        Ok(weight)
    }

    /// Deposit `amount` of `asset` for `depositor` and return the receipt id.
    ///
    /// Runs one sweep with the default batch limit as its final step. Under
    /// [`TriggeredSweepPolicy::Atomic`] a failure in that sweep aborts the
    /// deposit too.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidArgument`]: zero amount, or zero weight.
    /// - [`LedgerError::UnsupportedAsset`]: the asset has no weight.
    /// - [`LedgerError::ArithmeticOverflow`]: weight or unlock time overflow.
    /// - [`LedgerError::CollaboratorFailure`]: custody or rewards rejected a call.
    ///   If undoing an earlier call also failed, those failures are listed
    ///   in [`LedgerError::compensation_failures`].
    pub fn deposit(
        &mut self,
        depositor: &AccountId,
        asset: &AssetId,
        amount: u128,
    ) -> Result<ReceiptId, LedgerError> {
        let weight = self.preview_weight(asset, amount)?;
        let now = self.clock.now();
        let unlock_at = now.checked_add_secs(self.config.cooldown_secs)?;
        // Fail before any collaborator call if the book is out of ids.
        self.book
            .next_id()
            .checked_next()
            .ok_or_else(|| ArithmeticError::overflow("receipt id"))?;

        let mut journal = Journal::begin(&self.book);
        match self.deposit_in(&mut journal, depositor, asset, amount, weight, now, unlock_at) {
            Ok(receipt_id) => {
                tracing::info!(
                    %receipt_id,
                    %depositor,
                    %asset,
                    amount,
                    weight,
                    %unlock_at,
                    "deposit recorded"
                );
                journal.commit(self.sink.as_ref());
                Ok(receipt_id)
            }
            Err(e) => {
                tracing::warn!(%depositor, %asset, amount, error = %e, "deposit rolled back");
                let failures = journal.rollback(&mut self.book, &mut self.custody, &mut self.rewards);
                Err(e.with_compensation_failures(failures))
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn deposit_in(
        &mut self,
        journal: &mut Journal,
        depositor: &AccountId,
        asset: &AssetId,
        amount: u128,
        weight: u128,
        now: Timestamp,
        unlock_at: Timestamp,
    ) -> Result<ReceiptId, LedgerError> {
        self.custody.transfer_in(depositor, asset, amount)?;
        journal.record(Effect::TransferredIn {
            from: depositor.clone(),
            asset: asset.clone(),
            amount,
        });

        self.rewards.delegate_stake(depositor, weight)?;
        journal.record(Effect::Staked {
            owner: depositor.clone(),
            weight,
        });

        let receipt_id = self.book.append(
            depositor.clone(),
            asset.clone(),
            amount,
            weight,
            now,
            unlock_at,
        )?;

        let limit = self.config.default_batch_limit;
        match self.config.triggered_sweep {
            TriggeredSweepPolicy::Atomic => {
                self.sweep_in(journal, now, limit)?;
            }
            TriggeredSweepPolicy::BestEffort => {
                let savepoint = journal.savepoint(&self.book);
                if let Err(e) = self.sweep_in(journal, now, limit) {
                    let failures = journal.rollback_to(
                        savepoint,
                        &mut self.book,
                        &mut self.custody,
                        &mut self.rewards,
                    );
                    if !failures.is_empty() {
                        // The sweep could not be undone cleanly; abort the deposit too.
                        return Err(e.with_compensation_failures(failures));
                    }
                    tracing::warn!(%receipt_id, error = %e, "triggered sweep rolled back; deposit kept");
                }
            }
        }

        journal.emit(LedgerEvent::DepositRecorded {
            depositor: depositor.clone(),
            asset: asset.clone(),
            amount,
            receipt_id,
        });
        Ok(receipt_id)
    }

    // ── Expiry sweeper ───────────────────────────────────────────────

    /// Settle due receipts from the cursor, examining at most `max_count`.
    ///
    /// Anyone may call this. `max_count = 0` does nothing.
    pub fn sweep(&mut self, max_count: u32) -> Result<SweepReport, LedgerError> {
        let now = self.clock.now();
        let mut journal = Journal::begin(&self.book);
        match self.sweep_in(&mut journal, now, max_count) {
            Ok(report) => {
                journal.commit(self.sink.as_ref());
                Ok(report)
            }
            Err(e) => {
                tracing::warn!(cursor = %self.book.cursor(), error = %e, "sweep rolled back");
                let failures = journal.rollback(&mut self.book, &mut self.custody, &mut self.rewards);
                Err(e.with_compensation_failures(failures))
            }
        }
    }

    /// Sweep with the configured default batch limit.
    pub fn sweep_default(&mut self) -> Result<SweepReport, LedgerError> {
        self.sweep(self.config.default_batch_limit)
    }

    fn sweep_in(
        &mut self,
        journal: &mut Journal,
        now: Timestamp,
        max_count: u32,
    ) -> Result<SweepReport, LedgerError> {
        let Self { book, rewards, .. } = self;
        let report = sweep::sweep(book, now, max_count, |receipt| {
            rewards.delegate_withdraw(&receipt.owner, receipt.weight)?;
            journal.record(Effect::Withdrew {
                receipt_id: receipt.id,
                owner: receipt.owner.clone(),
                weight: receipt.weight,
            });
            journal.emit(LedgerEvent::ReceiptSettled {
                receipt_id: receipt.id,
                owner: receipt.owner.clone(),
                weight: receipt.weight,
            });
            Ok(())
        })?;

        if report.settled.is_empty() {
            tracing::debug!(cursor = %report.cursor, stop = %report.stop, "sweep settled nothing");
        } else {
            tracing::info!(
                settled = report.settled_count(),
                cursor = %report.cursor,
                stop = %report.stop,
                "sweep settled receipts"
            );
        }
        Ok(report)
    }

    // ── Read path ────────────────────────────────────────────────────

    /// Current configuration.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Configured rate for `asset` (zero if unsupported).
    pub fn weight_of(&self, asset: &AssetId) -> WeightRate {
        self.config.weight_of(asset)
    }

    /// Cooldown applied to new receipts.
    pub fn cooldown_secs(&self) -> u64 {
        self.config.cooldown_secs
    }

    /// Batch size of deposit-triggered sweeps.
    pub fn default_batch_limit(&self) -> u32 {
        self.config.default_batch_limit
    }

    /// Look up a receipt.
    pub fn receipt(&self, id: ReceiptId) -> Option<&Receipt> {
        self.book.get(id)
    }

    /// All receipts in id order.
    pub fn receipts(&self) -> &[Receipt] {
        self.book.receipts()
    }

    /// The receipt book.
    pub fn book(&self) -> &ReceiptBook {
        &self.book
    }

    /// The id the next deposit will receive.
    pub fn next_id(&self) -> ReceiptId {
        self.book.next_id()
    }

    /// The next receipt the sweeper will examine.
    pub fn cursor(&self) -> ReceiptId {
        self.book.cursor()
    }

    /// Whether every receipt has been settled.
    pub fn is_drained(&self) -> bool {
        self.book.is_drained()
    }

    /// Pending receipts owned by `owner`.
    pub fn pending_receipts_of<'a>(
        &'a self,
        owner: &'a AccountId,
    ) -> impl Iterator<Item = &'a Receipt> {
        self.book.pending_of(owner)
    }

    /// Entitlement this ledger has credited to `owner` and not yet reversed.
    pub fn pending_weight_of(&self, owner: &AccountId) -> u128 {
        self.book.pending_weight_of(owner)
    }

    /// The asset custody collaborator.
    pub fn custody(&self) -> &C {
        &self.custody
    }

    /// Mutable access to asset custody, e.g. to fund accounts.
    pub fn custody_mut(&mut self) -> &mut C {
        &mut self.custody
    }

    /// The reward distribution collaborator.
    pub fn rewards(&self) -> &R {
        &self.rewards
    }

    /// Mutable access to reward distribution.
    pub fn rewards_mut(&mut self) -> &mut R {
        &mut self.rewards
    }

    /// The capability check.
    pub fn admin(&self) -> &A {
        &self.admin
    }
}
