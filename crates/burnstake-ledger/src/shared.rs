//! # Shared Ledger Handle
//!
//! A cloneable handle that serializes every operation through one mutex.
//! Each call holds the lock for the whole operation, including its
//! collaborator calls and any rollback, so concurrent callers observe the
//! ledger only between complete operations.

use std::sync::Arc;

use parking_lot::Mutex;

use burnstake_core::{AccountId, AssetId, ReceiptId, WeightRate};

use crate::collaborator::{AdminCapability, AssetCustody, RewardDistribution};
use crate::error::LedgerError;
use crate::ledger::Ledger;
use crate::snapshot::LedgerSnapshot;
use crate::sweep::SweepReport;

/// Thread-safe, cloneable handle to a [`Ledger`].
pub struct SharedLedger<C, R, A> {
    inner: Arc<Mutex<Ledger<C, R, A>>>,
}

impl<C, R, A> Clone for SharedLedger<C, R, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C, R, A> SharedLedger<C, R, A>
where
    C: AssetCustody,
    R: RewardDistribution,
    A: AdminCapability,
{
    /// Wrap `ledger` for sharing.
    pub fn new(ledger: Ledger<C, R, A>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ledger)),
        }
    }

    /// [`Ledger::deposit`] under the lock.
    pub fn deposit(
        &self,
        depositor: &AccountId,
        asset: &AssetId,
        amount: u128,
    ) -> Result<ReceiptId, LedgerError> {
        self.inner.lock().deposit(depositor, asset, amount)
    }

    /// [`Ledger::sweep`] under the lock. Concurrent sweeps never settle a
    /// receipt twice.
    pub fn sweep(&self, max_count: u32) -> Result<SweepReport, LedgerError> {
        self.inner.lock().sweep(max_count)
    }

    /// [`Ledger::set_asset_weight`] under the lock.
    pub fn set_asset_weight(
        &self,
        caller: &AccountId,
        asset: AssetId,
        weight: WeightRate,
    ) -> Result<(), LedgerError> {
        self.inner.lock().set_asset_weight(caller, asset, weight)
    }

    /// [`Ledger::set_cooldown_secs`] under the lock.
    pub fn set_cooldown_secs(&self, caller: &AccountId, secs: u64) -> Result<(), LedgerError> {
        self.inner.lock().set_cooldown_secs(caller, secs)
    }

    /// [`Ledger::set_default_batch_limit`] under the lock.
    pub fn set_default_batch_limit(&self, caller: &AccountId, count: u32) -> Result<(), LedgerError> {
        self.inner.lock().set_default_batch_limit(caller, count)
    }

    /// A consistent copy of the ledger state.
    pub fn snapshot(&self) -> LedgerSnapshot {
        self.inner.lock().snapshot()
    }

    /// Run `f` with exclusive access to the ledger.
    pub fn with<T>(&self, f: impl FnOnce(&mut Ledger<C, R, A>) -> T) -> T {
        f(&mut self.inner.lock())
    }

    /// Run `f` against a consistent view of the ledger.
    pub fn read<T>(&self, f: impl FnOnce(&Ledger<C, R, A>) -> T) -> T {
        f(&self.inner.lock())
    }
}
