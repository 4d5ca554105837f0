//! # In-Memory Collaborators
//!
//! Reference implementations of the collaborator traits, used by the CLI
//! and by tests. Balances and entitlements are plain maps and serialize
//! with serde, so the CLI can persist them next to the ledger snapshot.
//!
//! Each collaborator supports fault injection (`fail_*`). Injected faults
//! are runtime-only and are not persisted.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use burnstake_core::{AccountId, ArithmeticError, AssetId};

use crate::collaborator::{AdminCapability, AssetCustody, CollaboratorError, RewardDistribution};

// ─── Asset Custody ───────────────────────────────────────────────────

/// Per-account asset balances with a burn counter per asset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InMemoryCustody {
    balances: BTreeMap<AccountId, BTreeMap<AssetId, u128>>,
    burned: BTreeMap<AssetId, u128>,
    #[serde(skip)]
    fail_transfers: bool,
}

impl InMemoryCustody {
    /// Empty custody.
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit external funds to `account`. Returns the new balance.
    pub fn fund(
        &mut self,
        account: &AccountId,
        asset: &AssetId,
        amount: u128,
    ) -> Result<u128, ArithmeticError> {
        let balance = self
            .balances
            .entry(account.clone())
            .or_default()
            .entry(asset.clone())
            .or_default();
        *balance = balance
            .checked_add(amount)
            .ok_or_else(|| ArithmeticError::overflow("custody balance"))?;
        Ok(*balance)
    }

    /// Balance of `asset` held by `account`.
    pub fn balance_of(&self, account: &AccountId, asset: &AssetId) -> u128 {
        self.balances
            .get(account)
            .and_then(|assets| assets.get(asset))
            .copied()
            .unwrap_or(0)
    }

    /// Total of `asset` taken in by deposits.
    pub fn burned(&self, asset: &AssetId) -> u128 {
        self.burned.get(asset).copied().unwrap_or(0)
    }

    /// Make every following `transfer_in` fail.
    pub fn fail_transfers(&mut self, fail: bool) {
        self.fail_transfers = fail;
    }
}

impl AssetCustody for InMemoryCustody {
    fn transfer_in(
        &mut self,
        from: &AccountId,
        asset: &AssetId,
        amount: u128,
    ) -> Result<(), CollaboratorError> {
        if self.fail_transfers {
            return Err(CollaboratorError::custody("transfers disabled"));
        }
        let held = self.balance_of(from, asset);
        if held < amount {
            return Err(CollaboratorError::custody(format!(
                "{from} holds {held} {asset}, needs {amount}"
            )));
        }
        let burned = self
            .burned(asset)
            .checked_add(amount)
            .ok_or_else(|| CollaboratorError::custody("burn counter overflow"))?;
        self.balances
            .entry(from.clone())
            .or_default()
            .insert(asset.clone(), held - amount);
        self.burned.insert(asset.clone(), burned);
        Ok(())
    }

    fn restore(
        &mut self,
        to: &AccountId,
        asset: &AssetId,
        amount: u128,
    ) -> Result<(), CollaboratorError> {
        let burned = self.burned(asset);
        if burned < amount {
            return Err(CollaboratorError::custody(format!(
                "cannot restore {amount} {asset}; only {burned} taken in"
            )));
        }
        self.fund(to, asset, amount)
            .map_err(|e| CollaboratorError::custody(e.to_string()))?;
        self.burned.insert(asset.clone(), burned - amount);
        Ok(())
    }
}

// ─── Reward Distribution ─────────────────────────────────────────────

/// Per-account delegated entitlement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InMemoryRewards {
    entitlements: BTreeMap<AccountId, u128>,
    #[serde(skip)]
    fail_stakes: bool,
    #[serde(skip)]
    fail_withdrawals: bool,
    #[serde(skip)]
    fail_withdrawals_for: BTreeSet<AccountId>,
}

impl InMemoryRewards {
    /// No entitlements.
    pub fn new() -> Self {
        Self::default()
    }

    /// Entitlement currently held by `account`.
    pub fn entitlement_of(&self, account: &AccountId) -> u128 {
        self.entitlements.get(account).copied().unwrap_or(0)
    }

    /// Sum of all entitlements.
    pub fn total(&self) -> u128 {
        self.entitlements
            .values()
            .fold(0u128, |sum, v| sum.saturating_add(*v))
    }

    /// Accounts with non-zero entitlement.
    pub fn holders(&self) -> impl Iterator<Item = (&AccountId, &u128)> {
        self.entitlements.iter()
    }

    /// Make every following `delegate_stake` fail.
    pub fn fail_stakes(&mut self, fail: bool) {
        self.fail_stakes = fail;
    }

    /// Make every following `delegate_withdraw` fail.
    pub fn fail_withdrawals(&mut self, fail: bool) {
        self.fail_withdrawals = fail;
    }

    /// Make `delegate_withdraw` fail for one account only.
    pub fn fail_withdrawals_for(&mut self, account: AccountId) {
        self.fail_withdrawals_for.insert(account);
    }

    /// Clear every injected fault.
    pub fn clear_faults(&mut self) {
        self.fail_stakes = false;
        self.fail_withdrawals = false;
        self.fail_withdrawals_for.clear();
    }
}

impl RewardDistribution for InMemoryRewards {
    fn delegate_stake(
        &mut self,
        on_behalf_of: &AccountId,
        amount: u128,
    ) -> Result<(), CollaboratorError> {
        if self.fail_stakes {
            return Err(CollaboratorError::rewards("stake delegation disabled"));
        }
        let held = self.entitlement_of(on_behalf_of);
        let next = held
            .checked_add(amount)
            .ok_or_else(|| CollaboratorError::rewards("entitlement overflow"))?;
        self.entitlements.insert(on_behalf_of.clone(), next);
        Ok(())
    }

    fn delegate_withdraw(
        &mut self,
        on_behalf_of: &AccountId,
        amount: u128,
    ) -> Result<(), CollaboratorError> {
        if self.fail_withdrawals || self.fail_withdrawals_for.contains(on_behalf_of) {
            return Err(CollaboratorError::rewards(format!(
                "withdrawal disabled for {on_behalf_of}"
            )));
        }
        let held = self.entitlement_of(on_behalf_of);
        if held < amount {
            return Err(CollaboratorError::rewards(format!(
                "{on_behalf_of} holds {held}, cannot withdraw {amount}"
            )));
        }
        if held == amount {
            self.entitlements.remove(on_behalf_of);
        } else {
            self.entitlements.insert(on_behalf_of.clone(), held - amount);
        }
        Ok(())
    }
}

// ─── Admin Capability ────────────────────────────────────────────────

/// A fixed set of administrators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaticAdmins {
    admins: BTreeSet<AccountId>,
}

impl StaticAdmins {
    /// Grant the capability to every account in `admins`.
    pub fn new(admins: impl IntoIterator<Item = AccountId>) -> Self {
        Self {
            admins: admins.into_iter().collect(),
        }
    }

    /// Grant the capability to `account`.
    pub fn grant(&mut self, account: AccountId) {
        self.admins.insert(account);
    }

    /// Withdraw the capability from `account`.
    pub fn revoke(&mut self, account: &AccountId) {
        self.admins.remove(account);
    }
}

impl AdminCapability for StaticAdmins {
    fn has_admin_capability(&self, caller: &AccountId) -> bool {
        self.admins.contains(caller)
    }
}
