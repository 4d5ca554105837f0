//! # Collaborator Contracts
//!
//! The ledger decides *when* and *how much* entitlement to credit or debit.
//! Moving the asset and keeping the entitlement books are delegated to
//! external collaborators behind these traits:
//!
//! - [`AssetCustody`]: irreversibly takes the deposited asset from the
//!   depositor.
//! - [`RewardDistribution`]: credits and debits delegated stake.
//! - [`AdminCapability`]: the predicate consulted before every
//!   configuration change.
//!
//! ## Compensation
//!
//! A ledger operation is atomic end to end. When a later step fails, the
//! ledger undoes every collaborator call the operation already made, in
//! reverse order:
//!
//! | Completed call | Compensation |
//! |----------------|--------------|
//! | `transfer_in(from, asset, amount)` | `restore(from, asset, amount)` |
//! | `delegate_stake(who, weight)` | `delegate_withdraw(who, weight)` |
//! | `delegate_withdraw(who, weight)` | `delegate_stake(who, weight)` |
//!
//! Implementations that sit in front of a transactional backend may make
//! `restore` a rollback of the pending transfer rather than a new credit.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use burnstake_core::{AccountId, AssetId};

/// Which collaborator failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Collaborator {
    /// The asset custody (transfer/burn) service.
    AssetCustody,
    /// The reward distribution (delegated stake) service.
    RewardDistribution,
}

impl std::fmt::Display for Collaborator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::AssetCustody => "asset custody",
            Self::RewardDistribution => "reward distribution",
        };
        f.write_str(s)
    }
}

/// A collaborator rejected a call.
///
/// When the ledger then fails to undo an earlier call of the same
/// operation, the rejected compensations are listed in `compensation`.
/// A non-empty list means the collaborator's books no longer match the
/// ledger and need manual reconciliation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{collaborator} failed: {reason}{}", compensation_note(.compensation))]
pub struct CollaboratorError {
    /// The collaborator that failed.
    pub collaborator: Collaborator,
    /// Human-readable reason.
    pub reason: String,
    /// Compensating calls that failed while rolling back.
    pub compensation: Vec<CollaboratorError>,
}

impl CollaboratorError {
    /// An asset custody failure.
    pub fn custody(reason: impl Into<String>) -> Self {
        Self {
            collaborator: Collaborator::AssetCustody,
            reason: reason.into(),
            compensation: Vec::new(),
        }
    }

    /// A reward distribution failure.
    pub fn rewards(reason: impl Into<String>) -> Self {
        Self {
            collaborator: Collaborator::RewardDistribution,
            reason: reason.into(),
            compensation: Vec::new(),
        }
    }

    /// True when a rollback left a collaborator out of step with the ledger.
    pub fn diverged(&self) -> bool {
        !self.compensation.is_empty()
    }
}

fn compensation_note(failures: &[CollaboratorError]) -> String {
    if failures.is_empty() {
        return String::new();
    }
    let listed: Vec<String> = failures.iter().map(ToString::to_string).collect();
    format!(
        "; {} compensation(s) also failed, state diverged: {}",
        failures.len(),
        listed.join("; ")
    )
}

/// Custody of the deposited asset.
pub trait AssetCustody: Send {
    /// Irrecoverably remove `amount` of `asset` from `from`.
    ///
    /// Must either complete or fail without effect.
    fn transfer_in(
        &mut self,
        from: &AccountId,
        asset: &AssetId,
        amount: u128,
    ) -> Result<(), CollaboratorError>;

    /// Undo a `transfer_in` made earlier in the same ledger operation.
    fn restore(
        &mut self,
        to: &AccountId,
        asset: &AssetId,
        amount: u128,
    ) -> Result<(), CollaboratorError>;
}

/// The external entitlement ledger that holds delegated stake.
pub trait RewardDistribution: Send {
    /// Credit `amount` of entitlement to `on_behalf_of`.
    fn delegate_stake(
        &mut self,
        on_behalf_of: &AccountId,
        amount: u128,
    ) -> Result<(), CollaboratorError>;

    /// Debit `amount` of entitlement from `on_behalf_of`.
    fn delegate_withdraw(
        &mut self,
        on_behalf_of: &AccountId,
        amount: u128,
    ) -> Result<(), CollaboratorError>;
}

/// The administrative capability check.
pub trait AdminCapability: Send {
    /// Whether `caller` may change ledger configuration.
    fn has_admin_capability(&self, caller: &AccountId) -> bool;
}

impl<F> AdminCapability for F
where
    F: Fn(&AccountId) -> bool + Send,
{
    fn has_admin_capability(&self, caller: &AccountId) -> bool {
        self(caller)
    }
}
