//! # Configuration Store
//!
//! Holds the supported-asset weight table, the cooldown applied to new
//! receipts, and the default sweep batch size.
//!
//! The setters here only validate and mutate. The administrative capability
//! check happens in [`Ledger`](crate::Ledger) before any setter runs, so a
//! rejected caller never reaches this module.
//!
//! ## Invariants
//!
//! - `cooldown_secs > 0` and `default_batch_limit > 0` at all times.
//! - A zero weight is never stored: setting a weight of zero removes the
//!   entry, and an absent entry reads as [`WeightRate::UNSUPPORTED`].
//! - Cooldown changes apply to receipts created afterwards only. Existing
//!   receipts carry their own `unlock_at`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use burnstake_core::{AssetId, RateScale, WeightRate};

use crate::error::LedgerError;
use crate::event::LedgerEvent;

/// What a deposit does when the sweep it triggers fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggeredSweepPolicy {
    /// The triggered sweep is part of the deposit. Its failure aborts the
    /// deposit.
    #[default]
    Atomic,
    /// The triggered sweep is rolled back on its own and logged; the
    /// deposit still commits.
    BestEffort,
}

/// Ledger configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LedgerConfig {
    /// Raw fixed-point weight per deposited unit, keyed by asset.
    #[serde(default)]
    pub asset_weights: BTreeMap<AssetId, WeightRate>,
    /// Seconds between deposit and eligibility for settlement.
    pub cooldown_secs: u64,
    /// Batch size used by the sweep every deposit triggers.
    pub default_batch_limit: u32,
    /// Denominator of every weight rate.
    #[serde(default)]
    pub rate_scale: RateScale,
    /// Failure handling for the deposit-triggered sweep.
    #[serde(default)]
    pub triggered_sweep: TriggeredSweepPolicy,
}

impl LedgerConfig {
    /// A configuration with no supported assets.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidArgument`] if either value is zero.
    pub fn new(cooldown_secs: u64, default_batch_limit: u32) -> Result<Self, LedgerError> {
        let config = Self {
            asset_weights: BTreeMap::new(),
            cooldown_secs,
            default_batch_limit,
            rate_scale: RateScale::UNIT,
            triggered_sweep: TriggeredSweepPolicy::Atomic,
        };
        config.validate()?;
        Ok(config)
    }

    /// Builder: support `asset` at `rate` (a zero rate leaves it unsupported).
    pub fn with_asset(mut self, asset: AssetId, rate: WeightRate) -> Self {
        self.set_asset_weight(asset, rate);
        self
    }

    /// Builder: use `scale` as the fixed-point denominator.
    pub fn with_rate_scale(mut self, scale: RateScale) -> Self {
        self.rate_scale = scale;
        self
    }

    /// Builder: choose the triggered-sweep failure policy.
    pub fn with_triggered_sweep(mut self, policy: TriggeredSweepPolicy) -> Self {
        self.triggered_sweep = policy;
        self
    }

    /// Check the invariants and drop zero-weight entries.
    ///
    /// Used on configurations that did not come through the setters, such
    /// as genesis files and snapshots.
    pub fn normalize(mut self) -> Result<Self, LedgerError> {
        self.asset_weights.retain(|_, rate| rate.is_supported());
        self.validate()?;
        Ok(self)
    }

    /// Check the invariants without modifying the configuration.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.cooldown_secs == 0 {
            return Err(LedgerError::invalid("cooldown duration must be non-zero"));
        }
        if self.default_batch_limit == 0 {
            return Err(LedgerError::invalid("default batch limit must be non-zero"));
        }
        Ok(())
    }

    /// The configured rate for `asset`, or [`WeightRate::UNSUPPORTED`].
    pub fn weight_of(&self, asset: &AssetId) -> WeightRate {
        self.asset_weights
            .get(asset)
            .copied()
            .unwrap_or(WeightRate::UNSUPPORTED)
    }

    /// Iterate over supported assets in identifier order.
    pub fn supported_assets(&self) -> impl Iterator<Item = (&AssetId, &WeightRate)> {
        self.asset_weights.iter()
    }

    /// Set or overwrite the weight of `asset`. Zero removes it.
    pub fn set_asset_weight(&mut self, asset: AssetId, weight: WeightRate) -> LedgerEvent {
        if weight.is_supported() {
            self.asset_weights.insert(asset.clone(), weight);
        } else {
            self.asset_weights.remove(&asset);
        }
        LedgerEvent::AssetWeightChanged { asset, weight }
    }

    /// Replace the cooldown used for future receipts.
    pub fn set_cooldown_secs(&mut self, cooldown_secs: u64) -> Result<LedgerEvent, LedgerError> {
        if cooldown_secs == 0 {
            return Err(LedgerError::invalid("cooldown duration must be non-zero"));
        }
        self.cooldown_secs = cooldown_secs;
        Ok(LedgerEvent::CooldownChanged { cooldown_secs })
    }

    /// Replace the default sweep batch size.
    pub fn set_default_batch_limit(&mut self, count: u32) -> Result<LedgerEvent, LedgerError> {
        if count == 0 {
            return Err(LedgerError::invalid("default batch limit must be non-zero"));
        }
        self.default_batch_limit = count;
        Ok(LedgerEvent::CleanupCountChanged { count })
    }
}
