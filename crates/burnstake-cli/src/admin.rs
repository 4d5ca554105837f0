//! # Configuration Subcommands
//!
//! `set-weight`, `remove-asset`, `set-cooldown` and `set-batch-limit`. Each
//! names its caller with `--caller`; the ledger rejects callers not listed
//! as admins in the state file.

use std::path::Path;

use anyhow::Result;
use clap::Args;

use burnstake_core::{AccountId, AssetId, WeightRate};

use crate::state::transact;

/// Arguments for `burnstake set-weight`.
#[derive(Args, Debug)]
pub struct SetWeightArgs {
    /// Account performing the change.
    #[arg(long)]
    pub caller: AccountId,

    /// Asset to configure.
    #[arg(long)]
    pub asset: AssetId,

    /// Raw fixed-point weight per unit; zero removes the asset.
    #[arg(long)]
    pub weight: u128,
}

/// Arguments for `burnstake remove-asset`.
#[derive(Args, Debug)]
pub struct RemoveAssetArgs {
    #[arg(long)]
    pub caller: AccountId,

    #[arg(long)]
    pub asset: AssetId,
}

/// Arguments for `burnstake set-cooldown`.
#[derive(Args, Debug)]
pub struct SetCooldownArgs {
    #[arg(long)]
    pub caller: AccountId,

    /// Cooldown for new receipts, in seconds.
    #[arg(long)]
    pub secs: u64,
}

/// Arguments for `burnstake set-batch-limit`.
#[derive(Args, Debug)]
pub struct SetBatchLimitArgs {
    #[arg(long)]
    pub caller: AccountId,

    /// Receipts examined by each deposit-triggered sweep.
    #[arg(long)]
    pub count: u32,
}

pub fn run_set_weight(args: &SetWeightArgs, state_path: &Path) -> Result<u8> {
    transact(state_path, None, |ledger| {
        Ok(ledger.set_asset_weight(&args.caller, args.asset.clone(), WeightRate(args.weight))?)
    })?;
    if args.weight == 0 {
        println!("{} is no longer accepted", args.asset);
    } else {
        println!("{} weight set to {}", args.asset, args.weight);
    }
    Ok(0)
}

pub fn run_remove_asset(args: &RemoveAssetArgs, state_path: &Path) -> Result<u8> {
    transact(state_path, None, |ledger| {
        Ok(ledger.remove_asset(&args.caller, args.asset.clone())?)
    })?;
    println!("{} is no longer accepted", args.asset);
    Ok(0)
}

pub fn run_set_cooldown(args: &SetCooldownArgs, state_path: &Path) -> Result<u8> {
    transact(state_path, None, |ledger| {
        Ok(ledger.set_cooldown_secs(&args.caller, args.secs)?)
    })?;
    println!("Cooldown set to {}s", args.secs);
    Ok(0)
}

pub fn run_set_batch_limit(args: &SetBatchLimitArgs, state_path: &Path) -> Result<u8> {
    transact(state_path, None, |ledger| {
        Ok(ledger.set_default_batch_limit(&args.caller, args.count)?)
    })?;
    println!("Default batch limit set to {}", args.count);
    Ok(0)
}
