//! # Ledger Operations
//!
//! `fund`, `deposit` and `sweep`. Deposits and sweeps go through the ledger
//! and fail without touching the state file; `fund` credits the in-memory
//! custody directly and stands in for an external asset transfer.

use std::path::Path;

use anyhow::Result;
use clap::Args;

use burnstake_core::{AccountId, AssetId};
use burnstake_ledger::SweepStop;

use crate::state::transact;

/// Arguments for `burnstake fund`.
#[derive(Args, Debug)]
pub struct FundArgs {
    /// Account to credit.
    #[arg(long)]
    pub account: AccountId,

    /// Asset to credit.
    #[arg(long)]
    pub asset: AssetId,

    /// Amount in the asset's smallest unit.
    #[arg(long)]
    pub amount: u128,
}

/// Arguments for `burnstake deposit`.
#[derive(Args, Debug)]
pub struct DepositArgs {
    /// Depositor, who also receives the entitlement.
    #[arg(long)]
    pub from: AccountId,

    /// Asset to deposit.
    #[arg(long)]
    pub asset: AssetId,

    /// Amount in the asset's smallest unit.
    #[arg(long)]
    pub amount: u128,
}

/// Arguments for `burnstake sweep`.
#[derive(Args, Debug)]
pub struct SweepArgs {
    /// Receipts to examine at most. Defaults to the configured batch limit.
    #[arg(long)]
    pub max: Option<u32>,
}

/// Execute `burnstake fund`.
pub fn run_fund(args: &FundArgs, state_path: &Path, at: Option<i64>) -> Result<u8> {
    let balance = transact(state_path, at, |ledger| {
        Ok(ledger
            .custody_mut()
            .fund(&args.account, &args.asset, args.amount)?)
    })?;
    println!("{}: {balance} {}", args.account, args.asset);
    Ok(0)
}

/// Execute `burnstake deposit`.
pub fn run_deposit(args: &DepositArgs, state_path: &Path, at: Option<i64>) -> Result<u8> {
    let receipt = transact(state_path, at, |ledger| {
        let id = ledger.deposit(&args.from, &args.asset, args.amount)?;
        Ok(ledger.receipt(id).cloned())
    })?;
    if let Some(receipt) = receipt {
        println!("Receipt {}", receipt.id);
        println!("  Owner: {}", receipt.owner);
        println!("  Deposit: {} {}", receipt.amount, receipt.asset);
        println!("  Weight: {}", receipt.weight);
        println!("  Unlocks after: {}", receipt.unlock_at);
    }
    Ok(0)
}

/// Execute `burnstake sweep`.
pub fn run_sweep(args: &SweepArgs, state_path: &Path, at: Option<i64>) -> Result<u8> {
    let report = transact(state_path, at, |ledger| {
        let max = args.max.unwrap_or(ledger.default_batch_limit());
        Ok(ledger.sweep(max)?)
    })?;
    println!(
        "Settled {} of {} examined; cursor at {}",
        report.settled_count(),
        report.examined,
        report.cursor
    );
    for id in &report.settled {
        println!("  {id}");
    }
    match report.stop {
        SweepStop::Drained => println!("All receipts settled."),
        SweepStop::BudgetExhausted => println!("Batch limit reached; run sweep again."),
        SweepStop::Blocked {
            receipt_id,
            unlock_at,
        } => println!("Next receipt {receipt_id} unlocks after {unlock_at}."),
    }
    Ok(0)
}
