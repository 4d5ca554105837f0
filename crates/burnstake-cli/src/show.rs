//! # Show Subcommand
//!
//! Prints the ledger configuration and receipts, or one account's view with
//! `--account`. `--json` prints the raw state document instead.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use burnstake_core::AccountId;

use crate::state::{CliLedger, StateFile};

/// Arguments for `burnstake show`.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Show one account's balances, entitlement and pending receipts.
    #[arg(long)]
    pub account: Option<AccountId>,

    /// Print the state file as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute `burnstake show`.
pub fn run_show(args: &ShowArgs, state_path: &Path) -> Result<u8> {
    let state = StateFile::load(state_path)?;
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&state).context("failed to serialize state")?
        );
        return Ok(0);
    }
    let ledger = state.open(crate::make_clock(None)?)?;
    let text = match &args.account {
        Some(account) => render_account(&ledger, account),
        None => render_ledger(&ledger),
    };
    print!("{text}");
    Ok(0)
}

fn render_ledger(ledger: &CliLedger) -> String {
    let config = ledger.config();
    let mut out = String::new();
    out.push_str(&format!("Cooldown: {}s\n", config.cooldown_secs));
    out.push_str(&format!("Default batch limit: {}\n", config.default_batch_limit));
    out.push_str(&format!("Rate scale: {}\n", config.rate_scale.get()));
    out.push_str("Assets:\n");
    for (asset, rate) in config.supported_assets() {
        out.push_str(&format!("  {asset}: {rate}\n"));
    }
    out.push_str(&format!(
        "Receipts: {} (cursor {})\n",
        ledger.next_id().as_u64(),
        ledger.cursor()
    ));
    for r in ledger.receipts() {
        out.push_str(&format!(
            "  [{}] {} {} {} weight {} unlocks {} {}\n",
            r.id.as_u64(),
            r.owner,
            r.amount,
            r.asset,
            r.weight,
            r.unlock_at,
            r.status
        ));
    }
    out
}

fn render_account(ledger: &CliLedger, account: &AccountId) -> String {
    let mut out = format!("Account: {account}\n");
    out.push_str(&format!(
        "  Entitlement: {}\n",
        ledger.rewards().entitlement_of(account)
    ));
    out.push_str(&format!(
        "  Pending weight: {}\n",
        ledger.pending_weight_of(account)
    ));
    for (asset, _) in ledger.config().supported_assets() {
        out.push_str(&format!(
            "  Balance {asset}: {}\n",
            ledger.custody().balance_of(account, asset)
        ));
    }
    for r in ledger.pending_receipts_of(account) {
        out.push_str(&format!(
            "  Pending {}: weight {} unlocks {}\n",
            r.id, r.weight, r.unlock_at
        ));
    }
    out
}
