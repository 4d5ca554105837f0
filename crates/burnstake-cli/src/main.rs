//! # burnstake CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use burnstake_cli::admin::{
    run_remove_asset, run_set_batch_limit, run_set_cooldown, run_set_weight, RemoveAssetArgs,
    SetBatchLimitArgs, SetCooldownArgs, SetWeightArgs,
};
use burnstake_cli::init::{run_init, InitArgs};
use burnstake_cli::ops::{run_deposit, run_fund, run_sweep, DepositArgs, FundArgs, SweepArgs};
use burnstake_cli::show::{run_show, ShowArgs};

/// Receipt-backed staking ledger.
///
/// Operates a file-backed ledger: deposits credit weighted entitlement,
/// sweeps reverse it once each deposit's cooldown has passed.
#[derive(Parser, Debug)]
#[command(name = "burnstake", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    /// Ledger state file.
    #[arg(long, global = true, default_value = burnstake_cli::DEFAULT_STATE_FILE)]
    state: PathBuf,

    /// Run at this Unix time instead of the system clock.
    #[arg(long, global = true)]
    at: Option<i64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a state file from a genesis configuration.
    Init(InitArgs),

    /// Credit an account in the in-memory custody.
    Fund(FundArgs),

    /// Deposit an asset and receive a receipt.
    Deposit(DepositArgs),

    /// Settle receipts whose cooldown has passed.
    Sweep(SweepArgs),

    /// Set an asset's weight (admin).
    SetWeight(SetWeightArgs),

    /// Stop accepting an asset (admin).
    RemoveAsset(RemoveAssetArgs),

    /// Set the cooldown for new receipts (admin).
    SetCooldown(SetCooldownArgs),

    /// Set the batch size of deposit-triggered sweeps (admin).
    SetBatchLimit(SetBatchLimitArgs),

    /// Print ledger or account state.
    Show(ShowArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v when set.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    tracing::debug!(state = %cli.state.display(), at = ?cli.at, "burnstake starting");

    let state = cli.state.as_path();
    let result = match cli.command {
        Commands::Init(args) => run_init(&args, state),
        Commands::Fund(args) => run_fund(&args, state, cli.at),
        Commands::Deposit(args) => run_deposit(&args, state, cli.at),
        Commands::Sweep(args) => run_sweep(&args, state, cli.at),
        Commands::SetWeight(args) => run_set_weight(&args, state),
        Commands::RemoveAsset(args) => run_remove_asset(&args, state),
        Commands::SetCooldown(args) => run_set_cooldown(&args, state),
        Commands::SetBatchLimit(args) => run_set_batch_limit(&args, state),
        Commands::Show(args) => run_show(&args, state),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parse_deposit() {
        let cli = Cli::try_parse_from([
            "burnstake", "deposit", "--from", "alice", "--asset", "STK", "--amount", "100",
        ])
        .unwrap();
        assert_eq!(cli.state, PathBuf::from(burnstake_cli::DEFAULT_STATE_FILE));
        assert!(cli.at.is_none());
        if let Commands::Deposit(args) = cli.command {
            assert_eq!(args.from.as_str(), "alice");
            assert_eq!(args.asset.as_str(), "STK");
            assert_eq!(args.amount, 100);
        } else {
            panic!("expected deposit");
        }
    }

    #[test]
    fn cli_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "burnstake", "sweep", "--max", "3", "--at", "1700000000", "--state", "s.json", "-vv",
        ])
        .unwrap();
        assert_eq!(cli.at, Some(1_700_000_000));
        assert_eq!(cli.state, PathBuf::from("s.json"));
        assert_eq!(cli.verbose, 2);
        assert!(!cli.log_json);
        assert!(matches!(cli.command, Commands::Sweep(SweepArgs { max: Some(3) })));
    }

    #[test]
    fn cli_parse_amount_beyond_u64() {
        let cli = Cli::try_parse_from([
            "burnstake",
            "fund",
            "--account",
            "alice",
            "--asset",
            "STK",
            "--amount",
            "100000000000000000000000",
        ])
        .unwrap();
        if let Commands::Fund(args) = cli.command {
            assert_eq!(args.amount, 100_000_000_000_000_000_000_000);
        } else {
            panic!("expected fund");
        }
    }

    #[test]
    fn cli_parse_rejects_blank_account() {
        assert!(Cli::try_parse_from([
            "burnstake", "set-cooldown", "--caller", "a b", "--secs", "5",
        ])
        .is_err());
    }

    #[test]
    fn cli_parse_admin_commands() {
        for args in [
            vec!["burnstake", "set-weight", "--caller", "root", "--asset", "STK", "--weight", "2"],
            vec!["burnstake", "remove-asset", "--caller", "root", "--asset", "STK"],
            vec!["burnstake", "set-batch-limit", "--caller", "root", "--count", "4"],
            vec!["burnstake", "show", "--account", "alice"],
            vec!["burnstake", "init", "--config", "genesis.yaml", "--force"],
        ] {
            assert!(Cli::try_parse_from(args).is_ok());
        }
    }
}
