//! # Init Subcommand
//!
//! `burnstake init --config burnstake.yaml` creates a fresh state file from a
//! genesis configuration. Genesis values are not capability-checked.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::Args;

use burnstake_ledger::{InMemoryCustody, InMemoryRewards, Ledger, StaticAdmins};

use crate::config::CliConfig;
use crate::state::StateFile;

/// Arguments for `burnstake init`.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Genesis configuration (YAML).
    #[arg(long, default_value = "burnstake.yaml")]
    pub config: PathBuf,

    /// Overwrite an existing state file.
    #[arg(long)]
    pub force: bool,
}

/// Execute `burnstake init`.
pub fn run_init(args: &InitArgs, state_path: &Path) -> Result<u8> {
    if state_path.exists() && !args.force {
        bail!(
            "state file {} already exists; pass --force to overwrite",
            state_path.display()
        );
    }
    let config = CliConfig::load(&args.config)?;
    let admins = StaticAdmins::new(config.admins.iter().cloned());
    let ledger = Ledger::new(
        config.ledger,
        InMemoryCustody::new(),
        InMemoryRewards::new(),
        admins,
        crate::make_clock(None)?,
    )?;

    let assets = ledger.config().supported_assets().count();
    StateFile::from_ledger(ledger).save(state_path)?;
    tracing::info!(state = %state_path.display(), assets, "ledger initialized");
    println!("Initialized {} ({assets} supported assets)", state_path.display());
    Ok(0)
}
