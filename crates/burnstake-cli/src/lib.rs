//! # burnstake-cli — File-Backed Ledger CLI
//!
//! Drives a burnstake ledger whose state lives in one JSON file. Each
//! invocation loads the file, runs one ledger operation against in-memory
//! collaborators, and writes the file back only if the operation succeeded.
//!
//! ## Subcommands
//!
//! - `burnstake init --config burnstake.yaml`: create a state file from a
//!   YAML genesis configuration.
//! - `burnstake fund`: credit an account in the in-memory custody.
//! - `burnstake deposit`, `burnstake sweep`: the ledger's public operations.
//! - `burnstake set-weight`, `remove-asset`, `set-cooldown`,
//!   `set-batch-limit`: capability-gated configuration changes.
//! - `burnstake show`: print configuration, receipts, and balances.
//!
//! ```bash
//! burnstake init --config burnstake.yaml
//! burnstake fund --account alice --asset STK --amount 1000
//! burnstake --at 1700000000 deposit --from alice --asset STK --amount 100
//! burnstake --at 1700000100 sweep --max 10
//! ```
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from handlers; handlers delegate to
//!   `burnstake-ledger` and hold no ledger logic.
//! - `anyhow` is used here only, at the process boundary.

pub mod admin;
pub mod config;
pub mod init;
pub mod ops;
pub mod show;
pub mod state;

use std::sync::Arc;

use anyhow::{Context, Result};

use burnstake_core::{Clock, ManualClock, SystemClock};

/// Default state file name.
pub const DEFAULT_STATE_FILE: &str = "burnstake-state.json";

/// The clock an invocation runs against: fixed at `at` when given,
/// otherwise the system clock.
pub fn make_clock(at: Option<i64>) -> Result<Arc<dyn Clock>> {
    match at {
        Some(secs) => {
            let clock = ManualClock::at_epoch_secs(secs)
                .with_context(|| format!("invalid --at value {secs}"))?;
            Ok(Arc::new(clock))
        }
        None => Ok(Arc::new(SystemClock)),
    }
}
