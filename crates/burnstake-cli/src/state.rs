//! # State File
//!
//! One JSON document holding the ledger snapshot together with the state of
//! the in-memory collaborators it was run against. Commands that mutate go
//! through [`transact`], which saves only when the operation succeeds, so a
//! failed operation leaves the file untouched.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use burnstake_core::Clock;
use burnstake_ledger::{InMemoryCustody, InMemoryRewards, Ledger, LedgerSnapshot, StaticAdmins};

/// Ledger type driven by the CLI.
pub type CliLedger = Ledger<InMemoryCustody, InMemoryRewards, StaticAdmins>;

/// Persisted CLI state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateFile {
    pub ledger: LedgerSnapshot,
    pub custody: InMemoryCustody,
    pub rewards: InMemoryRewards,
    pub admins: StaticAdmins,
}

impl StateFile {
    /// Read and validate a state file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!(
                "state file {} not found; run `burnstake init` first",
                path.display()
            );
        }
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let state: Self = serde_json::from_str(&json)
            .with_context(|| format!("malformed state file {}", path.display()))?;
        state
            .ledger
            .validate()
            .with_context(|| format!("inconsistent state file {}", path.display()))?;
        Ok(state)
    }

    /// Write the state file, replacing any previous contents.
    ///
    /// Writes to a sibling temporary file first and renames it into place.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize state")?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)
            .with_context(|| format!("failed to write {}", tmp.display()))?;
        std::fs::rename(&tmp, path)
            .with_context(|| format!("failed to replace {}", path.display()))?;
        tracing::debug!(path = %path.display(), "state saved");
        Ok(())
    }

    /// Rebuild the ledger with the given clock.
    pub fn open(self, clock: Arc<dyn Clock>) -> Result<CliLedger> {
        Ledger::from_snapshot(self.ledger, self.custody, self.rewards, self.admins, clock)
            .context("failed to open ledger")
    }

    /// Capture a ledger and its collaborators.
    pub fn from_ledger(ledger: CliLedger) -> Self {
        let (ledger, custody, rewards, admins) = ledger.into_parts();
        Self {
            ledger,
            custody,
            rewards,
            admins,
        }
    }
}

/// Load the state at `path`, run `f` against the ledger, and save the
/// result if `f` succeeds.
pub fn transact<T>(
    path: &Path,
    at: Option<i64>,
    f: impl FnOnce(&mut CliLedger) -> Result<T>,
) -> Result<T> {
    let clock = crate::make_clock(at)?;
    let mut ledger = StateFile::load(path)?.open(clock)?;
    let out = f(&mut ledger)?;
    StateFile::from_ledger(ledger).save(path)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use burnstake_core::{AccountId, AssetId};
    use burnstake_ledger::{LedgerConfig, ReceiptBook};

    fn make_state() -> StateFile {
        StateFile {
            ledger: LedgerSnapshot {
                config: LedgerConfig::new(10, 5).unwrap(),
                book: ReceiptBook::new(),
            },
            custody: InMemoryCustody::new(),
            rewards: InMemoryRewards::new(),
            admins: StaticAdmins::new([AccountId::new("root").unwrap()]),
        }
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let state = make_state();
        state.save(&path).unwrap();
        assert_eq!(StateFile::load(&path).unwrap(), state);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_load_missing_mentions_init() {
        let dir = tempfile::tempdir().unwrap();
        let err = StateFile::load(&dir.path().join("state.json")).unwrap_err();
        assert!(err.to_string().contains("burnstake init"));
    }

    #[test]
    fn test_transact_saves_on_success_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        make_state().save(&path).unwrap();
        let alice = AccountId::new("alice").unwrap();
        let stk = AssetId::new("STK").unwrap();

        transact(&path, Some(0), |ledger| {
            ledger.custody_mut().fund(&alice, &stk, 7)?;
            Ok(())
        })
        .unwrap();
        let result: Result<()> = transact(&path, Some(0), |ledger| {
            ledger.custody_mut().fund(&alice, &stk, 5)?;
            bail!("abort")
        });
        assert!(result.is_err());

        let state = StateFile::load(&path).unwrap();
        assert_eq!(state.custody.balance_of(&alice, &stk), 7);
    }
}
