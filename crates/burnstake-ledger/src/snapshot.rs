//! # Ledger Snapshots
//!
//! The persisted form of a ledger: its configuration and receipt book.
//! Collaborator state is owned by the collaborators and persisted by
//! whoever hosts them.
//!
//! Snapshots are pretty-printed JSON. Loading validates both halves: the
//! configuration invariants and every receipt-sequence invariant.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::LedgerConfig;
use crate::error::LedgerError;
use crate::receipt::{InvariantViolation, ReceiptBook};

/// Errors reading or writing a snapshot.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// Filesystem failure.
    #[error("snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a valid snapshot document.
    #[error("snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The receipt book violates a sequence invariant.
    #[error("snapshot receipt book is inconsistent: {0}")]
    Invariant(#[from] InvariantViolation),

    /// The configuration violates a configuration invariant.
    #[error("snapshot configuration is invalid: {0}")]
    Config(#[from] LedgerError),
}

/// Configuration plus receipt book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Ledger configuration.
    pub config: LedgerConfig,
    /// Receipt sequence and sweep cursor.
    pub book: ReceiptBook,
}

impl LedgerSnapshot {
    /// Check both halves of the snapshot.
    pub fn validate(&self) -> Result<(), StoreError> {
        self.config.validate()?;
        self.book.check_invariants()?;
        Ok(())
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and validate a JSON snapshot.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let snapshot: Self = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Write the snapshot to `path`.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        std::fs::write(path, self.to_json()?)?;
        tracing::debug!(path = %path.display(), receipts = self.book.len(), "snapshot saved");
        Ok(())
    }

    /// Read and validate a snapshot from `path`.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
