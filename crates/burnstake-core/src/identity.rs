//! # Identity Newtypes
//!
//! Newtype wrappers for every identifier the ledger handles. These prevent
//! accidental identifier confusion: you cannot pass an `AssetId` where an
//! `AccountId` is expected, and receipt identifiers are never bare integers.
//!
//! String identifiers are validated at construction (and at deserialization,
//! via `try_from`), so an empty or whitespace-padded identifier can never
//! reach the ledger.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected identifier input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// The identifier string was empty.
    #[error("{kind} identifier must not be empty")]
    Empty {
        /// Which identifier kind was being constructed.
        kind: &'static str,
    },

    /// The identifier contains whitespace.
    #[error("{kind} identifier must not contain whitespace: {value:?}")]
    Whitespace {
        /// Which identifier kind was being constructed.
        kind: &'static str,
        /// The rejected input.
        value: String,
    },
}

fn validate(kind: &'static str, value: String) -> Result<String, IdentityError> {
    if value.is_empty() {
        return Err(IdentityError::Empty { kind });
    }
    if value.chars().any(char::is_whitespace) {
        return Err(IdentityError::Whitespace { kind, value });
    }
    Ok(value)
}

/// Identity of a depositor, an administrator, or any other ledger caller.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

/// Identifier of a depositable asset.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssetId(String);

/// Sequence number of a receipt.
///
/// Receipt identifiers are dense: the ledger assigns `0, 1, 2, ...` in
/// creation order and never reuses one.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ReceiptId(pub u64);

impl AccountId {
    /// Create an account identifier, rejecting empty or whitespace input.
    pub fn new(value: impl Into<String>) -> Result<Self, IdentityError> {
        validate("account", value.into()).map(Self)
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AssetId {
    /// Create an asset identifier, rejecting empty or whitespace input.
    pub fn new(value: impl Into<String>) -> Result<Self, IdentityError> {
        validate("asset", value.into()).map(Self)
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ReceiptId {
    /// The first receipt identifier ever issued.
    pub const GENESIS: ReceiptId = ReceiptId(0);

    /// The raw sequence number.
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// The identifier following this one, or `None` at `u64::MAX`.
    pub fn checked_next(&self) -> Option<ReceiptId> {
        self.0.checked_add(1).map(ReceiptId)
    }

    /// Position of this receipt in a dense, zero-based sequence.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<String> for AccountId {
    type Error = IdentityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for AssetId {
    type Error = IdentityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.0
    }
}

impl From<AssetId> for String {
    fn from(id: AssetId) -> Self {
        id.0
    }
}

impl std::str::FromStr for AccountId {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl std::str::FromStr for AssetId {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for ReceiptId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "receipt:{}", self.0)
    }
}
