//! # burnstake-core — Foundational Types for the Burnstake Ledger
//!
//! This crate is the leaf of the burnstake workspace. It defines the
//! primitives every other crate builds on and depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** `AccountId`, `AssetId` and
//!    `ReceiptId` are distinct types. An asset identifier cannot be passed
//!    where a depositor is expected.
//!
//! 2. **UTC-only, seconds-precision timestamps.** Unlock times are compared
//!    at second granularity, so `Timestamp` discards sub-second components
//!    at construction.
//!
//! 3. **Injected time.** The ledger never calls `Utc::now()` directly; it reads
//!    a [`Clock`]. Tests drive a [`ManualClock`].
//!
//! 4. **Checked fixed-point weights.** Weight computation goes through
//!    [`compute_weight()`], which multiplies with `checked_mul` and reports
//!    overflow as [`ArithmeticError`] instead of wrapping.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `burnstake-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod fixed;
pub mod identity;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use error::ArithmeticError;
pub use fixed::{compute_weight, RateScale, WeightRate};
pub use identity::{AccountId, AssetId, IdentityError, ReceiptId};
pub use temporal::{Clock, ManualClock, SystemClock, Timestamp, TimestampError};
