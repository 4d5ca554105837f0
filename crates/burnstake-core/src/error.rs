//! # Error Types — Arithmetic and Temporal Failures
//!
//! Leaf error types shared by every crate in the workspace. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! Ledger-level error kinds live in `burnstake-ledger`; the types here are
//! converted into them at the crate boundary.

use thiserror::Error;

/// Checked arithmetic failed.
///
/// Weight and unlock-time computations never wrap. Every overflow is
/// reported with the name of the computation that overflowed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArithmeticError {
    /// The result does not fit in the target integer type.
    #[error("arithmetic overflow in {context}")]
    Overflow {
        /// The computation that overflowed (e.g., "weight", "unlock_at").
        context: &'static str,
    },

    /// A fixed-point scale of zero was supplied.
    #[error("fixed-point scale must be non-zero")]
    ZeroScale,
}

impl ArithmeticError {
    /// Shorthand for an overflow in the named computation.
    pub fn overflow(context: &'static str) -> Self {
        Self::Overflow { context }
    }
}
