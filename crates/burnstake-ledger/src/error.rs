//! # Ledger Errors
//!
//! Every public ledger operation fails with exactly one [`LedgerError`] kind
//! and leaves no partial effect behind: staged receipts are dropped, the
//! cursor is restored, and completed collaborator calls are compensated
//! before the error reaches the caller. A compensation that itself fails is
//! the one exception; it is reported through
//! [`LedgerError::compensation_failures`].

use thiserror::Error;

use burnstake_core::{AccountId, ArithmeticError, AssetId};

use crate::collaborator::CollaboratorError;

/// Error returned by ledger operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// A zero amount, zero duration, or zero batch limit. Also a dust
    /// deposit: a nonzero amount whose weight rounds down to zero at the
    /// configured rate scale.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The asset has no configured weight (zero or absent).
    #[error("unsupported asset: {asset}")]
    UnsupportedAsset {
        /// The rejected asset.
        asset: AssetId,
    },

    /// Weight or unlock-time computation exceeded the representable range.
    #[error("arithmetic overflow: {0}")]
    ArithmeticOverflow(#[from] ArithmeticError),

    /// The caller lacks the administrative capability.
    #[error("{caller} is not authorized to {operation}")]
    Unauthorized {
        /// The rejected caller.
        caller: AccountId,
        /// The configuration operation that was attempted.
        operation: &'static str,
    },

    /// Asset custody or reward distribution rejected a call.
    #[error("collaborator failure: {0}")]
    CollaboratorFailure(#[from] CollaboratorError),
}

impl LedgerError {
    /// Shorthand for an [`LedgerError::InvalidArgument`].
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidArgument(reason.into())
    }

    /// Attach compensations that failed while rolling back after `self`.
    ///
    /// A collaborator failure carries them in
    /// [`CollaboratorError::compensation`]. Any other kind is replaced by
    /// the first failed compensation, since the divergence is what the
    /// caller must act on.
    pub(crate) fn with_compensation_failures(self, mut failures: Vec<CollaboratorError>) -> Self {
        if failures.is_empty() {
            return self;
        }
        match self {
            Self::CollaboratorFailure(mut e) => {
                e.compensation.append(&mut failures);
                Self::CollaboratorFailure(e)
            }
            other => {
                tracing::error!(error = %other, "rollback diverged after a non-collaborator error");
                let mut first = failures.remove(0);
                first.compensation.append(&mut failures);
                Self::CollaboratorFailure(first)
            }
        }
    }

    /// Compensations that failed while undoing the operation.
    ///
    /// Empty unless a collaborator's books diverged from the ledger.
    pub fn compensation_failures(&self) -> &[CollaboratorError] {
        match self {
            Self::CollaboratorFailure(e) => &e.compensation,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_failures_keeps_the_error() {
        let err = LedgerError::invalid("zero amount");
        assert_eq!(err.clone().with_compensation_failures(Vec::new()), err);
        assert!(err.compensation_failures().is_empty());
    }

    #[test]
    fn test_failures_attach_to_collaborator_error() {
        let err = LedgerError::from(CollaboratorError::custody("transfers disabled"))
            .with_compensation_failures(vec![CollaboratorError::rewards("withdrawal disabled")]);
        assert_eq!(
            err.compensation_failures(),
            &[CollaboratorError::rewards("withdrawal disabled")]
        );
        assert_eq!(
            err.to_string(),
            "collaborator failure: asset custody failed: transfers disabled; \
             1 compensation(s) also failed, state diverged: \
             reward distribution failed: withdrawal disabled"
        );
    }

    #[test]
    fn test_failures_replace_other_kinds() {
        let err = LedgerError::from(ArithmeticError::overflow("receipt id"))
            .with_compensation_failures(vec![
                CollaboratorError::rewards("first"),
                CollaboratorError::custody("second"),
            ]);
        let LedgerError::CollaboratorFailure(e) = &err else {
            panic!("expected a collaborator failure, got {err:?}");
        };
        assert_eq!(e.reason, "first");
        assert_eq!(e.compensation, vec![CollaboratorError::custody("second")]);
    }
}
