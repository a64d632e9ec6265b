//! The result of executing a single transaction.

use enum_as_inner::EnumAsInner;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The largest error code a service may report for a failed transaction.
/// Codes above it are reserved for the status codes the execution engine
/// itself assigns.
pub const MAX_USER_DEFINED_ERROR_CODE: u16 = u8::MAX as u16;

/// An error type for constructing a [`TransactionOutcome`].
#[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
pub enum OutcomeError {
    /// A user error code outside of `0..=MAX_USER_DEFINED_ERROR_CODE`.
    #[error("User defined error codes must be in 0..=255 (code: {0})")]
    UserCodeOutOfRange(u16),
}

/// How the execution of a transaction ended.
///
/// Outcomes are recorded for every executed transaction and take part in the
/// state hash, so their encoding must be identical on every node (see
/// [`crate::codec`]).
#[derive(Clone, Debug, Deserialize, EnumAsInner, Eq, Hash, PartialEq, Serialize)]
pub enum TransactionOutcome {
    /// The transaction was applied.
    Success,

    /// The service rejected the transaction with its own error code and a
    /// description of the failure.
    UserError(u8, String),

    /// Execution failed in a way the service did not anticipate, eg. a panic.
    UnexpectedError(String),
}

impl TransactionOutcome {
    /// A successful outcome.
    pub const fn successful() -> Self {
        Self::Success
    }

    /// An outcome carrying a service defined error code.
    ///
    /// Returns an error if `code` is larger than
    /// [`MAX_USER_DEFINED_ERROR_CODE`].
    pub fn user_error(code: u16, description: impl Into<String>) -> Result<Self, OutcomeError> {
        let code = u8::try_from(code).map_err(|_| OutcomeError::UserCodeOutOfRange(code))?;

        Ok(Self::UserError(code, description.into()))
    }

    /// An outcome for a failure the service did not anticipate.
    pub fn unexpected_error(description: impl Into<String>) -> Self {
        Self::UnexpectedError(description.into())
    }

    /// The user error code, if this is a [`TransactionOutcome::UserError`].
    pub fn error_code(&self) -> Option<u8> {
        match self {
            Self::UserError(code, _) => Some(*code),
            Self::Success | Self::UnexpectedError(_) => None,
        }
    }

    /// The failure description. `None` for a successful outcome.
    pub fn error_description(&self) -> Option<&str> {
        match self {
            Self::Success => None,
            Self::UserError(_, description) | Self::UnexpectedError(description) => {
                Some(description)
            }
        }
    }
}
