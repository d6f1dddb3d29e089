//! Centralization error types.

use cuadra_shared::AppError;
use thiserror::Error;

use super::roles::TaxRole;
use crate::ledger::ValidationError;

/// Failure to build a centralization entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// A role with a non-zero amount has no mapped account.
    #[error("No account mapped for tax role {role}")]
    MissingAccountRole {
        /// The unmapped role.
        role: TaxRole,
    },

    /// Role name not recognised.
    #[error("Unknown tax role: {0}")]
    UnknownRole(String),

    /// The assembled entry does not validate (e.g. the totals do not net to zero).
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

impl BuildError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingAccountRole { .. } => "MISSING_ACCOUNT_ROLE",
            Self::UnknownRole(_) => "UNKNOWN_TAX_ROLE",
            Self::Invalid(e) => e.error_code(),
        }
    }
}

impl From<BuildError> for AppError {
    fn from(err: BuildError) -> Self {
        match err {
            BuildError::Invalid(e) => e.into(),
            BuildError::MissingAccountRole { .. } | BuildError::UnknownRole(_) => {
                Self::Configuration(err.to_string())
            }
        }
    }
}
