//! Worksheet error types.

use cuadra_shared::AppError;
use rust_decimal::Decimal;
use thiserror::Error;

use super::classes::TerminalColumn;
use super::types::WorksheetColumn;

/// A worksheet post-condition failed.
///
/// Fatal to the report: either classification is wrong or upstream data is
/// corrupt, and rendering would produce a wrong financial statement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorksheetError {
    /// A column pair does not balance.
    #[error("Worksheet integrity violation in {column}: debit side {expected}, credit side {actual}")]
    IntegrityViolation {
        /// Column pair that failed.
        column: WorksheetColumn,
        /// Debit side total (after the result plug for the balance sheet).
        expected: Decimal,
        /// Credit side total (after the result plug for the balance sheet).
        actual: Decimal,
    },
}

impl WorksheetError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::IntegrityViolation { .. } => "WORKSHEET_INTEGRITY_VIOLATION",
        }
    }
}

/// A classification table could not be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassificationError {
    /// Class name not recognised.
    #[error("Unknown account class: {0}")]
    UnknownClass(String),

    /// Terminal column name not recognised.
    #[error("Unknown worksheet column: {0}")]
    UnknownColumn(String),

    /// Override condition not recognised.
    #[error("Unknown override condition: {0}")]
    UnknownCondition(String),

    /// A rule routes a balance to a column on the opposite side.
    #[error("Rule {rule} routes a {side} balance to {column}, which is on the other side")]
    RuleSideMismatch {
        /// The rule, as an account code or class prefix.
        rule: String,
        /// Balance side the rule applies to.
        side: &'static str,
        /// Offending target column.
        column: TerminalColumn,
    },

    /// Two major class rules share a prefix.
    #[error("Major class prefix {0} is defined more than once")]
    DuplicatePrefix(u64),
}

impl ClassificationError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownClass(_) => "UNKNOWN_CLASS",
            Self::UnknownColumn(_) => "UNKNOWN_COLUMN",
            Self::UnknownCondition(_) => "UNKNOWN_CONDITION",
            Self::RuleSideMismatch { .. } => "RULE_SIDE_MISMATCH",
            Self::DuplicatePrefix(_) => "DUPLICATE_PREFIX",
        }
    }
}

impl From<WorksheetError> for AppError {
    fn from(err: WorksheetError) -> Self {
        Self::Integrity(err.to_string())
    }
}

impl From<ClassificationError> for AppError {
    fn from(err: ClassificationError) -> Self {
        Self::Configuration(err.to_string())
    }
}
