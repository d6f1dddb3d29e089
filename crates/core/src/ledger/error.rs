//! Ledger error types.
//!
//! Every error carries the structured detail (line index, amounts,
//! difference) a caller needs to show a bookkeeper the exact problem.

use cuadra_shared::AppError;
use rust_decimal::Decimal;
use thiserror::Error;

use super::entry::{EntryKind, EntryStatus};

/// Journal entry validation failures, reported in rule order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// An entry needs at least two lines.
    #[error("Journal entry must have at least 2 lines, found {count}")]
    InsufficientLines {
        /// Number of lines present.
        count: usize,
    },

    /// A line has a blank account code or name.
    #[error("Line {line} is missing its account code or name")]
    MissingAccountReference {
        /// Zero-based line index.
        line: usize,
    },

    /// A line is not strictly debit-only or credit-only.
    #[error("Line {line} must carry exactly one positive amount (debit: {debit}, credit: {credit})")]
    AmbiguousLineSign {
        /// Zero-based line index.
        line: usize,
        /// Debit amount on the line.
        debit: Decimal,
        /// Credit amount on the line.
        credit: Decimal,
    },

    /// Total debits and credits differ by the tolerance or more.
    #[error(
        "Journal entry is not balanced. Debit: {total_debit}, Credit: {total_credit}, Difference: {difference}"
    )]
    Unbalanced {
        /// Sum of debit amounts.
        total_debit: Decimal,
        /// Sum of credit amounts.
        total_credit: Decimal,
        /// `total_debit - total_credit`.
        difference: Decimal,
    },
}

impl ValidationError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientLines { .. } => "INSUFFICIENT_LINES",
            Self::MissingAccountReference { .. } => "MISSING_ACCOUNT_REFERENCE",
            Self::AmbiguousLineSign { .. } => "AMBIGUOUS_LINE_SIGN",
            Self::Unbalanced { .. } => "UNBALANCED",
        }
    }

    /// Index of the offending line, for line-level errors.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::MissingAccountReference { line } | Self::AmbiguousLineSign { line, .. } => {
                Some(*line)
            }
            Self::InsufficientLines { .. } | Self::Unbalanced { .. } => None,
        }
    }
}

/// A validated entry posts to an account the chart does not allow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PostingError {
    /// The account is deactivated.
    #[error("Line {line}: account {code} is inactive")]
    AccountInactive {
        /// Zero-based line index.
        line: usize,
        /// Account code.
        code: String,
    },

    /// The account is a summary node.
    #[error("Line {line}: account {code} is a summary account and does not accept postings")]
    AccountNotPostable {
        /// Zero-based line index.
        line: usize,
        /// Account code.
        code: String,
    },
}

impl PostingError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::AccountInactive { .. } => "ACCOUNT_INACTIVE",
            Self::AccountNotPostable { .. } => "ACCOUNT_NOT_POSTABLE",
        }
    }
}

/// Entry state transition not allowed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    /// Only non-imported drafts can be modified.
    #[error("Cannot modify a {status:?} entry of kind {kind:?}")]
    NotEditable {
        /// Current status.
        status: EntryStatus,
        /// Entry kind.
        kind: EntryKind,
    },

    /// Only non-imported drafts can be hard-deleted.
    #[error("Cannot delete a {status:?} entry of kind {kind:?}; approved entries are reversed instead")]
    NotDeletable {
        /// Current status.
        status: EntryStatus,
        /// Entry kind.
        kind: EntryKind,
    },

    /// Only drafts can be approved.
    #[error("Only draft entries can be approved, entry is {0:?}")]
    NotDraft(EntryStatus),

    /// Only approved entries can be reversed.
    #[error("Only approved entries can be reversed, entry is {0:?}")]
    NotApproved(EntryStatus),
}

impl LifecycleError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotEditable { .. } => "ENTRY_NOT_EDITABLE",
            Self::NotDeletable { .. } => "ENTRY_NOT_DELETABLE",
            Self::NotDraft(_) => "ENTRY_NOT_DRAFT",
            Self::NotApproved(_) => "ENTRY_NOT_APPROVED",
        }
    }
}

/// Failure to approve an entry.
#[derive(Debug, Error)]
pub enum ApproveError {
    /// The entry is not in a state that can be approved.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
    /// The entry does not validate.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<PostingError> for AppError {
    fn from(err: PostingError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<LifecycleError> for AppError {
    fn from(err: LifecycleError) -> Self {
        Self::BusinessRule(err.to_string())
    }
}

impl From<ApproveError> for AppError {
    fn from(err: ApproveError) -> Self {
        match err {
            ApproveError::Lifecycle(e) => e.into(),
            ApproveError::Invalid(e) => e.into(),
        }
    }
}
