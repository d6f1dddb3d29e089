//! Journal entry domain types.

use chrono::NaiveDate;
use cuadra_shared::types::{CompanyId, EntryId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::{ApproveError, LifecycleError};
use super::validation::{JournalEntryValidator, ValidatedEntry};

/// Source of a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Entered by hand.
    Manual,
    /// Imported from the purchase/sales register.
    PurchaseSalesRegister,
    /// Generated from a tax form (e.g. IVA centralization).
    TaxForm,
    /// Generated by the system.
    Automatic,
}

impl EntryKind {
    /// Returns true if the entry was imported from an external register.
    #[must_use]
    pub fn is_imported(self) -> bool {
        matches!(self, Self::PurchaseSalesRegister)
    }
}

/// Entry status.
///
/// `Draft → Approved → Reversed`. Reversal is a status change that keeps the
/// entry on file; approved entries are never deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Entry can still be modified.
    Draft,
    /// Entry is approved and immutable.
    Approved,
    /// Entry was reversed; excluded from the ledger.
    Reversed,
}

impl EntryStatus {
    /// Returns true if entries in this status count towards the ledger.
    #[must_use]
    pub fn is_in_ledger(self) -> bool {
        matches!(self, Self::Draft | Self::Approved)
    }
}

/// One posting line of a journal entry.
///
/// Exactly one of `debit_amount`/`credit_amount` is strictly positive and
/// the other is zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLine {
    /// Account posted to.
    pub account_code: String,
    /// Account name as it read when the line was posted.
    pub account_name: String,
    /// Debit amount (zero on credit lines).
    #[serde(default)]
    pub debit_amount: Decimal,
    /// Credit amount (zero on debit lines).
    #[serde(default)]
    pub credit_amount: Decimal,
    /// Optional line description.
    #[serde(default)]
    pub description: Option<String>,
}

impl JournalLine {
    /// Creates a debit line.
    #[must_use]
    pub fn debit(
        account_code: impl Into<String>,
        account_name: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            account_code: account_code.into(),
            account_name: account_name.into(),
            debit_amount: amount,
            credit_amount: Decimal::ZERO,
            description: None,
        }
    }

    /// Creates a credit line.
    #[must_use]
    pub fn credit(
        account_code: impl Into<String>,
        account_name: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            account_code: account_code.into(),
            account_name: account_name.into(),
            debit_amount: Decimal::ZERO,
            credit_amount: amount,
            description: None,
        }
    }

    /// Sets the line description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns true if exactly one side is strictly positive and the other is zero.
    #[must_use]
    pub fn is_single_sided(&self) -> bool {
        let debit = self.debit_amount;
        let credit = self.credit_amount;
        (debit > Decimal::ZERO && credit.is_zero()) || (debit.is_zero() && credit > Decimal::ZERO)
    }

    /// Returns debit minus credit.
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        self.debit_amount - self.credit_amount
    }
}

/// A journal entry: a balanced set of postings recorded as one transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique identifier.
    pub id: EntryId,
    /// Company whose books this entry belongs to.
    pub company_id: CompanyId,
    /// Sequential entry number assigned by the store; zero until assigned.
    #[serde(default)]
    pub number: u64,
    /// Accounting date.
    pub entry_date: NaiveDate,
    /// Entry description.
    pub description: String,
    /// External reference (document number, form folio, ...).
    #[serde(default)]
    pub reference: Option<String>,
    /// Source of the entry.
    pub kind: EntryKind,
    /// Current status.
    pub status: EntryStatus,
    /// Posting lines.
    pub lines: Vec<JournalLine>,
}

impl JournalEntry {
    /// Creates an unnumbered draft entry.
    #[must_use]
    pub fn draft(
        company_id: CompanyId,
        entry_date: NaiveDate,
        description: impl Into<String>,
        kind: EntryKind,
        lines: Vec<JournalLine>,
    ) -> Self {
        Self {
            id: EntryId::new(),
            company_id,
            number: 0,
            entry_date,
            description: description.into(),
            reference: None,
            kind,
            status: EntryStatus::Draft,
            lines,
        }
    }

    /// Sum of debit amounts.
    #[must_use]
    pub fn total_debit(&self) -> Decimal {
        self.lines.iter().map(|line| line.debit_amount).sum()
    }

    /// Sum of credit amounts.
    #[must_use]
    pub fn total_credit(&self) -> Decimal {
        self.lines.iter().map(|line| line.credit_amount).sum()
    }

    /// Returns true if the entry can be modified.
    ///
    /// Only drafts that were not imported from a register are editable.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        self.status == EntryStatus::Draft && !self.kind.is_imported()
    }

    /// Returns true if the entry can be hard-deleted. Same rule as editing.
    #[must_use]
    pub fn can_delete(&self) -> bool {
        self.is_editable()
    }

    /// Fails unless the entry can be modified.
    pub fn ensure_editable(&self) -> Result<(), LifecycleError> {
        if self.is_editable() {
            Ok(())
        } else {
            Err(LifecycleError::NotEditable {
                status: self.status,
                kind: self.kind,
            })
        }
    }

    /// Fails unless the entry can be hard-deleted.
    pub fn ensure_deletable(&self) -> Result<(), LifecycleError> {
        if self.can_delete() {
            Ok(())
        } else {
            Err(LifecycleError::NotDeletable {
                status: self.status,
                kind: self.kind,
            })
        }
    }

    /// Approves a draft entry after validating it.
    ///
    /// # Errors
    ///
    /// `NotDraft` if the entry is not a draft, or the validation failure.
    pub fn approve(
        mut self,
        validator: &JournalEntryValidator,
    ) -> Result<ValidatedEntry, ApproveError> {
        if self.status != EntryStatus::Draft {
            return Err(LifecycleError::NotDraft(self.status).into());
        }
        self.status = EntryStatus::Approved;
        Ok(validator.validate(self)?)
    }

    /// Marks an approved entry as reversed. The entry stays on file.
    ///
    /// # Errors
    ///
    /// `NotApproved` for drafts and already reversed entries.
    pub fn reverse(&mut self) -> Result<(), LifecycleError> {
        if self.status != EntryStatus::Approved {
            return Err(LifecycleError::NotApproved(self.status));
        }
        self.status = EntryStatus::Reversed;
        Ok(())
    }
}
