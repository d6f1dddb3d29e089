//! Journal entry validation.
//!
//! Rules are applied in order and the first failure is returned:
//! 1. at least two lines
//! 2. every line names its account (code and name)
//! 3. every line is single-sided
//! 4. total debits equal total credits within the tolerance

use rust_decimal::Decimal;
use serde::Serialize;

use super::entry::JournalEntry;
use super::error::{PostingError, ValidationError};
use crate::chart::{AccountCode, ChartLookup};

/// Default balance tolerance: 0.01 currency units.
pub const BALANCE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Entry totals for validation and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EntryTotals {
    /// Sum of debit amounts.
    pub total_debit: Decimal,
    /// Sum of credit amounts.
    pub total_credit: Decimal,
}

impl EntryTotals {
    /// Sums the lines of an entry.
    #[must_use]
    pub fn of(entry: &JournalEntry) -> Self {
        Self {
            total_debit: entry.total_debit(),
            total_credit: entry.total_credit(),
        }
    }

    /// Returns `total_debit - total_credit`.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.total_debit - self.total_credit
    }

    /// Returns true if the difference is strictly below `tolerance`.
    #[must_use]
    pub fn is_balanced(&self, tolerance: Decimal) -> bool {
        self.difference().abs() < tolerance
    }
}

/// An entry that passed validation, with its totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedEntry {
    entry: JournalEntry,
    totals: EntryTotals,
}

impl ValidatedEntry {
    /// The validated entry.
    #[must_use]
    pub fn entry(&self) -> &JournalEntry {
        &self.entry
    }

    /// Debit and credit totals.
    #[must_use]
    pub fn totals(&self) -> EntryTotals {
        self.totals
    }

    /// Releases the entry, e.g. to hand it to the persistence layer.
    #[must_use]
    pub fn into_entry(self) -> JournalEntry {
        self.entry
    }
}

/// Stateless validator for journal entries.
#[derive(Debug, Clone, Copy)]
pub struct JournalEntryValidator {
    tolerance: Decimal,
}

impl Default for JournalEntryValidator {
    fn default() -> Self {
        Self {
            tolerance: BALANCE_TOLERANCE,
        }
    }
}

impl JournalEntryValidator {
    /// Creates a validator with a custom balance tolerance.
    ///
    /// The check is strict (`|Δ| < tolerance`), so a zero tolerance rejects
    /// every entry. Configuration refuses non-positive values.
    #[must_use]
    pub fn with_tolerance(tolerance: Decimal) -> Self {
        Self {
            tolerance: tolerance.abs(),
        }
    }

    /// The balance tolerance in use.
    #[must_use]
    pub fn tolerance(&self) -> Decimal {
        self.tolerance
    }

    /// Validates a candidate entry.
    ///
    /// # Errors
    ///
    /// Returns the first rule the entry breaks.
    pub fn validate(&self, candidate: JournalEntry) -> Result<ValidatedEntry, ValidationError> {
        if candidate.lines.len() < 2 {
            return Err(ValidationError::InsufficientLines {
                count: candidate.lines.len(),
            });
        }

        if let Some(line) = candidate.lines.iter().position(|line| {
            line.account_code.trim().is_empty() || line.account_name.trim().is_empty()
        }) {
            return Err(ValidationError::MissingAccountReference { line });
        }

        if let Some((line, bad)) = candidate
            .lines
            .iter()
            .enumerate()
            .find(|(_, line)| !line.is_single_sided())
        {
            return Err(ValidationError::AmbiguousLineSign {
                line,
                debit: bad.debit_amount,
                credit: bad.credit_amount,
            });
        }

        let totals = EntryTotals::of(&candidate);
        if !totals.is_balanced(self.tolerance) {
            return Err(ValidationError::Unbalanced {
                total_debit: totals.total_debit,
                total_credit: totals.total_credit,
                difference: totals.difference(),
            });
        }

        Ok(ValidatedEntry {
            entry: candidate,
            totals,
        })
    }
}

/// Validates an entry with the default tolerance.
///
/// # Errors
///
/// Returns the first rule the entry breaks.
pub fn validate_entry(candidate: JournalEntry) -> Result<ValidatedEntry, ValidationError> {
    JournalEntryValidator::default().validate(candidate)
}

/// Checks a validated entry against the chart before it is posted.
///
/// Known accounts must be active and postable. Codes not on file pass:
/// imports may reference accounts the chart does not carry yet.
///
/// # Errors
///
/// Returns the first line posting to an inactive or summary account.
pub fn check_postings(entry: &ValidatedEntry, chart: &dyn ChartLookup) -> Result<(), PostingError> {
    for (line, posting) in entry.entry().lines.iter().enumerate() {
        let Some(account) = chart.lookup(&AccountCode::new(&posting.account_code)) else {
            continue;
        };
        if !account.is_active {
            return Err(PostingError::AccountInactive {
                line,
                code: posting.account_code.clone(),
            });
        }
        if !account.is_postable {
            return Err(PostingError::AccountNotPostable {
                line,
                code: posting.account_code.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{Account, AccountClass, ChartOfAccounts};
    use crate::ledger::entry::{EntryKind, JournalLine};
    use chrono::NaiveDate;
    use cuadra_shared::types::CompanyId;
    use rust_decimal_macros::dec;

    fn make_entry(lines: Vec<JournalLine>) -> JournalEntry {
        JournalEntry::draft(
            CompanyId::new(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            "Test entry",
            EntryKind::Manual,
            lines,
        )
    }

    fn balanced() -> JournalEntry {
        make_entry(vec![
            JournalLine::debit("1.01.01.01", "Caja", dec!(100000)),
            JournalLine::credit("4.01.03.01", "Ventas", dec!(100000)),
        ])
    }

    #[test]
    fn test_default_tolerance() {
        assert_eq!(BALANCE_TOLERANCE, dec!(0.01));
        assert_eq!(JournalEntryValidator::default().tolerance(), dec!(0.01));
    }

    #[test]
    fn test_balanced_entry() {
        let validated = validate_entry(balanced()).unwrap();
        assert_eq!(validated.totals().total_debit, dec!(100000));
        assert_eq!(validated.totals().total_credit, dec!(100000));
        assert_eq!(validated.entry().lines.len(), 2);
    }

    #[test]
    fn test_insufficient_lines() {
        let entry = make_entry(vec![JournalLine::debit("1.01.01.01", "Caja", dec!(1))]);
        assert_eq!(
            validate_entry(entry),
            Err(ValidationError::InsufficientLines { count: 1 })
        );
        assert_eq!(
            validate_entry(make_entry(vec![])),
            Err(ValidationError::InsufficientLines { count: 0 })
        );
    }

    #[test]
    fn test_missing_account_reference() {
        let mut entry = balanced();
        entry.lines[1].account_code = "  ".to_string();
        assert_eq!(
            validate_entry(entry),
            Err(ValidationError::MissingAccountReference { line: 1 })
        );

        let mut entry = balanced();
        entry.lines[0].account_name = String::new();
        assert_eq!(
            validate_entry(entry),
            Err(ValidationError::MissingAccountReference { line: 0 })
        );
    }

    #[test]
    fn test_ambiguous_line_sign() {
        let mut entry = balanced();
        entry.lines[1].debit_amount = dec!(5);
        assert_eq!(
            validate_entry(entry),
            Err(ValidationError::AmbiguousLineSign {
                line: 1,
                debit: dec!(5),
                credit: dec!(100000),
            })
        );
    }

    #[test]
    fn test_negative_amount_is_ambiguous() {
        let mut entry = balanced();
        entry.lines[0].debit_amount = dec!(-100000);
        assert!(matches!(
            validate_entry(entry),
            Err(ValidationError::AmbiguousLineSign { line: 0, .. })
        ));
    }

    #[test]
    fn test_rules_apply_in_order() {
        // Both a missing reference (line 1) and an ambiguous sign (line 0):
        // the reference rule runs first.
        let mut entry = balanced();
        entry.lines[0].credit_amount = dec!(1);
        entry.lines[1].account_code = String::new();
        assert_eq!(
            validate_entry(entry),
            Err(ValidationError::MissingAccountReference { line: 1 })
        );
    }

    #[test]
    fn test_unbalanced_reports_difference() {
        let mut entry = balanced();
        entry.lines[1].credit_amount = dec!(99999.98);
        assert_eq!(
            validate_entry(entry),
            Err(ValidationError::Unbalanced {
                total_debit: dec!(100000),
                total_credit: dec!(99999.98),
                difference: dec!(0.02),
            })
        );
    }

    #[test]
    fn test_difference_below_tolerance_is_accepted() {
        let mut entry = balanced();
        entry.lines[1].credit_amount = dec!(99999.995);
        assert!(validate_entry(entry).is_ok());
    }

    #[test]
    fn test_difference_equal_to_tolerance_is_rejected() {
        let mut entry = balanced();
        entry.lines[1].credit_amount = dec!(99999.99);
        assert!(matches!(
            validate_entry(entry),
            Err(ValidationError::Unbalanced { .. })
        ));
    }

    #[test]
    fn test_custom_tolerance() {
        let mut entry = balanced();
        entry.lines[1].credit_amount = dec!(99999.50);
        let validator = JournalEntryValidator::with_tolerance(dec!(1));
        assert!(validator.validate(entry).is_ok());
    }

    #[test]
    fn test_check_postings() {
        let chart: ChartOfAccounts = [
            Account::summary("1.01", "Activo Circulante", AccountClass::Asset),
            Account::new("1.01.01.01", "Caja", AccountClass::Asset),
            Account::new("4.01.03.01", "Ventas", AccountClass::Income).deactivated(),
        ]
        .into_iter()
        .collect();

        let validated = validate_entry(balanced()).unwrap();
        assert_eq!(
            check_postings(&validated, &chart),
            Err(PostingError::AccountInactive {
                line: 1,
                code: "4.01.03.01".into()
            })
        );

        let summary = validate_entry(make_entry(vec![
            JournalLine::debit("1.01", "Activo Circulante", dec!(10)),
            JournalLine::credit("9.99", "Desconocida", dec!(10)),
        ]))
        .unwrap();
        assert!(matches!(
            check_postings(&summary, &chart),
            Err(PostingError::AccountNotPostable { line: 0, .. })
        ));

        let unknown = validate_entry(make_entry(vec![
            JournalLine::debit("1.01.01.01", "Caja", dec!(10)),
            JournalLine::credit("9.99", "Desconocida", dec!(10)),
        ]))
        .unwrap();
        assert!(check_postings(&unknown, &chart).is_ok());
    }
}
