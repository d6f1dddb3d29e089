//! Property-based tests for journal entry validation.
//!
//! Covers the balance invariant and the single-sided line invariant.

use chrono::NaiveDate;
use cuadra_shared::types::CompanyId;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::entry::{EntryKind, JournalEntry, JournalLine};
use super::error::ValidationError;
use super::validation::validate_entry;

/// Strategy to generate a valid positive amount (> 0).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    // 0.01 to 1,000,000.00
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a perturbation strictly larger than 0.01.
fn perturbation() -> impl Strategy<Value = Decimal> {
    (2i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn make_entry(lines: Vec<JournalLine>) -> JournalEntry {
    JournalEntry::draft(
        CompanyId::new(),
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        "Generated entry",
        EntryKind::Manual,
        lines,
    )
}

/// Debit lines for `debits`, balanced by one credit line per debit.
fn balanced_lines(debits: &[Decimal]) -> Vec<JournalLine> {
    let mut lines: Vec<JournalLine> = debits
        .iter()
        .enumerate()
        .map(|(i, amount)| JournalLine::debit(format!("5.01.{:02}", i + 1), "Gasto", *amount))
        .collect();
    lines.extend(
        debits
            .iter()
            .map(|amount| JournalLine::credit("1.01.01.01", "Caja", *amount)),
    );
    lines
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Any set of single-sided lines whose debits equal credits is accepted.
    #[test]
    fn prop_balanced_entry_accepted(debits in prop::collection::vec(positive_amount(), 1..8)) {
        let expected: Decimal = debits.iter().copied().sum();
        let result = validate_entry(make_entry(balanced_lines(&debits)));

        prop_assert!(result.is_ok(), "Balanced entry rejected: {:?}", result);
        let totals = result.unwrap().totals();
        prop_assert_eq!(totals.total_debit, expected);
        prop_assert_eq!(totals.total_credit, expected);
    }

    /// Perturbing one amount by more than the tolerance reports the exact difference.
    #[test]
    fn prop_perturbed_entry_unbalanced(
        debits in prop::collection::vec(positive_amount(), 1..8),
        delta in perturbation(),
        index in any::<prop::sample::Index>(),
        increase in any::<bool>(),
    ) {
        let mut lines = balanced_lines(&debits);
        let target = index.index(lines.len());
        let line = &mut lines[target];
        let is_debit = line.debit_amount > Decimal::ZERO;
        let current = if is_debit { line.debit_amount } else { line.credit_amount };

        // Keep the line single-sided: never push an amount to zero or below.
        let shift = if increase || current <= delta { delta } else { -delta };
        if is_debit {
            line.debit_amount += shift;
        } else {
            line.credit_amount += shift;
        }
        let expected = if is_debit { shift } else { -shift };

        let result = validate_entry(make_entry(lines));
        match result {
            Err(ValidationError::Unbalanced { difference, total_debit, total_credit }) => {
                prop_assert_eq!(difference, expected);
                prop_assert_eq!(total_debit - total_credit, difference);
            }
            other => prop_assert!(false, "Expected Unbalanced, got {:?}", other),
        }
    }

    /// A line with both sides positive is always ambiguous.
    #[test]
    fn prop_two_sided_line_rejected(
        debits in prop::collection::vec(positive_amount(), 1..5),
        extra in positive_amount(),
        index in any::<prop::sample::Index>(),
    ) {
        let mut lines = balanced_lines(&debits);
        let target = index.index(lines.len());
        if lines[target].debit_amount > Decimal::ZERO {
            lines[target].credit_amount = extra;
        } else {
            lines[target].debit_amount = extra;
        }

        let result = validate_entry(make_entry(lines));
        prop_assert!(
            matches!(
                result,
                Err(ValidationError::AmbiguousLineSign { line, .. }) if line == target
            ),
            "Expected AmbiguousLineSign at {}, got {:?}",
            target,
            result
        );
    }

    /// A line with both sides zero is always ambiguous.
    #[test]
    fn prop_empty_line_rejected(
        debits in prop::collection::vec(positive_amount(), 1..5),
        index in any::<prop::sample::Index>(),
    ) {
        let mut lines = balanced_lines(&debits);
        let target = index.index(lines.len() + 1);
        lines.insert(target, JournalLine::debit("1.01.01.02", "Banco", Decimal::ZERO));

        let result = validate_entry(make_entry(lines));
        prop_assert!(
            matches!(
                result,
                Err(ValidationError::AmbiguousLineSign { line, .. }) if line == target
            ),
            "Expected AmbiguousLineSign at {}, got {:?}",
            target,
            result
        );
    }
}
