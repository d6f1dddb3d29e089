//! Property-based tests for ledger aggregation.

use chrono::NaiveDate;
use cuadra_shared::types::CompanyId;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::aggregate::{LedgerFilter, aggregate_ledger};
use super::entry::{EntryKind, EntryStatus, JournalEntry, JournalLine};

fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// `(day, amount, cash_is_debit)` per entry.
fn movements() -> impl Strategy<Value = Vec<(u32, Decimal, bool)>> {
    prop::collection::vec((1u32..28, positive_amount(), any::<bool>()), 1..20)
}

fn build_entries(company: CompanyId, specs: &[(u32, Decimal, bool)]) -> Vec<JournalEntry> {
    specs
        .iter()
        .enumerate()
        .map(|(i, (day, amount, cash_is_debit))| {
            let (cash, other) = if *cash_is_debit {
                (
                    JournalLine::debit("1.01.01.01", "Caja", *amount),
                    JournalLine::credit("4.01.03.01", "Ventas", *amount),
                )
            } else {
                (
                    JournalLine::credit("1.01.01.01", "Caja", *amount),
                    JournalLine::debit("5.01.01", "Gastos", *amount),
                )
            };
            let mut entry = JournalEntry::draft(
                company,
                NaiveDate::from_ymd_opt(2024, 5, *day).unwrap(),
                "Generated",
                EntryKind::Manual,
                vec![cash, other],
            );
            entry.number = u64::try_from(i).unwrap() + 1;
            entry.status = EntryStatus::Approved;
            entry
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The result depends on the sort key only, never on input order.
    #[test]
    fn prop_aggregation_ignores_input_order(
        specs in movements(),
        shuffle_seed in any::<u64>(),
    ) {
        let entries = build_entries(CompanyId::new(), &specs);
        let mut shuffled = entries.clone();
        // Deterministic permutation driven by the seed.
        let len = shuffled.len();
        let mut state = shuffle_seed;
        for i in (1..len).rev() {
            state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
            let j = usize::try_from(state >> 33).unwrap() % (i + 1);
            shuffled.swap(i, j);
        }

        prop_assert_eq!(
            aggregate_ledger(&entries, &LedgerFilter::new()),
            aggregate_ledger(&shuffled, &LedgerFilter::new())
        );
    }

    /// The last running balance equals the balance, and totals match the lines.
    #[test]
    fn prop_running_balance_ends_at_balance(specs in movements()) {
        let entries = build_entries(CompanyId::new(), &specs);
        for aggregate in aggregate_ledger(&entries, &LedgerFilter::new()) {
            let last = aggregate.movements.last().map(|m| m.running_balance);
            prop_assert_eq!(last, Some(aggregate.balance));
            prop_assert_eq!(aggregate.balance, aggregate.total_debit - aggregate.total_credit);

            let mut previous = None;
            for movement in &aggregate.movements {
                if let Some((date, number)) = previous {
                    prop_assert!((movement.date, movement.entry_number) >= (date, number));
                }
                previous = Some((movement.date, movement.entry_number));
            }
        }
    }

    /// Aggregating every account keeps the books balanced.
    #[test]
    fn prop_total_balance_is_zero(specs in movements()) {
        let entries = build_entries(CompanyId::new(), &specs);
        let sum: Decimal = aggregate_ledger(&entries, &LedgerFilter::new())
            .iter()
            .map(|a| a.balance)
            .sum();
        prop_assert_eq!(sum, Decimal::ZERO);
    }
}
