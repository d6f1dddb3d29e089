//! Ledger aggregation: per-account movements, totals and running balances.
//!
//! Aggregates are derived values recomputed from whatever entry snapshot the
//! caller supplies. Balances follow the debit-positive convention
//! (`balance = total_debit - total_credit`).

use std::collections::BTreeMap;

use chrono::NaiveDate;
use cuadra_shared::types::{CompanyId, EntryId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::entry::{JournalEntry, JournalLine};
use crate::chart::{AccountCode, ChartLookup, EmptyChart};

/// Selects which entries and lines take part in an aggregation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerFilter {
    /// Only entries of this company.
    pub company_id: Option<CompanyId>,
    /// Inclusive lower date bound.
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper date bound.
    pub date_to: Option<NaiveDate>,
    /// Only lines posted to this account.
    pub account_code: Option<AccountCode>,
    /// With `account_code`, also keep lines posted below it.
    #[serde(default)]
    pub include_descendants: bool,
}

impl LedgerFilter {
    /// A filter that keeps every in-ledger entry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to one company.
    #[must_use]
    pub fn company(mut self, company_id: CompanyId) -> Self {
        self.company_id = Some(company_id);
        self
    }

    /// Restricts to an inclusive date window. Either bound may be open.
    #[must_use]
    pub fn between(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }

    /// Restricts to a single account.
    #[must_use]
    pub fn account(mut self, code: impl Into<AccountCode>) -> Self {
        self.account_code = Some(code.into());
        self
    }

    /// Restricts to an account and every account below it.
    #[must_use]
    pub fn subtree(mut self, code: impl Into<AccountCode>) -> Self {
        self.account_code = Some(code.into());
        self.include_descendants = true;
        self
    }

    fn admits_entry(&self, entry: &JournalEntry) -> bool {
        entry.status.is_in_ledger()
            && self.company_id.is_none_or(|id| id == entry.company_id)
            && self.date_from.is_none_or(|from| entry.entry_date >= from)
            && self.date_to.is_none_or(|to| entry.entry_date <= to)
    }

    fn admits_account(&self, code: &AccountCode) -> bool {
        match &self.account_code {
            None => true,
            Some(wanted) if self.include_descendants => code.is_within(wanted),
            Some(wanted) => code == wanted,
        }
    }
}

/// One posting to an account, as it appears in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Movement {
    /// Entry the posting belongs to.
    pub entry_id: EntryId,
    /// Entry date.
    pub date: NaiveDate,
    /// Entry number.
    pub entry_number: u64,
    /// Line description, falling back to the entry description.
    pub description: String,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Cumulative debit minus credit after this movement.
    pub running_balance: Decimal,
}

/// Movements and totals for one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerAccountAggregate {
    /// Account code.
    pub account_code: AccountCode,
    /// Chart name, or the most recent line snapshot for unknown accounts.
    pub account_name: String,
    /// Movements ordered by `(date, entry number)`.
    pub movements: Vec<Movement>,
    /// Sum of debits.
    pub total_debit: Decimal,
    /// Sum of credits.
    pub total_credit: Decimal,
    /// `total_debit - total_credit`.
    pub balance: Decimal,
}

/// Gross debit and credit totals for one account; worksheet input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialTotal {
    /// Account code.
    pub account_code: AccountCode,
    /// Best-known account name.
    #[serde(default)]
    pub account_name: Option<String>,
    /// Total debits.
    pub debit: Decimal,
    /// Total credits.
    pub credit: Decimal,
}

impl TrialTotal {
    /// Creates an unnamed trial total.
    #[must_use]
    pub fn new(account_code: impl Into<AccountCode>, debit: Decimal, credit: Decimal) -> Self {
        Self {
            account_code: account_code.into(),
            account_name: None,
            debit,
            credit,
        }
    }

    /// Sets the account name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.account_name = Some(name.into());
        self
    }
}

impl From<&LedgerAccountAggregate> for TrialTotal {
    fn from(aggregate: &LedgerAccountAggregate) -> Self {
        Self {
            account_code: aggregate.account_code.clone(),
            account_name: Some(aggregate.account_name.clone()),
            debit: aggregate.total_debit,
            credit: aggregate.total_credit,
        }
    }
}

/// A line paired with its entry, carrying the sort key.
struct Posting<'e> {
    entry: &'e JournalEntry,
    line_index: usize,
    line: &'e JournalLine,
}

impl Posting<'_> {
    fn sort_key(&self) -> (NaiveDate, u64, EntryId, usize) {
        (
            self.entry.entry_date,
            self.entry.number,
            self.entry.id,
            self.line_index,
        )
    }
}

/// Builds ledger aggregates from an entry snapshot.
#[derive(Clone, Copy)]
pub struct LedgerAggregator<'c> {
    chart: &'c dyn ChartLookup,
}

impl Default for LedgerAggregator<'_> {
    fn default() -> Self {
        Self { chart: &EmptyChart }
    }
}

impl<'c> LedgerAggregator<'c> {
    /// Creates an aggregator that names accounts from `chart`.
    #[must_use]
    pub fn new(chart: &'c dyn ChartLookup) -> Self {
        Self { chart }
    }

    /// Aggregates the entries admitted by `filter`, one result per account,
    /// in account code order.
    #[must_use]
    pub fn aggregate(
        &self,
        entries: &[JournalEntry],
        filter: &LedgerFilter,
    ) -> Vec<LedgerAccountAggregate> {
        let mut groups: BTreeMap<AccountCode, Vec<Posting<'_>>> = BTreeMap::new();

        for entry in entries.iter().filter(|entry| filter.admits_entry(entry)) {
            for (line_index, line) in entry.lines.iter().enumerate() {
                let code = AccountCode::new(&line.account_code);
                if !filter.admits_account(&code) {
                    continue;
                }
                groups.entry(code).or_default().push(Posting {
                    entry,
                    line_index,
                    line,
                });
            }
        }

        let aggregates: Vec<LedgerAccountAggregate> = groups
            .into_iter()
            .map(|(code, postings)| self.aggregate_account(code, postings))
            .collect();

        debug!(
            entries = entries.len(),
            accounts = aggregates.len(),
            "Ledger aggregated"
        );
        aggregates
    }

    fn aggregate_account(
        &self,
        code: AccountCode,
        mut postings: Vec<Posting<'_>>,
    ) -> LedgerAccountAggregate {
        postings.sort_by_key(Posting::sort_key);

        let total_debit: Decimal = postings.iter().map(|p| p.line.debit_amount).sum();
        let total_credit: Decimal = postings.iter().map(|p| p.line.credit_amount).sum();

        let mut running = Decimal::ZERO;
        let movements: Vec<Movement> = postings
            .iter()
            .map(|posting| {
                running += posting.line.signed_amount();
                Movement {
                    entry_id: posting.entry.id,
                    date: posting.entry.entry_date,
                    entry_number: posting.entry.number,
                    description: posting
                        .line
                        .description
                        .clone()
                        .unwrap_or_else(|| posting.entry.description.clone()),
                    debit: posting.line.debit_amount,
                    credit: posting.line.credit_amount,
                    running_balance: running,
                }
            })
            .collect();

        let account_name = match self.chart.lookup(&code) {
            Some(account) => account.name.clone(),
            None => postings
                .last()
                .map(|posting| posting.line.account_name.clone())
                .unwrap_or_default(),
        };

        LedgerAccountAggregate {
            account_code: code,
            account_name,
            movements,
            total_debit,
            total_credit,
            balance: total_debit - total_credit,
        }
    }
}

/// Aggregates entries without chart metadata; names come from the lines.
#[must_use]
pub fn aggregate_ledger(
    entries: &[JournalEntry],
    filter: &LedgerFilter,
) -> Vec<LedgerAccountAggregate> {
    LedgerAggregator::default().aggregate(entries, filter)
}

/// Reduces aggregates to one trial total per account.
#[must_use]
pub fn trial_totals(aggregates: &[LedgerAccountAggregate]) -> Vec<TrialTotal> {
    aggregates.iter().map(TrialTotal::from).collect()
}
