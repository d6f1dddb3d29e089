//! Command handlers. Each one runs the engine over a snapshot and returns a
//! serializable result.

use chrono::NaiveDate;
use cuadra_core::centralization::{AccountRoleMap, CentralizationEntryBuilder, TaxTotals};
use cuadra_core::chart::ChartLookup;
use cuadra_core::ledger::{
    JournalEntry, JournalEntryValidator, LedgerAccountAggregate, LedgerAggregator, LedgerFilter,
    check_postings, trial_totals,
};
use cuadra_core::worksheet::{Worksheet, WorksheetClassifier};
use cuadra_shared::types::EntryId;
use cuadra_shared::{AppConfig, AppResult};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use crate::snapshot::Snapshot;

/// Outcome of validating one entry.
#[derive(Debug, Serialize)]
pub struct EntryCheck {
    /// Entry id.
    pub entry_id: EntryId,
    /// Entry number.
    pub number: u64,
    /// Stable error code, absent when the entry is valid.
    pub error_code: Option<&'static str>,
    /// Human-readable error.
    pub message: Option<String>,
}

/// Result of the `validate` command.
#[derive(Debug, Serialize)]
pub struct ValidationReport {
    /// Entries checked (reversed entries are skipped).
    pub checked: usize,
    /// Entries that failed.
    pub invalid: usize,
    /// Failures only.
    pub failures: Vec<EntryCheck>,
}

/// Options of the `ledger` command.
#[derive(Debug, Default)]
pub struct LedgerOptions {
    /// Inclusive lower date bound.
    pub from: Option<NaiveDate>,
    /// Inclusive upper date bound.
    pub to: Option<NaiveDate>,
    /// Single account to report.
    pub account: Option<String>,
    /// Include the account's descendants.
    pub subtree: bool,
}

/// Amounts of the `centralize` command.
#[derive(Debug, Default)]
pub struct CentralizeOptions {
    /// Last day of the tax period.
    pub period_end: NaiveDate,
    /// Output tax.
    pub output_tax: Decimal,
    /// Input tax.
    pub input_tax: Decimal,
    /// Credit carried in.
    pub prior_credit: Decimal,
    /// Tax to pay.
    pub tax_payable: Decimal,
    /// Credit carried forward.
    pub carry_forward: Decimal,
    /// Tax form reference.
    pub reference: Option<String>,
}

/// Engine components configured from [`AppConfig`].
pub struct Engine {
    validator: JournalEntryValidator,
    classifier: WorksheetClassifier,
    roles: AccountRoleMap,
}

impl Engine {
    /// Builds the engine tables from configuration.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let tolerance = config.ledger.balance_tolerance;
        Ok(Self {
            validator: JournalEntryValidator::with_tolerance(tolerance),
            classifier: WorksheetClassifier::from_settings(&config.classification)?
                .with_tolerance(tolerance),
            roles: AccountRoleMap::from_settings(&config.centralization)?,
        })
    }

    /// Validates every in-ledger entry and checks its postings against the chart.
    pub fn validate(&self, snapshot: &Snapshot) -> ValidationReport {
        let mut checked = 0;
        let mut failures = Vec::new();

        for entry in snapshot.entries.iter().filter(|e| e.status.is_in_ledger()) {
            checked += 1;
            let outcome = self
                .validator
                .validate(entry.clone())
                .map_err(|e| (e.error_code(), e.to_string()))
                .and_then(|validated| {
                    check_postings(&validated, &snapshot.chart)
                        .map_err(|e| (e.error_code(), e.to_string()))
                });

            if let Err((code, message)) = outcome {
                warn!(
                    entry_id = %entry.id,
                    number = entry.number,
                    error_code = code,
                    "Invalid entry"
                );
                failures.push(EntryCheck {
                    entry_id: entry.id,
                    number: entry.number,
                    error_code: Some(code),
                    message: Some(message),
                });
            }
        }

        info!(checked, invalid = failures.len(), "Entries validated");
        ValidationReport {
            checked,
            invalid: failures.len(),
            failures,
        }
    }

    /// Aggregates the company's ledger.
    pub fn ledger(
        &self,
        snapshot: &Snapshot,
        options: &LedgerOptions,
    ) -> Vec<LedgerAccountAggregate> {
        let mut filter = LedgerFilter::new()
            .company(snapshot.company_id)
            .between(options.from, options.to);
        if let Some(code) = options.account.as_deref() {
            filter = if options.subtree {
                filter.subtree(code)
            } else {
                filter.account(code)
            };
        }
        LedgerAggregator::new(&snapshot.chart).aggregate(&snapshot.entries, &filter)
    }

    /// Builds the worksheet over the whole ledger. `checked` runs the
    /// integrity checks; otherwise the unchecked worksheet is returned.
    pub fn worksheet(&self, snapshot: &Snapshot, checked: bool) -> AppResult<Worksheet> {
        let chart: &dyn ChartLookup = &snapshot.chart;
        let filter = LedgerFilter::new().company(snapshot.company_id);
        let aggregates = LedgerAggregator::new(chart).aggregate(&snapshot.entries, &filter);
        let trial = trial_totals(&aggregates);

        if checked {
            Ok(self
                .classifier
                .classify_with_adjustments(&trial, &snapshot.adjustments, chart)?)
        } else {
            Ok(self.classifier.build(&trial, &snapshot.adjustments, chart))
        }
    }

    /// Builds the IVA centralization entry.
    pub fn centralize(
        &self,
        snapshot: &Snapshot,
        options: CentralizeOptions,
    ) -> AppResult<JournalEntry> {
        let totals = TaxTotals {
            company_id: snapshot.company_id,
            period_end: options.period_end,
            output_tax: options.output_tax,
            input_tax: options.input_tax,
            prior_credit: options.prior_credit,
            tax_payable: options.tax_payable,
            carry_forward_credit: options.carry_forward,
            reference: options.reference,
        };
        Ok(CentralizationEntryBuilder::new(self.validator).build(&totals, &self.roles)?)
    }
}
