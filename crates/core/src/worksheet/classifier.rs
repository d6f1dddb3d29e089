//! Worksheet classification.
//!
//! Per account: net the trial balance and adjustments into a single-sided
//! adjusted balance, resolve the major class, then route the balance to a
//! terminal column through the override table or the class routing.

use std::collections::BTreeMap;

use cuadra_shared::config::ClassificationSettings;
use rust_decimal::Decimal;
use tracing::{debug, error, warn};

use super::classes::{MajorClassRule, MajorClassTable, Side, TerminalColumn};
use super::error::{ClassificationError, WorksheetError};
use super::overrides::OverrideTable;
use super::types::{Adjustment, ColumnPair, Worksheet, WorksheetRow};
use crate::chart::{AccountCode, ChartLookup};
use crate::ledger::{BALANCE_TOLERANCE, TrialTotal};

/// Classifies trial totals into the 8-column worksheet.
#[derive(Debug, Clone)]
pub struct WorksheetClassifier {
    classes: MajorClassTable,
    overrides: OverrideTable,
    tolerance: Decimal,
}

impl Default for WorksheetClassifier {
    fn default() -> Self {
        Self::new(MajorClassTable::default(), OverrideTable::default())
    }
}

/// Account data gathered before classification.
#[derive(Default)]
struct RowInput {
    name: Option<String>,
    trial_balance: ColumnPair,
    adjustments: ColumnPair,
}

/// Outcome of class resolution for one account.
struct Resolution<'t> {
    rule: Option<&'t MajorClassRule>,
    synthesized: bool,
    summary: bool,
    chart_name: Option<String>,
}

impl WorksheetClassifier {
    /// Creates a classifier with the default balance tolerance.
    #[must_use]
    pub fn new(classes: MajorClassTable, overrides: OverrideTable) -> Self {
        Self {
            classes,
            overrides,
            tolerance: BALANCE_TOLERANCE,
        }
    }

    /// Builds a classifier from configuration.
    ///
    /// # Errors
    ///
    /// Any error building the class or override table.
    pub fn from_settings(settings: &ClassificationSettings) -> Result<Self, ClassificationError> {
        Ok(Self::new(
            MajorClassTable::from_settings(&settings.major_classes)?,
            OverrideTable::from_settings(&settings.overrides)?,
        ))
    }

    /// Sets the tolerance used by the post-condition checks.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: Decimal) -> Self {
        self.tolerance = tolerance.abs();
        self
    }

    /// Classifies trial totals and checks the worksheet.
    ///
    /// # Errors
    ///
    /// `IntegrityViolation` when a column pair does not balance.
    pub fn classify(
        &self,
        trial: &[TrialTotal],
        chart: &dyn ChartLookup,
    ) -> Result<Worksheet, WorksheetError> {
        self.classify_with_adjustments(trial, &[], chart)
    }

    /// Classifies trial totals plus adjustments and checks the worksheet.
    ///
    /// # Errors
    ///
    /// `IntegrityViolation` when a column pair does not balance.
    pub fn classify_with_adjustments(
        &self,
        trial: &[TrialTotal],
        adjustments: &[Adjustment],
        chart: &dyn ChartLookup,
    ) -> Result<Worksheet, WorksheetError> {
        let worksheet = self.build(trial, adjustments, chart);
        if let Err(e) = worksheet.verify() {
            error!(error = %e, "Worksheet failed integrity check");
            return Err(e);
        }
        Ok(worksheet)
    }

    /// Builds the worksheet without checking it.
    ///
    /// Duplicate trial totals for one account are summed. Adjustments for
    /// accounts without trial totals add rows.
    #[must_use]
    pub fn build(
        &self,
        trial: &[TrialTotal],
        adjustments: &[Adjustment],
        chart: &dyn ChartLookup,
    ) -> Worksheet {
        let mut inputs: BTreeMap<AccountCode, RowInput> = BTreeMap::new();

        for total in trial {
            let input = inputs.entry(total.account_code.clone()).or_default();
            input.trial_balance += ColumnPair::new(total.debit, total.credit);
            if input.name.is_none() {
                input.name.clone_from(&total.account_name);
            }
        }
        for adjustment in adjustments {
            let input = inputs.entry(adjustment.account_code.clone()).or_default();
            input.adjustments += ColumnPair::new(adjustment.debit, adjustment.credit);
            if input.name.is_none() {
                input.name.clone_from(&adjustment.account_name);
            }
        }

        let rows: Vec<WorksheetRow> = inputs
            .into_iter()
            .map(|(code, input)| self.classify_row(code, input, chart))
            .collect();

        let worksheet = Worksheet::from_rows(rows, self.tolerance);
        debug!(
            accounts = worksheet.rows.len(),
            net_income = %worksheet.net_income,
            "Worksheet built"
        );
        worksheet
    }

    fn resolve(&self, code: &AccountCode, chart: &dyn ChartLookup) -> Resolution<'_> {
        match chart.lookup(code) {
            Some(account) => Resolution {
                rule: self
                    .classes
                    .rule_for(code)
                    .or_else(|| self.classes.rule_for_class(account.account_type)),
                synthesized: false,
                summary: !account.is_postable,
                chart_name: Some(account.name.clone()),
            },
            None => Resolution {
                rule: self.classes.rule_for(code),
                synthesized: true,
                summary: false,
                chart_name: None,
            },
        }
    }

    fn classify_row(
        &self,
        code: AccountCode,
        input: RowInput,
        chart: &dyn ChartLookup,
    ) -> WorksheetRow {
        let net = input.trial_balance.net() + input.adjustments.net();
        let adjusted_balance = ColumnPair::from_net(net);
        let resolution = self.resolve(&code, chart);

        let routed_to = if net.is_zero() || resolution.summary {
            None
        } else {
            let side = if net > Decimal::ZERO { Side::Debit } else { Side::Credit };
            self.route(&code, side, &resolution)
        };

        let mut income_statement = ColumnPair::default();
        let mut balance_sheet = ColumnPair::default();
        match routed_to {
            Some(TerminalColumn::IncomeStatementDebit) => {
                income_statement.debit = adjusted_balance.debit;
            }
            Some(TerminalColumn::IncomeStatementCredit) => {
                income_statement.credit = adjusted_balance.credit;
            }
            Some(TerminalColumn::BalanceSheetDebit) => balance_sheet.debit = adjusted_balance.debit,
            Some(TerminalColumn::BalanceSheetCredit) => {
                balance_sheet.credit = adjusted_balance.credit;
            }
            None => {}
        }

        WorksheetRow {
            account_name: resolution.chart_name.or(input.name),
            class: resolution.rule.map(|rule| rule.class),
            class_synthesized: resolution.synthesized && resolution.rule.is_some(),
            trial_balance: input.trial_balance,
            adjustments: input.adjustments,
            adjusted_balance,
            income_statement,
            balance_sheet,
            routed_to,
            account_code: code,
        }
    }

    fn route(
        &self,
        code: &AccountCode,
        side: Side,
        resolution: &Resolution<'_>,
    ) -> Option<TerminalColumn> {
        if let Some(rule) = self.overrides.find(code, side) {
            debug!(account = %code, column = %rule.target_column, "Override applied");
            return Some(rule.target_column);
        }

        let Some(rule) = resolution.rule else {
            warn!(account = %code, "No major class for account prefix, balance left unrouted");
            return None;
        };
        if resolution.synthesized {
            warn!(
                account = %code,
                class = %rule.class,
                "Account not in chart, class synthesized from prefix"
            );
        }

        let column = rule.route(side);
        if column.is_none() {
            warn!(
                account = %code,
                class = %rule.class,
                side = side.as_str(),
                "Balance on unexpected side for class, retained with no terminal column"
            );
        }
        column
    }
}

/// Classifies trial totals with the default class table.
///
/// # Errors
///
/// `IntegrityViolation` when a column pair does not balance.
pub fn classify_worksheet(
    trial: &[TrialTotal],
    chart: &dyn ChartLookup,
    overrides: &OverrideTable,
) -> Result<Worksheet, WorksheetError> {
    WorksheetClassifier::new(MajorClassTable::default(), overrides.clone()).classify(trial, chart)
}
