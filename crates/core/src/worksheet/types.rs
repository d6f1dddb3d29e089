//! Worksheet data types.

use std::fmt;
use std::ops::{Add, AddAssign};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::classes::TerminalColumn;
use super::error::WorksheetError;
use crate::chart::{AccountClass, AccountCode};

/// A debit/credit column pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnPair {
    /// Debit column.
    pub debit: Decimal,
    /// Credit column.
    pub credit: Decimal,
}

impl ColumnPair {
    /// Creates a pair.
    #[must_use]
    pub fn new(debit: Decimal, credit: Decimal) -> Self {
        Self { debit, credit }
    }

    /// Single-sided pair from a debit-positive net amount.
    #[must_use]
    pub fn from_net(net: Decimal) -> Self {
        if net > Decimal::ZERO {
            Self::new(net, Decimal::ZERO)
        } else {
            Self::new(Decimal::ZERO, -net)
        }
    }

    /// `debit - credit`.
    #[must_use]
    pub fn net(&self) -> Decimal {
        self.debit - self.credit
    }

    /// Returns true if both columns are zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.debit.is_zero() && self.credit.is_zero()
    }

    /// Returns true if debit and credit agree within `tolerance`.
    #[must_use]
    pub fn balances(&self, tolerance: Decimal) -> bool {
        self.net().abs() < tolerance
    }

    fn check(&self, column: WorksheetColumn, tolerance: Decimal) -> Result<(), WorksheetError> {
        if self.balances(tolerance) {
            Ok(())
        } else {
            Err(WorksheetError::IntegrityViolation {
                column,
                expected: self.debit,
                actual: self.credit,
            })
        }
    }
}

impl Add for ColumnPair {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.debit + rhs.debit, self.credit + rhs.credit)
    }
}

impl AddAssign for ColumnPair {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// Column pairs of the 8-column worksheet, named in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorksheetColumn {
    /// Gross ledger totals.
    TrialBalance,
    /// Manual adjustments.
    Adjustments,
    /// Net of trial balance and adjustments.
    AdjustedBalance,
    /// Loss and gain columns.
    IncomeStatement,
    /// Asset and liability columns.
    BalanceSheet,
}

impl fmt::Display for WorksheetColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::TrialBalance => "trial_balance",
            Self::Adjustments => "adjustments",
            Self::AdjustedBalance => "adjusted_balance",
            Self::IncomeStatement => "income_statement",
            Self::BalanceSheet => "balance_sheet",
        })
    }
}

/// Manual adjustment to one account's trial balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjustment {
    /// Account adjusted.
    pub account_code: AccountCode,
    /// Account name for accounts without trial totals.
    #[serde(default)]
    pub account_name: Option<String>,
    /// Debit adjustment.
    #[serde(default)]
    pub debit: Decimal,
    /// Credit adjustment.
    #[serde(default)]
    pub credit: Decimal,
    /// Why the adjustment was made.
    #[serde(default)]
    pub description: Option<String>,
}

impl Adjustment {
    /// Debit adjustment.
    #[must_use]
    pub fn debit(account_code: impl Into<AccountCode>, amount: Decimal) -> Self {
        Self {
            account_code: account_code.into(),
            account_name: None,
            debit: amount,
            credit: Decimal::ZERO,
            description: None,
        }
    }

    /// Credit adjustment.
    #[must_use]
    pub fn credit(account_code: impl Into<AccountCode>, amount: Decimal) -> Self {
        Self {
            credit: amount,
            debit: Decimal::ZERO,
            ..Self::debit(account_code, Decimal::ZERO)
        }
    }
}

/// One account on the worksheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorksheetRow {
    /// Account code.
    pub account_code: AccountCode,
    /// Best-known account name.
    pub account_name: Option<String>,
    /// Resolved major class; `None` when the prefix is not in the table.
    pub class: Option<AccountClass>,
    /// True when the class came from the code prefix because the chart has
    /// no such account.
    pub class_synthesized: bool,
    /// Gross ledger totals.
    pub trial_balance: ColumnPair,
    /// Manual adjustments.
    pub adjustments: ColumnPair,
    /// Single-sided net of trial balance and adjustments.
    pub adjusted_balance: ColumnPair,
    /// Loss/gain columns.
    pub income_statement: ColumnPair,
    /// Asset/liability columns.
    pub balance_sheet: ColumnPair,
    /// Terminal column the adjusted balance was routed to.
    pub routed_to: Option<TerminalColumn>,
}

impl WorksheetRow {
    /// Returns true if a non-zero adjusted balance reached no terminal column.
    #[must_use]
    pub fn is_unrouted(&self) -> bool {
        self.routed_to.is_none() && !self.adjusted_balance.is_zero()
    }
}

/// Column totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WorksheetTotals {
    /// Trial balance totals.
    pub trial_balance: ColumnPair,
    /// Adjustment totals.
    pub adjustments: ColumnPair,
    /// Adjusted balance totals.
    pub adjusted_balance: ColumnPair,
    /// Income statement totals.
    pub income_statement: ColumnPair,
    /// Balance sheet totals.
    pub balance_sheet: ColumnPair,
}

impl WorksheetTotals {
    /// Sums the rows.
    #[must_use]
    pub fn of(rows: &[WorksheetRow]) -> Self {
        rows.iter().fold(Self::default(), |mut totals, row| {
            totals.trial_balance += row.trial_balance;
            totals.adjustments += row.adjustments;
            totals.adjusted_balance += row.adjusted_balance;
            totals.income_statement += row.income_statement;
            totals.balance_sheet += row.balance_sheet;
            totals
        })
    }
}

/// The period result row that closes the income statement into the balance sheet.
///
/// A profit sits in the income statement debit and balance sheet credit
/// columns; a loss in the income statement credit and balance sheet debit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodResult {
    /// `Σ income_statement.credit - Σ income_statement.debit`.
    pub net_income: Decimal,
    /// Plug into the income statement columns.
    pub income_statement: ColumnPair,
    /// Plug into the balance sheet columns.
    pub balance_sheet: ColumnPair,
}

/// Terminal column totals after the result plug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClosingTotals {
    /// Income statement totals including the result.
    pub income_statement: ColumnPair,
    /// Balance sheet totals including the result.
    pub balance_sheet: ColumnPair,
}

/// Balance sheet summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BalanceSheetSummary {
    /// Σ balance sheet debit.
    pub assets: Decimal,
    /// Σ balance sheet credit.
    pub liabilities_and_equity: Decimal,
    /// Net income carried into equity.
    pub result: Decimal,
    /// Whether assets equal liabilities, equity and result within the
    /// worksheet's tolerance.
    pub is_balanced: bool,
}

/// Income statement summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IncomeStatementSummary {
    /// Σ income statement credit.
    pub gains: Decimal,
    /// Σ income statement debit.
    pub losses: Decimal,
    /// `gains - losses`.
    pub net_income: Decimal,
}

/// The 8-column worksheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Worksheet {
    /// Rows in account code order.
    pub rows: Vec<WorksheetRow>,
    /// Column totals.
    pub totals: WorksheetTotals,
    /// `Σ income_statement.credit - Σ income_statement.debit`.
    pub net_income: Decimal,
    /// Balance tolerance the worksheet is checked against.
    pub tolerance: Decimal,
}

impl Worksheet {
    /// Builds a worksheet from classified rows, computing totals.
    #[must_use]
    pub fn from_rows(rows: Vec<WorksheetRow>, tolerance: Decimal) -> Self {
        let totals = WorksheetTotals::of(&rows);
        let net_income = totals.income_statement.credit - totals.income_statement.debit;
        Self {
            rows,
            totals,
            net_income,
            tolerance: tolerance.abs(),
        }
    }

    /// Row for an account code.
    #[must_use]
    pub fn row(&self, code: &str) -> Option<&WorksheetRow> {
        let code = AccountCode::new(code);
        self.rows.iter().find(|row| row.account_code == code)
    }

    /// Checks every column pair.
    ///
    /// Trial balance, adjustments and adjusted balance must balance on their
    /// own; the balance sheet must balance once the result is plugged in.
    ///
    /// # Errors
    ///
    /// `IntegrityViolation` for the first pair that does not balance within
    /// the worksheet's tolerance.
    pub fn verify(&self) -> Result<(), WorksheetError> {
        let tolerance = self.tolerance;
        self.totals
            .trial_balance
            .check(WorksheetColumn::TrialBalance, tolerance)?;
        self.totals
            .adjustments
            .check(WorksheetColumn::Adjustments, tolerance)?;
        self.totals
            .adjusted_balance
            .check(WorksheetColumn::AdjustedBalance, tolerance)?;
        self.closing_totals()
            .balance_sheet
            .check(WorksheetColumn::BalanceSheet, tolerance)
    }

    /// The period result row.
    #[must_use]
    pub fn result(&self) -> PeriodResult {
        let profit = self.net_income.max(Decimal::ZERO);
        let loss = (-self.net_income).max(Decimal::ZERO);
        PeriodResult {
            net_income: self.net_income,
            income_statement: ColumnPair::new(profit, loss),
            balance_sheet: ColumnPair::new(loss, profit),
        }
    }

    /// Terminal column totals with the result row added.
    #[must_use]
    pub fn closing_totals(&self) -> ClosingTotals {
        let result = self.result();
        ClosingTotals {
            income_statement: self.totals.income_statement + result.income_statement,
            balance_sheet: self.totals.balance_sheet + result.balance_sheet,
        }
    }

    /// Balance sheet summary.
    #[must_use]
    pub fn balance_sheet(&self) -> BalanceSheetSummary {
        let closing = self.closing_totals().balance_sheet;
        BalanceSheetSummary {
            assets: self.totals.balance_sheet.debit,
            liabilities_and_equity: self.totals.balance_sheet.credit,
            result: self.net_income,
            is_balanced: closing.balances(self.tolerance),
        }
    }

    /// Income statement summary.
    #[must_use]
    pub fn income_statement(&self) -> IncomeStatementSummary {
        IncomeStatementSummary {
            gains: self.totals.income_statement.credit,
            losses: self.totals.income_statement.debit,
            net_income: self.net_income,
        }
    }

    /// Rows whose balance reached no terminal column.
    pub fn unrouted(&self) -> impl Iterator<Item = &WorksheetRow> {
        self.rows.iter().filter(|row| row.is_unrouted())
    }
}
