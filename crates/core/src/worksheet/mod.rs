//! 8-column worksheet.
//!
//! Trial balance, adjustments, adjusted balance, income statement and
//! balance sheet, classified through two data tables: the major class table
//! keyed on the first code segment, and per-account override rules.

pub mod classes;
pub mod classifier;
pub mod error;
pub mod overrides;
pub mod types;


pub use classes::{MajorClassRule, MajorClassTable, Side, TerminalColumn};
pub use classifier::{WorksheetClassifier, classify_worksheet};
pub use error::{ClassificationError, WorksheetError};
pub use overrides::{AccountOverrideRule, OverrideCondition, OverrideTable};
pub use types::{
    Adjustment, BalanceSheetSummary, ClosingTotals, ColumnPair, IncomeStatementSummary,
    PeriodResult, Worksheet, WorksheetColumn, WorksheetRow, WorksheetTotals,
};
