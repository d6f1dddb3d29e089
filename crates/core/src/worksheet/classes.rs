//! Major class table: default routing keyed on the first code segment.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use cuadra_shared::config::MajorClassSettings;
use serde::{Deserialize, Serialize};

use super::error::ClassificationError;
use crate::chart::{AccountClass, AccountCode};

/// Side of an adjusted balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Debit balance.
    Debit,
    /// Credit balance.
    Credit,
}

impl Side {
    /// Lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debit => "debit",
            Self::Credit => "credit",
        }
    }
}

/// One of the four terminal worksheet columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalColumn {
    /// Loss column.
    IncomeStatementDebit,
    /// Gain column.
    IncomeStatementCredit,
    /// Asset column.
    BalanceSheetDebit,
    /// Liability and equity column.
    BalanceSheetCredit,
}

impl TerminalColumn {
    /// Side the column sits on.
    #[must_use]
    pub fn side(self) -> Side {
        match self {
            Self::IncomeStatementDebit | Self::BalanceSheetDebit => Side::Debit,
            Self::IncomeStatementCredit | Self::BalanceSheetCredit => Side::Credit,
        }
    }

    /// Configuration name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::IncomeStatementDebit => "income_statement_debit",
            Self::IncomeStatementCredit => "income_statement_credit",
            Self::BalanceSheetDebit => "balance_sheet_debit",
            Self::BalanceSheetCredit => "balance_sheet_credit",
        }
    }
}

impl fmt::Display for TerminalColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TerminalColumn {
    type Err = ClassificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "income_statement_debit" => Ok(Self::IncomeStatementDebit),
            "income_statement_credit" => Ok(Self::IncomeStatementCredit),
            "balance_sheet_debit" => Ok(Self::BalanceSheetDebit),
            "balance_sheet_credit" => Ok(Self::BalanceSheetCredit),
            other => Err(ClassificationError::UnknownColumn(other.to_string())),
        }
    }
}

/// Default routing for one major class prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MajorClassRule {
    /// First code segment.
    pub prefix: u64,
    /// Class the prefix denotes.
    pub class: AccountClass,
    /// Where a debit balance goes; `None` retains it with no terminal column.
    pub debit_column: Option<TerminalColumn>,
    /// Where a credit balance goes; `None` retains it with no terminal column.
    pub credit_column: Option<TerminalColumn>,
}

impl MajorClassRule {
    /// Creates a rule with the class's standard routing.
    ///
    /// Assets only route debit balances, liabilities and equity only credit
    /// balances. Income and expense route both sides to the income statement.
    #[must_use]
    pub fn standard(prefix: u64, class: AccountClass) -> Self {
        let (debit_column, credit_column) = match class {
            AccountClass::Asset => (Some(TerminalColumn::BalanceSheetDebit), None),
            AccountClass::Liability | AccountClass::Equity => {
                (None, Some(TerminalColumn::BalanceSheetCredit))
            }
            AccountClass::Income | AccountClass::Expense => (
                Some(TerminalColumn::IncomeStatementDebit),
                Some(TerminalColumn::IncomeStatementCredit),
            ),
        };
        Self {
            prefix,
            class,
            debit_column,
            credit_column,
        }
    }

    /// Terminal column for a balance on `side`.
    #[must_use]
    pub fn route(&self, side: Side) -> Option<TerminalColumn> {
        match side {
            Side::Debit => self.debit_column,
            Side::Credit => self.credit_column,
        }
    }

    fn check_sides(&self) -> Result<(), ClassificationError> {
        for (side, column) in [
            (Side::Debit, self.debit_column),
            (Side::Credit, self.credit_column),
        ] {
            if let Some(column) = column.filter(|column| column.side() != side) {
                return Err(ClassificationError::RuleSideMismatch {
                    rule: format!("class {}", self.prefix),
                    side: side.as_str(),
                    column,
                });
            }
        }
        Ok(())
    }
}

/// Data-driven table from major class prefix to default routing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MajorClassTable {
    rules: BTreeMap<u64, MajorClassRule>,
}

impl Default for MajorClassTable {
    /// 1 asset, 2 liability, 3 equity, 4 income, 5 and 6 expense.
    fn default() -> Self {
        let rules = [
            MajorClassRule::standard(1, AccountClass::Asset),
            MajorClassRule::standard(2, AccountClass::Liability),
            MajorClassRule::standard(3, AccountClass::Equity),
            MajorClassRule::standard(4, AccountClass::Income),
            MajorClassRule::standard(5, AccountClass::Expense),
            MajorClassRule::standard(6, AccountClass::Expense),
        ];
        Self {
            rules: rules.into_iter().map(|rule| (rule.prefix, rule)).collect(),
        }
    }
}

impl MajorClassTable {
    /// Builds a table from explicit rules.
    ///
    /// # Errors
    ///
    /// `DuplicatePrefix` or `RuleSideMismatch`.
    pub fn new(
        rules: impl IntoIterator<Item = MajorClassRule>,
    ) -> Result<Self, ClassificationError> {
        let mut table = BTreeMap::new();
        for rule in rules {
            rule.check_sides()?;
            let prefix = rule.prefix;
            if table.insert(prefix, rule).is_some() {
                return Err(ClassificationError::DuplicatePrefix(prefix));
            }
        }
        Ok(Self { rules: table })
    }

    /// Builds a table from configuration; an empty list gives the default table.
    ///
    /// Missing columns take the class's standard routing.
    ///
    /// # Errors
    ///
    /// Unknown class or column names, or any error of [`MajorClassTable::new`].
    pub fn from_settings(settings: &[MajorClassSettings]) -> Result<Self, ClassificationError> {
        if settings.is_empty() {
            return Ok(Self::default());
        }

        let rules = settings
            .iter()
            .map(|row| -> Result<MajorClassRule, ClassificationError> {
                let class = AccountClass::from_str(&row.class)
                    .map_err(|_| ClassificationError::UnknownClass(row.class.clone()))?;
                let standard = MajorClassRule::standard(row.prefix, class);
                let debit_column = match &row.debit_column {
                    Some(name) => Some(name.parse()?),
                    None => standard.debit_column,
                };
                let credit_column = match &row.credit_column {
                    Some(name) => Some(name.parse()?),
                    None => standard.credit_column,
                };
                Ok(MajorClassRule {
                    debit_column,
                    credit_column,
                    ..standard
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(rules)
    }

    /// Rule for a prefix.
    #[must_use]
    pub fn rule(&self, prefix: u64) -> Option<&MajorClassRule> {
        self.rules.get(&prefix)
    }

    /// Rule for the code's first segment.
    #[must_use]
    pub fn rule_for(&self, code: &AccountCode) -> Option<&MajorClassRule> {
        self.rule(code.major_prefix()?)
    }

    /// First rule of a class; used for chart accounts whose prefix is not in the table.
    #[must_use]
    pub fn rule_for_class(&self, class: AccountClass) -> Option<&MajorClassRule> {
        self.rules.values().find(|rule| rule.class == class)
    }

    /// Iterates rules in prefix order.
    pub fn iter(&self) -> impl Iterator<Item = &MajorClassRule> {
        self.rules.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1.01.01.01", AccountClass::Asset)]
    #[case("2.1.3.002", AccountClass::Liability)]
    #[case("3.01", AccountClass::Equity)]
    #[case("4.01.03.01", AccountClass::Income)]
    #[case("5.01.01", AccountClass::Expense)]
    #[case("6.02", AccountClass::Expense)]
    fn test_default_table_classes(#[case] code: &str, #[case] class: AccountClass) {
        let table = MajorClassTable::default();
        assert_eq!(table.rule_for(&AccountCode::new(code)).map(|r| r.class), Some(class));
    }

    #[test]
    fn test_unknown_prefix() {
        let table = MajorClassTable::default();
        assert!(table.rule_for(&AccountCode::new("9.01")).is_none());
        assert!(table.rule_for(&AccountCode::new("X.01")).is_none());
    }

    #[rstest]
    #[case(AccountClass::Asset, Side::Debit, Some(TerminalColumn::BalanceSheetDebit))]
    #[case(AccountClass::Asset, Side::Credit, None)]
    #[case(AccountClass::Liability, Side::Debit, None)]
    #[case(AccountClass::Equity, Side::Credit, Some(TerminalColumn::BalanceSheetCredit))]
    #[case(AccountClass::Income, Side::Credit, Some(TerminalColumn::IncomeStatementCredit))]
    #[case(AccountClass::Income, Side::Debit, Some(TerminalColumn::IncomeStatementDebit))]
    #[case(AccountClass::Expense, Side::Credit, Some(TerminalColumn::IncomeStatementCredit))]
    fn test_standard_routing(
        #[case] class: AccountClass,
        #[case] side: Side,
        #[case] expected: Option<TerminalColumn>,
    ) {
        assert_eq!(MajorClassRule::standard(1, class).route(side), expected);
    }

    #[test]
    fn test_duplicate_prefix_rejected() {
        let result = MajorClassTable::new([
            MajorClassRule::standard(1, AccountClass::Asset),
            MajorClassRule::standard(1, AccountClass::Expense),
        ]);
        assert_eq!(result, Err(ClassificationError::DuplicatePrefix(1)));
    }

    #[test]
    fn test_side_mismatch_rejected() {
        let rule = MajorClassRule {
            credit_column: Some(TerminalColumn::BalanceSheetDebit),
            ..MajorClassRule::standard(7, AccountClass::Asset)
        };
        assert!(matches!(
            MajorClassTable::new([rule]),
            Err(ClassificationError::RuleSideMismatch { side: "credit", .. })
        ));
    }

    #[test]
    fn test_from_settings() {
        assert_eq!(MajorClassTable::from_settings(&[]).unwrap(), MajorClassTable::default());

        let table = MajorClassTable::from_settings(&[
            MajorClassSettings {
                prefix: 1,
                class: "asset".into(),
                debit_column: None,
                credit_column: Some("balance_sheet_credit".into()),
            },
            MajorClassSettings {
                prefix: 7,
                class: "expense".into(),
                debit_column: None,
                credit_column: None,
            },
        ])
        .unwrap();
        assert_eq!(
            table.rule(1).and_then(|r| r.route(Side::Credit)),
            Some(TerminalColumn::BalanceSheetCredit)
        );
        assert_eq!(table.rule(7).map(|r| r.class), Some(AccountClass::Expense));
        assert!(table.rule(2).is_none());
    }

    #[test]
    fn test_from_settings_rejects_unknown_names() {
        let bad_class = MajorClassSettings {
            prefix: 1,
            class: "memo".into(),
            debit_column: None,
            credit_column: None,
        };
        assert_eq!(
            MajorClassTable::from_settings(&[bad_class]),
            Err(ClassificationError::UnknownClass("memo".into()))
        );

        let bad_column = MajorClassSettings {
            prefix: 1,
            class: "asset".into(),
            debit_column: Some("balance_sheet".into()),
            credit_column: None,
        };
        assert_eq!(
            MajorClassTable::from_settings(&[bad_column]),
            Err(ClassificationError::UnknownColumn("balance_sheet".into()))
        );
    }

    #[test]
    fn test_column_parse() {
        assert_eq!(
            "income_statement_credit".parse::<TerminalColumn>(),
            Ok(TerminalColumn::IncomeStatementCredit)
        );
        assert_eq!(TerminalColumn::BalanceSheetCredit.side(), Side::Credit);
        assert_eq!(TerminalColumn::BalanceSheetDebit.to_string(), "balance_sheet_debit");
    }
}
