//! Per-account routing exceptions.
//!
//! Overrides are evaluated before the major class routing; the first rule
//! matching an account and its balance side wins and suppresses the default.
//! The typical case is an input VAT credit asset that ends the period with a
//! credit balance and belongs in the liability column.

use std::fmt;
use std::str::FromStr;

use cuadra_shared::config::OverrideSettings;
use serde::{Deserialize, Serialize};

use super::classes::{Side, TerminalColumn};
use super::error::ClassificationError;
use crate::chart::AccountCode;

/// Balance condition an override applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideCondition {
    /// The adjusted balance is a debit.
    DebitBalance,
    /// The adjusted balance is a credit.
    CreditBalance,
}

impl OverrideCondition {
    /// Balance side the condition matches.
    #[must_use]
    pub fn side(self) -> Side {
        match self {
            Self::DebitBalance => Side::Debit,
            Self::CreditBalance => Side::Credit,
        }
    }
}

impl fmt::Display for OverrideCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::DebitBalance => "debit_balance",
            Self::CreditBalance => "credit_balance",
        })
    }
}

impl FromStr for OverrideCondition {
    type Err = ClassificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "debit_balance" => Ok(Self::DebitBalance),
            "credit_balance" => Ok(Self::CreditBalance),
            other => Err(ClassificationError::UnknownCondition(other.to_string())),
        }
    }
}

/// Routes one account's balance on one side to a fixed column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountOverrideRule {
    /// Exact account code.
    pub account_code: AccountCode,
    /// Side of the balance the rule applies to.
    pub condition: OverrideCondition,
    /// Column the balance is routed to.
    pub target_column: TerminalColumn,
}

impl AccountOverrideRule {
    /// Creates a rule.
    ///
    /// # Errors
    ///
    /// `RuleSideMismatch` when the target column is on the other side from
    /// the condition.
    pub fn new(
        account_code: impl Into<AccountCode>,
        condition: OverrideCondition,
        target_column: TerminalColumn,
    ) -> Result<Self, ClassificationError> {
        let account_code = account_code.into();
        if target_column.side() != condition.side() {
            return Err(ClassificationError::RuleSideMismatch {
                rule: account_code.to_string(),
                side: condition.side().as_str(),
                column: target_column,
            });
        }
        Ok(Self {
            account_code,
            condition,
            target_column,
        })
    }

    /// Returns true if the rule applies to `code` with a balance on `side`.
    #[must_use]
    pub fn matches(&self, code: &AccountCode, side: Side) -> bool {
        &self.account_code == code && self.condition.side() == side
    }
}

/// Ordered override rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideTable {
    rules: Vec<AccountOverrideRule>,
}

impl OverrideTable {
    /// Creates a table; rules are tried in the given order.
    #[must_use]
    pub fn new(rules: Vec<AccountOverrideRule>) -> Self {
        Self { rules }
    }

    /// Builds a table from configuration.
    ///
    /// # Errors
    ///
    /// Unknown condition or column names, or a side mismatch.
    pub fn from_settings(settings: &[OverrideSettings]) -> Result<Self, ClassificationError> {
        let rules = settings
            .iter()
            .map(|row| -> Result<AccountOverrideRule, ClassificationError> {
                AccountOverrideRule::new(
                    row.account_code.as_str(),
                    row.condition.parse()?,
                    row.target_column.parse()?,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(rules))
    }

    /// First rule matching the account and balance side.
    #[must_use]
    pub fn find(&self, code: &AccountCode, side: Side) -> Option<&AccountOverrideRule> {
        self.rules.iter().find(|rule| rule.matches(code, side))
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if there are no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl FromIterator<AccountOverrideRule> for OverrideTable {
    fn from_iter<I: IntoIterator<Item = AccountOverrideRule>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
