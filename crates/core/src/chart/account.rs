//! Chart of accounts entries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::code::AccountCode;

/// Major account class.
///
/// Debit-normal classes (asset, expense) carry a positive balance under the
/// ledger's debit-minus-credit convention; the others carry a negative one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountClass {
    /// Asset (class 1).
    Asset,
    /// Liability (class 2).
    Liability,
    /// Equity (class 3).
    Equity,
    /// Income (class 4).
    Income,
    /// Expense (classes 5 and 6).
    Expense,
}

impl AccountClass {
    /// Returns true for asset and expense accounts.
    #[must_use]
    pub fn is_debit_normal(self) -> bool {
        matches!(self, Self::Asset | Self::Expense)
    }

    /// Returns true for classes reported on the income statement.
    #[must_use]
    pub fn is_nominal(self) -> bool {
        matches!(self, Self::Income | Self::Expense)
    }

    /// Lowercase name used in configuration.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl fmt::Display for AccountClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asset" => Ok(Self::Asset),
            "liability" => Ok(Self::Liability),
            "equity" => Ok(Self::Equity),
            "income" | "revenue" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown account class: {s}")),
        }
    }
}

/// An account in the chart of accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Hierarchical code, e.g. `1.01.05.01`.
    pub code: AccountCode,
    /// Display name.
    pub name: String,
    /// Major class, declared by chart administration.
    pub account_type: AccountClass,
    /// Leaf accounts accept postings; summary nodes only group children.
    #[serde(default = "default_true")]
    pub is_postable: bool,
    /// Weak reference to the parent node. Not an ownership relation.
    #[serde(default)]
    pub parent_code: Option<AccountCode>,
    /// Deactivated accounts stay on file for historical postings.
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl Account {
    /// Creates an active, postable account whose parent is derived from its code.
    #[must_use]
    pub fn new(
        code: impl Into<AccountCode>,
        name: impl Into<String>,
        account_type: AccountClass,
    ) -> Self {
        let code = code.into();
        let parent_code = code.parent();
        Self {
            code,
            name: name.into(),
            account_type,
            is_postable: true,
            parent_code,
            is_active: true,
        }
    }

    /// Creates a summary (non-postable) account.
    #[must_use]
    pub fn summary(
        code: impl Into<AccountCode>,
        name: impl Into<String>,
        account_type: AccountClass,
    ) -> Self {
        Self {
            is_postable: false,
            ..Self::new(code, name, account_type)
        }
    }

    /// Returns a deactivated copy of this account.
    #[must_use]
    pub fn deactivated(self) -> Self {
        Self {
            is_active: false,
            ..self
        }
    }
}
