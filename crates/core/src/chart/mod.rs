//! Chart of accounts.
//!
//! The chart is a static reference table: account code to name, class and
//! hierarchy. The rest of the engine only reads it through [`ChartLookup`],
//! and a missing code is always an ordinary `None`, never an error.

pub mod account;
pub mod code;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use account::{Account, AccountClass};
pub use code::{AccountCode, Segment};

/// Read access to account metadata.
pub trait ChartLookup: Send + Sync {
    /// Returns the account for `code`, or `None` when it is not on file.
    fn lookup(&self, code: &AccountCode) -> Option<&Account>;
}

/// A lookup with no accounts on file; every code is unknown.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyChart;

impl ChartLookup for EmptyChart {
    fn lookup(&self, _code: &AccountCode) -> Option<&Account> {
        None
    }
}

/// What chart administration may do with an account being removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRemoval {
    /// The account has postings or children: keep it, mark it inactive.
    Deactivate,
    /// Nothing references the account: it can be hard-deleted.
    Delete,
}

/// Ordered chart of accounts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Account>", into = "Vec<Account>")]
pub struct ChartOfAccounts {
    accounts: BTreeMap<AccountCode, Account>,
}

impl ChartOfAccounts {
    /// Creates an empty chart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an account, returning the replaced one.
    pub fn insert(&mut self, account: Account) -> Option<Account> {
        self.accounts.insert(account.code.clone(), account)
    }

    /// Number of accounts on file.
    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Returns true if the chart has no accounts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Iterates accounts in code order.
    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    /// Direct children of `code`.
    pub fn children<'a>(&'a self, code: &'a AccountCode) -> impl Iterator<Item = &'a Account> + 'a {
        self.descendants(code)
            .filter(move |account| account.code.depth() == code.depth() + 1)
    }

    /// Every account strictly below `code`.
    pub fn descendants<'a>(
        &'a self,
        code: &'a AccountCode,
    ) -> impl Iterator<Item = &'a Account> + 'a {
        self.accounts
            .values()
            .filter(move |account| account.code.is_descendant_of(code))
    }

    /// Returns true if any account lies below `code`.
    #[must_use]
    pub fn has_descendants(&self, code: &AccountCode) -> bool {
        self.descendants(code).next().is_some()
    }

    /// Decides how an account may be removed.
    ///
    /// Accounts with postings or descendants are soft-deleted (deactivated);
    /// all others may be hard-deleted. Returns `None` for unknown codes.
    #[must_use]
    pub fn removal_for(&self, code: &AccountCode, has_postings: bool) -> Option<AccountRemoval> {
        self.accounts.get(code)?;
        if has_postings || self.has_descendants(code) {
            Some(AccountRemoval::Deactivate)
        } else {
            Some(AccountRemoval::Delete)
        }
    }
}

impl ChartLookup for ChartOfAccounts {
    fn lookup(&self, code: &AccountCode) -> Option<&Account> {
        self.accounts.get(code)
    }
}

impl FromIterator<Account> for ChartOfAccounts {
    fn from_iter<I: IntoIterator<Item = Account>>(iter: I) -> Self {
        let mut chart = Self::new();
        for account in iter {
            chart.insert(account);
        }
        chart
    }
}

impl From<Vec<Account>> for ChartOfAccounts {
    fn from(accounts: Vec<Account>) -> Self {
        accounts.into_iter().collect()
    }
}

impl From<ChartOfAccounts> for Vec<Account> {
    fn from(chart: ChartOfAccounts) -> Self {
        chart.accounts.into_values().collect()
    }
}
