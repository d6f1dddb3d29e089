//! Tax roles and the accounts mapped to them.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use cuadra_shared::config::CentralizationSettings;
use serde::{Deserialize, Serialize};

use super::error::BuildError;

/// Named role a centralization line plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaxRole {
    /// Output tax (IVA debito fiscal) of the period. Debited.
    OutputTax,
    /// Input tax (IVA credito fiscal) of the period. Credited.
    InputTax,
    /// Credit carried in from the previous period. Credited.
    PriorCredit,
    /// Tax to pay. Credited.
    TaxPayable,
    /// Credit carried to the next period. Debited.
    CarryForwardCredit,
}

impl TaxRole {
    /// Every role, in line order.
    pub const ALL: [Self; 5] = [
        Self::OutputTax,
        Self::InputTax,
        Self::PriorCredit,
        Self::TaxPayable,
        Self::CarryForwardCredit,
    ];

    /// Returns true if the role's line is a debit.
    #[must_use]
    pub fn is_debit(self) -> bool {
        matches!(self, Self::OutputTax | Self::CarryForwardCredit)
    }

    /// Configuration name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OutputTax => "output-tax",
            Self::InputTax => "input-tax",
            Self::PriorCredit => "prior-credit",
            Self::TaxPayable => "tax-payable",
            Self::CarryForwardCredit => "carry-forward-credit",
        }
    }
}

impl fmt::Display for TaxRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaxRole {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| BuildError::UnknownRole(s.to_string()))
    }
}

/// Account a role posts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAccount {
    /// Account code.
    pub code: String,
    /// Account name written on the line.
    pub name: String,
}

/// Role to account mapping supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRoleMap {
    accounts: BTreeMap<TaxRole, RoleAccount>,
}

impl AccountRoleMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps a role to an account.
    #[must_use]
    pub fn with(mut self, role: TaxRole, code: impl Into<String>, name: impl Into<String>) -> Self {
        self.insert(role, code, name);
        self
    }

    /// Maps a role to an account, replacing any previous mapping.
    pub fn insert(&mut self, role: TaxRole, code: impl Into<String>, name: impl Into<String>) {
        self.accounts.insert(
            role,
            RoleAccount {
                code: code.into(),
                name: name.into(),
            },
        );
    }

    /// Account for a role.
    #[must_use]
    pub fn get(&self, role: TaxRole) -> Option<&RoleAccount> {
        self.accounts.get(&role)
    }

    /// Builds the map from configuration.
    ///
    /// # Errors
    ///
    /// `UnknownRole` for role names outside [`TaxRole`].
    pub fn from_settings(settings: &CentralizationSettings) -> Result<Self, BuildError> {
        let mut map = Self::new();
        for (name, account) in &settings.roles {
            map.insert(name.parse()?, account.code.as_str(), account.name.as_str());
        }
        Ok(map)
    }
}
