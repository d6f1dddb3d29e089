//! IVA centralization entry.

use chrono::NaiveDate;
use cuadra_shared::types::CompanyId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::BuildError;
use super::roles::{AccountRoleMap, TaxRole};
use crate::ledger::{EntryKind, JournalEntry, JournalEntryValidator, JournalLine};

/// Tax totals for one period, computed outside the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxTotals {
    /// Company the entry is for.
    pub company_id: CompanyId,
    /// Last day of the tax period; the entry date.
    pub period_end: NaiveDate,
    /// Output tax of the period.
    #[serde(default)]
    pub output_tax: Decimal,
    /// Input tax of the period.
    #[serde(default)]
    pub input_tax: Decimal,
    /// Credit carried in from the previous period.
    #[serde(default)]
    pub prior_credit: Decimal,
    /// Tax to pay.
    #[serde(default)]
    pub tax_payable: Decimal,
    /// Credit carried to the next period.
    #[serde(default)]
    pub carry_forward_credit: Decimal,
    /// Tax form folio or other reference.
    #[serde(default)]
    pub reference: Option<String>,
}

impl TaxTotals {
    /// Amount for a role.
    #[must_use]
    pub fn amount(&self, role: TaxRole) -> Decimal {
        match role {
            TaxRole::OutputTax => self.output_tax,
            TaxRole::InputTax => self.input_tax,
            TaxRole::PriorCredit => self.prior_credit,
            TaxRole::TaxPayable => self.tax_payable,
            TaxRole::CarryForwardCredit => self.carry_forward_credit,
        }
    }
}

/// Assembles the centralization entry and validates it.
#[derive(Debug, Clone, Copy, Default)]
pub struct CentralizationEntryBuilder {
    validator: JournalEntryValidator,
}

impl CentralizationEntryBuilder {
    /// Creates a builder that validates with `validator`.
    #[must_use]
    pub fn new(validator: JournalEntryValidator) -> Self {
        Self { validator }
    }

    /// Builds a draft `tax_form` entry.
    ///
    /// One line per role with a non-zero amount: output tax and carried
    /// forward credit are debits, input tax, prior credit and tax payable
    /// are credits.
    ///
    /// # Errors
    ///
    /// `MissingAccountRole` when a non-zero amount has no account, `Invalid`
    /// when the lines do not validate.
    pub fn build(
        &self,
        totals: &TaxTotals,
        accounts: &AccountRoleMap,
    ) -> Result<JournalEntry, BuildError> {
        let mut lines = Vec::with_capacity(TaxRole::ALL.len());
        for role in TaxRole::ALL {
            let amount = totals.amount(role);
            if amount.is_zero() {
                continue;
            }
            let account = accounts
                .get(role)
                .ok_or(BuildError::MissingAccountRole { role })?;
            let line = if role.is_debit() {
                JournalLine::debit(&account.code, &account.name, amount)
            } else {
                JournalLine::credit(&account.code, &account.name, amount)
            };
            lines.push(line.with_description(role.as_str()));
        }

        let mut entry = JournalEntry::draft(
            totals.company_id,
            totals.period_end,
            format!("IVA centralization {}", totals.period_end.format("%Y-%m")),
            EntryKind::TaxForm,
            lines,
        );
        entry.reference.clone_from(&totals.reference);

        let validated = self.validator.validate(entry)?;
        debug!(
            company_id = %totals.company_id,
            period_end = %totals.period_end,
            lines = validated.entry().lines.len(),
            "Centralization entry built"
        );
        Ok(validated.into_entry())
    }
}

/// Builds the centralization entry with the default tolerance.
///
/// # Errors
///
/// See [`CentralizationEntryBuilder::build`].
pub fn build_centralization_entry(
    totals: &TaxTotals,
    accounts: &AccountRoleMap,
) -> Result<JournalEntry, BuildError> {
    CentralizationEntryBuilder::default().build(totals, accounts)
}
