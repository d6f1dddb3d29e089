//! Tax centralization.
//!
//! Turns externally computed IVA totals into one balanced `tax_form`
//! journal entry, posting each amount to the account mapped to its role.

pub mod builder;
pub mod error;
pub mod roles;

pub use builder::{CentralizationEntryBuilder, TaxTotals, build_centralization_entry};
pub use error::BuildError;
pub use roles::{AccountRoleMap, RoleAccount, TaxRole};
