//! Double-entry bookkeeping logic.
//!
//! This module implements the ledger side of the engine:
//! - Journal entries, lines and their lifecycle
//! - Entry validation (balance and single-sided line invariants)
//! - Ledger aggregation with running balances
//! - Error types for ledger operations

pub mod aggregate;
pub mod entry;
pub mod error;
pub mod validation;

#[cfg(test)]
mod aggregate_props;
#[cfg(test)]
mod validation_props;

pub use aggregate::{
    LedgerAccountAggregate, LedgerAggregator, LedgerFilter, Movement, TrialTotal, aggregate_ledger,
    trial_totals,
};
pub use entry::{EntryKind, EntryStatus, JournalEntry, JournalLine};
pub use error::{ApproveError, LifecycleError, PostingError, ValidationError};
pub use validation::{
    BALANCE_TOLERANCE, EntryTotals, JournalEntryValidator, ValidatedEntry, check_postings,
    validate_entry,
};
