//! Core engine for Cuadra.
//!
//! This crate contains pure bookkeeping logic with ZERO web or database dependencies.
//! Every operation takes an immutable snapshot (entries, chart, tables) and
//! returns new values.
//!
//! # Modules
//!
//! - `chart` - Chart of accounts and hierarchical account codes
//! - `ledger` - Journal entries, validation and ledger aggregation
//! - `worksheet` - 8-column worksheet classification
//! - `centralization` - IVA centralization entry

pub mod centralization;
pub mod chart;
pub mod ledger;
pub mod worksheet;
