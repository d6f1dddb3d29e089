//! Books snapshot read by every command.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use cuadra_core::chart::ChartOfAccounts;
use cuadra_core::ledger::JournalEntry;
use cuadra_core::worksheet::Adjustment;
use cuadra_shared::types::CompanyId;
use serde::Deserialize;

/// A company's books as exported by the persistence layer.
#[derive(Debug, Deserialize)]
pub struct Snapshot {
    /// Company the books belong to.
    pub company_id: CompanyId,
    /// Chart of accounts.
    #[serde(default)]
    pub chart: ChartOfAccounts,
    /// Journal entries in any status.
    #[serde(default)]
    pub entries: Vec<JournalEntry>,
    /// Worksheet adjustments.
    #[serde(default)]
    pub adjustments: Vec<Adjustment>,
}

impl Snapshot {
    /// Reads a snapshot from a JSON file, or from stdin when `path` is `-`.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = if path == Path::new("-") {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read snapshot from stdin")?;
            buf
        } else {
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read snapshot {}", path.display()))?
        };
        Self::parse(&raw)
    }

    /// Parses a snapshot document.
    pub fn parse(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("Malformed snapshot")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_snapshot() {
        let snapshot =
            Snapshot::parse(r#"{"company_id": "0190a1b2-0000-7000-8000-000000000002"}"#).unwrap();
        assert!(snapshot.chart.is_empty());
        assert!(snapshot.entries.is_empty());
        assert!(snapshot.adjustments.is_empty());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Snapshot::parse("not json").is_err());
    }
}
