//! Application configuration management.
//!
//! Settings are plain data: the engine crate turns the classification and
//! centralization sections into its own typed tables and reports bad values
//! from there.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Ledger configuration.
    #[serde(default)]
    pub ledger: LedgerSettings,
    /// Worksheet classification tables.
    #[serde(default)]
    pub classification: ClassificationSettings,
    /// Tax centralization account roles.
    #[serde(default)]
    pub centralization: CentralizationSettings,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Ledger configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerSettings {
    /// Maximum accepted difference between total debits and credits.
    #[serde(default = "default_balance_tolerance")]
    pub balance_tolerance: Decimal,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            balance_tolerance: default_balance_tolerance(),
        }
    }
}

fn default_balance_tolerance() -> Decimal {
    Decimal::new(1, 2) // 0.01
}

/// Worksheet classification configuration.
///
/// An empty `major_classes` list means "use the built-in table".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassificationSettings {
    /// Major class table keyed on the first account code segment.
    #[serde(default)]
    pub major_classes: Vec<MajorClassSettings>,
    /// Per-account routing exceptions.
    #[serde(default)]
    pub overrides: Vec<OverrideSettings>,
}

/// One row of the major class table.
#[derive(Debug, Clone, Deserialize)]
pub struct MajorClassSettings {
    /// First code segment, e.g. `1` for `1.01.05.01`.
    pub prefix: u64,
    /// Class name: `asset`, `liability`, `equity`, `income` or `expense`.
    pub class: String,
    /// Terminal column for a debit balance, if any.
    #[serde(default)]
    pub debit_column: Option<String>,
    /// Terminal column for a credit balance, if any.
    #[serde(default)]
    pub credit_column: Option<String>,
}

/// One per-account routing exception.
#[derive(Debug, Clone, Deserialize)]
pub struct OverrideSettings {
    /// Exact account code the rule applies to.
    pub account_code: String,
    /// `debit_balance` or `credit_balance`.
    pub condition: String,
    /// Terminal column the balance is routed to.
    pub target_column: String,
}

/// Tax centralization configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CentralizationSettings {
    /// Role name (`output-tax`, `input-tax`, ...) to account.
    #[serde(default)]
    pub roles: BTreeMap<String, RoleAccountSettings>,
}

/// Account mapped to a centralization role.
#[derive(Debug, Clone, Deserialize)]
pub struct RoleAccountSettings {
    /// Account code.
    pub code: String,
    /// Account name written on the generated line.
    pub name: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

fn default_log_filter() -> String {
    "cuadra=info".to_string()
}

impl AppConfig {
    /// Loads configuration from `config/` files and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Loads configuration from `{dir}/default.toml`, `{dir}/{RUN_MODE}.toml`
    /// and `CUADRA__*` environment variables, later sources winning.
    ///
    /// # Errors
    ///
    /// Returns an error if a source is malformed, a value has the wrong type
    /// or the balance tolerance is not positive.
    pub fn load_from(dir: &str) -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name(&format!("{dir}/default")).required(false))
            .add_source(config::File::with_name(&format!("{dir}/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("CUADRA").separator("__"))
            .build()?;

        config.try_deserialize::<Self>()?.validated()
    }

    /// Parses configuration from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed or the balance tolerance
    /// is not positive.
    pub fn from_toml(source: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize::<Self>()?
            .validated()
    }

    fn validated(self) -> Result<Self, config::ConfigError> {
        // A zero tolerance would reject every entry, balanced or not.
        if self.ledger.balance_tolerance <= Decimal::ZERO {
            return Err(config::ConfigError::Message(format!(
                "ledger.balance_tolerance must be positive, got {}",
                self.ledger.balance_tolerance
            )));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults_without_sources() {
        temp_env::with_vars_unset(["CUADRA__LEDGER__BALANCE_TOLERANCE", "RUN_MODE"], || {
            let config = AppConfig::load_from("does-not-exist").unwrap();
            assert_eq!(config.ledger.balance_tolerance, dec!(0.01));
            assert!(config.classification.major_classes.is_empty());
            assert!(config.classification.overrides.is_empty());
            assert!(config.centralization.roles.is_empty());
            assert_eq!(config.logging.filter, "cuadra=info");
            assert!(!config.logging.json);
        });
    }

    #[test]
    fn test_environment_overrides_tolerance() {
        temp_env::with_var("CUADRA__LEDGER__BALANCE_TOLERANCE", Some("0.5"), || {
            let config = AppConfig::load_from("does-not-exist").unwrap();
            assert_eq!(config.ledger.balance_tolerance, dec!(0.5));
        });
    }

    #[test]
    fn test_non_positive_tolerance_is_rejected() {
        for value in ["0", "-0.01"] {
            temp_env::with_var("CUADRA__LEDGER__BALANCE_TOLERANCE", Some(value), || {
                let err = AppConfig::load_from("does-not-exist").unwrap_err();
                assert!(err.to_string().contains("balance_tolerance must be positive"));
            });
        }

        let result = AppConfig::from_toml(
            r#"
            [ledger]
            balance_tolerance = "0"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_from_toml_full_document() {
        let config = AppConfig::from_toml(
            r#"
            [ledger]
            balance_tolerance = "0.001"

            [[classification.major_classes]]
            prefix = 1
            class = "asset"
            debit_column = "balance_sheet_debit"

            [[classification.major_classes]]
            prefix = 7
            class = "expense"
            debit_column = "income_statement_debit"
            credit_column = "income_statement_credit"

            [[classification.overrides]]
            account_code = "1.01.05.01"
            condition = "credit_balance"
            target_column = "balance_sheet_credit"

            [centralization.roles.output-tax]
            code = "2.01.07.01"
            name = "IVA Debito Fiscal"

            [logging]
            filter = "cuadra=debug"
            json = true
            "#,
        )
        .unwrap();

        assert_eq!(config.ledger.balance_tolerance, dec!(0.001));
        assert_eq!(config.classification.major_classes.len(), 2);
        assert_eq!(config.classification.major_classes[1].prefix, 7);
        assert_eq!(config.classification.major_classes[0].credit_column, None);
        assert_eq!(config.classification.overrides[0].account_code, "1.01.05.01");
        assert_eq!(config.centralization.roles["output-tax"].code, "2.01.07.01");
        assert_eq!(config.logging.filter, "cuadra=debug");
        assert!(config.logging.json);
    }

    #[test]
    fn test_from_toml_rejects_wrong_types() {
        let result = AppConfig::from_toml(
            r#"
            [[classification.major_classes]]
            prefix = "one"
            class = "asset"
            "#,
        );
        assert!(result.is_err());
    }
}
