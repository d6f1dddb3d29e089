//! Cuadra command-line host
//!
//! Loads a JSON snapshot of a company's books, runs the ledger and worksheet
//! engine over it and prints JSON to stdout. Logs go to stderr.

mod commands;
mod snapshot;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use cuadra_shared::AppConfig;
use cuadra_shared::config::LoggingSettings;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use commands::{CentralizeOptions, Engine, LedgerOptions};
use snapshot::Snapshot;

#[derive(Parser)]
#[command(
    name = "cuadra",
    version,
    about = "Double-entry ledger and 8-column worksheet engine",
    long_about = "Validates journal entries, aggregates the general ledger, \
                  classifies the 8-column worksheet and builds the IVA \
                  centralization entry from a JSON snapshot of a company's books."
)]
struct Cli {
    /// Snapshot file (`-` for stdin)
    #[arg(short, long, global = true, default_value = "-", env = "CUADRA_SNAPSHOT")]
    snapshot: PathBuf,

    /// Configuration directory
    #[arg(long, global = true, default_value = "config")]
    config_dir: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate every draft and approved entry
    Validate,

    /// Aggregated general ledger
    Ledger {
        /// First date (YYYY-MM-DD), inclusive
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last date (YYYY-MM-DD), inclusive
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Only this account
        #[arg(short, long)]
        account: Option<String>,
        /// Include accounts below --account
        #[arg(long, requires = "account")]
        subtree: bool,
    },

    /// 8-column worksheet
    Worksheet {
        /// Print the worksheet even if it fails the integrity checks
        #[arg(long)]
        unchecked: bool,
    },

    /// IVA centralization entry
    #[command(alias = "iva")]
    Centralize {
        /// Last day of the tax period (YYYY-MM-DD)
        #[arg(long)]
        period_end: NaiveDate,
        /// Output tax
        #[arg(long, default_value = "0")]
        output_tax: Decimal,
        /// Input tax
        #[arg(long, default_value = "0")]
        input_tax: Decimal,
        /// Credit carried in from the previous period
        #[arg(long, default_value = "0")]
        prior_credit: Decimal,
        /// Tax to pay
        #[arg(long, default_value = "0")]
        tax_payable: Decimal,
        /// Credit carried to the next period
        #[arg(long, default_value = "0")]
        carry_forward: Decimal,
        /// Tax form folio
        #[arg(long)]
        reference: Option<String>,
    },
}

fn init_tracing(settings: &LoggingSettings) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.filter));
    let registry = tracing_subscriber::registry().with(filter);
    if settings.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{out}");
    Ok(())
}

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = AppConfig::load_from(&cli.config_dir).context("Failed to load configuration")?;
    init_tracing(&config.logging);

    let engine = Engine::from_config(&config)?;
    let snapshot = Snapshot::load(&cli.snapshot)?;

    match cli.command {
        Commands::Validate => {
            let report = engine.validate(&snapshot);
            print_json(&report)?;
            if report.invalid > 0 {
                std::process::exit(1);
            }
        }
        Commands::Ledger {
            from,
            to,
            account,
            subtree,
        } => {
            let options = LedgerOptions {
                from,
                to,
                account,
                subtree,
            };
            print_json(&engine.ledger(&snapshot, &options))?;
        }
        Commands::Worksheet { unchecked } => match engine.worksheet(&snapshot, !unchecked) {
            Ok(worksheet) => print_json(&worksheet)?,
            Err(e) => {
                error!(error = %e, error_code = e.error_code(), "Worksheet rejected");
                return Err(e.into());
            }
        },
        Commands::Centralize {
            period_end,
            output_tax,
            input_tax,
            prior_credit,
            tax_payable,
            carry_forward,
            reference,
        } => {
            let options = CentralizeOptions {
                period_end,
                output_tax,
                input_tax,
                prior_credit,
                tax_payable,
                carry_forward,
                reference,
            };
            print_json(&engine.centralize(&snapshot, options)?)?;
        }
    }

    Ok(())
}
