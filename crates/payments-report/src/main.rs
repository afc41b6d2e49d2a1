//! TurtleCoin Payments Reconciliation Report
//!
//! Reads a walletd `getTransactions` JSON export, classifies every transfer
//! relative to one wallet address and prints two balance reconciliations
//! against the amounts walletd reported.

mod config;
mod constants;
mod ledger;
mod payments;
mod reports;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use config::{FileConfig, ReportConfig};

#[derive(Parser, Debug)]
#[command(name = "payments-report")]
#[command(about = "Balance reconciliation report for a TurtleCoin wallet payments export")]
struct Args {
    /// Path to the payments JSON export
    file: PathBuf,

    /// Config file with wallet definitions (default: config.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Configured wallet to report on (default: first wallet in config)
    #[arg(short, long)]
    wallet: Option<String>,

    /// Report on this address instead of a configured wallet
    #[arg(long)]
    address: Option<String>,

    /// Report title for --address (default: the address)
    #[arg(long, requires = "address")]
    title: Option<String>,

    /// Also write a summary CSV to this path
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Print totals as JSON instead of the text report
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,payments_report={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Resolve the wallet and currency settings for this run
fn report_config(args: &Args) -> Result<ReportConfig> {
    let file_config = FileConfig::load_or_default(args.config.as_deref())?;
    ReportConfig::from_file(
        &file_config,
        args.wallet.as_deref(),
        args.address.clone(),
        args.title.clone(),
    )
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = report_config(&args)?;
    tracing::debug!("Reporting on {} ({})", config.title, config.self_address);

    let export = payments::load_payments(&args.file)?;
    tracing::debug!(
        "Loaded {}: {} items, {} transactions, {} transfers",
        args.file.display(),
        export.items.len(),
        export.transactions().count(),
        export.transfers().count()
    );

    let totals = ledger::aggregate(&export, &config.self_address)?;
    tracing::debug!("Totals: {:?}", totals);

    for (name, result) in [
        ("Incoming / Outgoing", totals.incoming_outgoing()?),
        ("Sent to others", totals.sent_to_others()?),
    ] {
        if !result.is_balanced() {
            tracing::warn!(
                "{} reconciliation is off by {} {}",
                name,
                reports::format_amount(result.difference, config.decimals),
                config.ticker
            );
        }
    }

    if args.json {
        println!("{}", reports::render_json_report(&totals, &config)?);
    } else {
        reports::print_report(&totals, &config)?;
    }

    if let Some(path) = args.csv {
        reports::generate_summary_csv(&path, &totals, &config)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_single_positional_file() {
        let args = Args::try_parse_from(["payments-report", "payments.json"]).unwrap();
        assert_eq!(args.file, PathBuf::from("payments.json"));
        assert_eq!(args.config, None);
        assert!(!args.json);
    }

    #[test]
    fn test_missing_file_is_usage_error() {
        let err = Args::try_parse_from(["payments-report"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("Usage"));
    }

    #[test]
    fn test_extra_positional_is_usage_error() {
        let err = Args::try_parse_from(["payments-report", "a.json", "b.json"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_title_requires_address() {
        let err = Args::try_parse_from(["payments-report", "a.json", "--title", "@Bot"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_explicit_missing_config_fails() {
        let args = Args::try_parse_from([
            "payments-report",
            "--config",
            "/nonexistent/tipz.toml",
            "payments.json",
        ])
        .unwrap();
        let err = report_config(&args).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/tipz.toml"));
    }

    #[test]
    fn test_address_override_without_config() {
        let address = constants::DEFAULT_WALLET_ADDRESS.replacen("TRTLv", "TRTLx", 1);
        let args =
            Args::try_parse_from(["payments-report", "payments.json", "--address", &address]).unwrap();

        let config = report_config(&args).unwrap();
        assert_eq!(config.self_address, address);
        assert_eq!(config.title, address);
    }
}
