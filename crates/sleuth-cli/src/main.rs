//! `sleuth` - run every lookup for one email address and print the report.

use anyhow::Context;
use clap::Parser;
use sleuth_core::AppConfig;
use sleuth_scanner::{Investigator, Report};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "sleuth", version, about = "Email OSINT lookups")]
struct Args {
    /// Email address to investigate
    #[arg(required_unless_present = "save_config")]
    email: Option<String>,

    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Also write the JSON report to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of lookups allowed to run at once
    #[arg(short, long)]
    workers: Option<usize>,

    /// Per-lookup timeout in seconds (0 disables)
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Configuration file to use instead of the default location
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the effective configuration to the default location and exit
    #[arg(long)]
    save_config: bool,
}

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,sleuth=info"));

    // stdout carries only the report
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_config(args: &Args) -> anyhow::Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let mut config = AppConfig::load_from(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?;
            config.apply_env(|name| std::env::var(name).ok());
            config
        }
        None => AppConfig::load_with_env().context("failed to load config")?,
    };

    apply_flags(&mut config, args);
    config.validate().context("invalid configuration")?;
    Ok(config)
}

/// Command-line flags win over file and environment values.
fn apply_flags(config: &mut AppConfig, args: &Args) {
    if let Some(workers) = args.workers {
        config.scanning.worker_pool_width = workers;
    }
    if let Some(timeout) = args.timeout {
        config.scanning.task_timeout_secs = timeout;
    }
}

fn emit(report: &Report, args: &Args) -> anyhow::Result<()> {
    if args.json || args.output.is_some() {
        let json = serde_json::to_string_pretty(report).context("failed to serialize report")?;

        if let Some(path) = &args.output {
            std::fs::write(path, &json)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            info!("Report written to {}", path.display());
        }
        if args.json {
            println!("{json}");
            return Ok(());
        }
    }

    print!("{report}");
    Ok(())
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = load_config(&args)?;

    if args.save_config {
        config.save().context("failed to save config")?;
        let path = AppConfig::config_path()?;
        info!("Configuration written to {}", path.display());
        return Ok(());
    }

    // Guaranteed by clap unless --save-config was given
    let Some(email) = args.email.as_deref() else {
        anyhow::bail!("no email address given");
    };

    let investigator = Investigator::from_config(&config)?;
    let report = investigator.investigate(email).await?;
    emit(&report, &args)
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    info!("Starting Sleuth v{}", env!("CARGO_PKG_VERSION"));

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let args = Args::try_parse_from(["sleuth", "alice@example.com"]).expect("parse args");
        assert_eq!(args.email.as_deref(), Some("alice@example.com"));
        assert!(!args.json);
        assert!(args.output.is_none());
    }

    #[test]
    fn test_email_required() {
        assert!(Args::try_parse_from(["sleuth"]).is_err());
        assert!(Args::try_parse_from(["sleuth", "--save-config"]).is_ok());
    }

    #[test]
    fn test_flags_override_config() {
        let args = Args::try_parse_from([
            "sleuth",
            "alice@example.com",
            "--workers",
            "4",
            "--timeout",
            "0",
            "--json",
        ])
        .expect("parse args");

        let mut config = AppConfig::default();
        apply_flags(&mut config, &args);

        assert_eq!(config.scanning.worker_pool_width, 4);
        assert_eq!(config.scanning.task_timeout_secs, 0);
        assert!(args.json);
    }

    #[test]
    fn test_missing_explicit_config_is_error() {
        let args = Args::try_parse_from([
            "sleuth",
            "alice@example.com",
            "--config",
            "/nonexistent/sleuth/config.toml",
        ])
        .expect("parse args");

        assert!(load_config(&args).is_err());
    }
}
