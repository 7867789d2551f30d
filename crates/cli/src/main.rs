//! Hearth
//!
//! Estimates a house's annual heating and cooling energy, cost and CO2 for
//! two configurations and reports the difference.

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use hearth_cli::config::Config;

/// Hearth heating and cooling estimator
#[derive(Parser, Debug)]
#[command(name = "hearth", version)]
#[command(about = "Compare a house's annual heating and cooling energy, cost and CO2", long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "hearth.toml")]
    config: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hearth=info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    info!("Starting hearth v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load(&args.config)
        .with_context(|| format!("loading configuration from {}", args.config.display()))?;
    let report = hearth_cli::run(&config).context("simulation failed")?;

    let rendered = match args.format {
        Format::Text => report.to_string(),
        Format::Json => serde_json::to_string_pretty(&report).context("serializing report")?,
    };

    match &args.output {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("writing report to {}", path.display()))?;
            info!("Wrote report to {}", path.display());
        }
        None => println!("{rendered}"),
    }

    Ok(())
}
