//! HeatCal CLI
//!
//! Builds the heating and cooling calendar for the configured month.

#![allow(clippy::print_stdout)]

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use application::{ClassificationService, ForecastPort, ReportService};
use clap::{Parser, Subcommand};
use domain::{CalendarGrid, ClassificationTable, DayClassification};
use infrastructure::{AppConfig, ForecastAdapter, PdfCalendarRenderer, init_logging};
use tracing::{error, info};

/// HeatCal CLI
#[derive(Parser)]
#[command(name = "heatcal")]
#[command(author, version, about = "Heating and cooling calendar generator", long_about = None)]
struct Cli {
    /// Verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (default: ./heatcal.toml if present)
    #[arg(short, long, env = "HEATCAL_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch temperatures, classify each day and write the PDF calendar
    Generate {
        /// Output path (overrides report.output_path)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Fetch temperatures and print the classification table as JSON
    Classify,

    /// Print the empty calendar grid for the configured range
    Layout,
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

/// Classifier wired to the HTTP forecast adapter
fn build_classifier(config: &AppConfig) -> anyhow::Result<ClassificationService> {
    let forecast: Arc<dyn ForecastPort> =
        Arc::new(ForecastAdapter::new(&config.forecast, config.retry.clone())?);
    Ok(
        ClassificationService::new(forecast, config.thresholds()?)
            .with_failure_policy(config.on_provider_error),
    )
}

async fn run(command: Commands, mut config: AppConfig) -> anyhow::Result<()> {
    config.validate().context("Invalid configuration")?;
    let range = config.date_range()?;
    let location = config.geo_location()?;

    match command {
        Commands::Generate { output } => {
            if let Some(output) = output {
                config.report.output_path = output;
            }
            let renderer = Arc::new(PdfCalendarRenderer::new(config.render_config()));
            let service = ReportService::new(build_classifier(&config)?, renderer);

            let summary = service.generate(&range, &location).await?;
            info!(path = %summary.output_path.display(), "Report generated");

            println!("Wrote {}", summary.output_path.display());
            println!(
                "{} days: heating on {} days, cooling on {} days",
                summary.days, summary.heating_days, summary.cooling_days
            );
        },

        Commands::Classify => {
            let table = build_classifier(&config)?
                .classify(&range, &location)
                .await?;
            println!("{}", serde_json::to_string_pretty(&table)?);
        },

        Commands::Layout => {
            let table =
                ClassificationTable::from_days(range, vec![DayClassification::INACTIVE; range.len()])?;
            print!("{}", CalendarGrid::from_table(&table));
        },
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(filter) = log_filter_from_verbosity(cli.verbose) {
        config.telemetry.log_filter = filter.to_string();
    }
    init_logging(&config.telemetry)?;

    if let Err(e) = run(cli.command, config).await {
        error!(error = format!("{e:#}"), "heatcal failed");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
