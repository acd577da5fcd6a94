//! CLI entry point for the listings ETL.

use airbnb_etl::{
    EtlConfig, EtlPipeline, render_cleaning_summary, render_load_summary, render_quality_summary,
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Clean the input listings file and write the canonical CSV (default)
    Clean,
    /// Score the data quality of every dataset in the data directory
    Evaluate,
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Airbnb listings cleaning and data-quality pipeline",
    long_about = "Cleans a raw Airbnb listings table into a canonical CSV and reports \
                  data-quality scores before and after.\n\n\
                  EXAMPLES:\n  \
                  # Clean Datasource/airbnb.xlsx into Datasource/airbnb_clean.csv\n  \
                  airbnb-etl\n\n  \
                  # Clean a CSV export and keep a JSON report\n  \
                  airbnb-etl clean -i airbnb.csv -r airbnb_report.json\n\n  \
                  # Score every dataset in a directory\n  \
                  airbnb-etl evaluate --data-dir data/"
)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Directory holding the source datasets and receiving the output
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Raw listings file, relative to the data directory
    #[arg(short, long, global = true)]
    input: Option<String>,

    /// Cleaned CSV file, relative to the data directory
    #[arg(short, long, global = true)]
    output: Option<String>,

    /// Also write a JSON report with this name to the data directory
    #[arg(short, long, global = true)]
    report: Option<String>,

    /// Load the configuration from a JSON file; flags override its values
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// chrono format of the host-registration date
    #[arg(long, global = true)]
    date_format: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output JSON to stdout instead of the human-readable summary
    ///
    /// Disables all logs so stdout carries only the JSON document.
    #[arg(long, global = true)]
    json: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Configuration file (or defaults) with command-line overrides applied.
fn build_config(args: &Args) -> Result<EtlConfig> {
    let mut config = match &args.config {
        Some(path) => EtlConfig::from_json_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => EtlConfig::default(),
    };

    if let Some(dir) = &args.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(input) = &args.input {
        config.input_file = input.clone();
    }
    if let Some(output) = &args.output {
        config.output_file = output.clone();
    }
    if let Some(report) = &args.report {
        config.report_file = Some(report.clone());
    }
    if let Some(format) = &args.date_format {
        config.date_format = format.clone();
    }

    config.validate()?;
    Ok(config)
}

fn run_clean(pipeline: &EtlPipeline, json: bool) -> Result<()> {
    let outcome = match pipeline.run() {
        Ok(outcome) => outcome,
        Err(e) => {
            if e.is_schema_violation() {
                error!(
                    "{} does not match the expected listings layout ({})",
                    pipeline.config().input_path().display(),
                    e.error_code()
                );
            }
            return Err(e.into());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.to_etl_report())?);
        return Ok(());
    }

    println!("\n{}", "=".repeat(60));
    println!("{}", render_quality_summary(&outcome.metrics_before));
    println!("\n{}", render_cleaning_summary(&outcome.report));
    println!("\n{}", render_quality_summary(&outcome.metrics_after));
    println!("{}", "=".repeat(60));
    println!("Cleaned dataset: {}", outcome.output_path.display());
    if let Some(path) = &outcome.report_path {
        println!("Report: {}", path.display());
    }
    Ok(())
}

fn run_evaluate(pipeline: &EtlPipeline, json: bool) -> Result<()> {
    let evaluation = pipeline.evaluate_directory()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&evaluation)?);
        return Ok(());
    }

    if evaluation.files.is_empty() {
        println!(
            "No CSV or spreadsheet files in {}",
            evaluation.data_dir.display()
        );
        return Ok(());
    }

    println!("{}", render_load_summary(&evaluation.files));
    for m in &evaluation.metrics {
        println!("\n{}", render_quality_summary(m));
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    let config = build_config(&args)?;
    let pipeline = EtlPipeline::new(config);
    let command = args.command.unwrap_or(Command::Clean);
    info!("Running {:?}", command);

    match command {
        Command::Clean => run_clean(&pipeline, args.json),
        Command::Evaluate => run_evaluate(&pipeline, args.json),
    }
}
