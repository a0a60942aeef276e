mod config;
mod pipeline;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

use ocrflow_config::{collect_redacted_paths, redact, OcrflowConfig, SinkKind, ValidationReport};
use ocrflow_logging::init_logger;
use ocrflow_worker::BatchSummary;

use config::Overrides;

#[derive(Parser)]
#[command(name = "ocrflow")]
#[command(about = "Batch OCR pipeline: route each document to a light or heavy engine and log the result")]
#[command(version)]
struct Cli {
    /// Config file (default: $OCRFLOW_CONFIG_DIR/config.yaml or ~/.ocrflow/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one pass over the batch and exit
    Run {
        /// JSON or NDJSON manifest of documents; the demo batch when omitted
        #[arg(long)]
        manifest: Option<PathBuf>,
        /// Size threshold in MiB between the light and heavy engine
        #[arg(long)]
        threshold_mb: Option<f64>,
        /// Where to write log records
        #[arg(long)]
        sink: Option<SinkKind>,
        /// File for the ndjson and sqlite sinks
        #[arg(long)]
        sink_path: Option<PathBuf>,
    },
    /// Show the signal and engine a file would be routed to, without running OCR
    Classify {
        path: PathBuf,
        #[arg(long)]
        threshold_mb: Option<f64>,
    },
    /// Print the effective configuration and validation findings
    Config,
}

impl Commands {
    fn overrides(&self) -> Overrides {
        match self {
            Commands::Run {
                manifest,
                threshold_mb,
                sink,
                sink_path,
            } => Overrides {
                threshold_mb: *threshold_mb,
                sink: *sink,
                sink_path: sink_path.clone(),
                manifest: manifest.clone(),
            },
            Commands::Classify { threshold_mb, .. } => Overrides {
                threshold_mb: *threshold_mb,
                ..Default::default()
            },
            Commands::Config => Overrides::default(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, report) = config::resolve(cli.config.as_deref(), &cli.command.overrides()).await?;

    init_logger(config.log_level(), config.log_dir().map(Path::new));

    match cli.command {
        Commands::Run { .. } => {
            ensure_valid(&report)?;
            let summary = run_batch(&config).await?;
            print_summary(&summary);
        }
        Commands::Classify { path, .. } => {
            ensure_valid(&report)?;
            let router = pipeline::build_router(&config);
            let decision = router
                .decide(&path.display().to_string())
                .await
                .with_context(|| format!("Cannot classify {}", path.display()))?;
            println!("{}", serde_json::to_string_pretty(&decision)?);
        }
        Commands::Config => {
            print_config(&config, &report)?;
            if !report.is_valid() {
                bail!("configuration has {} error(s)", report.errors.len());
            }
        }
    }

    Ok(())
}

fn ensure_valid(report: &ValidationReport) -> Result<()> {
    for warning in &report.warnings {
        warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for err in &report.errors {
        error!(path = %err.path, message = %err.message, "Config error");
    }
    if !report.is_valid() {
        bail!(
            "configuration has {} error(s); run `ocrflow config` for details",
            report.errors.len()
        );
    }
    Ok(())
}

async fn run_batch(config: &OcrflowConfig) -> Result<BatchSummary> {
    info!(
        threshold_mb = config.threshold_mb(),
        manifest = config.manifest().unwrap_or("<demo>"),
        "Starting ocrflow batch"
    );
    let worker = pipeline::build_worker(config)?;
    worker.run_once().await.context("Batch aborted")
}

// Stdout may carry sink rows, so the summary goes to stderr.
fn print_summary(summary: &BatchSummary) {
    eprintln!("run {}", summary.run_id);
    for doc in &summary.documents {
        let mut line = format!("  {:<20} {:<10} {}", doc.doc_id, doc.ocr_engine, doc.status);
        if let Some(err) = &doc.error_message {
            line.push_str(&format!("  ({err})"));
        }
        if let Some(err) = &doc.sink_error {
            line.push_str(&format!("  [sink: {err}]"));
        }
        eprintln!("{line}");
    }
    eprintln!(
        "processed={} succeeded={} failed={} sink_failures={}",
        summary.processed(),
        summary.succeeded(),
        summary.failed(),
        summary.sink_failures()
    );
}

fn print_config(config: &OcrflowConfig, report: &ValidationReport) -> Result<()> {
    let value = serde_json::to_value(config)?;
    let redacted = redact(&value);
    print!("{}", serde_yaml::to_string(&redacted)?);

    let masked = collect_redacted_paths(&value);
    if !masked.is_empty() {
        println!("# redacted: {}", masked.join(", "));
    }
    for warning in &report.warnings {
        println!("# warning {}: {}", warning.path, warning.message);
    }
    for err in &report.errors {
        println!("# error {}: {}", err.path, err.message);
    }
    Ok(())
}
