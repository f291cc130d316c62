//! mako-rollup - per-account storage usage of a storage node.
//!
//! Usage:
//!   mako-rollup                      Roll up /manta as Prometheus gauges
//!   mako-rollup --base DIR           Roll up another tree
//!   mako-rollup --format json        Emit the rollup as JSON

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::{ArgAction, Parser, ValueEnum};
use color_eyre::eyre::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use makofind_core::WalkConfig;
use makofind_rollup::{RollupConfig, RollupVisitor};
use makofind_walk::{Driver, Reporter, Walker};

#[derive(Parser)]
#[command(
    name = "mako-rollup",
    version,
    about = "Sum logical bytes and object counts per account"
)]
struct Cli {
    /// Tree whose top-level directories are accounts
    #[arg(long, default_value = "/manta")]
    base: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Prefix for metric names (e.g. "mako_")
    #[arg(long, default_value = "")]
    metric_prefix: String,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Prometheus text exposition format
    #[default]
    Text,
    Json,
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let config = RollupConfig::builder()
        .base(cli.base)
        .metric_prefix(cli.metric_prefix)
        .build()
        .context("Invalid rollup configuration")?;

    let start = Instant::now();
    let mut visitor = RollupVisitor::new(&config);
    let mut driver = Driver::new(
        Walker::new(WalkConfig::default()),
        Reporter::stderr("mako-rollup"),
    );
    let summary = driver.run(&[&config.base], &mut visitor);
    let report = visitor.into_report(start.elapsed(), chrono::Utc::now());

    let total = report.total();
    info!(
        accounts = report.accounts.len(),
        objects = total.objects,
        bytes = %humansize::format_size(total.bytes, humansize::BINARY),
        unattributed_objects = report.unattributed.objects,
        "rollup complete"
    );

    let rendered = match cli.format {
        OutputFormat::Text => report.to_prometheus(&config.metric_prefix),
        OutputFormat::Json => serde_json::to_string_pretty(&report)? + "\n",
    };
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(rendered.as_bytes())
        .and_then(|()| stdout.flush())
        .context("Failed to write rollup")?;

    Ok(if summary.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn setup_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "mako_rollup=info,makofind_walk=info,warn",
        _ => "mako_rollup=debug,makofind_walk=debug,makofind_rollup=debug,warn",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
