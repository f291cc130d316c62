//! makofind - list every regular file under one or more directory trees.
//!
//! Usage:
//!   makofind DIR...          Print a manifest line per regular file
//!
//! Each line is `<path>\t<size>\t<mtime>\t<physical KiB>`. Symlinks are not
//! followed and mount points are not crossed. Exits non-zero if anything
//! could not be listed.

use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use color_eyre::eyre::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use makofind_core::{DEFAULT_MAX_OPEN_DIRS, RunSummary, WalkConfig};
use makofind_walk::{Driver, ManifestVisitor, Reporter, Walker};

#[derive(Parser)]
#[command(
    name = "makofind",
    version,
    about = "List every regular file under the given directories",
    long_about = "makofind walks each directory tree depth-first without building it in memory \
                  and prints, for every regular file, its logical size, modification time and \
                  physical size in kilobytes."
)]
struct Cli {
    /// Directories to traverse, in order
    #[arg(required = true, value_name = "DIR")]
    roots: Vec<PathBuf>,

    /// Maximum number of directories held open at once (also the depth limit)
    #[arg(long, default_value_t = DEFAULT_MAX_OPEN_DIRS)]
    max_open_dirs: usize,

    /// Stop at the first root that aborts instead of moving on to the next
    #[arg(long)]
    stop_on_abort: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let config = WalkConfig::builder()
        .max_open_dirs(cli.max_open_dirs)
        .stop_on_abort(cli.stop_on_abort)
        .build()
        .context("Invalid walk configuration")?;

    let summary = run(&cli.roots, config);
    log_summary(&summary);

    Ok(if summary.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Walk the roots and write the manifest to stdout.
fn run(roots: &[PathBuf], config: WalkConfig) -> RunSummary {
    let stdout = io::stdout();
    let mut visitor = ManifestVisitor::new(BufWriter::new(stdout.lock()));
    let mut driver = Driver::new(Walker::new(config), Reporter::stderr("makofind"));

    driver.run(roots, &mut visitor)
}

fn log_summary(summary: &RunSummary) {
    info!(
        roots = summary.roots,
        aborted = summary.roots_aborted,
        records = summary.records,
        bytes = %humansize::format_size(summary.bytes, humansize::BINARY),
        errors = summary.errors,
        "manifest complete"
    );
}

fn setup_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "makofind=info,makofind_walk=info,warn",
        _ => "makofind=debug,makofind_walk=debug,warn",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
