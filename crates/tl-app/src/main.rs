//! Command line entry point: load every CSV file of a directory into tables

use std::path::PathBuf;
use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use tl_core::{config::DEFAULT_CONFIG_FILE, AppConfig};
use tl_data::{db, DirectoryWalker, RunSummary};

/// Load every CSV file of a directory into database tables
#[derive(Parser, Debug)]
#[command(name = "csvload")]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON configuration file
    #[arg(default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Directory to scan, overrides `csv_dir` from the config
    csv_dir: Option<PathBuf>,
}

/// Load the config, connect and walk the CSV directory.
///
/// Only config, connection and listing failures are errors; failing files
/// are reported in the summary.
fn run(args: &Args) -> Result<RunSummary> {
    let mut config = AppConfig::load(&args.config)
        .with_context(|| format!("Failed to load config {}", args.config.display()))?;
    if let Some(dir) = &args.csv_dir {
        config = config.with_csv_dir(dir);
    }

    let conn = db::open(&config.database).context("Failed to connect to DB")?;

    let summary = DirectoryWalker::new(&conn)
        .run(&config.csv_dir)
        .context("Failed to process CSV files")?;

    if summary.has_failures() {
        warn!("{} of {} files failed", summary.failed.len(), summary.files_seen());
    }
    info!(
        "{} files loaded, {} rows inserted",
        summary.loaded.len(),
        summary.total_rows()
    );
    Ok(summary)
}

fn main() -> Result<()> {
    // Initialize tracing
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let args = Args::parse();
    run(&args)?;

    println!("All CSV files processed successfully!");
    Ok(())
}
