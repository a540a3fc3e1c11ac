//! Read command - backup overview

use anyhow::{Context, Result};
use clap::Args;
use shotmarker::report::BackupSummary;
use shotmarker::{BackupReader, ReportConfig};
use std::path::PathBuf;

/// Arguments for the read command
#[derive(Args)]
pub struct ReadArgs {
    /// Extracted backup folder containing data.txt
    pub dir: PathBuf,
}

/// Execute the read command
pub fn execute(args: ReadArgs, config: &ReportConfig) -> Result<()> {
    let reader = BackupReader::open(&args.dir)?;
    println!("Using data directory: {}", args.dir.display());

    let summary = BackupSummary::collect(&reader, config)
        .with_context(|| format!("Failed to read backup: {}", args.dir.display()))?;
    print!("{}", summary);
    Ok(())
}
