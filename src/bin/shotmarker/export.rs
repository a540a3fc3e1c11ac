//! Export command - matches to JSON

use anyhow::{Context, Result};
use clap::Args;
use shotmarker::report::{export_matches, write_matches};
use shotmarker::{BackupReader, ReportConfig};
use std::path::PathBuf;

/// Arguments for the export command
#[derive(Args)]
pub struct ExportArgs {
    /// Extracted backup folder containing data.txt
    pub dir: PathBuf,

    /// Output JSON file
    #[arg(short, long, default_value = "matches.json")]
    pub output: PathBuf,
}

/// Execute the export command
pub fn execute(args: ExportArgs, config: &ReportConfig) -> Result<()> {
    let reader = BackupReader::open(&args.dir)?;
    println!("Extracting match data from: {}", args.dir.display());

    let outcome = export_matches(&reader, config)
        .with_context(|| format!("Failed to export matches from {}", args.dir.display()))?;
    write_matches(&args.output, &outcome.matches)?;

    println!("Extracted {} matches to {}", outcome.matches.len(), args.output.display());
    println!();
    print!("{}", outcome);
    Ok(())
}
