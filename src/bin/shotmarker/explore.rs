//! Explore command - string file classification and session detail

use anyhow::{Context, Result};
use clap::Args;
use shotmarker::report::{Exploration, examine_string_file};
use shotmarker::{BackupReader, ReportConfig};
use std::path::PathBuf;

/// Arguments for the explore command
#[derive(Args)]
pub struct ExploreArgs {
    /// Extracted backup folder containing data.txt
    pub dir: PathBuf,

    /// String file id to examine in detail
    pub id: Option<String>,
}

/// Execute the explore command
pub fn execute(args: ExploreArgs, config: &ReportConfig) -> Result<()> {
    let reader = BackupReader::open(&args.dir)?;

    if let Some(id) = args.id {
        let detail = examine_string_file(&reader, &id, config)
            .with_context(|| format!("Failed to examine string file {}", id))?;
        print!("{}", detail);
        return Ok(());
    }

    let exploration = Exploration::collect(&reader, config)?;
    print!("{}", exploration);

    let example = exploration.analyses.first().map(|a| a.id.as_str()).unwrap_or("1715436178223");
    println!();
    println!("To examine a specific file, run: shotmarker explore {} <id>", args.dir.display());
    println!("Example: shotmarker explore {} {}", args.dir.display(), example);
    Ok(())
}
