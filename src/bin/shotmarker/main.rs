//! ShotMarker CLI - Inspect and export target backups
//!
//! # Commands
//!
//! - `shotmarker read <DIR>` - Summarize a backup and decode live frames
//! - `shotmarker explore <DIR> [ID]` - Classify string files, or examine one session
//! - `shotmarker export <DIR>` - Export matches as JSON
//! - `shotmarker decode <ENCODED>...` - Decode shot strings with a round-trip check
//!
//! # Usage
//!
//! Extract the device backup first, then point the tool at the folder:
//! ```bash
//! tar -xf SM_backup_May_16.tar -C SM_backup_May_16
//! shotmarker read SM_backup_May_16
//! shotmarker export SM_backup_May_16 -o may16.json
//!
//! # Older firmware wrote slightly malformed shot strings
//! shotmarker --lenient explore SM_backup_May_16 1715436178223
//! ```
//!
//! Logging goes to stderr and is controlled with `RUST_LOG`.

mod decode;
mod explore;
mod export;
mod read;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use shotmarker::{DecodeMode, ReportConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// ShotMarker CLI - Inspect and export target backups
#[derive(Parser)]
#[command(name = "shotmarker")]
#[command(about = "Inspect and export ShotMarker target backups")]
#[command(version)]
struct Cli {
    /// Report configuration file (YAML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Accept legacy shot strings with malformed symbols or padding
    #[arg(long, global = true)]
    lenient: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize a backup and decode the shots of its live frames
    Read(read::ReadArgs),

    /// Classify stored string files, or examine one session in detail
    Explore(explore::ExploreArgs),

    /// Export stored matches as JSON
    Export(export::ExportArgs),

    /// Decode transcoded shot strings
    Decode(decode::DecodeArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref(), cli.lenient)?;

    match cli.command {
        Commands::Read(args) => read::execute(args, &config),
        Commands::Explore(args) => explore::execute(args, &config),
        Commands::Export(args) => export::execute(args, &config),
        Commands::Decode(args) => decode::execute(args, &config),
    }
}

fn load_config(path: Option<&PathBuf>, lenient: bool) -> Result<ReportConfig> {
    let mut config = match path {
        Some(path) => ReportConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => ReportConfig::default(),
    };
    if lenient {
        config.decode_mode = DecodeMode::Lenient;
    }
    Ok(config)
}
