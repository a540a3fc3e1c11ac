//! Backup reports
//!
//! Each report collects its data from a [`BackupReader`](crate::backup::BackupReader)
//! into a plain struct first and renders through `Display` afterwards, so the
//! same data can be asserted on in tests or printed by the command-line tool.
//!
//! - [`BackupSummary`]: device info, live frames and string file previews
//! - [`Exploration`]: classification of every stored string file
//! - [`SessionDetail`]: one stored session in detail
//! - [`ExportOutcome`]: match export with per-shot tags

mod explore;
mod export;
mod summary;

use chrono::{DateTime, Utc};

pub use explore::{
    Exploration, SessionContent, SessionDetail, StringFileAnalysis, StringFileKind,
    analyze_string_file, examine_string_file,
};
pub use export::{
    ExportOutcome, ExportedShot, MatchRecord, export_matches, shot_tags, write_matches,
};
pub use summary::{BackupSummary, FrameReport, StringPreview};

/// Session start encoded in a string file id
pub fn id_timestamp(id: &str) -> Option<DateTime<Utc>> {
    id.parse::<i64>().ok().and_then(DateTime::from_timestamp_millis)
}

/// First `chars` characters of `text`
pub(crate) fn preview(text: &str, chars: usize) -> String {
    text.chars().take(chars).collect()
}

/// Render an optional timestamp, `unknown` when absent
pub(crate) fn timestamp_text(timestamp: Option<DateTime<Utc>>) -> String {
    timestamp.map(|ts| ts.to_string()).unwrap_or_else(|| "unknown".to_string())
}
