//! Match export
//!
//! Turns stored sessions into match records: one per archived session that has
//! scoring shots, with calibrated positions, converted velocities and the
//! device's per-shot tags.

use crate::backup::BackupReader;
use crate::config::{ReportConfig, round_to};
use crate::decode::decode_frame;
use crate::schema::{ArchiveEntry, ShotAnnotations, value_text};
use crate::{Result, ShotMarkerError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use tracing::{debug, info, warn};

/// Score recorded for a scoring shot without one
const MISSING_SCORE: &str = "0";

/// One exported shot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedShot {
    pub x: f64,
    pub y: f64,
    pub score: Option<String>,
    pub sighter: bool,
    pub velocity: f64,
    pub target_face: Option<Value>,
    /// Slash-separated review tags
    pub tags: String,
    /// Solution residual, only for shots seen by every sensor
    pub quality: Option<f64>,
}

/// One exported match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    #[serde(rename = "match")]
    pub match_name: String,
    /// Comma-joined scores of the non-sighter shots
    pub shots: String,
    pub user: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub distance: Option<Value>,
    pub target_face: Option<Value>,
    pub group_text: Option<Value>,
    pub shot_data: Vec<ExportedShot>,
}

impl MatchRecord {
    /// Number of scoring shots
    pub fn scoring_shots(&self) -> usize {
        if self.shots.is_empty() { 0 } else { self.shots.split(',').count() }
    }
}

/// Result of a match export
#[derive(Debug, Default)]
pub struct ExportOutcome {
    /// Matches in chronological order
    pub matches: Vec<MatchRecord>,
    pub archive_entries: usize,
    pub string_files: usize,
    /// Archive entries without a usable match
    pub skipped: usize,
    /// Sessions that could not be read or parsed
    pub corrupt_sessions: usize,
    /// Shots dropped because they failed to decode
    pub failed_shots: usize,
    /// Matches listed by `Display`
    pub summary_limit: usize,
}

/// Build match records from every archived session.
pub fn export_matches(reader: &BackupReader, config: &ReportConfig) -> Result<ExportOutcome> {
    let archive = reader.read_archive()?;
    let string_files = reader.string_ids()?.len();
    info!(entries = archive.len(), string_files, "Exporting matches");

    let mut outcome = ExportOutcome {
        archive_entries: archive.len(),
        string_files,
        summary_limit: config.summary_limit,
        ..ExportOutcome::default()
    };

    for (id, entry) in archive.newest_first() {
        if !reader.has_string(id) {
            outcome.skipped += 1;
            continue;
        }

        let frame = match reader.read_session(id) {
            Ok(frame) => frame,
            Err(error) => {
                warn!(id, %error, "Skipping unreadable session");
                outcome.corrupt_sessions += 1;
                outcome.skipped += 1;
                continue;
            }
        };

        let decoded = decode_frame(&frame, config.decode_mode).valid;
        outcome.failed_shots += decoded.failures.len();

        let scores: Vec<&str> = decoded
            .shots
            .iter()
            .filter(|shot| !shot.annotations.sighter)
            .map(|shot| shot.annotations.score.as_deref().unwrap_or(MISSING_SCORE))
            .collect();
        if scores.is_empty() {
            debug!(id, shots = decoded.shots.len(), "No scoring shots");
            outcome.skipped += 1;
            continue;
        }

        let cal_x = frame.cal_x.unwrap_or(0.0);
        let cal_y = frame.cal_y.unwrap_or(0.0);
        let shot_data = decoded
            .shots
            .iter()
            .map(|decoded| {
                let shot = &decoded.shot;
                let annotations = &decoded.annotations;
                let velocity = shot.velocity * config.velocity_factor;
                ExportedShot {
                    x: round_to(shot.x + cal_x, config.position_decimals),
                    y: round_to(shot.y + cal_y, config.position_decimals),
                    score: annotations.score.clone(),
                    sighter: annotations.sighter,
                    velocity: round_to(velocity, config.velocity_decimals),
                    target_face: entry.face_id.clone(),
                    tags: shot_tags(annotations),
                    quality: quality(annotations, config.quality_decimals),
                }
            })
            .collect();

        outcome.matches.push(MatchRecord {
            match_name: match_name(entry, &frame.id_text_or("")),
            shots: scores.join(","),
            user: entry.shooter_name(),
            timestamp: entry.ts.and_then(DateTime::from_timestamp_millis),
            distance: entry.distance.clone(),
            target_face: entry.face_id.clone(),
            group_text: entry.group.clone(),
            shot_data,
        });
    }

    outcome.matches.sort_by_key(|record| record.timestamp);
    info!(
        matches = outcome.matches.len(),
        skipped = outcome.skipped,
        failed_shots = outcome.failed_shots,
        "Match export complete"
    );
    Ok(outcome)
}

/// Write matches as pretty-printed JSON.
pub fn write_matches(path: &Path, matches: &[MatchRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(matches)
        .map_err(|e| ShotMarkerError::parse_error("Match serialization", e))?;
    std::fs::write(path, json).map_err(|e| ShotMarkerError::file_error(path, e))?;
    debug!(path = %path.display(), matches = matches.len(), "Wrote matches");
    Ok(())
}

/// Review tags for a shot, joined with `/`.
pub fn shot_tags(annotations: &ShotAnnotations) -> String {
    let mut tags = Vec::new();
    if annotations.fake {
        tags.push("inserted".to_string());
    } else if annotations.score_override {
        tags.push("modified".to_string());
    }
    if annotations.off {
        tags.push("off".to_string());
    }
    if annotations.hide {
        tags.push("hidden".to_string());
    }
    if annotations.sighter {
        tags.push("sighter".to_string());
    }
    if annotations.simulated {
        tags.push("simulated".to_string());
    }
    if let Some(warning) = annotations.warning_text() {
        tags.push(format!("warning-{}", warning));
    }
    if !annotations.fake && !annotations.is_complete() {
        tags.push("incomplete".to_string());
    }
    tags.join("/")
}

fn quality(annotations: &ShotAnnotations, decimals: u32) -> Option<f64> {
    if !annotations.is_complete() {
        return None;
    }
    annotations.err_v.map(|err| round_to(err, decimals))
}

fn match_name(entry: &ArchiveEntry, frame_id: &str) -> String {
    match entry.target_name.as_deref() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => format!("Match {}", frame_id),
    }
}

impl fmt::Display for ExportOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Found {} archive entries", self.archive_entries)?;
        writeln!(f, "Found {} string files", self.string_files)?;
        writeln!(f, "Processed {} matches, skipped {} entries", self.matches.len(), self.skipped)?;
        if self.corrupt_sessions > 0 || self.failed_shots > 0 {
            writeln!(
                f,
                "Corrupt sessions: {}, undecodable shots: {}",
                self.corrupt_sessions, self.failed_shots
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Summary:")?;
        for (i, record) in self.matches.iter().take(self.summary_limit).enumerate() {
            writeln!(
                f,
                "  {}. {} ({} shots) - {} [{}]",
                i + 1,
                record.match_name,
                record.scoring_shots(),
                record.user,
                value_text(record.group_text.as_ref())
            )?;
        }
        if self.matches.len() > self.summary_limit {
            writeln!(f, "  ... and {} more matches", self.matches.len() - self.summary_limit)?;
        }
        Ok(())
    }
}
