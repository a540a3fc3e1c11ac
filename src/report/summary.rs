//! Backup overview report

use super::{preview, timestamp_text};
use crate::backup::BackupReader;
use crate::config::ReportConfig;
use crate::decode::{FrameShots, decode_frame};
use crate::{Result, ShotMarkerError};
use chrono::{DateTime, Utc};
use std::fmt;
use tracing::warn;

/// Decoded shots of one live frame
#[derive(Debug)]
pub struct FrameReport {
    pub id: String,
    pub label: String,
    pub shots: FrameShots,
}

/// Start of one string file's inflated content
#[derive(Debug)]
pub struct StringPreview {
    pub id: String,
    /// Preview text, or the read error message
    pub content: std::result::Result<String, String>,
}

/// Overview of a backup directory
#[derive(Debug)]
pub struct BackupSummary {
    pub version: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub frame_count: usize,
    /// Frames holding shot data
    pub frames: Vec<FrameReport>,
    /// Archive size, or `None` when `archive.txt` is unreadable
    pub archive_entries: Option<usize>,
    pub string_count: usize,
    pub previews: Vec<StringPreview>,
}

impl BackupSummary {
    /// Read the main data, archive and the first few string files.
    ///
    /// Only `data.txt` is required. An unreadable archive or string file is
    /// logged and reported in place.
    pub fn collect(reader: &BackupReader, config: &ReportConfig) -> Result<Self> {
        let data = reader.read_main_data()?;

        let frames = data
            .frames_with_shots()
            .map(|(id, frame)| FrameReport {
                id: frame.id_text_or(id),
                label: frame.label_text().to_string(),
                shots: decode_frame(frame, config.decode_mode),
            })
            .collect();

        let archive_entries = match reader.read_archive() {
            Ok(archive) => Some(archive.len()),
            Err(error) => {
                warn!(%error, "Archive unavailable");
                None
            }
        };

        let ids = reader.string_ids()?;
        let previews = ids
            .iter()
            .take(config.sample_strings)
            .map(|id| StringPreview {
                id: id.clone(),
                content: reader
                    .read_string(id)
                    .map(|text| preview(&text, config.preview_chars))
                    .map_err(|e: ShotMarkerError| e.to_string()),
            })
            .collect();

        Ok(Self {
            version: data.version_text(),
            timestamp: data.ts.and_then(DateTime::from_timestamp_millis),
            frame_count: data.frames.len(),
            frames,
            archive_entries,
            string_count: ids.len(),
            previews,
        })
    }
}

impl fmt::Display for BackupSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Shot Marker Backup ===")?;
        writeln!(f, "Version: {}", self.version)?;
        writeln!(f, "Timestamp: {}", timestamp_text(self.timestamp))?;
        writeln!(f, "Number of frames: {}", self.frame_count)?;
        writeln!(f)?;
        writeln!(f, "Frames with shot data: {}", self.frames.len())?;

        for frame in &self.frames {
            writeln!(f)?;
            writeln!(f, "--- Frame {} ({}) ---", frame.id, frame.label)?;
            write_frame_shots(f, &frame.shots)?;
        }

        writeln!(f)?;
        match self.archive_entries {
            Some(count) => writeln!(f, "Archive entries: {}", count)?,
            None => writeln!(f, "Archive entries: unavailable")?,
        }

        writeln!(f)?;
        writeln!(f, "Found {} string files", self.string_count)?;
        for sample in &self.previews {
            match &sample.content {
                Ok(text) => writeln!(f, "String {}: {}...", sample.id, text)?,
                Err(error) => writeln!(f, "String {}: {}", sample.id, error)?,
            }
        }
        Ok(())
    }
}

fn write_frame_shots(f: &mut fmt::Formatter<'_>, shots: &FrameShots) -> fmt::Result {
    if !shots.valid.is_empty() {
        writeln!(f, "Decoding {} shots:", shots.valid.attempted())?;
        for decoded in &shots.valid.shots {
            let shot = &decoded.shot;
            writeln!(
                f,
                "  Shot {}: {} x={:.2} y={:.2} v={:.1} temp={} error={} multi_assign={}",
                decoded.index + 1,
                timestamp_text(shot.datetime()),
                shot.x,
                shot.y,
                shot.velocity,
                shot.temperature,
                shot.error,
                shot.multi_assign
            )?;
        }
        for failure in &shots.valid.failures {
            writeln!(f, "  Shot {}: Error decoding - {}", failure.index + 1, failure.error)?;
        }
    }

    if !shots.invalid.is_empty() {
        writeln!(f, "Decoding {} invalid shots:", shots.invalid.attempted())?;
        for decoded in &shots.invalid.shots {
            writeln!(
                f,
                "  Invalid Shot {}: {} error={}",
                decoded.index + 1,
                timestamp_text(decoded.shot.datetime()),
                decoded.shot.error
            )?;
        }
        for failure in &shots.invalid.failures {
            let index = failure.index + 1;
            writeln!(f, "  Invalid Shot {}: Error decoding - {}", index, failure.error)?;
        }
    }
    Ok(())
}
