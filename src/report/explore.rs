//! String file exploration
//!
//! Classifies every `string-<id>.z` file in a backup and renders a single
//! session in detail.

use super::{id_timestamp, preview, timestamp_text};
use crate::backup::BackupReader;
use crate::config::ReportConfig;
use crate::decode::{FrameShots, decode_frame};
use crate::schema::{Frame, ShotEntry, is_truthy, value_text};
use crate::{Result, ShotMarkerError};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};

/// Parse errors listed by the exploration report
const PARSE_ERROR_LIMIT: usize = 5;

/// What a string file turned out to contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StringFileKind {
    /// A session document with a frame id
    FrameData,
    /// Valid JSON without a frame id
    Unknown,
    /// Not a session document
    ParseError,
}

impl fmt::Display for StringFileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StringFileKind::FrameData => "frame_data",
            StringFileKind::Unknown => "unknown",
            StringFileKind::ParseError => "parse_error",
        })
    }
}

/// Classification of one string file
#[derive(Debug, Clone, PartialEq)]
pub struct StringFileAnalysis {
    pub id: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub kind: StringFileKind,
    pub frame_id: String,
    pub label: String,
    pub shot_count: usize,
    pub invalid_shot_count: usize,
    pub distance: String,
    pub target_size: String,
    pub active: String,
    /// Inflated size in bytes
    pub data_size: usize,
    /// Parse error message for [`StringFileKind::ParseError`]
    pub error: Option<String>,
    /// Start of the content for [`StringFileKind::ParseError`]
    pub preview: Option<String>,
}

impl StringFileAnalysis {
    pub fn has_shots(&self) -> bool {
        self.shot_count > 0
    }
}

/// Inflate and classify one string file.
///
/// Fails only when the file cannot be read or inflated. Content that is not a
/// session document is classified as [`StringFileKind::ParseError`].
pub fn analyze_string_file(
    reader: &BackupReader,
    id: &str,
    config: &ReportConfig,
) -> Result<StringFileAnalysis> {
    let content = reader.read_string(id)?;

    let mut analysis = StringFileAnalysis {
        id: id.to_string(),
        timestamp: id_timestamp(id),
        kind: StringFileKind::ParseError,
        frame_id: String::new(),
        label: String::new(),
        shot_count: 0,
        invalid_shot_count: 0,
        distance: String::new(),
        target_size: String::new(),
        active: String::new(),
        data_size: content.len(),
        error: None,
        preview: None,
    };

    match Frame::parse(&content) {
        Ok(frame) => {
            analysis.kind = if frame.id.as_ref().is_some_and(is_truthy) {
                StringFileKind::FrameData
            } else {
                StringFileKind::Unknown
            };
            analysis.frame_id = value_text(frame.id.as_ref());
            analysis.label = frame.label.clone().unwrap_or_default();
            analysis.shot_count = frame.shots.len();
            analysis.invalid_shot_count = frame.shots_invalid.len();
            analysis.distance = frame.distance_text();
            analysis.target_size = frame.target_size();
            analysis.active = value_text(frame.active.as_ref());
        }
        Err(error) => {
            debug!(id, %error, "String file is not a session document");
            analysis.error = Some(match error {
                ShotMarkerError::Parse { details, .. } => details,
                other => other.to_string(),
            });
            analysis.preview = Some(preview(&content, config.preview_chars));
        }
    }

    Ok(analysis)
}

/// Classification of every string file in a backup
#[derive(Debug)]
pub struct Exploration {
    /// Analyses in ascending id order
    pub analyses: Vec<StringFileAnalysis>,
    /// Files that could not be read or inflated
    pub unreadable: Vec<(String, String)>,
    /// Entries listed in the recent-files section
    pub recent_limit: usize,
}

impl Exploration {
    /// Analyze every string file, logging and skipping unreadable ones.
    pub fn collect(reader: &BackupReader, config: &ReportConfig) -> Result<Self> {
        let mut analyses = Vec::new();
        let mut unreadable = Vec::new();

        for id in reader.string_ids()? {
            match analyze_string_file(reader, &id, config) {
                Ok(analysis) => analyses.push(analysis),
                Err(error) => {
                    warn!(id = %id, %error, "Skipping unreadable string file");
                    unreadable.push((id, error.to_string()));
                }
            }
        }

        Ok(Self { analyses, unreadable, recent_limit: config.summary_limit })
    }

    /// Number of files per kind
    pub fn counts(&self) -> BTreeMap<StringFileKind, usize> {
        let mut counts = BTreeMap::new();
        for analysis in &self.analyses {
            *counts.entry(analysis.kind).or_insert(0) += 1;
        }
        counts
    }

    pub fn files_with_shots(&self) -> impl Iterator<Item = &StringFileAnalysis> {
        self.analyses.iter().filter(|a| a.has_shots())
    }

    /// The last `recent_limit` files by id
    pub fn recent(&self) -> &[StringFileAnalysis] {
        let start = self.analyses.len().saturating_sub(self.recent_limit);
        &self.analyses[start..]
    }

    pub fn parse_errors(&self) -> impl Iterator<Item = &StringFileAnalysis> {
        self.analyses.iter().filter(|a| a.kind == StringFileKind::ParseError)
    }
}

impl fmt::Display for Exploration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Exploring Compressed String Files ===")?;
        writeln!(f, "Total string files: {}", self.analyses.len() + self.unreadable.len())?;
        writeln!(f)?;

        writeln!(f, "File types found:")?;
        for (kind, count) in self.counts() {
            writeln!(f, "  {}: {} files", kind, count)?;
        }
        if !self.unreadable.is_empty() {
            writeln!(f, "  unreadable: {} files", self.unreadable.len())?;
        }

        writeln!(f)?;
        writeln!(f, "Files with shot data: {}", self.files_with_shots().count())?;
        for item in self.files_with_shots() {
            let date = item.timestamp.map(|ts| ts.date_naive().to_string()).unwrap_or_default();
            writeln!(
                f,
                "  {} ({}): Frame {} \"{}\" - {} shots",
                item.id, date, item.frame_id, item.label, item.shot_count
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Most recent files (last {}):", self.recent_limit)?;
        for item in self.recent() {
            if item.kind == StringFileKind::FrameData {
                writeln!(
                    f,
                    "  {}: Frame {} \"{}\" - {} shots, {} invalid",
                    item.id, item.frame_id, item.label, item.shot_count, item.invalid_shot_count
                )?;
            } else {
                writeln!(f, "  {}: {} - {} bytes", item.id, item.kind, item.data_size)?;
            }
        }

        let errors: Vec<_> = self.parse_errors().collect();
        if !errors.is_empty() {
            writeln!(f)?;
            writeln!(f, "Parse errors ({}):", errors.len())?;
            for item in errors.iter().take(PARSE_ERROR_LIMIT) {
                writeln!(f, "  {}: {}", item.id, item.error.as_deref().unwrap_or_default())?;
                writeln!(f, "    Preview: {}...", item.preview.as_deref().unwrap_or_default())?;
            }
        }

        for (id, error) in &self.unreadable {
            writeln!(f, "  {}: unreadable - {}", id, error)?;
        }
        Ok(())
    }
}

/// Parsed or raw content of an examined session
#[derive(Debug)]
pub enum SessionContent {
    Parsed { frame: Box<Frame>, shots: FrameShots },
    Unparsed { error: String, preview: String },
}

/// One stored session in detail
#[derive(Debug)]
pub struct SessionDetail {
    pub id: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub content: SessionContent,
    preview_chars: usize,
}

/// Examine one stored session.
///
/// Fails when the string file is missing or cannot be inflated.
pub fn examine_string_file(
    reader: &BackupReader,
    id: &str,
    config: &ReportConfig,
) -> Result<SessionDetail> {
    let text = reader.read_string(id)?;

    let content = match Frame::parse(&text) {
        Ok(frame) => {
            let shots = decode_frame(&frame, config.decode_mode);
            SessionContent::Parsed { frame: Box::new(frame), shots }
        }
        Err(error) => SessionContent::Unparsed {
            error: error.to_string(),
            preview: preview(&text, config.preview_chars * 2),
        },
    };

    Ok(SessionDetail {
        id: id.to_string(),
        timestamp: id_timestamp(id),
        content,
        preview_chars: config.preview_chars,
    })
}

impl fmt::Display for SessionDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Examining String File {} ===", self.id)?;

        let (frame, shots) = match &self.content {
            SessionContent::Parsed { frame, shots } => (frame, shots),
            SessionContent::Unparsed { error, preview } => {
                writeln!(f, "Parse error: {}", error)?;
                return writeln!(f, "Content preview: {}...", preview);
            }
        };

        writeln!(f, "Timestamp: {}", timestamp_text(self.timestamp))?;
        writeln!(f, "Frame ID: {}", value_text(frame.id.as_ref()))?;
        writeln!(f, "Label: {}", frame.label_text())?;
        writeln!(f, "Active: {}", value_text(frame.active.as_ref()))?;
        writeln!(f, "Target: {} at {}", frame.target_size(), frame.distance_text())?;
        writeln!(f, "Face ID: {}", value_text(frame.face_id.as_ref()))?;

        if !frame.shots.is_empty() {
            writeln!(f)?;
            writeln!(f, "Shots ({}):", frame.shots.len())?;
            for decoded in &shots.valid.shots {
                let shot = &decoded.shot;
                write!(
                    f,
                    "  Shot {}: ({:.2}, {:.2}) at {:.1} m/s",
                    decoded.index + 1,
                    shot.x,
                    shot.y,
                    shot.velocity
                )?;
                if let Some(score) = &decoded.annotations.score {
                    write!(f, ", score {}", score)?;
                }
                writeln!(f)?;
            }
            for failure in &shots.valid.failures {
                match frame.shots.get(failure.index) {
                    Some(ShotEntry::Other(_)) => {
                        writeln!(f, "  Shot {}: Raw data - {}", failure.index + 1, failure.entry)?
                    }
                    _ => writeln!(
                        f,
                        "  Shot {}: Decode error - {} ({}...)",
                        failure.index + 1,
                        failure.error,
                        failure.entry
                    )?,
                }
            }
        }

        if !frame.shots_invalid.is_empty() {
            writeln!(f)?;
            writeln!(f, "Invalid shots: {}", frame.shots_invalid.len())?;
        }

        if let Some(profiles) = &frame.profiles {
            writeln!(f)?;
            writeln!(f, "Profiles: {}", profiles.len())?;
        }

        if let Some(scores) = &frame.score_string {
            writeln!(f)?;
            writeln!(f, "Score string: {}...", preview(scores, self.preview_chars))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{BackupFixture, encoded_session, sample_shots};
    use anyhow::Result;
    use serde_json::json;

    fn fixture_dir() -> Result<tempfile::TempDir> {
        let dir = tempfile::tempdir()?;
        BackupFixture::new()
            .with_session("1715436178223", "M1", &sample_shots(3))
            .with_session_document(
                "1715436179000",
                json!({"ts": 1715436179000u64}),
                json!({"label": "no id"}),
            )
            .with_raw_string("1715436180000", "this is not json")
            .write(dir.path())?;
        std::fs::write(dir.path().join("string-1715436190000.z"), b"garbage")?;
        Ok(dir)
    }

    #[test]
    fn test_analyze_kinds() -> Result<()> {
        let dir = fixture_dir()?;
        let reader = BackupReader::open(dir.path())?;
        let config = ReportConfig::default();

        let frame = analyze_string_file(&reader, "1715436178223", &config)?;
        assert_eq!(frame.kind, StringFileKind::FrameData);
        assert_eq!(frame.frame_id, "1");
        assert_eq!(frame.shot_count, 3);
        assert_eq!(frame.distance, "300 m");
        assert_eq!(frame.target_size, "1200x1200");
        assert!(frame.timestamp.is_some());

        let unknown = analyze_string_file(&reader, "1715436179000", &config)?;
        assert_eq!(unknown.kind, StringFileKind::Unknown);
        assert!(!unknown.has_shots());

        let broken = analyze_string_file(&reader, "1715436180000", &config)?;
        assert_eq!(broken.kind, StringFileKind::ParseError);
        assert_eq!(broken.preview.as_deref(), Some("this is not json"));
        assert!(broken.error.is_some());

        assert!(analyze_string_file(&reader, "1715436190000", &config).is_err());
        Ok(())
    }

    #[test]
    fn test_exploration() -> Result<()> {
        let dir = fixture_dir()?;
        let reader = BackupReader::open(dir.path())?;
        let exploration = Exploration::collect(&reader, &ReportConfig::default())?;

        assert_eq!(exploration.analyses.len(), 3);
        assert_eq!(exploration.unreadable.len(), 1);
        assert_eq!(exploration.counts().get(&StringFileKind::FrameData), Some(&1));
        assert_eq!(exploration.files_with_shots().count(), 1);
        assert_eq!(exploration.parse_errors().count(), 1);

        let text = exploration.to_string();
        assert!(text.contains("frame_data: 1 files"));
        assert!(text.contains("Parse errors (1):"));
        assert!(text.contains("unreadable: 1 files"));
        Ok(())
    }

    #[test]
    fn test_recent_limit() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut fixture = BackupFixture::new();
        for n in 0..15 {
            fixture = fixture.with_raw_string(&n.to_string(), &encoded_session(&[]).to_string());
        }
        fixture.write(dir.path())?;

        let reader = BackupReader::open(dir.path())?;
        let exploration = Exploration::collect(&reader, &ReportConfig::default())?;
        let recent: Vec<&str> = exploration.recent().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(recent.len(), 10);
        assert_eq!(recent.first(), Some(&"5"));
        assert_eq!(recent.last(), Some(&"14"));
        Ok(())
    }

    #[test]
    fn test_examine_session() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut session = encoded_session(&sample_shots(2));
        session["shots"].as_array_mut().unwrap().push(json!(42));
        session["profiles"] = json!({"a": {}, "b": {}});
        BackupFixture::new()
            .with_session_document("1715436178223", json!({}), session)
            .write(dir.path())?;

        let reader = BackupReader::open(dir.path())?;
        let detail = examine_string_file(&reader, "1715436178223", &ReportConfig::default())?;
        let SessionContent::Parsed { shots, .. } = &detail.content else {
            panic!("Expected parsed session");
        };
        assert_eq!(shots.valid.shots.len(), 2);
        assert_eq!(shots.valid.failures.len(), 1);

        let text = detail.to_string();
        assert!(text.contains("Shots (3):"));
        assert!(text.contains("Shot 1: ("));
        assert!(text.contains(", -6.70) at 850.1 m/s, score 5"));
        assert!(text.contains("Shot 3: Raw data - 42"));
        assert!(text.contains("Profiles: 2"));
        Ok(())
    }

    #[test]
    fn test_examine_unparsed_and_missing() -> Result<()> {
        let dir = tempfile::tempdir()?;
        BackupFixture::new().with_raw_string("5", "[1, 2").write(dir.path())?;

        let reader = BackupReader::open(dir.path())?;
        let detail = examine_string_file(&reader, "5", &ReportConfig::default())?;
        assert!(matches!(detail.content, SessionContent::Unparsed { .. }));
        assert!(detail.to_string().contains("Content preview: [1, 2..."));

        let err = examine_string_file(&reader, "6", &ReportConfig::default()).unwrap_err();
        assert!(matches!(err, ShotMarkerError::StringNotFound { .. }));
        Ok(())
    }
}
