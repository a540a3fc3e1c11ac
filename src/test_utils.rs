//! Test utilities for building synthetic backups
//!
//! Real device backups carry personal match data, so tests and benches build
//! their own: deterministic shots, zlib-compressed session files and the
//! surrounding `data.txt` / `archive.txt` documents.

#![cfg(any(test, feature = "benchmark"))]

use crate::Shot;
use crate::backup::{ARCHIVE_FILE, DATA_FILE};
use crate::codec;
use flate2::Compression;
use flate2::write::ZlibEncoder;
use serde_json::{Map, Value, json};
use std::io::Write;
use std::path::Path;

/// Session start used by [`sample_shot`]
pub const SAMPLE_START_MS: u64 = 1_715_436_178_223;

/// Deterministic shot number `index` of a synthetic string.
///
/// Positions walk a small spiral around the centre so consecutive shots differ
/// in every field.
pub fn sample_shot(index: usize) -> Shot {
    let step = index as f64;
    Shot {
        timestamp: SAMPLE_START_MS + index as u64 * 45_000,
        x: 12.345 - step * 3.25,
        y: -6.7 + step * 1.5,
        velocity: 850.12 - step * 0.75,
        temperature: 21,
        multi_assign: 0,
        error: 0,
    }
}

/// `count` consecutive sample shots
pub fn sample_shots(count: usize) -> Vec<Shot> {
    (0..count).map(sample_shot).collect()
}

/// Compress text the way the device stores string files.
pub fn compress(text: &str) -> std::io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text.as_bytes())?;
    encoder.finish()
}

/// Builder for an extracted backup directory
#[derive(Debug, Clone)]
pub struct BackupFixture {
    main_data: Map<String, Value>,
    frames: Map<String, Value>,
    archive: Map<String, Value>,
    strings: Vec<(String, String)>,
}

impl Default for BackupFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl BackupFixture {
    /// Empty backup with firmware `1.0.0`
    pub fn new() -> Self {
        let mut main_data = Map::new();
        main_data.insert("version".to_string(), json!("1.0.0"));
        main_data.insert("version_date".to_string(), json!("2024-05-01"));
        main_data.insert("ts".to_string(), json!(SAMPLE_START_MS));
        Self { main_data, frames: Map::new(), archive: Map::new(), strings: Vec::new() }
    }

    /// Add a live frame with encoded shots to `data.txt`.
    pub fn with_frame(mut self, id: &str, label: &str, shots: &[Shot]) -> Self {
        let mut frame = encoded_session(shots);
        frame["id"] = json!(id);
        frame["label"] = json!(label);
        self.frames.insert(id.to_string(), frame);
        self
    }

    /// Add a stored session with encoded shots, all scored `5`, and its archive entry.
    pub fn with_session(self, id: &str, target_name: &str, shots: &[Shot]) -> Self {
        let entry = json!({
            "ts": id.parse::<i64>().unwrap_or_default(),
            "name": "Test Shooter",
            "target_name": target_name,
            "distance": "300m",
            "face_id": "ICFRA-300",
            "group": "45mm",
        });
        self.with_session_document(id, entry, encoded_session(shots))
    }

    /// Add a stored session from raw JSON documents.
    pub fn with_session_document(mut self, id: &str, archive_entry: Value, session: Value) -> Self {
        self.archive.insert(id.to_string(), archive_entry);
        self.strings.push((id.to_string(), session.to_string()));
        self
    }

    /// Add an archive entry without a string file.
    pub fn with_archive_entry(mut self, id: &str, archive_entry: Value) -> Self {
        self.archive.insert(id.to_string(), archive_entry);
        self
    }

    /// Add a string file with arbitrary content and no archive entry.
    pub fn with_raw_string(mut self, id: &str, text: &str) -> Self {
        self.strings.push((id.to_string(), text.to_string()));
        self
    }

    /// Write every document into `dir`.
    pub fn write(&self, dir: &Path) -> std::io::Result<()> {
        let mut main_data = self.main_data.clone();
        main_data.insert("frames".to_string(), Value::Object(self.frames.clone()));

        std::fs::write(dir.join(DATA_FILE), Value::Object(main_data).to_string())?;
        std::fs::write(dir.join(ARCHIVE_FILE), Value::Object(self.archive.clone()).to_string())?;

        for (id, text) in &self.strings {
            std::fs::write(dir.join(format!("string-{}.z", id)), compress(text)?)?;
        }
        Ok(())
    }
}

/// Session document holding `shots` as encoded strings scored `5`
pub fn encoded_session(shots: &[Shot]) -> Value {
    let encoded: Vec<String> = shots.iter().map(codec::encode).collect();
    let scores: Vec<String> = (1..=shots.len()).map(|n| format!("{}:5", n)).collect();
    json!({
        "id": 1,
        "label": "Relay 1",
        "active": false,
        "dist": 300,
        "dist_unit": "m",
        "width": 1200,
        "height": 1200,
        "face_id": "ICFRA-300",
        "encoded": true,
        "shots": encoded,
        "shots_invalid": [],
        "score_string": scores.join(","),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::ZlibDecoder;
    use std::io::Read;

    #[test]
    fn test_sample_shots_are_distinct() {
        let shots = sample_shots(4);
        assert_eq!(shots[0].x, 12.345);
        assert!(shots.windows(2).all(|pair| pair[0].timestamp < pair[1].timestamp));
    }

    #[test]
    fn test_compress_is_zlib() -> anyhow::Result<()> {
        let compressed = compress("{\"id\": 1}")?;
        let mut text = String::new();
        ZlibDecoder::new(compressed.as_slice()).read_to_string(&mut text)?;
        assert_eq!(text, "{\"id\": 1}");
        Ok(())
    }

    #[test]
    fn test_fixture_layout() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        BackupFixture::new()
            .with_frame("4", "Lane 4", &sample_shots(2))
            .with_session("1715436178223", "M1", &sample_shots(1))
            .write(dir.path())?;

        assert!(dir.path().join("data.txt").is_file());
        assert!(dir.path().join("archive.txt").is_file());
        assert!(dir.path().join("string-1715436178223.z").is_file());
        Ok(())
    }
}
