//! Main backup document (`data.txt`)

use super::{Frame, loose, value_text};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Top level of `data.txt`
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MainData {
    /// Firmware version
    pub version: Option<Value>,
    pub version_date: Option<Value>,
    /// Backup time, ms since epoch
    #[serde(deserialize_with = "loose::millis")]
    pub ts: Option<i64>,
    /// Live frames keyed by frame id; frames that are not objects are dropped
    #[serde(deserialize_with = "loose::keyed")]
    pub frames: BTreeMap<String, Frame>,
}

impl MainData {
    /// Parse `data.txt` content.
    pub fn parse(json: &str) -> crate::Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| crate::ShotMarkerError::parse_error("MainData deserialization", e))
    }

    /// Firmware version for display
    pub fn version_text(&self) -> String {
        match value_text(self.version.as_ref()) {
            text if text.is_empty() => "unknown".to_string(),
            text => text,
        }
    }

    /// Frames holding at least one valid or invalid shot, in id order
    pub fn frames_with_shots(&self) -> impl Iterator<Item = (&str, &Frame)> {
        let mut frames: Vec<_> = self
            .frames
            .iter()
            .filter(|(_, frame)| frame.has_shot_data())
            .map(|(id, frame)| (id.as_str(), frame))
            .collect();
        frames.sort_by(|(a, _), (b, _)| super::compare_ids(a, b));
        frames.into_iter()
    }
}
