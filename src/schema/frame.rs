//! Target frame / session document
//!
//! The same structure appears inline under `frames` in `data.txt` and as the
//! whole content of each compressed `string-<id>.z` session file.

use super::{ScoreString, ShotEntry, loose, value_text};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One target frame and the shots recorded on it
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Frame {
    /// Frame identifier (numeric or text depending on firmware)
    pub id: Option<Value>,
    #[serde(deserialize_with = "loose::text")]
    pub label: Option<String>,
    pub active: Option<Value>,
    /// Distance to target
    pub dist: Option<Value>,
    #[serde(deserialize_with = "loose::text")]
    pub dist_unit: Option<String>,
    /// Target width in target units
    pub width: Option<Value>,
    /// Target height in target units
    pub height: Option<Value>,
    pub face_id: Option<Value>,
    /// Accepted shots
    #[serde(deserialize_with = "loose::list")]
    pub shots: Vec<ShotEntry>,
    /// Shots rejected by the device
    #[serde(deserialize_with = "loose::list")]
    pub shots_invalid: Vec<ShotEntry>,
    /// Whether `shots` holds transcoded strings
    #[serde(deserialize_with = "loose::truthy")]
    pub encoded: bool,
    /// Per-shot `display:score` pairs, comma separated
    #[serde(deserialize_with = "loose::text")]
    pub score_string: Option<String>,
    /// Horizontal calibration offset
    #[serde(deserialize_with = "loose::number")]
    pub cal_x: Option<f64>,
    /// Vertical calibration offset
    #[serde(deserialize_with = "loose::number")]
    pub cal_y: Option<f64>,
    #[serde(deserialize_with = "loose::object")]
    pub profiles: Option<Map<String, Value>>,
}

impl Frame {
    /// Parse a session document.
    pub fn parse(json: &str) -> crate::Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| crate::ShotMarkerError::parse_error("Frame deserialization", e))
    }

    /// Frame id for display, falling back to `fallback`
    pub fn id_text_or(&self, fallback: &str) -> String {
        match value_text(self.id.as_ref()) {
            text if text.is_empty() => fallback.to_string(),
            text => text,
        }
    }

    /// Label for display
    pub fn label_text(&self) -> &str {
        self.label.as_deref().filter(|label| !label.is_empty()).unwrap_or("No label")
    }

    /// Whether either shot list is non-empty
    pub fn has_shot_data(&self) -> bool {
        !self.shots.is_empty() || !self.shots_invalid.is_empty()
    }

    /// Target size as `WIDTHxHEIGHT`
    pub fn target_size(&self) -> String {
        format!("{}x{}", value_text(self.width.as_ref()), value_text(self.height.as_ref()))
    }

    /// Distance with its unit, e.g. `300 m`
    pub fn distance_text(&self) -> String {
        let dist = value_text(self.dist.as_ref());
        match self.dist_unit.as_deref() {
            Some(unit) if !unit.is_empty() => format!("{} {}", dist, unit),
            _ => dist,
        }
    }

    /// Parsed score string, if the frame carries one
    pub fn scores(&self) -> Option<ScoreString> {
        self.score_string.as_deref().map(ScoreString::parse)
    }
}
