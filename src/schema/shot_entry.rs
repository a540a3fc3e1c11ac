//! Shot entries as they appear in a session document
//!
//! Devices store shots either as transcoded strings (frames flagged `encoded`)
//! or, in older sessions, as plain objects carrying the shot fields next to
//! scoring annotations. Anything else is kept verbatim so it can be reported.

use super::loose;
use crate::ShotFields;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One element of a frame's `shots` or `shots_invalid` list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ShotEntry {
    /// Packed shot record carried as transcoded text
    Encoded(String),
    /// Already decoded shot object
    Object(Box<ShotObject>),
    /// Unrecognised entry
    Other(Value),
}

impl ShotEntry {
    /// Short description for logs and error messages
    pub fn describe(&self) -> String {
        let text = match self {
            ShotEntry::Encoded(text) => text.clone(),
            ShotEntry::Object(object) => serde_json::to_string(object).unwrap_or_default(),
            ShotEntry::Other(value) => value.to_string(),
        };
        text.chars().take(50).collect()
    }
}

/// Decoded shot object with its annotations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShotObject {
    #[serde(flatten)]
    pub fields: ShotFields,
    #[serde(flatten)]
    pub annotations: ShotAnnotations,
}

/// Scoring and review annotations attached to a shot
///
/// Boolean flags follow the device's loose typing: any non-empty, non-zero
/// value counts as set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShotAnnotations {
    /// Score awarded (`"V"`, a number, or a device string)
    #[serde(deserialize_with = "loose::text", skip_serializing_if = "Option::is_none")]
    pub score: Option<String>,
    /// Label shown on the target display
    #[serde(deserialize_with = "loose::text", skip_serializing_if = "Option::is_none")]
    pub display_text: Option<String>,
    #[serde(deserialize_with = "loose::truthy")]
    pub sighter: bool,
    /// Shot inserted manually by the range officer
    #[serde(deserialize_with = "loose::truthy")]
    pub fake: bool,
    #[serde(deserialize_with = "loose::truthy")]
    pub score_override: bool,
    #[serde(deserialize_with = "loose::truthy")]
    pub off: bool,
    #[serde(deserialize_with = "loose::truthy")]
    pub hide: bool,
    #[serde(deserialize_with = "loose::truthy")]
    pub simulated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<Value>,
    /// Number of sensors that contributed to the solution
    #[serde(deserialize_with = "loose::number", skip_serializing_if = "Option::is_none")]
    pub v_count: Option<f64>,
    /// Solution residual, reported as shot quality
    #[serde(deserialize_with = "loose::number", skip_serializing_if = "Option::is_none")]
    pub err_v: Option<f64>,
}

impl ShotAnnotations {
    /// Whether every sensor contributed to the position
    pub fn is_complete(&self) -> bool {
        self.v_count == Some(4.0)
    }

    /// Warning rendered as text, if one is set
    pub fn warning_text(&self) -> Option<String> {
        match &self.warning {
            None | Some(Value::Null) | Some(Value::Bool(false)) => None,
            Some(Value::String(text)) if text.is_empty() => None,
            Some(Value::String(text)) => Some(text.clone()),
            Some(other) => Some(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_entry_is_encoded() {
        let entry: ShotEntry = serde_json::from_str(r#""AAECAwQ=""#).unwrap();
        assert_eq!(entry, ShotEntry::Encoded("AAECAwQ=".to_string()));
    }

    #[test]
    fn test_object_entry_with_annotations() {
        let json = r#"{"ts": 1715436178223, "x": 1.25, "y": -3, "v": 820.5, "temp": 19,
                       "score": "V", "sighter": 1, "warning": "low", "v_count": 4, "err_v": 0.37}"#;
        let entry: ShotEntry = serde_json::from_str(json).unwrap();
        let ShotEntry::Object(object) = entry else {
            panic!("Expected object entry");
        };

        assert_eq!(object.fields.x, Some(1.25));
        assert_eq!(object.fields.y, Some(-3.0));
        assert_eq!(object.annotations.score.as_deref(), Some("V"));
        assert!(object.annotations.sighter);
        assert!(!object.annotations.fake);
        assert!(object.annotations.is_complete());
        assert_eq!(object.annotations.warning_text().as_deref(), Some("low"));
    }

    #[test]
    fn test_numeric_score_becomes_text() {
        let entry: ShotEntry = serde_json::from_str(r#"{"x": 0, "score": 5}"#).unwrap();
        let ShotEntry::Object(object) = entry else {
            panic!("Expected object entry");
        };
        assert_eq!(object.annotations.score.as_deref(), Some("5"));
    }

    #[test]
    fn test_stringly_sensor_fields() {
        let json = r#"{"x": 0, "display_text": 3, "v_count": "4", "err_v": "0.2", "off": "X"}"#;
        let entry: ShotEntry = serde_json::from_str(json).unwrap();
        let ShotEntry::Object(object) = entry else {
            panic!("Expected object entry");
        };
        assert_eq!(object.annotations.display_text.as_deref(), Some("3"));
        assert!(object.annotations.is_complete());
        assert_eq!(object.annotations.err_v, Some(0.2));
        assert!(object.annotations.off);
    }

    #[test]
    fn test_other_entry_is_preserved() {
        let entry: ShotEntry = serde_json::from_str("42").unwrap();
        assert_eq!(entry, ShotEntry::Other(Value::from(42)));
        assert_eq!(entry.describe(), "42");
    }
}
