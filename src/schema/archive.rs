//! Session archive index (`archive.txt`)
//!
//! Maps each stored session id (the millisecond timestamp in its
//! `string-<id>.z` file name) to the match metadata entered on the device.

use super::{loose, value_text};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Shooter name the device uses when none was entered
const PLACEHOLDER_NAME: &str = "A";

/// Archive metadata for one stored session
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ArchiveEntry {
    /// Session start, ms since epoch
    #[serde(deserialize_with = "loose::millis")]
    pub ts: Option<i64>,
    /// Shooter name
    #[serde(deserialize_with = "loose::text")]
    pub name: Option<String>,
    /// Match or target name
    #[serde(deserialize_with = "loose::text")]
    pub target_name: Option<String>,
    pub distance: Option<Value>,
    pub face_id: Option<Value>,
    /// Group size text computed by the device
    pub group: Option<Value>,
}

impl ArchiveEntry {
    /// Shooter name, or `Unknown Shooter` for the placeholder
    pub fn shooter_name(&self) -> String {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() && name != PLACEHOLDER_NAME => name.to_string(),
            _ => "Unknown Shooter".to_string(),
        }
    }

    /// Face id as text
    pub fn face_text(&self) -> String {
        value_text(self.face_id.as_ref())
    }
}

/// All archive entries keyed by session id
///
/// An entry that is not an object is logged and left out.
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Archive {
    #[serde(deserialize_with = "loose::keyed")]
    entries: BTreeMap<String, ArchiveEntry>,
}

impl Archive {
    /// Parse `archive.txt` content.
    pub fn parse(json: &str) -> crate::Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| crate::ShotMarkerError::parse_error("Archive deserialization", e))
    }

    pub fn get(&self, id: &str) -> Option<&ArchiveEntry> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries ordered from the most recent session id to the oldest
    pub fn newest_first(&self) -> impl Iterator<Item = (&str, &ArchiveEntry)> {
        let mut entries: Vec<_> = self.entries.iter().map(|(id, e)| (id.as_str(), e)).collect();
        entries.sort_by(|(a, _), (b, _)| super::compare_ids(b, a));
        entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARCHIVE: &str = r#"{
        "1715436178223": {"ts": 1715436178223, "name": "J. Smith", "target_name": "M1",
                          "distance": "300m", "face_id": "ICFRA", "group": "45mm"},
        "1715439999000": {"ts": 1715439999000, "name": "A", "target_name": "9"},
        "999": {"ts": 999}
    }"#;

    #[test]
    fn test_parse_archive() {
        let archive = Archive::parse(ARCHIVE).unwrap();
        assert_eq!(archive.len(), 3);

        let entry = archive.get("1715436178223").unwrap();
        assert_eq!(entry.shooter_name(), "J. Smith");
        assert_eq!(entry.face_text(), "ICFRA");
        assert_eq!(archive.get("1715439999000").unwrap().shooter_name(), "Unknown Shooter");
    }

    #[test]
    fn test_newest_first_orders_numerically() {
        let archive = Archive::parse(ARCHIVE).unwrap();
        let ids: Vec<&str> = archive.newest_first().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["1715439999000", "1715436178223", "999"]);
    }

    #[test]
    fn test_loosely_typed_entries() {
        let archive = Archive::parse(
            r#"{"2000": {"ts": "2000", "target_name": 9, "name": null}, "3000": 17, "4000": {}}"#,
        )
        .unwrap();
        assert_eq!(archive.len(), 2);

        let entry = archive.get("2000").unwrap();
        assert_eq!(entry.ts, Some(2000));
        assert_eq!(entry.target_name.as_deref(), Some("9"));
        assert_eq!(entry.shooter_name(), "Unknown Shooter");
        assert!(archive.get("3000").is_none());
    }

    #[test]
    fn test_archive_must_be_an_object() {
        assert!(Archive::parse("[1, 2]").is_err());
    }

    #[test]
    fn test_empty_archive() {
        let archive = Archive::parse("{}").unwrap();
        assert!(archive.is_empty());
        assert_eq!(archive.newest_first().count(), 0);
    }
}
