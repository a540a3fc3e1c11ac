//! Backup document schema
//!
//! Serde models for the JSON documents found in a device backup:
//! - `data.txt` with the live frames ([`MainData`])
//! - `archive.txt` with stored session metadata ([`Archive`])
//! - `string-<id>.z` session files, each a single [`Frame`]
//!
//! Devices omit fields freely and type them loosely, so every field is
//! optional, unknown keys are ignored and mistyped values are coerced (see
//! [`loose`]).

mod archive;
mod frame;
pub mod loose;
mod main_data;
mod score;
mod shot_entry;

use serde_json::Value;
use std::cmp::Ordering;

pub use archive::{Archive, ArchiveEntry};
pub use frame::Frame;
pub use main_data::MainData;
pub use score::{ScoreEntry, ScoreString};
pub use loose::is_truthy;
pub use shot_entry::{ShotAnnotations, ShotEntry, ShotObject};

/// Render a loosely typed JSON value as display text.
///
/// Strings are unquoted; null and missing values render empty.
pub fn value_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

/// Order session ids numerically, falling back to text order for
/// ids that are not plain integers.
pub(crate) fn compare_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_text() {
        assert_eq!(value_text(None), "");
        assert_eq!(value_text(Some(&Value::Null)), "");
        assert_eq!(value_text(Some(&json!("300m"))), "300m");
        assert_eq!(value_text(Some(&json!(300))), "300");
        assert_eq!(value_text(Some(&json!(true))), "true");
    }

    #[test]
    fn test_compare_ids() {
        assert_eq!(compare_ids("999", "1715436178223"), Ordering::Less);
        assert_eq!(compare_ids("20", "20"), Ordering::Equal);
        assert_eq!(compare_ids("12", "abc"), Ordering::Less);
        assert_eq!(compare_ids("abd", "abc"), Ordering::Greater);
    }
}
