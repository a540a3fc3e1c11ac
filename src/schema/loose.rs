//! Deserializers for loosely typed device fields
//!
//! Firmware versions disagree on field types: flags arrive as `1` or `"X"`,
//! names as numbers, timestamps as strings. These helpers coerce through
//! [`Value`] so one odd field never fails the surrounding document.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::warn;

/// Loose truthiness: null, false, 0, NaN and "" are unset
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Number from a JSON number or numeric string
pub fn number_value(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

pub(crate) fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(is_truthy(&value))
}

/// Strings as-is, other scalars rendered, null as `None`
pub(crate) fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    })
}

pub(crate) fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_value(&value))
}

/// Millisecond timestamp, fractional parts truncated
pub(crate) fn millis<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let exact = match &value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    };
    Ok(exact.or_else(|| number_value(&value).map(|n| n as i64)))
}

/// Objects only; anything else reads as absent
pub(crate) fn object<'de, D>(deserializer: D) -> Result<Option<Map<String, Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Object(map) => Ok(Some(map)),
        _ => Ok(None),
    }
}

/// Array elements; a missing or non-array list reads as empty
pub(crate) fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    items
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(D::Error::custom))
        .collect()
}

/// Keyed documents where one malformed entry is logged and dropped
pub(crate) fn keyed<'de, D, T>(deserializer: D) -> Result<BTreeMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let entries = match Value::deserialize(deserializer)? {
        Value::Object(entries) => entries,
        Value::Null => return Ok(BTreeMap::new()),
        other => {
            return Err(D::Error::custom(format!("expected an object, found {}", other)));
        }
    };

    let mut parsed = BTreeMap::new();
    for (key, value) in entries {
        match serde_json::from_value(value) {
            Ok(entry) => {
                parsed.insert(key, entry);
            }
            Err(error) => warn!(key = %key, %error, "Skipping malformed entry"),
        }
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Loose {
        #[serde(deserialize_with = "truthy")]
        flag: bool,
        #[serde(deserialize_with = "text")]
        name: Option<String>,
        #[serde(deserialize_with = "number")]
        offset: Option<f64>,
        #[serde(deserialize_with = "millis")]
        ts: Option<i64>,
        #[serde(deserialize_with = "list")]
        items: Vec<u32>,
        #[serde(deserialize_with = "keyed")]
        children: BTreeMap<String, Loose>,
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&Value::Null));
        assert!(!is_truthy(&Value::from(0)));
        assert!(!is_truthy(&Value::from("")));
        assert!(is_truthy(&Value::from("X")));
        assert!(is_truthy(&Value::from(2.5)));
        assert!(is_truthy(&json!({})));
    }

    #[test]
    fn test_coercions() {
        let loose: Loose = serde_json::from_value(json!({
            "flag": 1, "name": 9, "offset": " 0.5 ", "ts": "2000", "items": [1, 2]
        }))
        .unwrap();
        assert!(loose.flag);
        assert_eq!(loose.name.as_deref(), Some("9"));
        assert_eq!(loose.offset, Some(0.5));
        assert_eq!(loose.ts, Some(2000));
        assert_eq!(loose.items, vec![1, 2]);
    }

    #[test]
    fn test_unusable_values_read_as_absent() {
        let loose: Loose = serde_json::from_value(json!({
            "flag": "", "name": null, "offset": "wide", "ts": 1.5e3, "items": "none"
        }))
        .unwrap();
        assert!(!loose.flag);
        assert_eq!(loose.name, None);
        assert_eq!(loose.offset, None);
        assert_eq!(loose.ts, Some(1500));
        assert!(loose.items.is_empty());
    }

    #[test]
    fn test_keyed_drops_only_the_bad_entry() {
        let loose: Loose = serde_json::from_value(json!({
            "children": {"a": {"flag": true}, "b": 7, "c": {}}
        }))
        .unwrap();
        assert_eq!(loose.children.keys().collect::<Vec<_>>(), vec!["a", "c"]);
        assert!(loose.children["a"].flag);

        assert!(serde_json::from_value::<Loose>(json!({"children": [1]})).is_err());
    }
}
