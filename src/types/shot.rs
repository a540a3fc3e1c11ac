//! Shot record types
//!
//! [`Shot`] is the fully resolved record exchanged with the codec. [`ShotFields`]
//! is the partial form a producer assembles before encoding, or that a session
//! document carries when a shot is stored as a plain JSON object.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Temperature written when a producer leaves it unset.
pub const DEFAULT_TEMPERATURE: u8 = 20;

/// One decoded projectile impact.
///
/// Field names serialize the way the device writes them (`ts`, `v`, `temp`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    /// Milliseconds since the Unix epoch
    #[serde(rename = "ts")]
    pub timestamp: u64,
    /// Horizontal offset from target centre, 1/1000 unit precision
    pub x: f64,
    /// Vertical offset from target centre, 1/1000 unit precision
    pub y: f64,
    /// Projectile velocity, 1/100 unit precision
    #[serde(rename = "v")]
    pub velocity: f64,
    /// Raw temperature byte
    #[serde(rename = "temp")]
    pub temperature: u8,
    pub multi_assign: u8,
    /// Device status code, zero when the shot was clean
    pub error: u8,
}

impl Shot {
    /// Timestamp as a UTC date, or `None` when it is outside chrono's range.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        i64::try_from(self.timestamp).ok().and_then(DateTime::from_timestamp_millis)
    }
}

/// Shot with every field optional.
///
/// Missing fields take their defaults when resolved: current time for the
/// timestamp, 20 for the temperature and zero for everything else.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShotFields {
    #[serde(rename = "ts", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(rename = "v", skip_serializing_if = "Option::is_none")]
    pub velocity: Option<f64>,
    #[serde(rename = "temp", skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multi_assign: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<f64>,
}

impl ShotFields {
    /// Resolve defaults, stamping a missing timestamp with the current time.
    pub fn into_shot(self) -> Shot {
        self.into_shot_at(now_millis())
    }

    /// Resolve defaults using `now_ms` for a missing timestamp.
    pub fn into_shot_at(self, now_ms: u64) -> Shot {
        Shot {
            timestamp: self.timestamp.unwrap_or(now_ms),
            x: self.x.unwrap_or(0.0),
            y: self.y.unwrap_or(0.0),
            velocity: self.velocity.unwrap_or(0.0),
            temperature: self.temperature.map(clamp_byte).unwrap_or(DEFAULT_TEMPERATURE),
            multi_assign: self.multi_assign.map(clamp_byte).unwrap_or(0),
            error: self.error.map(clamp_byte).unwrap_or(0),
        }
    }
}

impl From<Shot> for ShotFields {
    fn from(shot: Shot) -> Self {
        Self {
            timestamp: Some(shot.timestamp),
            x: Some(shot.x),
            y: Some(shot.y),
            velocity: Some(shot.velocity),
            temperature: Some(f64::from(shot.temperature)),
            multi_assign: Some(f64::from(shot.multi_assign)),
            error: Some(f64::from(shot.error)),
        }
    }
}

/// Round and clamp a numeric field into a single byte. NaN becomes 0.
pub fn clamp_byte(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 255.0) as u8
}

fn now_millis() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as u64).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_missing_fields() {
        let shot = ShotFields::default().into_shot_at(1_700_000_000_000);
        assert_eq!(shot.timestamp, 1_700_000_000_000);
        assert_eq!(shot.x, 0.0);
        assert_eq!(shot.y, 0.0);
        assert_eq!(shot.velocity, 0.0);
        assert_eq!(shot.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(shot.multi_assign, 0);
        assert_eq!(shot.error, 0);
    }

    #[test]
    fn missing_timestamp_uses_current_time() {
        let before = now_millis();
        let shot = ShotFields::default().into_shot();
        let after = now_millis();
        assert!(shot.timestamp >= before && shot.timestamp <= after);
    }

    #[test]
    fn explicit_zero_temperature_is_kept() {
        let fields = ShotFields { temperature: Some(0.0), ..Default::default() };
        assert_eq!(fields.into_shot_at(0).temperature, 0);
    }

    #[test]
    fn byte_fields_clamp() {
        assert_eq!(clamp_byte(-4.0), 0);
        assert_eq!(clamp_byte(300.0), 255);
        assert_eq!(clamp_byte(21.4), 21);
        assert_eq!(clamp_byte(f64::NAN), 0);
    }

    #[test]
    fn device_field_names_deserialize() {
        let json = r#"{"ts": 1715436178223, "x": 1.5, "y": -2.25, "v": 812.4, "temp": 18.6}"#;
        let fields: ShotFields = serde_json::from_str(json).unwrap();
        assert_eq!(fields.timestamp, Some(1_715_436_178_223));
        assert_eq!(fields.velocity, Some(812.4));

        let shot = fields.into_shot_at(0);
        assert_eq!(shot.temperature, 19);
        assert_eq!(shot.multi_assign, 0);
    }

    #[test]
    fn datetime_conversion() {
        let shot = ShotFields { timestamp: Some(1_700_000_000_000), ..Default::default() }
            .into_shot_at(0);
        let date = shot.datetime().unwrap();
        assert_eq!(date.to_rfc3339(), "2023-11-14T22:13:20+00:00");
    }
}
