//! Report configuration
//!
//! Unit-conversion factors and presentation limits used by the reporting and
//! export layers. The codec never reads this: decoded shots stay in device units
//! until a report converts them.
//!
//! Configuration is plain YAML; every key is optional.
//!
//! ```yaml
//! velocity_factor: 3.28084
//! position_decimals: 1
//! decode_mode: lenient
//! ```

use crate::codec::DecodeMode;
use crate::{Result, ShotMarkerError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Metres per second to feet per second
pub const MPS_TO_FPS: f64 = 3.28084;

/// Settings for reports and match export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Factor applied to decoded velocity before export
    pub velocity_factor: f64,
    /// Decimal places kept on exported x/y
    pub position_decimals: u32,
    /// Decimal places kept on exported velocity
    pub velocity_decimals: u32,
    /// Decimal places kept on exported shot quality
    pub quality_decimals: u32,
    /// Transcoder strictness for stored shot strings
    pub decode_mode: DecodeMode,
    /// Number of string files previewed by the read report
    pub sample_strings: usize,
    /// Characters shown when previewing string contents
    pub preview_chars: usize,
    /// Entries listed in summaries
    pub summary_limit: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            velocity_factor: MPS_TO_FPS,
            position_decimals: 0,
            velocity_decimals: 0,
            quality_decimals: 1,
            decode_mode: DecodeMode::Strict,
            sample_strings: 5,
            preview_chars: 100,
            summary_limit: 10,
        }
    }
}

impl ReportConfig {
    /// Parse configuration from a YAML string.
    ///
    /// An empty document yields the defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml_ng::from_str(yaml)
            .map_err(|e| ShotMarkerError::parse_error("ReportConfig deserialization", e))
    }

    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| ShotMarkerError::file_error(path, e))?;
        let config = Self::from_yaml(&yaml)?;
        debug!(path = %path.display(), ?config, "Loaded report configuration");
        Ok(config)
    }
}

/// Round `value` to `decimals` places, half away from zero.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if decimals == 0 {
        return value.round();
    }
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}
