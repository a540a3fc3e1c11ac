//! Type-safe Rust library for ShotMarker target backups.
//!
//! Electronic scoring targets store every shot as a compact 32-byte record,
//! transcoded to text and embedded in JSON session documents. This crate reads
//! those records back: the shot codec, the backup directory layout around it,
//! and reports built on top.
//!
//! # Features
//!
//! - **Shot Codec**: Bit-exact packing and transcoding of shot records
//! - **Backup Reading**: `data.txt`, `archive.txt` and zlib session files
//! - **Skip and Continue**: One corrupt shot never hides its siblings
//! - **Reports**: Backup summaries, string file exploration, match export
//!
//! # Quick Start
//!
//! ```rust
//! use shotmarker::{Shot, codec};
//!
//! # fn main() -> shotmarker::Result<()> {
//! let shot = Shot { timestamp: 1_700_000_000_000, x: 12.345, y: -6.7, velocity: 850.12,
//!                   temperature: 21, multi_assign: 0, error: 0 };
//! let text = codec::encode(&shot);
//! let back = codec::decode(&text)?;
//! assert_eq!(back.temperature, 21);
//! # Ok(())
//! # }
//! ```
//!
//! ## Example (match export)
//!
//! ```rust,no_run
//! use shotmarker::{ReportConfig, ShotMarker, report};
//!
//! fn main() -> shotmarker::Result<()> {
//!     let reader = ShotMarker::open("SM_backup_May_16")?;
//!     let outcome = report::export_matches(&reader, &ReportConfig::default())?;
//!     report::write_matches("matches.json".as_ref(), &outcome.matches)?;
//!     println!("{}", outcome);
//!     Ok(())
//! }
//! ```

// Core types and error handling
pub mod codec;
pub mod config;
mod error;
#[cfg_attr(any(test, feature = "benchmark"), path = "test_utils.rs")]
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod types;

// Backup documents
pub mod backup;
pub mod schema;

// Decoding and reports
pub mod decode;
pub mod report;

// Core exports
pub use error::*;
pub use types::*;

pub use backup::BackupReader;
pub use codec::DecodeMode;
pub use config::ReportConfig;
pub use decode::{DecodedShot, FrameShots, ShotBatch, ShotFailure, decode_entries, decode_frame};

/// Unified entry point for reading ShotMarker data.
///
/// # Examples
///
/// ```rust,no_run
/// use shotmarker::ShotMarker;
///
/// fn main() -> shotmarker::Result<()> {
///     let reader = ShotMarker::open("SM_backup_Aug_13")?;
///     for id in reader.string_ids()? {
///         println!("{}", id);
///     }
///     Ok(())
/// }
/// ```
pub struct ShotMarker;

impl ShotMarker {
    /// Open an extracted backup directory.
    ///
    /// # Errors
    ///
    /// Returns [`ShotMarkerError::MissingDataFile`] if the directory does not
    /// contain `data.txt`.
    pub fn open<P: AsRef<std::path::Path>>(dir: P) -> Result<BackupReader> {
        BackupReader::open(dir)
    }

    /// Decode one transcoded shot record.
    ///
    /// # Example
    ///
    /// ```rust
    /// use shotmarker::{DecodeMode, ShotMarker, ShotMarkerError};
    ///
    /// let err = ShotMarker::decode("AAAAAAAAAAAAAA==", DecodeMode::Strict).unwrap_err();
    /// assert!(matches!(err, ShotMarkerError::TruncatedRecord { expected: 32, actual: 10 }));
    /// ```
    pub fn decode(encoded: &str, mode: DecodeMode) -> Result<Shot> {
        codec::decode_with(encoded, mode)
    }
}
