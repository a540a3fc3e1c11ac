//! Error types for backup reading and shot decoding.
//!
//! All errors implement the `std::error::Error` trait and carry structured context
//! so callers can decide whether to skip a record or abort.
//!
//! ## Error Categories
//!
//! - **Record Errors**: A single shot entry cannot be decoded
//! - **File Errors**: Problems reading backup files or writing exports
//! - **Decompression Errors**: A `string-<id>.z` file is not a valid zlib stream
//! - **Parse Errors**: JSON documents or YAML configuration that fail to deserialize
//!
//! ## Skip and Continue
//!
//! Record errors never poison a batch. Use [`ShotMarkerError::is_record_level`] to
//! decide whether the failure belongs to one shot or to the whole operation:
//!
//! ```rust
//! use shotmarker::ShotMarkerError;
//!
//! let error = ShotMarkerError::TruncatedRecord { expected: 32, actual: 10 };
//! if error.is_record_level() {
//!     println!("Skipping shot: {}", error);
//!     for suggestion in error.recovery_suggestions() {
//!         println!("  - {}", suggestion);
//!     }
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Parse context for a shot list entry that is neither a string nor an object
pub const SHOT_ENTRY_CONTEXT: &str = "shot entry";

/// Result type alias for shotmarker operations.
pub type Result<T, E = ShotMarkerError> = std::result::Result<T, E>;

/// Main error type for shotmarker operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ShotMarkerError {
    #[error("Malformed encoded input at position {position}: {reason}")]
    MalformedInput { position: usize, reason: String },

    #[error("Truncated shot record: expected {expected} bytes, found {actual}")]
    TruncatedRecord { expected: usize, actual: usize },

    #[error("Backup file error: {path}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decompress {path}")]
    Decompress {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in {context}: {details}")]
    Parse { context: String, details: String },

    #[error("Directory '{dir}' does not contain data.txt")]
    MissingDataFile { dir: PathBuf },

    #[error("String file '{id}' not found in backup")]
    StringNotFound { id: String },
}

impl ShotMarkerError {
    /// Returns whether this error concerns a single shot record.
    ///
    /// Batch callers skip the offending record and keep decoding its siblings.
    pub fn is_record_level(&self) -> bool {
        match self {
            ShotMarkerError::MalformedInput { .. } => true,
            ShotMarkerError::TruncatedRecord { .. } => true,
            ShotMarkerError::File { .. } => false,
            ShotMarkerError::Decompress { .. } => false,
            ShotMarkerError::Parse { context, .. } => context == SHOT_ENTRY_CONTEXT,
            ShotMarkerError::MissingDataFile { .. } => false,
            ShotMarkerError::StringNotFound { .. } => false,
        }
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            ShotMarkerError::MalformedInput { .. } => vec![
                "Check the encoded shot was copied without truncation",
                "Retry with lenient decoding for legacy records",
            ],
            ShotMarkerError::TruncatedRecord { .. } => vec![
                "Verify the encoded shot string is complete",
                "Skip the record and continue with the session",
            ],
            ShotMarkerError::File { .. } => vec![
                "Check file exists and is readable",
                "Check file permissions",
                "Ensure sufficient disk space for exports",
            ],
            ShotMarkerError::Decompress { .. } => vec![
                "Re-extract the backup archive",
                "Verify the string file was not modified after extraction",
            ],
            ShotMarkerError::Parse { .. } => vec![
                "Check data format compatibility",
                "Verify source data integrity",
            ],
            ShotMarkerError::MissingDataFile { .. } => vec![
                "Pass the extracted backup folder, not the .tar archive",
                "Extract the backup with `tar -xf <backup>.tar -C <dir>`",
            ],
            ShotMarkerError::StringNotFound { .. } => vec![
                "List available string ids with `shotmarker explore <dir>`",
                "Check the id matches a string-<id>.z file name",
            ],
        }
    }

    /// Helper constructor for file errors with path context.
    pub fn file_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ShotMarkerError::File { path: path.into(), source }
    }

    /// Helper constructor for malformed transcoder input.
    pub fn malformed_input(position: usize, reason: impl Into<String>) -> Self {
        ShotMarkerError::MalformedInput { position, reason: reason.into() }
    }

    /// Helper constructor for parse errors.
    pub fn parse_error(context: impl Into<String>, details: impl ToString) -> Self {
        ShotMarkerError::Parse { context: context.into(), details: details.to_string() }
    }
}

impl From<std::io::Error> for ShotMarkerError {
    fn from(err: std::io::Error) -> Self {
        ShotMarkerError::File { path: PathBuf::from("<unknown>"), source: err }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
          #[test]
          fn error_messages_carry_their_context(
            position in 0usize..10_000usize,
            reason in ".*",
            actual in 0usize..32usize,
            context in "\\w+",
            details in ".*"
          ) {
            let malformed = ShotMarkerError::malformed_input(position, reason.clone());
            let truncated = ShotMarkerError::TruncatedRecord { expected: 32, actual };
            let parse = ShotMarkerError::parse_error(context.clone(), details.clone());

            let malformed_msg = malformed.to_string();
            prop_assert!(malformed_msg.contains(&position.to_string()));
            prop_assert!(malformed_msg.contains(&reason));

            let truncated_msg = truncated.to_string();
            prop_assert!(truncated_msg.contains("32"));
            prop_assert!(truncated_msg.contains(&actual.to_string()));

            let parse_msg = parse.to_string();
            prop_assert!(parse_msg.contains(&context));
            prop_assert!(parse_msg.contains(&details));
          }

          #[test]
          fn io_conversion_preserves_message(reason in ".*") {
            let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, reason.clone());
            let converted: ShotMarkerError = io_err.into();
            match converted {
              ShotMarkerError::File { source, .. } => {
                prop_assert_eq!(source.to_string(), reason);
              }
              _ => prop_assert!(false, "Expected File error from io::Error conversion"),
            }
          }
        }
    }

    #[test]
    fn record_level_classification() {
        assert!(ShotMarkerError::malformed_input(3, "bad char").is_record_level());
        assert!(ShotMarkerError::TruncatedRecord { expected: 32, actual: 10 }.is_record_level());
        assert!(!ShotMarkerError::MissingDataFile { dir: PathBuf::from("/tmp") }.is_record_level());
        assert!(!ShotMarkerError::parse_error("data.txt", "eof").is_record_level());
        assert!(ShotMarkerError::parse_error(SHOT_ENTRY_CONTEXT, "17").is_record_level());
    }

    #[test]
    fn error_traits_validation() {
        fn assert_send_sync_static<T: Send + Sync + 'static>() {}
        assert_send_sync_static::<ShotMarkerError>();

        let error = ShotMarkerError::StringNotFound { id: "1715436178223".to_string() };
        let _: &dyn std::error::Error = &error;
    }

    #[test]
    fn every_variant_has_suggestions() {
        let errors = [
            ShotMarkerError::malformed_input(0, "x"),
            ShotMarkerError::TruncatedRecord { expected: 32, actual: 0 },
            ShotMarkerError::file_error("/data.txt", std::io::Error::other("boom")),
            ShotMarkerError::Decompress {
                path: PathBuf::from("string-1.z"),
                source: std::io::Error::other("bad zlib header"),
            },
            ShotMarkerError::parse_error("archive.txt", "expected value"),
            ShotMarkerError::MissingDataFile { dir: PathBuf::from("SM_backup") },
            ShotMarkerError::StringNotFound { id: "42".to_string() },
        ];

        for error in &errors {
            let suggestions = error.recovery_suggestions();
            assert!(!suggestions.is_empty(), "{error} has no suggestions");
            for suggestion in suggestions {
                assert!(suggestion.len() > 5);
            }
        }
    }

    #[test]
    fn file_error_keeps_source() {
        let error = ShotMarkerError::file_error(
            "/backup/data.txt",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        let source = std::error::Error::source(&error).expect("source should be attached");
        assert_eq!(source.to_string(), "missing");
    }
}
