//! Backup directory reader
//!
//! Reads the documents of an extracted device backup on demand. Nothing is
//! cached: every call goes back to the filesystem, so a reader can be kept
//! around while files are being inspected or replaced.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use shotmarker::backup::BackupReader;
//!
//! fn list_sessions() -> shotmarker::Result<()> {
//!     let reader = BackupReader::open("SM_backup_May_16")?;
//!     let data = reader.read_main_data()?;
//!     println!("Firmware {} with {} frames", data.version_text(), data.frames.len());
//!
//!     for id in reader.string_ids()? {
//!         let session = reader.read_session(&id)?;
//!         println!("{}: {} shots", id, session.shots.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

use crate::schema::{Archive, Frame, MainData};
use crate::{Result, ShotMarkerError};
use flate2::read::ZlibDecoder;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Live frame document
pub const DATA_FILE: &str = "data.txt";
/// Stored session index
pub const ARCHIVE_FILE: &str = "archive.txt";

const STRING_PREFIX: &str = "string-";
const STRING_SUFFIX: &str = ".z";

/// Reader over an extracted backup directory
#[derive(Debug, Clone)]
pub struct BackupReader {
    dir: PathBuf,
}

impl BackupReader {
    /// Open a backup directory. It must contain `data.txt`.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        if !dir.join(DATA_FILE).is_file() {
            return Err(ShotMarkerError::MissingDataFile { dir });
        }
        debug!(dir = %dir.display(), "Opened backup directory");
        Ok(Self { dir })
    }

    /// Backup directory path
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the compressed session file for `id`
    pub fn string_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}{}{}", STRING_PREFIX, id, STRING_SUFFIX))
    }

    /// Read and parse `data.txt`.
    pub fn read_main_data(&self) -> Result<MainData> {
        let text = self.read_text(DATA_FILE)?;
        MainData::parse(&text)
    }

    /// Read and parse `archive.txt`.
    pub fn read_archive(&self) -> Result<Archive> {
        let text = self.read_text(ARCHIVE_FILE)?;
        Archive::parse(&text)
    }

    /// Ids of all `string-<id>.z` files, numeric ids in ascending order.
    pub fn string_ids(&self) -> Result<Vec<String>> {
        let entries =
            fs::read_dir(&self.dir).map_err(|e| ShotMarkerError::file_error(&self.dir, e))?;

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ShotMarkerError::file_error(&self.dir, e))?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            let id = name.strip_prefix(STRING_PREFIX).and_then(|n| n.strip_suffix(STRING_SUFFIX));
            if let Some(id) = id {
                ids.push(id.to_string());
            }
        }

        ids.sort_by(|a, b| crate::schema::compare_ids(a, b));
        Ok(ids)
    }

    /// Whether `string-<id>.z` exists
    pub fn has_string(&self, id: &str) -> bool {
        self.string_path(id).is_file()
    }

    /// Inflate `string-<id>.z` into text. Invalid UTF-8 is replaced, not rejected.
    pub fn read_string(&self, id: &str) -> Result<String> {
        let path = self.string_path(id);
        let compressed = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ShotMarkerError::StringNotFound { id: id.to_string() });
            }
            Err(e) => return Err(ShotMarkerError::file_error(path, e)),
        };

        let mut inflated = Vec::new();
        ZlibDecoder::new(compressed.as_slice())
            .read_to_end(&mut inflated)
            .map_err(|source| ShotMarkerError::Decompress { path, source })?;
        let text = String::from_utf8_lossy(&inflated).into_owned();

        debug!(id, compressed = compressed.len(), inflated = text.len(), "Read string file");
        Ok(text)
    }

    /// Inflate and parse `string-<id>.z` as a session document.
    pub fn read_session(&self, id: &str) -> Result<Frame> {
        let text = self.read_string(id)?;
        Frame::parse(&text).map_err(|e| match e {
            ShotMarkerError::Parse { details, .. } => {
                ShotMarkerError::parse_error(format!("string file {}", id), details)
            }
            other => other,
        })
    }

    fn read_text(&self, name: &str) -> Result<String> {
        let path = self.dir.join(name);
        fs::read_to_string(&path).map_err(|e| ShotMarkerError::file_error(path, e))
    }
}
