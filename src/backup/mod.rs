//! Extracted backup directories
//!
//! A device backup unpacks into a flat directory:
//!
//! | File | Content |
//! |---|---|
//! | `data.txt` | live frames as JSON |
//! | `archive.txt` | stored session index as JSON |
//! | `string-<id>.z` | one zlib-compressed session document per stored session |

mod reader;

pub use reader::{ARCHIVE_FILE, BackupReader, DATA_FILE};
