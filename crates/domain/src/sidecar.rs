use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::OpaqueId;

pub const SIDECAR_FILE_NAME: &str = ".imgrater.json";

pub fn sidecar_path(directory: &Path) -> PathBuf {
    directory.join(SIDECAR_FILE_NAME)
}

/// Cached metadata for one image file.
///
/// `(name, size_bytes, mtime_secs)` stands in for content identity. A file
/// rewritten with the same size within the same second is not detected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    #[serde(rename = "n")]
    pub name: String,
    #[serde(rename = "s")]
    pub size_bytes: u64,
    #[serde(rename = "m")]
    pub mtime_secs: i64,
    #[serde(rename = "w", default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(rename = "h", default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(rename = "tw", default, skip_serializing_if = "Option::is_none")]
    pub thumb_width: Option<u32>,
    #[serde(rename = "th", default, skip_serializing_if = "Option::is_none")]
    pub thumb_height: Option<u32>,
}

impl FileEntry {
    pub fn discovered(name: impl Into<String>, size_bytes: u64, mtime_secs: i64) -> Self {
        Self {
            name: name.into(),
            size_bytes,
            mtime_secs,
            width: None,
            height: None,
            thumb_width: None,
            thumb_height: None,
        }
    }

    pub fn is_unchanged(&self, size_bytes: u64, mtime_secs: i64) -> bool {
        self.size_bytes == size_bytes && self.mtime_secs == mtime_secs
    }
}

pub type FileMap = BTreeMap<OpaqueId, FileEntry>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubdirectoryEntry {
    pub name: String,
    /// `None` until the subdirectory's file list has been requested once.
    #[serde(default)]
    pub files: Option<FileMap>,
}

impl SubdirectoryEntry {
    pub fn unscanned(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            files: None,
        }
    }

    pub fn file_count(&self) -> Option<usize> {
        self.files.as_ref().map(BTreeMap::len)
    }
}

/// Contents of one `.imgrater.json` sidecar: subdirectory id -> entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SidecarDocument {
    pub subdirectories: BTreeMap<OpaqueId, SubdirectoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubdirectorySummary {
    pub name: String,
    #[serde(rename = "fileCount")]
    pub file_count: Option<usize>,
}
