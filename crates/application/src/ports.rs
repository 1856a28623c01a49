use std::path::Path;

use imgrater_domain::{Dimensions, OpaqueId};
use serde_json::Value;

use crate::ApplicationError;

/// JSON documents addressed by file path. No locking.
pub trait KeyedStore: Send + Sync {
    fn load(&self, path: &Path) -> Result<Value, ApplicationError>;

    fn save(&self, path: &Path, document: &Value) -> Result<(), ApplicationError>;
}

pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> OpaqueId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    pub kind: EntryKind,
    pub size_bytes: u64,
    /// Whole seconds since the epoch, rounded down.
    pub mtime_secs: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub stat: FileStat,
}

pub trait FileSystem: Send + Sync {
    /// `None` when the path does not exist or cannot be read.
    fn stat(&self, path: &Path) -> Option<FileStat>;

    /// Immediate children of `path`. An unreadable directory lists as empty.
    fn list_dir(&self, path: &Path) -> Vec<DirEntry>;

    /// Returns `Ok(false)` when there was nothing to remove.
    fn remove_file(&self, path: &Path) -> Result<bool, ApplicationError>;

    fn ensure_dir(&self, path: &Path) -> Result<(), ApplicationError>;
}

pub trait MediaInspector: Send + Sync {
    fn read_dimensions(&self, path: &Path) -> Result<Dimensions, ApplicationError>;

    /// Resizes to exactly `size` and writes the encoded thumbnail to `dest`,
    /// replacing any existing file.
    fn render_resized(
        &self,
        source: &Path,
        dest: &Path,
        size: Dimensions,
    ) -> Result<(), ApplicationError>;
}
