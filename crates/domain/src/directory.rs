use std::path::{Path, PathBuf};

use serde::Serialize;

/// A parent directory registered in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisteredDirectory {
    pub name: String,
    pub path: PathBuf,
}

impl RegisteredDirectory {
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        Self {
            name,
            path: path.to_path_buf(),
        }
    }
}
