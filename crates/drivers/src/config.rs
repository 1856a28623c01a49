use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use imgrater_domain::{DirectoryId, ThumbnailSettings};
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "config/config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub directories: BTreeMap<String, PathBuf>,
    pub thumbnail_dir: PathBuf,
    pub thumbnail_store: PathBuf,
    pub thumbnail: ThumbnailSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            directories: BTreeMap::new(),
            thumbnail_dir: PathBuf::from("thumbnails"),
            thumbnail_store: PathBuf::from("config/thumbnails.json"),
            thumbnail: ThumbnailSettings::default(),
        }
    }
}

impl AppConfig {
    /// Reads the JSON config. A missing file means defaults; a malformed one is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn registered_directories(&self) -> Result<BTreeMap<DirectoryId, PathBuf>, ConfigError> {
        self.directories
            .iter()
            .map(|(directory_id, path)| {
                let directory_id = DirectoryId::new(directory_id.clone())
                    .map_err(|error| ConfigError::Invalid(error.to_string()))?;
                Ok((directory_id, path.clone()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn default_config_uses_local_thumbnail_paths() {
        let config = AppConfig::default();
        assert_eq!(config.thumbnail_dir, PathBuf::from("thumbnails"));
        assert_eq!(config.thumbnail_store, PathBuf::from("config/thumbnails.json"));
        assert_eq!(config.thumbnail, ThumbnailSettings::default());
        assert!(config.directories.is_empty());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().expect("tempdir");
        let config = AppConfig::load(&dir.path().join("config.json")).expect("load");
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn partial_file_is_merged_with_defaults() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{ "directories": { "main": "/srv/photos" }, "thumbnail": { "maxSize": 480 } }"#,
        )
        .expect("write");

        let config = AppConfig::load(&path).expect("load");

        assert_eq!(config.directories["main"], PathBuf::from("/srv/photos"));
        assert_eq!(config.thumbnail.base_size, 200);
        assert_eq!(config.thumbnail.max_size, 480);
        assert_eq!(config.thumbnail_dir, PathBuf::from("thumbnails"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("config.json");
        fs::write(&path, "{ directories: ").expect("write");

        assert!(matches!(
            AppConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn empty_directory_id_is_rejected() {
        let config = AppConfig {
            directories: BTreeMap::from([(String::new(), PathBuf::from("/x"))]),
            ..AppConfig::default()
        };
        assert!(matches!(
            config.registered_directories(),
            Err(ConfigError::Invalid(_))
        ));
    }
}
