use std::fs;
use std::path::Path;

use imgrater_application::{ApplicationError, KeyedStore};
use serde_json::Value;

/// Keyed persistent store backed by plain JSON files. Saves overwrite in place.
#[derive(Debug, Default)]
pub struct JsonFileStore;

impl KeyedStore for JsonFileStore {
    fn load(&self, path: &Path) -> Result<Value, ApplicationError> {
        let bytes = fs::read(path).map_err(|error| ApplicationError::Io(error.to_string()))?;
        serde_json::from_slice(&bytes)
            .map_err(|error| ApplicationError::Persistence(error.to_string()))
    }

    fn save(&self, path: &Path, document: &Value) -> Result<(), ApplicationError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|error| ApplicationError::Io(error.to_string()))?;
            }
        }

        let bytes = serde_json::to_vec(document)
            .map_err(|error| ApplicationError::Persistence(error.to_string()))?;
        fs::write(path, bytes).map_err(|error| ApplicationError::Io(error.to_string()))
    }
}
