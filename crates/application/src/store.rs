use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::{ApplicationError, KeyedStore};

/// Loads a cached document, treating a missing or malformed file as empty.
pub fn load_document<T>(store: &dyn KeyedStore, path: &Path) -> T
where
    T: DeserializeOwned + Default,
{
    let parsed = store.load(path).and_then(|value| {
        serde_json::from_value(value)
            .map_err(|error| ApplicationError::Persistence(error.to_string()))
    });

    match parsed {
        Ok(document) => document,
        Err(error) => {
            debug!(path = %path.display(), %error, "cache not loaded, starting empty");
            T::default()
        }
    }
}

/// Overwrites a cached document. Failures are logged and dropped; the next
/// scan rebuilds whatever was lost.
pub fn save_document<T>(store: &dyn KeyedStore, path: &Path, document: &T)
where
    T: Serialize,
{
    let result = serde_json::to_value(document)
        .map_err(|error| ApplicationError::Persistence(error.to_string()))
        .and_then(|value| store.save(path, &value));

    if let Err(error) = result {
        warn!(path = %path.display(), %error, "failed to save cache");
    }
}
