use std::collections::BTreeMap;

use imgrater_application::ApplicationError;
use imgrater_domain::{DirectoryId, FileMap, OpaqueId, RegisteredDirectory, SubdirectorySummary};
use serde::Serialize;

pub fn present_directories(
    directories: &BTreeMap<DirectoryId, RegisteredDirectory>,
) -> Result<String, ApplicationError> {
    to_json(directories)
}

/// `{id: {name, fileCount}}`, with `fileCount: null` for unscanned subdirectories.
pub fn present_subdirectories(
    subdirectories: &BTreeMap<OpaqueId, SubdirectorySummary>,
) -> Result<String, ApplicationError> {
    to_json(subdirectories)
}

pub fn present_files(files: &FileMap) -> Result<String, ApplicationError> {
    to_json(files)
}

fn to_json<T: Serialize>(value: &T) -> Result<String, ApplicationError> {
    serde_json::to_string_pretty(value)
        .map_err(|error| ApplicationError::Persistence(error.to_string()))
}
