use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use imgrater_domain::{DirectoryId, FileMap, OpaqueId, RegisteredDirectory, SubdirectorySummary};
use tracing::debug;

use crate::{
    ApplicationError, DirectoryReconciler, ListDirectoriesQuery, ListFilesCommand,
    ListSubdirectoriesCommand, SourceFileQuery, ThumbnailCache, ThumbnailQuery,
};

/// Entry point used by the request layer. Unknown directory ids behave like
/// empty directories.
pub struct GalleryService {
    directories: BTreeMap<DirectoryId, PathBuf>,
    reconciler: DirectoryReconciler,
    thumbnails: Arc<ThumbnailCache>,
}

impl GalleryService {
    pub fn new(
        directories: BTreeMap<DirectoryId, PathBuf>,
        reconciler: DirectoryReconciler,
        thumbnails: Arc<ThumbnailCache>,
    ) -> Self {
        Self {
            directories,
            reconciler,
            thumbnails,
        }
    }

    pub fn list_directories(
        &self,
        _query: ListDirectoriesQuery,
    ) -> BTreeMap<DirectoryId, RegisteredDirectory> {
        self.directories
            .iter()
            .map(|(directory_id, path)| {
                (directory_id.clone(), RegisteredDirectory::from_path(path))
            })
            .collect()
    }

    /// Runs the scan on the calling thread; it only stats and lists entries.
    pub fn list_subdirectories(
        &self,
        command: ListSubdirectoriesCommand,
    ) -> BTreeMap<OpaqueId, SubdirectorySummary> {
        let Some(directory) = self.directories.get(&command.directory_id) else {
            debug!(directory_id = %command.directory_id, "unknown directory");
            return BTreeMap::new();
        };
        self.reconciler.list_subdirectories(directory)
    }

    pub async fn list_files(&self, command: ListFilesCommand) -> FileMap {
        let Some(directory) = self.directories.get(&command.directory_id) else {
            debug!(directory_id = %command.directory_id, "unknown directory");
            return FileMap::new();
        };
        self.reconciler
            .list_files(directory, &command.subdirectory_id)
            .await
    }

    /// Absolute path of the thumbnail, rendering it on first access.
    pub async fn thumbnail(
        &self,
        query: ThumbnailQuery,
    ) -> Result<Option<PathBuf>, ApplicationError> {
        let rendered = self.thumbnails.get(&query.file_id).await?;
        Ok(rendered.map(|_| self.thumbnails.thumbnail_path(&query.file_id)))
    }

    pub fn source_file(&self, query: SourceFileQuery) -> Option<PathBuf> {
        let directory = self.directories.get(&query.directory_id)?;
        self.reconciler
            .resolve_file(directory, &query.subdirectory_id, &query.file_id)
    }
}
