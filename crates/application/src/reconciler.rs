use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::join_all;
use imgrater_domain::{
    is_supported_image, sidecar_path, Dimensions, FileEntry, FileMap, OpaqueId, SidecarDocument,
    SubdirectoryEntry, SubdirectorySummary, ThumbnailInstruction,
};
use tracing::{debug, info, warn};

use crate::store::{load_document, save_document};
use crate::{
    ApplicationError, EntryKind, FileSystem, IdGenerator, KeyedStore, MediaInspector,
    ThumbnailCache,
};

/// Keeps each registered directory's `.imgrater.json` sidecar in step with the
/// directory tree and tells the thumbnail cache what to create or drop.
///
/// Every call is a load, mutate, save cycle on the sidecar without locking;
/// two overlapping calls on the same directory can lose one side's changes.
pub struct DirectoryReconciler {
    store: Arc<dyn KeyedStore>,
    ids: Arc<dyn IdGenerator>,
    fs: Arc<dyn FileSystem>,
    media: Arc<dyn MediaInspector>,
    thumbnails: Arc<ThumbnailCache>,
}

impl DirectoryReconciler {
    pub fn new(
        store: Arc<dyn KeyedStore>,
        ids: Arc<dyn IdGenerator>,
        fs: Arc<dyn FileSystem>,
        media: Arc<dyn MediaInspector>,
        thumbnails: Arc<ThumbnailCache>,
    ) -> Self {
        Self {
            store,
            ids,
            fs,
            media,
            thumbnails,
        }
    }

    pub fn list_subdirectories(
        &self,
        directory: &Path,
    ) -> BTreeMap<OpaqueId, SubdirectorySummary> {
        let sidecar = sidecar_path(directory);
        let mut document: SidecarDocument = load_document(self.store.as_ref(), &sidecar);
        let mut report = BTreeMap::new();
        let mut instructions = Vec::new();

        document.subdirectories.retain(|subdirectory_id, entry| {
            if self.is_directory(&directory.join(&entry.name)) {
                report.insert(
                    subdirectory_id.clone(),
                    SubdirectorySummary {
                        name: entry.name.clone(),
                        file_count: entry.file_count(),
                    },
                );
                return true;
            }

            debug!(%subdirectory_id, name = %entry.name, "subdirectory gone");
            if let Some(files) = &entry.files {
                instructions.extend(files.keys().map(|file_id| ThumbnailInstruction::Delete {
                    file_id: file_id.clone(),
                }));
            }
            false
        });

        let known: HashSet<String> = document
            .subdirectories
            .values()
            .map(|entry| entry.name.clone())
            .collect();
        let mut discovered = 0_usize;
        for entry in self.fs.list_dir(directory) {
            if entry.stat.kind != EntryKind::Directory || known.contains(&entry.name) {
                continue;
            }

            let subdirectory_id = self.fresh_id(|candidate| {
                document.subdirectories.contains_key(candidate)
            });
            report.insert(
                subdirectory_id.clone(),
                SubdirectorySummary {
                    name: entry.name.clone(),
                    file_count: None,
                },
            );
            document
                .subdirectories
                .insert(subdirectory_id, SubdirectoryEntry::unscanned(entry.name));
            discovered += 1;
        }

        let removed_files = instructions.len();
        self.thumbnails.apply_updates(instructions);
        save_document(self.store.as_ref(), &sidecar, &document);
        info!(
            directory = %directory.display(),
            subdirectories = report.len(),
            discovered,
            removed_files,
            "subdirectories reconciled"
        );

        report
    }

    /// Reconciles one subdirectory's files. An unknown `subdirectory_id` yields
    /// an empty mapping.
    pub async fn list_files(&self, directory: &Path, subdirectory_id: &OpaqueId) -> FileMap {
        let sidecar = sidecar_path(directory);
        let mut document: SidecarDocument = load_document(self.store.as_ref(), &sidecar);
        let Some(subdirectory) = document.subdirectories.get_mut(subdirectory_id) else {
            debug!(%subdirectory_id, "unknown subdirectory");
            return FileMap::new();
        };
        let subdirectory_path = directory.join(&subdirectory.name);
        let mut files = subdirectory.files.take().unwrap_or_default();
        let mut instructions = Vec::new();

        files.retain(|file_id, entry| {
            let unchanged = self
                .fs
                .stat(&subdirectory_path.join(&entry.name))
                .is_some_and(|stat| {
                    stat.kind == EntryKind::File
                        && entry.is_unchanged(stat.size_bytes, stat.mtime_secs)
                });
            if !unchanged {
                debug!(%file_id, name = %entry.name, "file gone or changed");
                instructions.push(ThumbnailInstruction::Delete {
                    file_id: file_id.clone(),
                });
            }
            unchanged
        });
        let removed = instructions.len();

        let known: HashSet<String> = files.values().map(|entry| entry.name.clone()).collect();
        let mut discovered = Vec::new();
        for entry in self.fs.list_dir(&subdirectory_path) {
            if entry.stat.kind != EntryKind::File
                || known.contains(&entry.name)
                || !is_supported_image(Path::new(&entry.name))
            {
                continue;
            }

            let file_id = self.fresh_id(|candidate| files.contains_key(candidate));
            let source_path = subdirectory_path.join(&entry.name);
            files.insert(
                file_id.clone(),
                FileEntry::discovered(entry.name, entry.stat.size_bytes, entry.stat.mtime_secs),
            );
            discovered.push((file_id, source_path));
        }
        let discovered_count = discovered.len();

        for (file_id, source_path, result) in self.read_dimensions(discovered).await {
            let dimensions = match result {
                Ok(dimensions) => dimensions,
                Err(error) => {
                    warn!(path = %source_path.display(), %error, "failed to read image dimensions");
                    continue;
                }
            };
            let thumb = self.thumbnails.compute_thumbnail_size(dimensions);
            if let Some(entry) = files.get_mut(&file_id) {
                entry.width = Some(dimensions.width);
                entry.height = Some(dimensions.height);
                entry.thumb_width = Some(thumb.width);
                entry.thumb_height = Some(thumb.height);
            }
            instructions.push(ThumbnailInstruction::Create {
                file_id,
                source_path,
                size: thumb,
            });
        }

        self.thumbnails.apply_updates(instructions);
        if let Some(subdirectory) = document.subdirectories.get_mut(subdirectory_id) {
            subdirectory.files = Some(files.clone());
        }
        save_document(self.store.as_ref(), &sidecar, &document);
        info!(
            directory = %subdirectory_path.display(),
            files = files.len(),
            discovered = discovered_count,
            removed,
            "files reconciled"
        );

        files
    }

    /// Path of a cached file, from the sidecar alone.
    pub fn resolve_file(
        &self,
        directory: &Path,
        subdirectory_id: &OpaqueId,
        file_id: &OpaqueId,
    ) -> Option<PathBuf> {
        let document: SidecarDocument =
            load_document(self.store.as_ref(), &sidecar_path(directory));
        let subdirectory = document.subdirectories.get(subdirectory_id)?;
        let entry = subdirectory.files.as_ref()?.get(file_id)?;
        Some(directory.join(&subdirectory.name).join(&entry.name))
    }

    async fn read_dimensions(
        &self,
        discovered: Vec<(OpaqueId, PathBuf)>,
    ) -> Vec<(OpaqueId, PathBuf, Result<Dimensions, ApplicationError>)> {
        let reads = discovered.into_iter().map(|(file_id, source_path)| {
            let media = Arc::clone(&self.media);
            let task_path = source_path.clone();
            async move {
                let result = tokio::task::spawn_blocking(move || media.read_dimensions(&task_path))
                    .await
                    .map_err(|error| ApplicationError::Task(error.to_string()))
                    .and_then(|read| read);
                (file_id, source_path, result)
            }
        });

        join_all(reads).await
    }

    fn is_directory(&self, path: &Path) -> bool {
        self.fs
            .stat(path)
            .is_some_and(|stat| stat.kind == EntryKind::Directory)
    }

    fn fresh_id(&self, taken: impl Fn(&OpaqueId) -> bool) -> OpaqueId {
        loop {
            let candidate = self.ids.next_id();
            if !taken(&candidate) {
                return candidate;
            }
        }
    }
}
