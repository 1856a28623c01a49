use std::path::PathBuf;
use std::sync::Arc;

use imgrater_domain::{
    thumbnail_file_name, Dimensions, OpaqueId, PendingThumbnail, ThumbnailIndex,
    ThumbnailInstruction, ThumbnailRecord, ThumbnailSettings,
};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::store::{load_document, save_document};
use crate::{ApplicationError, FileSystem, KeyedStore, MediaInspector};

#[derive(Debug, Clone)]
pub struct ThumbnailCacheConfig {
    pub thumbnail_dir: PathBuf,
    pub store_path: PathBuf,
    pub settings: ThumbnailSettings,
}

/// Owns the global thumbnail index and the thumbnail files it describes.
///
/// Records are created as pending specs by [`ThumbnailCache::apply_updates`]
/// and rendered on first [`ThumbnailCache::get`]. `get` does not coalesce
/// concurrent calls for the same id; duplicate renders overwrite the same
/// file with the same content.
pub struct ThumbnailCache {
    config: ThumbnailCacheConfig,
    store: Arc<dyn KeyedStore>,
    fs: Arc<dyn FileSystem>,
    media: Arc<dyn MediaInspector>,
    records: Mutex<ThumbnailIndex>,
}

impl ThumbnailCache {
    pub fn open(
        config: ThumbnailCacheConfig,
        store: Arc<dyn KeyedStore>,
        fs: Arc<dyn FileSystem>,
        media: Arc<dyn MediaInspector>,
    ) -> Result<Self, ApplicationError> {
        config.settings.validate()?;
        fs.ensure_dir(&config.thumbnail_dir)?;

        let records: ThumbnailIndex = load_document(store.as_ref(), &config.store_path);
        debug!(
            store = %config.store_path.display(),
            records = records.len(),
            "thumbnail index loaded"
        );

        Ok(Self {
            config,
            store,
            fs,
            media,
            records: Mutex::new(records),
        })
    }

    pub fn compute_thumbnail_size(&self, source: Dimensions) -> Dimensions {
        self.config.settings.compute_thumbnail_size(source)
    }

    pub fn thumbnail_path(&self, file_id: &OpaqueId) -> PathBuf {
        self.config.thumbnail_dir.join(thumbnail_file_name(file_id))
    }

    pub fn record(&self, file_id: &OpaqueId) -> Option<ThumbnailRecord> {
        self.records.lock().get(file_id).cloned()
    }

    /// Applies a batch of instructions and persists the index once. File
    /// removal and the save run after the index lock is released.
    pub fn apply_updates(&self, instructions: Vec<ThumbnailInstruction>) {
        if instructions.is_empty() {
            return;
        }

        let mut queued = 0_usize;
        let mut stale = Vec::new();
        let snapshot = {
            let mut records = self.records.lock();
            for instruction in instructions {
                match instruction {
                    ThumbnailInstruction::Create {
                        file_id,
                        source_path,
                        size,
                    } => {
                        records.insert(
                            file_id,
                            ThumbnailRecord::Pending(PendingThumbnail {
                                file_path: source_path,
                                thumb_width: size.width,
                                thumb_height: size.height,
                            }),
                        );
                        queued += 1;
                    }
                    ThumbnailInstruction::Delete { file_id } => {
                        records.remove(&file_id);
                        stale.push(self.thumbnail_path(&file_id));
                    }
                }
            }
            records.clone()
        };

        let mut deleted = 0_usize;
        for path in stale {
            match self.fs.remove_file(&path) {
                Ok(true) => deleted += 1,
                Ok(false) => {}
                Err(error) => warn!(path = %path.display(), %error, "failed to delete thumbnail"),
            }
        }

        save_document(self.store.as_ref(), &self.config.store_path, &snapshot);
        info!(queued, deleted, "thumbnail index updated");
    }

    /// Returns the thumbnail file name, rendering it first if it is still pending.
    pub async fn get(&self, file_id: &OpaqueId) -> Result<Option<String>, ApplicationError> {
        let pending = match self.records.lock().get(file_id) {
            None => return Ok(None),
            Some(ThumbnailRecord::Created) => return Ok(Some(thumbnail_file_name(file_id))),
            Some(ThumbnailRecord::Pending(pending)) => pending.clone(),
        };

        let dest = self.thumbnail_path(file_id);
        let media = Arc::clone(&self.media);
        let render_dest = dest.clone();
        tokio::task::spawn_blocking(move || {
            media.render_resized(&pending.file_path, &render_dest, pending.size())
        })
        .await
        .map_err(|error| ApplicationError::Task(error.to_string()))??;

        let mut records = self.records.lock();
        if !records.contains_key(file_id) {
            // Deleted while rendering.
            drop(records);
            if let Err(error) = self.fs.remove_file(&dest) {
                warn!(path = %dest.display(), %error, "failed to delete orphaned thumbnail");
            }
            return Ok(None);
        }
        records.insert(file_id.clone(), ThumbnailRecord::Created);
        let snapshot = records.clone();
        drop(records);
        save_document(self.store.as_ref(), &self.config.store_path, &snapshot);
        debug!(%file_id, "thumbnail rendered");

        Ok(Some(thumbnail_file_name(file_id)))
    }
}
