use std::sync::Arc;

use imgrater_adapters::{ImageMediaInspector, JsonFileStore, UuidIdGenerator, WalkdirFileSystem};
use imgrater_application::{
    ApplicationError, DirectoryReconciler, FileSystem, GalleryService, KeyedStore,
    MediaInspector, ThumbnailCache, ThumbnailCacheConfig,
};
use thiserror::Error;
use tracing::info;

use crate::config::{AppConfig, ConfigError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to open thumbnail cache: {0}")]
    Application(#[from] ApplicationError),
}

pub fn build_gallery_service(config: &AppConfig) -> Result<GalleryService, StartupError> {
    let directories = config.registered_directories()?;

    let store: Arc<dyn KeyedStore> = Arc::new(JsonFileStore);
    let fs: Arc<dyn FileSystem> = Arc::new(WalkdirFileSystem);
    let media: Arc<dyn MediaInspector> = Arc::new(ImageMediaInspector);

    let thumbnails = Arc::new(ThumbnailCache::open(
        ThumbnailCacheConfig {
            thumbnail_dir: config.thumbnail_dir.clone(),
            store_path: config.thumbnail_store.clone(),
            settings: config.thumbnail,
        },
        Arc::clone(&store),
        Arc::clone(&fs),
        Arc::clone(&media),
    )?);
    let reconciler = DirectoryReconciler::new(
        store,
        Arc::new(UuidIdGenerator),
        fs,
        media,
        Arc::clone(&thumbnails),
    );

    info!(directories = directories.len(), "gallery service ready");
    Ok(GalleryService::new(directories, reconciler, thumbnails))
}
