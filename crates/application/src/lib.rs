mod error;
mod ports;
mod reconciler;
mod service;
mod store;
mod thumbnails;
mod use_cases;

#[cfg(test)]
mod fakes;

pub use error::ApplicationError;
pub use ports::{
    DirEntry, EntryKind, FileStat, FileSystem, IdGenerator, KeyedStore, MediaInspector,
};
pub use reconciler::DirectoryReconciler;
pub use service::GalleryService;
pub use store::{load_document, save_document};
pub use thumbnails::{ThumbnailCache, ThumbnailCacheConfig};
pub use use_cases::{
    ListDirectoriesQuery, ListFilesCommand, ListSubdirectoriesCommand, SourceFileQuery,
    ThumbnailQuery,
};
