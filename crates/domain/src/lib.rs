mod directory;
mod error;
mod id;
mod image;
mod sidecar;
mod thumbnail;

pub use directory::RegisteredDirectory;
pub use error::DomainError;
pub use id::{DirectoryId, OpaqueId};
pub use image::{is_supported_image, Dimensions, SUPPORTED_EXTENSIONS};
pub use sidecar::{
    sidecar_path, FileEntry, FileMap, SidecarDocument, SubdirectoryEntry, SubdirectorySummary,
    SIDECAR_FILE_NAME,
};
pub use thumbnail::{
    thumbnail_file_name, PendingThumbnail, ThumbnailIndex, ThumbnailInstruction, ThumbnailRecord,
    ThumbnailSettings, THUMBNAIL_EXTENSION,
};
