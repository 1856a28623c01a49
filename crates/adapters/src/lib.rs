pub mod fs;
pub mod media;
pub mod presenters;

pub use fs::{JsonFileStore, UuidIdGenerator, WalkdirFileSystem};
pub use media::{ImageMediaInspector, MediaFile};
pub use presenters::{present_directories, present_files, present_subdirectories};
