use imgrater_domain::{DirectoryId, OpaqueId};

#[derive(Debug, Clone, Default)]
pub struct ListDirectoriesQuery;

#[derive(Debug, Clone)]
pub struct ListSubdirectoriesCommand {
    pub directory_id: DirectoryId,
}

#[derive(Debug, Clone)]
pub struct ListFilesCommand {
    pub directory_id: DirectoryId,
    pub subdirectory_id: OpaqueId,
}

#[derive(Debug, Clone)]
pub struct ThumbnailQuery {
    pub file_id: OpaqueId,
}

#[derive(Debug, Clone)]
pub struct SourceFileQuery {
    pub directory_id: DirectoryId,
    pub subdirectory_id: OpaqueId,
    pub file_id: OpaqueId,
}
