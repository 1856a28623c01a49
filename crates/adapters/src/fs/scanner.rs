use std::fs::{self, Metadata};
use std::io::ErrorKind;
use std::path::Path;
use std::time::UNIX_EPOCH;

use imgrater_application::{ApplicationError, DirEntry, EntryKind, FileStat, FileSystem};
use tracing::debug;
use walkdir::WalkDir;

/// Local-disk [`FileSystem`]. Symlinks are followed, like a plain `stat`.
#[derive(Debug, Default)]
pub struct WalkdirFileSystem;

impl FileSystem for WalkdirFileSystem {
    fn stat(&self, path: &Path) -> Option<FileStat> {
        fs::metadata(path).ok().map(|metadata| file_stat(&metadata))
    }

    fn list_dir(&self, path: &Path) -> Vec<DirEntry> {
        WalkDir::new(path)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(error) => {
                    debug!(path = %path.display(), %error, "skipping unreadable entry");
                    None
                }
            })
            .filter_map(|entry| {
                let name = entry.file_name().to_str()?.to_string();
                let metadata = entry.metadata().ok()?;
                Some(DirEntry {
                    name,
                    stat: file_stat(&metadata),
                })
            })
            .collect()
    }

    fn remove_file(&self, path: &Path) -> Result<bool, ApplicationError> {
        match fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(false),
            Err(error) => Err(ApplicationError::Io(error.to_string())),
        }
    }

    fn ensure_dir(&self, path: &Path) -> Result<(), ApplicationError> {
        fs::create_dir_all(path).map_err(|error| ApplicationError::Io(error.to_string()))
    }
}

fn file_stat(metadata: &Metadata) -> FileStat {
    let kind = if metadata.is_file() {
        EntryKind::File
    } else if metadata.is_dir() {
        EntryKind::Directory
    } else {
        EntryKind::Other
    };

    FileStat {
        kind,
        size_bytes: metadata.len(),
        mtime_secs: mtime_secs(metadata),
    }
}

fn mtime_secs(metadata: &Metadata) -> i64 {
    let Ok(modified) = metadata.modified() else {
        return 0;
    };

    match modified.duration_since(UNIX_EPOCH) {
        Ok(since) => since.as_secs() as i64,
        Err(error) => {
            let before = error.duration();
            -(before.as_secs() as i64) - i64::from(before.subsec_nanos() > 0)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime};

    use super::*;
    use tempfile::TempDir;

    #[test]
    fn stat_reports_kind_size_and_whole_seconds() {
        let dir = TempDir::new().expect("tempdir");
        let file = dir.path().join("a.jpg");
        fs::write(&file, b"12345").expect("write");
        let when = UNIX_EPOCH + Duration::from_millis(1_700_000_000_999);
        fs::File::options()
            .write(true)
            .open(&file)
            .expect("open")
            .set_modified(when)
            .expect("set mtime");

        let stat = WalkdirFileSystem.stat(&file).expect("stat");
        assert_eq!(stat.kind, EntryKind::File);
        assert_eq!(stat.size_bytes, 5);
        assert_eq!(stat.mtime_secs, 1_700_000_000);

        let dir_stat = WalkdirFileSystem.stat(dir.path()).expect("stat");
        assert_eq!(dir_stat.kind, EntryKind::Directory);
    }

    #[test]
    fn stat_of_missing_path_is_none() {
        let dir = TempDir::new().expect("tempdir");
        assert_eq!(WalkdirFileSystem.stat(&dir.path().join("nope")), None);
    }

    #[test]
    fn list_dir_returns_immediate_children_only() {
        let dir = TempDir::new().expect("tempdir");
        fs::create_dir_all(dir.path().join("trip/deeper")).expect("mkdir");
        fs::write(dir.path().join("trip/a.png"), b"x").expect("write");
        fs::write(dir.path().join("notes.txt"), b"x").expect("write");

        let entries = WalkdirFileSystem.list_dir(dir.path());
        let names: Vec<_> = entries.iter().map(|entry| entry.name.as_str()).collect();
        assert_eq!(names, vec!["notes.txt", "trip"]);
        assert_eq!(entries[1].stat.kind, EntryKind::Directory);
    }

    #[test]
    fn list_dir_of_missing_directory_is_empty() {
        let dir = TempDir::new().expect("tempdir");
        assert!(WalkdirFileSystem.list_dir(&dir.path().join("gone")).is_empty());
    }

    #[test]
    fn remove_file_tolerates_missing_files() {
        let dir = TempDir::new().expect("tempdir");
        let file = dir.path().join("t.webp");
        fs::write(&file, b"x").expect("write");

        assert!(WalkdirFileSystem.remove_file(&file).expect("remove"));
        assert!(!WalkdirFileSystem.remove_file(&file).expect("remove again"));
    }

    #[test]
    fn pre_epoch_mtime_rounds_down() {
        let dir = TempDir::new().expect("tempdir");
        let file = dir.path().join("old.jpg");
        fs::write(&file, b"x").expect("write");
        let when = SystemTime::UNIX_EPOCH - Duration::from_millis(1_500);
        let handle = fs::File::options().write(true).open(&file).expect("open");
        if handle.set_modified(when).is_err() {
            return;
        }

        let stat = WalkdirFileSystem.stat(&file).expect("stat");
        assert_eq!(stat.mtime_secs, -2);
    }
}
