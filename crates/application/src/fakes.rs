//! In-memory stand-ins for the ports, shared by the unit tests.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use imgrater_domain::{Dimensions, OpaqueId, ThumbnailSettings};
use parking_lot::Mutex;
use serde_json::Value;

use crate::{
    ApplicationError, DirEntry, DirectoryReconciler, EntryKind, FileStat, FileSystem,
    IdGenerator, KeyedStore, MediaInspector, ThumbnailCache, ThumbnailCacheConfig,
};

pub fn id(value: &str) -> OpaqueId {
    OpaqueId::new(value)
}

#[derive(Default)]
pub struct MemoryStore {
    documents: Mutex<HashMap<PathBuf, Value>>,
    saves: AtomicUsize,
    failing: AtomicBool,
}

impl MemoryStore {
    pub fn put(&self, path: &Path, document: Value) {
        self.documents.lock().insert(path.to_path_buf(), document);
    }

    pub fn get(&self, path: &Path) -> Option<Value> {
        self.documents.lock().get(path).cloned()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn fail_saves(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }
}

impl KeyedStore for MemoryStore {
    fn load(&self, path: &Path) -> Result<Value, ApplicationError> {
        self.get(path)
            .ok_or_else(|| ApplicationError::Io(format!("{} not found", path.display())))
    }

    fn save(&self, path: &Path, document: &Value) -> Result<(), ApplicationError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ApplicationError::Io("disk full".to_string()));
        }
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.put(path, document.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> OpaqueId {
        let value = self.next.fetch_add(1, Ordering::SeqCst);
        id(&format!("id{value}"))
    }
}

#[derive(Debug, Clone, Copy)]
enum Node {
    Directory,
    File { size_bytes: u64, mtime_secs: i64 },
}

#[derive(Default)]
pub struct FakeFileSystem {
    nodes: Mutex<BTreeMap<PathBuf, Node>>,
}

impl FakeFileSystem {
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut nodes = self.nodes.lock();
        for ancestor in path.as_ref().ancestors() {
            if ancestor.as_os_str().is_empty() {
                continue;
            }
            nodes.insert(ancestor.to_path_buf(), Node::Directory);
        }
    }

    /// Adds or replaces a file, creating missing parent directories.
    pub fn add_file(&self, path: impl AsRef<Path>, size_bytes: u64, mtime_secs: i64) {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            self.add_dir(parent);
        }
        self.nodes.lock().insert(
            path.to_path_buf(),
            Node::File {
                size_bytes,
                mtime_secs,
            },
        );
    }

    pub fn remove(&self, path: impl AsRef<Path>) {
        self.nodes.lock().remove(path.as_ref());
    }

    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        self.nodes.lock().contains_key(path.as_ref())
    }
}

fn stat_of(node: Node) -> FileStat {
    match node {
        Node::Directory => FileStat {
            kind: EntryKind::Directory,
            size_bytes: 0,
            mtime_secs: 0,
        },
        Node::File {
            size_bytes,
            mtime_secs,
        } => FileStat {
            kind: EntryKind::File,
            size_bytes,
            mtime_secs,
        },
    }
}

impl FileSystem for FakeFileSystem {
    fn stat(&self, path: &Path) -> Option<FileStat> {
        self.nodes.lock().get(path).copied().map(stat_of)
    }

    fn list_dir(&self, path: &Path) -> Vec<DirEntry> {
        let nodes = self.nodes.lock();
        if !matches!(nodes.get(path), Some(Node::Directory)) {
            return Vec::new();
        }
        nodes
            .iter()
            .filter(|(child, _)| child.parent() == Some(path))
            .filter_map(|(child, node)| {
                let name = child.file_name()?.to_string_lossy().to_string();
                Some(DirEntry {
                    name,
                    stat: stat_of(*node),
                })
            })
            .collect()
    }

    fn remove_file(&self, path: &Path) -> Result<bool, ApplicationError> {
        let mut nodes = self.nodes.lock();
        match nodes.get(path) {
            Some(Node::File { .. }) => {
                nodes.remove(path);
                Ok(true)
            }
            Some(Node::Directory) => Err(ApplicationError::Io(format!(
                "{} is a directory",
                path.display()
            ))),
            None => Ok(false),
        }
    }

    fn ensure_dir(&self, path: &Path) -> Result<(), ApplicationError> {
        self.add_dir(path);
        Ok(())
    }
}

/// Reports 800x400 for every image unless told otherwise. Rendering writes
/// a file node into the fake filesystem.
pub struct FakeMedia {
    fs: Arc<FakeFileSystem>,
    dimensions: Mutex<HashMap<PathBuf, Dimensions>>,
    failing: Mutex<HashSet<PathBuf>>,
    reads: AtomicUsize,
    renders: AtomicUsize,
}

impl FakeMedia {
    pub fn new(fs: Arc<FakeFileSystem>) -> Self {
        Self {
            fs,
            dimensions: Mutex::new(HashMap::new()),
            failing: Mutex::new(HashSet::new()),
            reads: AtomicUsize::new(0),
            renders: AtomicUsize::new(0),
        }
    }

    pub fn set_dimensions(&self, path: impl AsRef<Path>, width: u32, height: u32) {
        self.dimensions
            .lock()
            .insert(path.as_ref().to_path_buf(), Dimensions::new(width, height));
    }

    pub fn fail_on(&self, path: impl AsRef<Path>) {
        self.failing.lock().insert(path.as_ref().to_path_buf());
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn render_count(&self) -> usize {
        self.renders.load(Ordering::SeqCst)
    }

    fn check(&self, path: &Path) -> Result<(), ApplicationError> {
        if self.failing.lock().contains(path) {
            return Err(ApplicationError::Decode(format!(
                "cannot decode {}",
                path.display()
            )));
        }
        Ok(())
    }
}

impl MediaInspector for FakeMedia {
    fn read_dimensions(&self, path: &Path) -> Result<Dimensions, ApplicationError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.check(path)?;
        Ok(self
            .dimensions
            .lock()
            .get(path)
            .copied()
            .unwrap_or(Dimensions::new(800, 400)))
    }

    fn render_resized(
        &self,
        source: &Path,
        dest: &Path,
        size: Dimensions,
    ) -> Result<(), ApplicationError> {
        self.renders.fetch_add(1, Ordering::SeqCst);
        self.check(source)?;
        self.fs
            .add_file(dest, u64::from(size.width) * u64::from(size.height), 0);
        Ok(())
    }
}

pub struct Harness {
    pub fs: Arc<FakeFileSystem>,
    pub store: Arc<MemoryStore>,
    pub media: Arc<FakeMedia>,
    pub thumbnails: Arc<ThumbnailCache>,
    pub reconciler: DirectoryReconciler,
}

impl Harness {
    pub fn new() -> Self {
        let fs = Arc::new(FakeFileSystem::default());
        let store = Arc::new(MemoryStore::default());
        let media = Arc::new(FakeMedia::new(fs.clone()));
        let thumbnails = Arc::new(open_thumbnails(&fs, &store, &media));
        let reconciler = DirectoryReconciler::new(
            store.clone(),
            Arc::new(SequentialIds::default()),
            fs.clone(),
            media.clone(),
            thumbnails.clone(),
        );

        Self {
            fs,
            store,
            media,
            thumbnails,
            reconciler,
        }
    }

    pub fn open_thumbnails(&self) -> ThumbnailCache {
        open_thumbnails(&self.fs, &self.store, &self.media)
    }
}

fn open_thumbnails(
    fs: &Arc<FakeFileSystem>,
    store: &Arc<MemoryStore>,
    media: &Arc<FakeMedia>,
) -> ThumbnailCache {
    ThumbnailCache::open(
        ThumbnailCacheConfig {
            thumbnail_dir: PathBuf::from("/thumbs"),
            store_path: PathBuf::from("/config/thumbnails.json"),
            settings: ThumbnailSettings::default(),
        },
        store.clone(),
        fs.clone(),
        media.clone(),
    )
    .expect("thumbnail cache")
}
