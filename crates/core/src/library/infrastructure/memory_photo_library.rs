use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::library::domain::photo_placer::PhotoPlacer;
use crate::library::domain::photo_scanner::PhotoScanner;

#[derive(Default)]
struct Store {
    files: BTreeMap<PathBuf, Vec<u8>>,
    dirs: BTreeSet<PathBuf>,
    read_only: BTreeSet<PathBuf>,
}

/// In-memory photo tree implementing both [`PhotoScanner`] and [`PhotoPlacer`].
///
/// Clones share the same tree, so one handle can be given to a use case
/// while another inspects the result. Listing order is deliberately not
/// alphabetical, mirroring filesystems that return entries unsorted.
#[derive(Clone, Default)]
pub struct MemoryPhotoLibrary {
    store: Arc<Mutex<Store>>,
}

impl MemoryPhotoLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a file, creating its parent directory.
    pub fn insert(&self, path: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>) {
        let path = path.into();
        let mut store = self.lock();
        if let Some(parent) = path.parent() {
            store.dirs.insert(parent.to_path_buf());
        }
        store.files.insert(path, bytes.into());
    }

    /// Create an empty directory.
    pub fn create_dir(&self, dir: impl Into<PathBuf>) {
        self.lock().dirs.insert(dir.into());
    }

    /// Make every write into `dir` fail with `PermissionDenied`.
    pub fn deny_writes(&self, dir: impl Into<PathBuf>) {
        self.lock().read_only.insert(dir.into());
    }

    pub fn read_file(&self, path: &Path) -> Option<Vec<u8>> {
        self.lock().files.get(path).cloned()
    }

    pub fn exists(&self, path: &Path) -> bool {
        let store = self.lock();
        store.files.contains_key(path) || store.dirs.contains(path)
    }

    /// All files below `dir`, sorted.
    pub fn files_under(&self, dir: &Path) -> Vec<PathBuf> {
        self.lock()
            .files
            .keys()
            .filter(|p| p.starts_with(dir))
            .cloned()
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        // A panicking test thread must not hide the tree from later assertions
        self.store.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("{} does not exist", path.display()),
    )
}

impl PhotoScanner for MemoryPhotoLibrary {
    fn list(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let store = self.lock();
        if !store.dirs.contains(dir) {
            return Err(not_found(dir));
        }
        let mut files: Vec<PathBuf> = store
            .files
            .keys()
            .filter(|p| p.parent() == Some(dir))
            .cloned()
            .collect();
        files.reverse();
        Ok(files)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.lock()
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| not_found(path))
    }
}

impl PhotoPlacer for MemoryPhotoLibrary {
    fn reset(&mut self, dir: &Path) -> io::Result<()> {
        let mut store = self.lock();
        store.files.retain(|p, _| !p.starts_with(dir));
        store.dirs.retain(|d| !d.starts_with(dir));
        store.dirs.insert(dir.to_path_buf());
        Ok(())
    }

    fn place(&mut self, source: &Path, dest_dir: &Path) -> io::Result<PathBuf> {
        let mut store = self.lock();
        if store.read_only.iter().any(|d| dest_dir.starts_with(d)) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{} is read-only", dest_dir.display()),
            ));
        }
        let bytes = store
            .files
            .get(source)
            .cloned()
            .ok_or_else(|| not_found(source))?;
        let file_name = source.file_name().ok_or_else(|| not_found(source))?;
        let dest = dest_dir.join(file_name);
        store.dirs.insert(dest_dir.to_path_buf());
        store.files.insert(dest.clone(), bytes);
        Ok(dest)
    }
}
