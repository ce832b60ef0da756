use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::library::domain::photo_scanner::PhotoScanner;

/// Lists and reads photos straight from the local filesystem.
pub struct FsPhotoScanner;

impl FsPhotoScanner {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FsPhotoScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl PhotoScanner for FsPhotoScanner {
    fn list(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            // Follows symlinks, so a linked photo counts as a file
            if entry.path().is_file() {
                files.push(entry.path());
            }
        }
        Ok(files)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }
}
