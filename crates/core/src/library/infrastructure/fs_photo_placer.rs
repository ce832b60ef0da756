use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::library::domain::photo_placer::PhotoPlacer;

/// Copies photos into an output tree on the local filesystem.
pub struct FsPhotoPlacer;

impl FsPhotoPlacer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FsPhotoPlacer {
    fn default() -> Self {
        Self::new()
    }
}

impl PhotoPlacer for FsPhotoPlacer {
    fn reset(&mut self, dir: &Path) -> io::Result<()> {
        match fs::remove_dir_all(dir) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
        fs::create_dir_all(dir)
    }

    fn place(&mut self, source: &Path, dest_dir: &Path) -> io::Result<PathBuf> {
        let file_name = source.file_name().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} has no file name", source.display()),
            )
        })?;
        fs::create_dir_all(dest_dir)?;
        let dest = dest_dir.join(file_name);
        fs::copy(source, &dest)?;
        Ok(dest)
    }
}
