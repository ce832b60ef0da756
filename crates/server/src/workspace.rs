use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use face_sorter_core::shared::constants::REGISTRY_FILE_NAME;

/// One uploaded photo, already reduced to a bare file name.
#[derive(Clone, Debug)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Directory layout the server works in:
/// `uploads/ref`, `uploads/group`, `output` and the registry artifact.
#[derive(Clone, Debug)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn ref_dir(&self) -> PathBuf {
        self.root.join("uploads").join("ref")
    }

    pub fn group_dir(&self) -> PathBuf {
        self.root.join("uploads").join("group")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.join("output")
    }

    pub fn artifact(&self) -> PathBuf {
        self.root.join(REGISTRY_FILE_NAME)
    }

    /// Empty the upload and output directories. The registry is kept.
    pub fn reset(&self) -> io::Result<()> {
        for dir in [self.ref_dir(), self.group_dir(), self.output_dir()] {
            reset_dir(&dir)?;
        }
        Ok(())
    }

    /// Write uploads into `dir`, replacing files of the same name.
    pub fn save(&self, dir: &Path, uploads: &[Upload]) -> io::Result<()> {
        fs::create_dir_all(dir)?;
        for upload in uploads {
            log::debug!("Saving {} into {}", upload.file_name, dir.display());
            fs::write(dir.join(&upload.file_name), &upload.bytes)?;
        }
        Ok(())
    }

    /// `path` relative to the workspace root, so responses never reveal
    /// where the server keeps its files.
    pub fn relative(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root).unwrap_or(path).to_path_buf()
    }

    pub fn display(&self, path: &Path) -> String {
        self.relative(path).display().to_string()
    }
}

pub fn reset_dir(dir: &Path) -> io::Result<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }
    fs::create_dir_all(dir)
}

/// Reduce a client-supplied file name to its last path component.
///
/// Returns `None` for names that cannot be stored safely.
pub fn sanitize_file_name(raw: &str) -> Option<String> {
    let name = raw.rsplit(['/', '\\']).next()?.trim();
    if name.is_empty() || name == "." || name == ".." {
        return None;
    }
    Some(name.to_string())
}
