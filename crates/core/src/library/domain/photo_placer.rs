use std::io;
use std::path::{Path, PathBuf};

/// Write access to the sorted output tree.
pub trait PhotoPlacer: Send {
    /// Make `dir` exist and be empty, discarding anything from earlier runs.
    fn reset(&mut self, dir: &Path) -> io::Result<()>;

    /// Copy `source` verbatim into `dest_dir` (created if needed), keeping
    /// its file name. An existing copy is overwritten. Returns the new path.
    fn place(&mut self, source: &Path, dest_dir: &Path) -> io::Result<PathBuf>;
}
