use std::io;
use std::path::{Path, PathBuf};

/// Read access to the photo collections (reference and group directories).
///
/// Implementations only enumerate and read; which files count as photos
/// and in what order they are processed is decided by [`select_photos`].
///
/// [`select_photos`]: crate::library::domain::photo_filter::select_photos
pub trait PhotoScanner: Send {
    /// Every regular file directly inside `dir`, in no particular order.
    fn list(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;

    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}
