use std::path::{Path, PathBuf};

use crate::shared::constants::IMAGE_EXTENSIONS;

/// Whether `path` has one of the accepted photo extensions (case-insensitive).
pub fn is_supported_photo(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Keeps supported photos and orders them lexicographically by file name.
///
/// Directory listings come back in platform-dependent order; sorting here
/// makes registries and output reproducible.
pub fn select_photos(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut photos: Vec<PathBuf> = paths
        .into_iter()
        .filter(|p| is_supported_photo(p))
        .collect();
    photos.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    photos
}

/// File stem used as an identity label (`alice.jpg` → `alice`).
pub fn label_for(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
}
