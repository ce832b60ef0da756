use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::embedding::domain::face_embedding::FaceEmbedding;
use crate::registry::domain::registry::Registry;
use crate::registry::domain::registry_store::{
    RegistryLoadError, RegistryStore, RegistryStoreError,
};

/// Stores the registry as the JSON pair `[[embedding, ...], [label, ...]]`.
///
/// `f32` values survive the round trip exactly, so distances computed
/// against a reloaded registry match the ones at registration time.
pub struct JsonRegistryStore;

impl JsonRegistryStore {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonRegistryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryStore for JsonRegistryStore {
    fn load(&self, path: &Path) -> Result<Option<Registry>, RegistryLoadError> {
        match fs::read(path) {
            Ok(bytes) => decode(path, &bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(RegistryLoadError::Read {
                path: path.to_path_buf(),
                source: e,
            }),
        }
    }

    fn save(&self, path: &Path, registry: &Registry) -> Result<(), RegistryStoreError> {
        let bytes = encode(registry)?;

        let temp_path = path.with_extension("part");
        let result = write_then_rename(&temp_path, path, &bytes);
        if result.is_err() {
            let _ = fs::remove_file(&temp_path);
        }
        result
    }
}

/// Serialize a registry to the artifact encoding.
pub fn encode(registry: &Registry) -> Result<Vec<u8>, RegistryStoreError> {
    serde_json::to_vec(&(registry.embeddings(), registry.labels()))
        .map_err(|e| RegistryStoreError::Encode(e.to_string()))
}

/// Parse artifact bytes read from `path`. Empty input means "never registered".
pub fn decode(path: &Path, bytes: &[u8]) -> Result<Option<Registry>, RegistryLoadError> {
    if bytes.is_empty() {
        return Ok(None);
    }
    let (embeddings, labels): (Vec<FaceEmbedding>, Vec<String>) = serde_json::from_slice(bytes)
        .map_err(|e| RegistryLoadError::Corrupt {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    Registry::from_parts(embeddings, labels)
        .map(Some)
        .map_err(|e| RegistryLoadError::Invalid {
            path: path.to_path_buf(),
            source: e,
        })
}

fn write_then_rename(temp_path: &Path, dest: &Path, bytes: &[u8]) -> Result<(), RegistryStoreError> {
    let write_err = |e: io::Error| RegistryStoreError::Write {
        path: temp_path.to_path_buf(),
        source: e,
    };

    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    let mut file = fs::File::create(temp_path).map_err(write_err)?;
    file.write_all(bytes).map_err(write_err)?;
    file.sync_all().map_err(write_err)?;
    drop(file);

    fs::rename(temp_path, dest).map_err(|e| RegistryStoreError::Write {
        path: dest.to_path_buf(),
        source: e,
    })
}
