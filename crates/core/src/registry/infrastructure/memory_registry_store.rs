use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::registry::domain::registry::Registry;
use crate::registry::domain::registry_store::{
    RegistryLoadError, RegistryStore, RegistryStoreError,
};
use crate::registry::infrastructure::json_registry_store::{decode, encode};

/// Registry store keeping artifacts in memory, encoded exactly like
/// [`JsonRegistryStore`](super::json_registry_store::JsonRegistryStore).
///
/// Clones share the same artifacts.
#[derive(Clone, Default)]
pub struct MemoryRegistryStore {
    artifacts: Arc<Mutex<HashMap<PathBuf, Vec<u8>>>>,
}

impl MemoryRegistryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the artifact at `path` with arbitrary bytes.
    pub fn put_raw(&self, path: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>) {
        self.artifacts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(path.into(), bytes.into());
    }

    pub fn raw(&self, path: &Path) -> Option<Vec<u8>> {
        self.artifacts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(path)
            .cloned()
    }
}

impl RegistryStore for MemoryRegistryStore {
    fn load(&self, path: &Path) -> Result<Option<Registry>, RegistryLoadError> {
        match self.raw(path) {
            Some(bytes) => decode(path, &bytes),
            None => Ok(None),
        }
    }

    fn save(&self, path: &Path, registry: &Registry) -> Result<(), RegistryStoreError> {
        let bytes = encode(registry)?;
        self.put_raw(path, bytes);
        Ok(())
    }
}
