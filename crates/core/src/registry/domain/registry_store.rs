use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::registry::domain::registry::{Registry, RegistryError};

#[derive(Error, Debug)]
pub enum RegistryLoadError {
    #[error("failed to read registry {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("registry {path} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },
    #[error("registry {path} is inconsistent: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: RegistryError,
    },
}

#[derive(Error, Debug)]
pub enum RegistryStoreError {
    #[error("failed to encode registry: {0}")]
    Encode(String),
    #[error("failed to write registry to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Persists the registry as a single artifact at a caller-chosen path.
pub trait RegistryStore: Send {
    /// Load the registry at `path`.
    ///
    /// A missing or zero-length artifact is `Ok(None)`: nothing has been
    /// registered yet. Anything present but unreadable is an error.
    fn load(&self, path: &Path) -> Result<Option<Registry>, RegistryLoadError>;

    /// Replace the artifact at `path`. Readers never observe a partial write.
    fn save(&self, path: &Path, registry: &Registry) -> Result<(), RegistryStoreError>;
}
