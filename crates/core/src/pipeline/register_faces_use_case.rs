use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::embedding::domain::embedding_extractor::EmbeddingExtractor;
use crate::library::domain::frame_decoder::FrameDecoder;
use crate::library::domain::photo_filter::{label_for, select_photos};
use crate::library::domain::photo_scanner::PhotoScanner;
use crate::matching::domain::sort_report::RegistrationReport;
use crate::pipeline::photo_fault::{embed_photo, file_name_of};
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::registry::domain::registry::Registry;
use crate::registry::domain::registry_store::{RegistryStore, RegistryStoreError};
use crate::shared::constants::UNMATCHED_DIR_NAME;

#[derive(Error, Debug)]
pub enum RegisterError {
    #[error("cannot list reference photos in {path}: {source}")]
    Scan { path: PathBuf, source: io::Error },
    #[error(transparent)]
    Store(#[from] RegistryStoreError),
}

/// Builds the registry from a directory of labeled reference photos:
/// scan → decode → extract → keep first face → persist.
///
/// Each photo contributes at most one identity, labeled with its file stem.
/// Photos that yield no face (or cannot be read) are skipped with a warning.
pub struct RegisterFacesUseCase<'a> {
    scanner: &'a dyn PhotoScanner,
    decoder: &'a dyn FrameDecoder,
    extractor: &'a mut dyn EmbeddingExtractor,
    store: &'a dyn RegistryStore,
}

impl<'a> RegisterFacesUseCase<'a> {
    pub fn new(
        scanner: &'a dyn PhotoScanner,
        decoder: &'a dyn FrameDecoder,
        extractor: &'a mut dyn EmbeddingExtractor,
        store: &'a dyn RegistryStore,
    ) -> Self {
        Self {
            scanner,
            decoder,
            extractor,
            store,
        }
    }

    /// Register every reference photo in `reference_dir` and overwrite the
    /// artifact at `artifact_path`.
    pub fn execute(
        &mut self,
        reference_dir: &Path,
        artifact_path: &Path,
        logger: &mut dyn PipelineLogger,
    ) -> Result<RegistrationReport, RegisterError> {
        let listing = match self.scanner.list(reference_dir) {
            Ok(paths) => paths,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                logger.warning(&format!(
                    "Reference directory {} does not exist, registering no faces",
                    reference_dir.display()
                ));
                Vec::new()
            }
            Err(source) => {
                return Err(RegisterError::Scan {
                    path: reference_dir.to_path_buf(),
                    source,
                })
            }
        };

        let photos = select_photos(listing);
        let total = photos.len();
        logger.info(&format!("Registering faces from {total} reference photos"));

        let mut registry = Registry::new();
        let mut skipped = Vec::new();

        for (i, path) in photos.iter().enumerate() {
            logger.progress(i + 1, total);
            let name = file_name_of(path);

            let Some(label) = label_for(path) else {
                logger.warning(&format!("{name}: no usable label, skipping"));
                skipped.push(name);
                continue;
            };
            if label == UNMATCHED_DIR_NAME {
                logger.warning(&format!(
                    "{name}: '{UNMATCHED_DIR_NAME}' is reserved for the unmatched folder, skipping"
                ));
                skipped.push(name);
                continue;
            }

            let faces = match embed_photo(
                self.scanner,
                self.decoder,
                &mut *self.extractor,
                path,
                logger,
            ) {
                Ok(faces) => faces,
                Err(fault) => {
                    logger.warning(&format!("{fault}, skipping"));
                    skipped.push(name);
                    continue;
                }
            };

            let Some(first) = faces.into_iter().next() else {
                logger.warning(&format!("{name}: no face found, skipping"));
                skipped.push(name);
                continue;
            };

            if let Err(e) = registry.push(label, first) {
                logger.warning(&format!("{name}: {e}, skipping"));
                skipped.push(name);
            }
        }

        self.store.save(artifact_path, &registry)?;
        logger.info(&format!(
            "Registered {} identities into {}",
            registry.len(),
            artifact_path.display()
        ));

        let (_, labels) = registry.into_parts();
        Ok(RegistrationReport {
            count: labels.len(),
            labels,
            skipped,
        })
    }
}
