use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use thiserror::Error;

use crate::embedding::domain::embedding_extractor::{EmbeddingExtractor, ExtractError};
use crate::embedding::domain::face_embedding::FaceEmbedding;
use crate::library::domain::frame_decoder::{DecodeError, FrameDecoder};
use crate::library::domain::photo_scanner::PhotoScanner;
use crate::pipeline::pipeline_logger::PipelineLogger;

/// Why a single photo could not be handled. Never aborts a batch.
#[derive(Error, Debug)]
pub enum PhotoFault {
    #[error("cannot read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("{path}: {source}")]
    Decode { path: PathBuf, source: DecodeError },
    #[error("{path}: {source}")]
    Extract { path: PathBuf, source: ExtractError },
    #[error("cannot copy {path} into {dest_dir}: {source}")]
    Place {
        path: PathBuf,
        dest_dir: PathBuf,
        source: io::Error,
        /// Copies that were written before the failure.
        written: Vec<PathBuf>,
    },
}

/// Read, decode and embed one photo.
pub(crate) fn embed_photo(
    scanner: &dyn PhotoScanner,
    decoder: &dyn FrameDecoder,
    extractor: &mut dyn EmbeddingExtractor,
    path: &Path,
    logger: &mut dyn PipelineLogger,
) -> Result<Vec<FaceEmbedding>, PhotoFault> {
    let t0 = Instant::now();
    let bytes = scanner.read(path).map_err(|source| PhotoFault::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let frame = decoder.decode(&bytes).map_err(|source| PhotoFault::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    logger.timing("decode", t0.elapsed().as_secs_f64() * 1000.0);

    let t0 = Instant::now();
    let faces = extractor
        .extract(&frame)
        .map_err(|source| PhotoFault::Extract {
            path: path.to_path_buf(),
            source,
        })?;
    logger.timing("extract", t0.elapsed().as_secs_f64() * 1000.0);

    Ok(faces)
}

/// Final path component as a display string.
pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
