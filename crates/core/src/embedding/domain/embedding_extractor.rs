use thiserror::Error;

use crate::embedding::domain::face_embedding::{DistanceMetric, FaceEmbedding};
use crate::shared::frame::Frame;

/// A model fault while locating or embedding faces.
///
/// Finding no faces is not an error; it is an empty result.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("face detection failed: {0}")]
    Detection(String),
    #[error("face embedding failed: {0}")]
    Embedding(String),
}

/// Domain interface turning a decoded photo into one embedding per face.
///
/// Embeddings come back in detection order. Implementations hold model
/// state, hence `&mut self`.
pub trait EmbeddingExtractor: Send {
    fn extract(&mut self, frame: &Frame) -> Result<Vec<FaceEmbedding>, ExtractError>;

    /// Comparator native to the embeddings this extractor produces.
    fn metric(&self) -> DistanceMetric;
}
