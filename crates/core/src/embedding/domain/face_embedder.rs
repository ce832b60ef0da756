use crate::embedding::domain::face_embedding::{DistanceMetric, FaceEmbedding};
use crate::shared::frame::Frame;

/// Domain interface for embedding a single, already-cropped face.
pub trait FaceEmbedder: Send {
    fn embed(&mut self, face: &Frame) -> Result<FaceEmbedding, Box<dyn std::error::Error>>;

    fn metric(&self) -> DistanceMetric;
}
