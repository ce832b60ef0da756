use crate::detection::domain::face_detector::FaceDetector;
use crate::embedding::domain::embedding_extractor::{EmbeddingExtractor, ExtractError};
use crate::embedding::domain::face_embedder::FaceEmbedder;
use crate::embedding::domain::face_embedding::{DistanceMetric, FaceEmbedding};
use crate::shared::frame::Frame;

/// Fraction of the face box added on each side before cropping.
pub const DEFAULT_CROP_PADDING: f64 = 0.2;

/// Two-stage extractor: detect faces, then embed each padded crop.
///
/// Embeddings keep the detector's ordering (highest confidence first), so
/// the "first face" of a reference image is its most confident detection.
pub struct DetectingExtractor {
    detector: Box<dyn FaceDetector>,
    embedder: Box<dyn FaceEmbedder>,
    crop_padding: f64,
}

impl DetectingExtractor {
    pub fn new(detector: Box<dyn FaceDetector>, embedder: Box<dyn FaceEmbedder>) -> Self {
        Self {
            detector,
            embedder,
            crop_padding: DEFAULT_CROP_PADDING,
        }
    }

    pub fn with_crop_padding(mut self, crop_padding: f64) -> Self {
        self.crop_padding = crop_padding.max(0.0);
        self
    }
}

impl EmbeddingExtractor for DetectingExtractor {
    fn extract(&mut self, frame: &Frame) -> Result<Vec<FaceEmbedding>, ExtractError> {
        let boxes = self
            .detector
            .detect(frame)
            .map_err(|e| ExtractError::Detection(e.to_string()))?;

        let mut embeddings = Vec::with_capacity(boxes.len());
        for face in &boxes {
            let Some((x, y, w, h)) = face.crop_rect(self.crop_padding, frame.width(), frame.height())
            else {
                log::debug!("Dropping face box outside the frame: {face:?}");
                continue;
            };
            let Some(crop) = frame.crop(x, y, w, h) else {
                continue;
            };
            let embedding = self
                .embedder
                .embed(&crop)
                .map_err(|e| ExtractError::Embedding(e.to_string()))?;
            embeddings.push(embedding);
        }
        Ok(embeddings)
    }

    fn metric(&self) -> DistanceMetric {
        self.embedder.metric()
    }
}
