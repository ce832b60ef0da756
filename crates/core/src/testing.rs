//! In-memory doubles for exercising the pipeline without ONNX models.

use std::collections::HashMap;
use std::io::Cursor;

use crate::embedding::domain::embedding_extractor::{EmbeddingExtractor, ExtractError};
use crate::embedding::domain::face_embedding::{DistanceMetric, FaceEmbedding};
use crate::shared::frame::Frame;

/// Encode a small PNG filled with one color.
pub fn solid_png(rgb: [u8; 3]) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(4, 4, image::Rgb(rgb));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png)
        .expect("encoding a PNG into memory cannot fail");
    buf.into_inner()
}

/// Extractor keyed on the color of a photo's top-left pixel.
///
/// Colors without an entry contain no face.
#[derive(Clone, Default)]
pub struct ColorKeyExtractor {
    faces: HashMap<[u8; 3], Vec<FaceEmbedding>>,
    failing: Vec<[u8; 3]>,
}

impl ColorKeyExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Photos of `color` contain faces with these embeddings.
    pub fn with_faces(mut self, color: [u8; 3], faces: Vec<Vec<f32>>) -> Self {
        self.faces
            .insert(color, faces.into_iter().map(FaceEmbedding::new).collect());
        self
    }

    /// Photos of `color` make the model fail.
    pub fn failing_on(mut self, color: [u8; 3]) -> Self {
        self.failing.push(color);
        self
    }
}

impl EmbeddingExtractor for ColorKeyExtractor {
    fn extract(&mut self, frame: &Frame) -> Result<Vec<FaceEmbedding>, ExtractError> {
        let color = frame.pixel(0, 0).unwrap_or([0, 0, 0]);
        if self.failing.contains(&color) {
            return Err(ExtractError::Embedding(format!(
                "model rejected input {color:?}"
            )));
        }
        Ok(self.faces.get(&color).cloned().unwrap_or_default())
    }

    fn metric(&self) -> DistanceMetric {
        DistanceMetric::Cosine
    }
}
