//! ArcFace face embedder using ONNX Runtime.
//!
//! Produces L2-normalized embeddings, so cosine distance is the native
//! comparator.

use std::path::Path;

use crate::embedding::domain::face_embedder::FaceEmbedder;
use crate::embedding::domain::face_embedding::{l2_normalize, DistanceMetric, FaceEmbedding};
use crate::shared::frame::Frame;
use crate::shared::onnx_session::load_session;

const INPUT_SIZE: usize = 112;
const NORM_MEAN: f32 = 127.5;
const NORM_STD: f32 = 127.5;

pub struct OnnxArcFaceEmbedder {
    session: ort::session::Session,
}

impl OnnxArcFaceEmbedder {
    pub fn new(model_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self {
            session: load_session(model_path)?,
        })
    }
}

impl FaceEmbedder for OnnxArcFaceEmbedder {
    fn embed(&mut self, face: &Frame) -> Result<FaceEmbedding, Box<dyn std::error::Error>> {
        if face.width() == 0 || face.height() == 0 || face.channels() < 3 {
            return Err("Face crop is empty or not RGB".into());
        }

        let tensor = preprocess(face);
        let input_value = ort::value::Tensor::from_array(tensor)?;
        let outputs = self.session.run(ort::inputs![input_value])?;
        let embedding_array = outputs[0].try_extract_array::<f32>()?;
        let embedding_slice = embedding_array
            .as_slice()
            .ok_or("Cannot get embedding slice")?;

        let mut embedding = embedding_slice.to_vec();
        l2_normalize(&mut embedding);
        Ok(FaceEmbedding::new(embedding))
    }

    fn metric(&self) -> DistanceMetric {
        DistanceMetric::Cosine
    }
}

/// Resize crop to 112x112 (nearest neighbour), normalize, NCHW layout.
fn preprocess(face: &Frame) -> ndarray::Array4<f32> {
    let src_w = face.width() as usize;
    let src_h = face.height() as usize;
    let src = face.as_ndarray();

    let mut tensor = ndarray::Array4::<f32>::zeros((1, 3, INPUT_SIZE, INPUT_SIZE));

    for y in 0..INPUT_SIZE {
        let src_y = (((y as f64 + 0.5) * src_h as f64 / INPUT_SIZE as f64) as usize).min(src_h - 1);
        for x in 0..INPUT_SIZE {
            let src_x =
                (((x as f64 + 0.5) * src_w as f64 / INPUT_SIZE as f64) as usize).min(src_w - 1);
            for c in 0..3 {
                tensor[[0, c, y, x]] = (src[[src_y, src_x, c]] as f32 - NORM_MEAN) / NORM_STD;
            }
        }
    }

    tensor
}
