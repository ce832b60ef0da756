use crate::detection::domain::face_box::FaceBox;
use crate::shared::frame::Frame;

/// Domain interface for face detection on a single still image.
///
/// Implementations may hold mutable inference state, hence `&mut self`.
/// Returned boxes are ordered by confidence, highest first.
pub trait FaceDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<FaceBox>, Box<dyn std::error::Error>>;
}
