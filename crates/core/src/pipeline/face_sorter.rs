use std::path::Path;

use crate::detection::infrastructure::onnx_yolo_detector::OnnxYoloDetector;
use crate::embedding::domain::embedding_extractor::EmbeddingExtractor;
use crate::embedding::infrastructure::detecting_extractor::DetectingExtractor;
use crate::embedding::infrastructure::onnx_arcface_embedder::OnnxArcFaceEmbedder;
use crate::library::domain::frame_decoder::FrameDecoder;
use crate::library::domain::photo_placer::PhotoPlacer;
use crate::library::domain::photo_scanner::PhotoScanner;
use crate::library::infrastructure::fs_photo_placer::FsPhotoPlacer;
use crate::library::infrastructure::fs_photo_scanner::FsPhotoScanner;
use crate::library::infrastructure::image_frame_decoder::ImageFrameDecoder;
use crate::matching::domain::identity_matcher::IdentityMatcher;
use crate::matching::domain::sort_report::{RegistrationReport, SortReport};
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::pipeline::register_faces_use_case::{RegisterError, RegisterFacesUseCase};
use crate::pipeline::sort_photos_use_case::{SortError, SortPaths, SortPhotosUseCase};
use crate::registry::domain::registry_store::RegistryStore;
use crate::registry::infrastructure::json_registry_store::JsonRegistryStore;
use crate::shared::constants::DEFAULT_TOLERANCE;

/// Model files and thresholds for the production ONNX stack.
#[derive(Clone, Debug)]
pub struct OnnxModels<'p> {
    pub detector: &'p Path,
    pub embedder: &'p Path,
    pub confidence: f64,
}

/// Entry point for outer callers: owns the collaborators and exposes the
/// two operations, registration and sorting.
///
/// Calls against the same artifact or output directory must be serialized
/// by the caller.
pub struct FaceSorter {
    scanner: Box<dyn PhotoScanner>,
    placer: Box<dyn PhotoPlacer>,
    decoder: Box<dyn FrameDecoder>,
    extractor: Box<dyn EmbeddingExtractor>,
    store: Box<dyn RegistryStore>,
    matcher: IdentityMatcher,
}

impl FaceSorter {
    pub fn new(
        scanner: Box<dyn PhotoScanner>,
        placer: Box<dyn PhotoPlacer>,
        decoder: Box<dyn FrameDecoder>,
        extractor: Box<dyn EmbeddingExtractor>,
        store: Box<dyn RegistryStore>,
    ) -> Self {
        Self {
            scanner,
            placer,
            decoder,
            extractor,
            store,
            matcher: IdentityMatcher::new(DEFAULT_TOLERANCE),
        }
    }

    /// Filesystem photos, `image` decoding and a JSON registry around the
    /// given extractor.
    pub fn with_extractor(extractor: Box<dyn EmbeddingExtractor>) -> Self {
        Self::new(
            Box::new(FsPhotoScanner::new()),
            Box::new(FsPhotoPlacer::new()),
            Box::new(ImageFrameDecoder::new()),
            extractor,
            Box::new(JsonRegistryStore::new()),
        )
    }

    /// YOLO detection followed by ArcFace embedding, both on ONNX Runtime.
    pub fn onnx(models: &OnnxModels<'_>) -> Result<Self, Box<dyn std::error::Error>> {
        let detector = OnnxYoloDetector::new(models.detector, models.confidence)?;
        let embedder = OnnxArcFaceEmbedder::new(models.embedder)?;
        let extractor = DetectingExtractor::new(Box::new(detector), Box::new(embedder));
        Ok(Self::with_extractor(Box::new(extractor)))
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.matcher = IdentityMatcher::new(tolerance);
        self
    }

    pub fn tolerance(&self) -> f64 {
        self.matcher.tolerance()
    }

    /// Build the registry from `reference_dir`, overwriting `artifact`.
    pub fn register_faces(
        &mut self,
        reference_dir: &Path,
        artifact: &Path,
        logger: &mut dyn PipelineLogger,
    ) -> Result<RegistrationReport, RegisterError> {
        RegisterFacesUseCase::new(
            self.scanner.as_ref(),
            self.decoder.as_ref(),
            self.extractor.as_mut(),
            self.store.as_ref(),
        )
        .execute(reference_dir, artifact, logger)
    }

    /// Sort `group_dir` into `output_dir` using the registry at `artifact`.
    /// `reference_dir` is only consulted to detect a stale registry.
    pub fn sort_photos(
        &mut self,
        reference_dir: &Path,
        group_dir: &Path,
        output_dir: &Path,
        artifact: &Path,
        logger: &mut dyn PipelineLogger,
    ) -> Result<SortReport, SortError> {
        SortPhotosUseCase::new(
            self.scanner.as_ref(),
            self.placer.as_mut(),
            self.decoder.as_ref(),
            self.extractor.as_mut(),
            self.store.as_ref(),
            self.matcher,
        )
        .execute(
            SortPaths {
                reference_dir,
                group_dir,
                output_dir,
                artifact,
            },
            logger,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::domain::sort_report::SortStatus;
    use crate::pipeline::pipeline_logger::NullPipelineLogger;
    use crate::testing::{solid_png, ColorKeyExtractor};
    use std::fs;

    const ALICE: [u8; 3] = [220, 20, 20];
    const NO_FACE: [u8; 3] = [128, 128, 128];

    fn sorter() -> FaceSorter {
        FaceSorter::with_extractor(Box::new(
            ColorKeyExtractor::new().with_faces(ALICE, vec![vec![0.6, 0.8]]),
        ))
    }

    #[test]
    fn test_register_then_sort_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let refs = dir.path().join("ref");
        let group = dir.path().join("group");
        let output = dir.path().join("output");
        let artifact = dir.path().join("encodings.json");
        fs::create_dir_all(&refs).unwrap();
        fs::create_dir_all(&group).unwrap();
        fs::write(refs.join("alice.jpg"), solid_png(ALICE)).unwrap();
        fs::write(refs.join("bob.jpg"), solid_png(NO_FACE)).unwrap();
        fs::write(group.join("party1.jpg"), solid_png(ALICE)).unwrap();
        fs::write(group.join("party2.jpg"), solid_png(NO_FACE)).unwrap();

        let mut sorter = sorter();
        let registration = sorter
            .register_faces(&refs, &artifact, &mut NullPipelineLogger)
            .unwrap();
        assert_eq!(registration.labels, vec!["alice"]);

        let report = sorter
            .sort_photos(&refs, &group, &output, &artifact, &mut NullPipelineLogger)
            .unwrap();
        assert_eq!((report.processed, report.matched, report.unmatched), (2, 1, 1));
        assert!(output.join("alice").join("party1.jpg").is_file());
        assert!(output.join("unmatched").join("party2.jpg").is_file());
    }

    #[test]
    fn test_garbage_artifact_becomes_error_status() {
        let dir = tempfile::tempdir().unwrap();
        let group = dir.path().join("group");
        let output = dir.path().join("output");
        let artifact = dir.path().join("encodings.json");
        fs::create_dir_all(&group).unwrap();
        fs::write(group.join("party1.jpg"), solid_png(ALICE)).unwrap();
        fs::write(&artifact, b"not json").unwrap();

        let result = sorter().sort_photos(
            &dir.path().join("ref"),
            &group,
            &output,
            &artifact,
            &mut NullPipelineLogger,
        );
        let status = SortStatus::from(result);

        assert!(matches!(status, SortStatus::Error { .. }));
        assert_eq!(fs::read_dir(&output).unwrap().count(), 0);
    }

    #[test]
    fn test_output_equal_to_group_keeps_photos_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let group = dir.path().join("photos");
        fs::create_dir_all(&group).unwrap();
        fs::write(group.join("party1.jpg"), solid_png(ALICE)).unwrap();
        let same_dir = group.join("..").join("photos");

        let result = sorter().sort_photos(
            &dir.path().join("ref"),
            &group,
            &same_dir,
            &dir.path().join("encodings.json"),
            &mut NullPipelineLogger,
        );

        assert!(matches!(result, Err(SortError::OutputContainsInput { .. })));
        assert!(group.join("party1.jpg").is_file());
    }

    #[test]
    fn test_output_above_group_keeps_photos_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out");
        let group = output.join("group");
        fs::create_dir_all(&group).unwrap();
        fs::write(group.join("party1.jpg"), solid_png(ALICE)).unwrap();

        let result = sorter().sort_photos(
            &dir.path().join("ref"),
            &group,
            &output,
            &dir.path().join("encodings.json"),
            &mut NullPipelineLogger,
        );

        assert!(matches!(result, Err(SortError::OutputContainsInput { .. })));
        assert!(group.join("party1.jpg").is_file());
    }

    #[test]
    fn test_tolerance_is_configurable() {
        assert_eq!(sorter().tolerance(), DEFAULT_TOLERANCE);
        assert_eq!(sorter().with_tolerance(0.3).tolerance(), 0.3);
    }
}
