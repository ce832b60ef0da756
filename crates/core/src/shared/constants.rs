pub const DETECTOR_MODEL_NAME: &str = "yolo11n-pose_widerface.onnx";
pub const DETECTOR_MODEL_URL: &str =
    "https://github.com/neutrinographics/faceguard/releases/download/v0.1.0/yolo11n-pose_widerface.onnx";

pub const EMBEDDING_MODEL_NAME: &str = "w600k_r50.onnx";
pub const EMBEDDING_MODEL_URL: &str =
    "https://github.com/neutrinographics/faceguard/releases/download/v0.1.0/w600k_r50.onnx";

/// Photo extensions accepted for both reference and group images (case-insensitive).
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Maximum embedding distance for two faces to count as the same person.
pub const DEFAULT_TOLERANCE: f64 = 0.5;

/// Output folder for photos with no recognised face.
pub const UNMATCHED_DIR_NAME: &str = "unmatched";

/// Default registry artifact file name.
pub const REGISTRY_FILE_NAME: &str = "encodings.json";
