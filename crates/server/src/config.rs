use std::path::PathBuf;

use clap::Parser;

use face_sorter_core::shared::constants::DEFAULT_TOLERANCE;

/// HTTP backend for registering reference faces and sorting group photos.
#[derive(Parser, Debug, Clone)]
#[command(name = "face-sorter-server", version)]
pub struct ServerArgs {
    /// Listen address.
    #[arg(long, default_value = "0.0.0.0:5000")]
    pub addr: String,

    /// Directory holding uploads, output and the registry.
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Origin allowed to call the API from a browser.
    #[arg(long, default_value = "http://localhost:3000")]
    pub allow_origin: String,

    /// Face detection model (downloaded to the user cache if omitted).
    #[arg(long)]
    pub detector_model: Option<PathBuf>,

    /// Face embedding model (downloaded to the user cache if omitted).
    #[arg(long)]
    pub embedding_model: Option<PathBuf>,

    /// Directory searched for bundled models before downloading.
    #[arg(long)]
    pub models_dir: Option<PathBuf>,

    /// Face detection confidence threshold (0.0-1.0).
    #[arg(long, default_value = "0.5")]
    pub confidence: f64,

    /// Maximum embedding distance counted as the same person.
    #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
    pub tolerance: f64,

    /// Maximum request body size in MiB.
    #[arg(long, default_value = "100")]
    pub body_limit_mb: usize,
}

impl ServerArgs {
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(0.0..=1.0).contains(&self.confidence) {
            anyhow::bail!(
                "Confidence must be between 0.0 and 1.0, got {}",
                self.confidence
            );
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            anyhow::bail!(
                "Tolerance must be a non-negative number, got {}",
                self.tolerance
            );
        }
        if self.body_limit_mb == 0 {
            anyhow::bail!("Body limit must be at least 1 MiB");
        }
        Ok(())
    }

    pub fn body_limit_bytes(&self) -> usize {
        self.body_limit_mb.saturating_mul(1024 * 1024)
    }
}
