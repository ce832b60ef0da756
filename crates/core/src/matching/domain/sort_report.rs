use std::path::PathBuf;

use serde::Serialize;

/// Aggregate counts from one sorting run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SortReport {
    /// Photos fully handled: classified (or copied in no-match mode) and placed.
    pub processed: usize,
    /// (face, registry entry) pairs within tolerance, summed over all photos.
    pub matched: usize,
    /// Photos copied to the unmatched bucket.
    pub unmatched: usize,
    /// Photos dropped because they could not be read, decoded or embedded.
    pub skipped: usize,
    /// Photos whose copy into a destination folder failed.
    pub failed: usize,
    /// Every copy written, in write order.
    pub output_files: Vec<PathBuf>,
}

/// Structured result handed to callers outside the core.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SortStatus {
    Success(SortReport),
    Error { message: String },
}

impl<E: std::error::Error> From<Result<SortReport, E>> for SortStatus {
    fn from(result: Result<SortReport, E>) -> Self {
        match result {
            Ok(report) => SortStatus::Success(report),
            Err(e) => SortStatus::Error {
                message: e.to_string(),
            },
        }
    }
}

/// What a registration run produced.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RegistrationReport {
    pub count: usize,
    pub labels: Vec<String>,
    /// Reference files that produced no registry entry.
    pub skipped: Vec<String>,
}
