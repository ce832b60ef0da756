use std::collections::HashMap;
use std::time::Instant;

/// Cross-cutting logger for pipeline orchestration events.
///
/// Decouples use cases from specific output mechanisms (stdout, HTTP
/// responses, log crate) so each caller can observe a run without changing
/// the orchestration code.
pub trait PipelineLogger: Send {
    /// Report photo-level progress.
    fn progress(&mut self, current: usize, total: usize);

    /// Record how long a named stage took for one photo.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Report a recoverable problem (skipped photo, stale registry).
    fn warning(&mut self, message: &str);

    /// Emit an end-of-run summary. Default: no-op.
    fn summary(&self) {}
}

/// Silent logger that discards all events.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn progress(&mut self, _current: usize, _total: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn info(&mut self, _message: &str) {}
    fn warning(&mut self, _message: &str) {}
}

/// CLI-oriented logger that tracks per-stage timing and provides a summary
/// report at the end of a run.
///
/// Progress output is throttled to every `throttle_photos` photos.
pub struct StdoutPipelineLogger {
    throttle_photos: usize,
    timings: HashMap<String, Vec<f64>>,
    start_time: Instant,
    total_photos: usize,
    warnings: usize,
}

impl StdoutPipelineLogger {
    pub fn new(throttle_photos: usize) -> Self {
        Self {
            throttle_photos: throttle_photos.max(1),
            timings: HashMap::new(),
            start_time: Instant::now(),
            total_photos: 0,
            warnings: 0,
        }
    }

    /// Returns the formatted summary string, or `None` if no data recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let photos = self.total_photos;
        let mut lines = Vec::new();

        lines.push(format!(
            "Run summary ({photos} photos, {:.1}s total):",
            elapsed_ms / 1000.0
        ));

        let mut stages: Vec<_> = self.timings.keys().collect();
        stages.sort();
        for stage in stages {
            let durations = &self.timings[stage];
            let total_ms: f64 = durations.iter().sum();
            let avg_ms = total_ms / durations.len().max(1) as f64;
            let pct = if elapsed_ms > 0.0 {
                total_ms / elapsed_ms * 100.0
            } else {
                0.0
            };
            lines.push(format!(
                "  {stage:12}: avg {avg_ms:6.1}ms  total {total_ms:7.0}ms  ({pct:4.1}%)"
            ));
        }

        if self.warnings > 0 {
            lines.push(format!("  Warnings: {}", self.warnings));
        }

        if photos > 0 && elapsed_ms > 0.0 {
            let rate = photos as f64 / (elapsed_ms / 1000.0);
            lines.push(format!("  Throughput: {rate:.1} photos/s"));
        }

        Some(lines.join("\n"))
    }

    /// Returns the timing data for a given stage.
    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(|v| v.as_slice())
    }
}

impl Default for StdoutPipelineLogger {
    fn default() -> Self {
        Self::new(10)
    }
}

impl PipelineLogger for StdoutPipelineLogger {
    fn progress(&mut self, current: usize, total: usize) {
        self.total_photos = total;
        if total > 0 && (current % self.throttle_photos == 0 || current == total) {
            let pct = current as f64 / total as f64 * 100.0;
            log::info!("Processing: {current}/{total} photos ({pct:.1}%)");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn warning(&mut self, message: &str) {
        self.warnings += 1;
        log::warn!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

/// Keeps every message in memory. Handy for asserting on warnings.
#[derive(Default)]
pub struct RecordingPipelineLogger {
    pub infos: Vec<String>,
    pub warnings: Vec<String>,
    pub last_progress: Option<(usize, usize)>,
}

impl PipelineLogger for RecordingPipelineLogger {
    fn progress(&mut self, current: usize, total: usize) {
        self.last_progress = Some((current, total));
    }

    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}

    fn info(&mut self, message: &str) {
        self.infos.push(message.to_string());
    }

    fn warning(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }
}
