use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand};

use face_sorter_core::matching::domain::sort_report::SortStatus;
use face_sorter_core::pipeline::face_sorter::{FaceSorter, OnnxModels};
use face_sorter_core::pipeline::pipeline_logger::{PipelineLogger, StdoutPipelineLogger};
use face_sorter_core::shared::constants::{DEFAULT_TOLERANCE, REGISTRY_FILE_NAME};
use face_sorter_core::shared::model_resolver::{self, ModelSpec, DETECTOR_MODEL, EMBEDDING_MODEL};

/// Register reference faces and sort group photos by who appears in them.
#[derive(Parser)]
#[command(name = "face-sorter", version)]
struct Cli {
    #[command(flatten)]
    models: ModelArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct ModelArgs {
    /// Face detection model (downloaded to the user cache if omitted).
    #[arg(long, global = true)]
    detector_model: Option<PathBuf>,

    /// Face embedding model (downloaded to the user cache if omitted).
    #[arg(long, global = true)]
    embedding_model: Option<PathBuf>,

    /// Directory searched for bundled models before downloading.
    #[arg(long, global = true)]
    models_dir: Option<PathBuf>,

    /// Face detection confidence threshold (0.0-1.0).
    #[arg(long, global = true, default_value = "0.5")]
    confidence: f64,
}

#[derive(Subcommand)]
enum Command {
    /// Build the face registry from labeled reference photos (one face each).
    Register {
        /// Directory of reference photos named after the person in them.
        reference_dir: PathBuf,

        /// Registry file to write.
        #[arg(long, default_value = REGISTRY_FILE_NAME)]
        registry: PathBuf,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Copy group photos into one folder per recognised person.
    Sort {
        /// Reference photos the registry was built from.
        reference_dir: PathBuf,

        /// Photos to sort.
        group_dir: PathBuf,

        /// Output directory (emptied first).
        output_dir: PathBuf,

        /// Registry file to read.
        #[arg(long, default_value = REGISTRY_FILE_NAME)]
        registry: PathBuf,

        /// Maximum embedding distance counted as the same person.
        #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
        tolerance: f64,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let mut sorter = build_sorter(&cli.models)?;
    let mut logger = StdoutPipelineLogger::default();

    match cli.command {
        Command::Register {
            reference_dir,
            registry,
            json,
        } => {
            let report = sorter.register_faces(&reference_dir, &registry, &mut logger)?;
            logger.summary();
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "Registered {} faces: {}",
                    report.count,
                    report.labels.join(", ")
                );
                if !report.skipped.is_empty() {
                    println!("Skipped: {}", report.skipped.join(", "));
                }
            }
        }
        Command::Sort {
            reference_dir,
            group_dir,
            output_dir,
            registry,
            tolerance,
            json,
        } => {
            sorter = sorter.with_tolerance(tolerance);
            let result = sorter.sort_photos(
                &reference_dir,
                &group_dir,
                &output_dir,
                &registry,
                &mut logger,
            );
            logger.summary();
            let status = SortStatus::from(result);
            if json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            }
            match status {
                SortStatus::Success(report) => {
                    if !json {
                        println!(
                            "Processed {} photos ({} matches, {} unmatched, {} skipped, {} failed)",
                            report.processed,
                            report.matched,
                            report.unmatched,
                            report.skipped,
                            report.failed
                        );
                        println!("Output written to {}", output_dir.display());
                    }
                }
                SortStatus::Error { message } => return Err(message.into()),
            }
        }
    }

    Ok(())
}

fn build_sorter(args: &ModelArgs) -> Result<FaceSorter, Box<dyn std::error::Error>> {
    let detector = resolve_model(
        DETECTOR_MODEL,
        args.detector_model.as_deref(),
        args.models_dir.as_deref(),
    )?;
    let embedder = resolve_model(
        EMBEDDING_MODEL,
        args.embedding_model.as_deref(),
        args.models_dir.as_deref(),
    )?;

    FaceSorter::onnx(&OnnxModels {
        detector: &detector,
        embedder: &embedder,
        confidence: args.confidence,
    })
}

fn resolve_model(
    spec: ModelSpec,
    explicit: Option<&Path>,
    bundled_dir: Option<&Path>,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    log::info!("Resolving model: {}", spec.name);
    let name = spec.name;
    let path = model_resolver::resolve(
        spec,
        explicit,
        bundled_dir,
        Some(Box::new(move |downloaded, total| {
            download_progress(name, downloaded, total)
        })),
    )?;
    Ok(path)
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !(0.0..=1.0).contains(&cli.models.confidence) {
        return Err(format!(
            "Confidence must be between 0.0 and 1.0, got {}",
            cli.models.confidence
        )
        .into());
    }
    match &cli.command {
        Command::Register { reference_dir, .. } => {
            if !reference_dir.is_dir() {
                log::warn!(
                    "Reference directory not found: {} (an empty registry will be written)",
                    reference_dir.display()
                );
            }
        }
        Command::Sort {
            group_dir,
            tolerance,
            ..
        } => {
            if !group_dir.is_dir() {
                return Err(format!("Group directory not found: {}", group_dir.display()).into());
            }
            if !tolerance.is_finite() || *tolerance < 0.0 {
                return Err(format!("Tolerance must be a non-negative number, got {tolerance}").into());
            }
        }
    }
    Ok(())
}

fn download_progress(name: &str, downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading {name}... {pct}%");
    } else {
        eprint!("\rDownloading {name}... {downloaded} bytes");
    }
    if total > 0 && downloaded >= total {
        eprintln!();
    }
}
