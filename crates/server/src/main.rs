use std::path::{Path, PathBuf};

use anyhow::Context;
use axum::http::HeaderValue;
use clap::Parser;
use tokio::net::TcpListener;

use face_sorter_core::pipeline::face_sorter::{FaceSorter, OnnxModels};
use face_sorter_core::shared::model_resolver::{self, ModelSpec, DETECTOR_MODEL, EMBEDDING_MODEL};
use face_sorter_server::config::ServerArgs;
use face_sorter_server::{create_app, AppState, HttpOptions, Workspace};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = ServerArgs::parse();
    args.validate()?;

    // Models are resolved before the runtime starts: downloads use a blocking client
    let detector = resolve_model(DETECTOR_MODEL, args.detector_model.as_deref(), &args)?;
    let embedder = resolve_model(EMBEDDING_MODEL, args.embedding_model.as_deref(), &args)?;
    let sorter = FaceSorter::onnx(&OnnxModels {
        detector: &detector,
        embedder: &embedder,
        confidence: args.confidence,
    })
    .map_err(|e| anyhow::anyhow!("failed to load models: {e}"))?
    .with_tolerance(args.tolerance);

    let workspace = Workspace::new(&args.workspace);
    workspace
        .reset()
        .with_context(|| format!("cannot prepare workspace {}", args.workspace.display()))?;

    let options = HttpOptions {
        allow_origin: HeaderValue::from_str(&args.allow_origin)
            .with_context(|| format!("invalid origin {:?}", args.allow_origin))?,
        body_limit: args.body_limit_bytes(),
    };
    let app = create_app(AppState::new(sorter, workspace), &options);

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async {
            let listener = TcpListener::bind(&args.addr)
                .await
                .with_context(|| format!("failed to bind {}", args.addr))?;
            log::info!("Starting server at http://{}", args.addr);
            axum::serve(listener, app).await?;
            Ok::<(), anyhow::Error>(())
        })
}

fn resolve_model(
    spec: ModelSpec,
    explicit: Option<&Path>,
    args: &ServerArgs,
) -> anyhow::Result<PathBuf> {
    log::info!("Resolving model: {}", spec.name);
    model_resolver::resolve(spec, explicit, args.models_dir.as_deref(), None)
        .with_context(|| format!("cannot resolve model {}", spec.name))
}
