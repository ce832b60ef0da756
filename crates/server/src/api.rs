use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use face_sorter_core::pipeline::face_sorter::FaceSorter;
use face_sorter_core::pipeline::pipeline_logger::{PipelineLogger, StdoutPipelineLogger};

use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::workspace::{reset_dir, sanitize_file_name, Upload, Workspace};

pub const REFERENCE_FIELD: &str = "reference_faces";
pub const GROUP_FIELD: &str = "group_photos";

#[derive(Default)]
struct Uploads {
    reference: Vec<Upload>,
    group: Vec<Upload>,
}

fn file_names(uploads: &[Upload]) -> Vec<String> {
    uploads.iter().map(|u| u.file_name.clone()).collect()
}

/// Health check.
pub async fn home_handler() -> Json<Value> {
    Json(json!({"status": "success", "message": "Backend is running!"}))
}

/// Replace the reference photos and rebuild the registry from them.
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<Value>> {
    let uploads = read_uploads(multipart).await?;
    log::debug!(
        "Received register_faces request with {} reference files",
        uploads.reference.len()
    );

    let body = with_sorter(state, move |ws, sorter| {
        ws.reset()?;
        if uploads.reference.is_empty() {
            log::warn!("No reference files received");
            return Ok(json!({
                "status": "success",
                "message": "No reference faces provided, skipping registration",
            }));
        }

        ws.save(&ws.ref_dir(), &uploads.reference)?;
        let mut logger = StdoutPipelineLogger::default();
        let report = sorter.register_faces(&ws.ref_dir(), &ws.artifact(), &mut logger)?;
        logger.summary();

        Ok(json!({
            "status": "success",
            "message": "Faces registered.",
            "details": {
                "faces_registered": report.count,
                "names": report.labels,
            },
        }))
    })
    .await?;

    Ok(Json(body))
}

/// Optionally add reference photos, then sort the uploaded group photos.
pub async fn upload_handler(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Value>)> {
    let uploads = read_uploads(multipart).await?;
    log::debug!(
        "Received {} reference files and {} group files",
        uploads.reference.len(),
        uploads.group.len()
    );

    with_sorter(state, move |ws, sorter| {
        let mut logger = StdoutPipelineLogger::default();

        if !uploads.reference.is_empty() {
            ws.save(&ws.ref_dir(), &uploads.reference)?;
            sorter.register_faces(&ws.ref_dir(), &ws.artifact(), &mut logger)?;
        }

        reset_dir(&ws.group_dir())?;
        ws.save(&ws.group_dir(), &uploads.group)?;

        let result = sorter.sort_photos(
            &ws.ref_dir(),
            &ws.group_dir(),
            &ws.output_dir(),
            &ws.artifact(),
            &mut logger,
        );
        logger.summary();

        let response = match result {
            Ok(mut report) => {
                report.output_files = report
                    .output_files
                    .iter()
                    .map(|p| ws.relative(p))
                    .collect();
                let output_files: Vec<String> =
                    report.output_files.iter().map(|p| ws.display(p)).collect();
                log::debug!("Files in output directory: {output_files:?}");
                (
                    StatusCode::OK,
                    Json(json!({
                        "status": "success",
                        "result": report,
                        "details": {
                            "reference_files": file_names(&uploads.reference),
                            "group_files": file_names(&uploads.group),
                            "output_files": output_files,
                        },
                    })),
                )
            }
            Err(e) => {
                log::error!("Sorting failed: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"status": "error", "message": e.to_string()})),
                )
            }
        };
        Ok(response)
    })
    .await
}

/// Collect the photo fields of a multipart request. Parts without a usable
/// file name and unknown fields are ignored.
async fn read_uploads(mut multipart: Multipart) -> Result<Uploads> {
    let mut uploads = Uploads::default();
    while let Some(field) = multipart.next_field().await.map_err(AppError::multipart)? {
        let target = match field.name() {
            Some(REFERENCE_FIELD) => &mut uploads.reference,
            Some(GROUP_FIELD) => &mut uploads.group,
            other => {
                log::debug!("Ignoring multipart field {other:?}");
                continue;
            }
        };
        let Some(file_name) = field.file_name().and_then(sanitize_file_name) else {
            log::warn!("Ignoring upload without a usable file name");
            continue;
        };
        let bytes = field.bytes().await.map_err(AppError::multipart)?;
        target.push(Upload {
            file_name,
            bytes: bytes.to_vec(),
        });
    }
    Ok(uploads)
}

/// Run `f` on a blocking thread while holding the sorter lock.
async fn with_sorter<T, F>(state: Arc<AppState>, f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&Workspace, &mut FaceSorter) -> anyhow::Result<T> + Send + 'static,
{
    let result = tokio::task::spawn_blocking(move || {
        // A panic in an earlier request leaves the sorter usable
        let mut sorter = state.sorter.lock().unwrap_or_else(|e| e.into_inner());
        f(&state.workspace, &mut sorter)
    })
    .await?;
    Ok(result?)
}
