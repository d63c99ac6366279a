//! Handler for `POST /images/upload`: the upload-and-analyze workflow.
//!
//! Receives a multipart video, stores it under a collision-safe name,
//! drives the external analysis pipeline to completion, and persists one
//! outcome row only when the whole pipeline succeeded. The request holds
//! the connection for the full workflow (several minutes for real videos),
//! which is why the server-wide timeout is configured above the analysis
//! budget.

use std::path::Path;

use axum::extract::{Multipart, State};
use axum::Json;
use serde_json::{json, Value};
use swinglab_core::analysis::pipeline;
use swinglab_core::storage;
use swinglab_db::repositories::VideoRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// One uploaded video plus the submitting user.
struct UploadRequest {
    original_name: String,
    bytes: Vec<u8>,
    userid: String,
}

/// POST /images/upload -- multipart fields `file` and `userid`.
pub async fn upload_video(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<Value>> {
    let request = read_multipart(multipart).await?;

    let upload_dir = &state.pipeline.upload_dir;
    tokio::fs::create_dir_all(upload_dir)
        .await
        .map_err(|e| AppError::InternalError(format!("Cannot create upload dir: {e}")))?;

    // Prefix with the user id so uploads from different users never collide
    // on the original filename alone, then suffix on remaining collisions.
    let candidate = format!("{}_{}", request.userid, request.original_name);
    let stored_name = storage::unique_filename(upload_dir, &candidate);
    let video_path = upload_dir.join(&stored_name);

    tokio::fs::write(&video_path, &request.bytes)
        .await
        .map_err(|e| AppError::InternalError(format!("Cannot store upload: {e}")))?;

    tracing::info!(
        userid = %request.userid,
        stored = %stored_name,
        size = request.bytes.len(),
        "Upload stored, starting analysis"
    );

    let outcome =
        pipeline::run(&state.pipeline, &video_path, &stored_name, &request.userid).await?;

    // Persisted strictly after the pipeline succeeds; a failed run leaves
    // no row behind.
    VideoRepo::insert(&state.pool, &request.userid, &stored_name, outcome.pred).await?;

    tracing::info!(
        userid = %request.userid,
        stored = %stored_name,
        pred = outcome.pred,
        "Analysis complete"
    );

    // Non-finite probabilities serialize as null, which the frontend
    // renders as "unknown".
    Ok(Json(json!({
        "result": outcome.result_json,
        "skeletonVideo": outcome.skeleton_video,
        "probTrue": outcome.prob_true,
        "probFalse": outcome.prob_false,
        "classifyResult": outcome.label(),
    })))
}

/// Pull the `file` and `userid` fields out of the multipart body.
///
/// Rejects with 400 before any filesystem side effect when either field
/// is missing or empty.
async fn read_multipart(mut multipart: Multipart) -> AppResult<UploadRequest> {
    let mut original_name: Option<String> = None;
    let mut bytes: Option<Vec<u8>> = None;
    let mut userid: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        match field.name() {
            Some("file") => {
                let name = field
                    .file_name()
                    .map(sanitize_filename)
                    .filter(|n| !n.is_empty())
                    .ok_or_else(|| {
                        AppError::BadRequest("File field is missing a filename".into())
                    })?;
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read file: {e}")))?;
                original_name = Some(name);
                bytes = Some(data.to_vec());
            }
            Some("userid") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read userid: {e}")))?;
                userid = Some(value.trim().to_string());
            }
            _ => {} // ignore unknown fields
        }
    }

    let original_name =
        original_name.ok_or_else(|| AppError::BadRequest("Missing 'file' field".into()))?;
    let bytes = bytes.ok_or_else(|| AppError::BadRequest("Missing 'file' field".into()))?;
    let userid = userid
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing 'userid' field".into()))?;

    if bytes.is_empty() {
        return Err(AppError::BadRequest("Uploaded file is empty".into()));
    }

    Ok(UploadRequest {
        original_name,
        bytes,
        userid,
    })
}

/// Keep only the basename of a client-supplied filename. Browsers normally
/// send a bare name, but some clients send full paths.
fn sanitize_filename(raw: &str) -> String {
    Path::new(raw)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
