//! Handlers for the `/comments` annotation tag endpoints.

use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};
use swinglab_core::types::DbId;
use swinglab_db::models::annotation_tag::{AnalysisTag, CreateAnalysisTag};
use swinglab_db::repositories::AnalysisTagRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /comments/add -- append one tag with a server-side timestamp.
pub async fn add_tag(
    State(state): State<AppState>,
    Json(request): Json<CreateAnalysisTag>,
) -> AppResult<Json<AnalysisTag>> {
    if request.tag.trim().is_empty() {
        return Err(AppError::BadRequest("tag must not be empty".into()));
    }
    if request.frame_index < 0 {
        return Err(AppError::BadRequest("frame_index must not be negative".into()));
    }

    let tag = AnalysisTagRepo::create(&state.pool, &request).await?;
    Ok(Json(tag))
}

/// GET /comments/{analysis_id} -- all tags for one analysis, ordered by
/// frame index.
pub async fn list_tags(
    State(state): State<AppState>,
    Path(analysis_id): Path<String>,
) -> AppResult<Json<Vec<AnalysisTag>>> {
    let tags = AnalysisTagRepo::list_by_analysis(&state.pool, &analysis_id).await?;
    Ok(Json(tags))
}

/// DELETE /comments/delete/{id} -- remove a tag; unknown ids are 404.
pub async fn delete_tag(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Value>> {
    if !AnalysisTagRepo::delete(&state.pool, id).await? {
        return Err(AppError::NotFound(format!("No tag with id {id}")));
    }
    Ok(Json(json!({ "status": "OK" })))
}
