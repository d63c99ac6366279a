//! Handlers for `/images/file_search` and `/images/file_delete`.
//!
//! Listing is a straight pass-through over the `video` outcome table; the
//! `admin` account sees every row. Deletion removes the database row first,
//! then best-effort removes the artifacts that belong to that upload: the
//! raw video, the derived skeleton video, and the landmark CSV/JSON pair.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use swinglab_core::storage;
use swinglab_db::repositories::VideoRepo;

use crate::error::AppResult;
use crate::state::AppState;

/// Account that sees all rows and whose rows deletion skips.
const ADMIN_USERID: &str = "admin";

#[derive(Debug, Deserialize)]
pub struct FileSearchRequest {
    pub userid: String,
}

#[derive(Debug, Deserialize)]
pub struct FileDeleteRequest {
    pub list: Vec<FileDeleteItem>,
}

#[derive(Debug, Deserialize)]
pub struct FileDeleteItem {
    pub userid: String,
    pub vid_name: String,
}

/// POST /images/file_search -- list outcome rows for one user, or all rows
/// for `admin`. An empty result is the legacy `{"status":"NOT"}` sentinel.
pub async fn file_search(
    State(state): State<AppState>,
    Json(request): Json<FileSearchRequest>,
) -> AppResult<Json<Value>> {
    let rows = if request.userid == ADMIN_USERID {
        VideoRepo::list_all(&state.pool).await?
    } else {
        VideoRepo::list_by_user(&state.pool, &request.userid).await?
    };

    if rows.is_empty() {
        return Ok(Json(json!({ "status": "NOT" })));
    }
    Ok(Json(json!(rows)))
}

/// POST /images/file_delete -- delete the given rows and their artifacts.
///
/// Admin-owned entries are skipped. Artifact removal is best-effort: a
/// missing or undeletable file is logged, never an error, since the row is
/// already gone.
pub async fn file_delete(
    State(state): State<AppState>,
    Json(request): Json<FileDeleteRequest>,
) -> AppResult<Json<Value>> {
    let mut deleted: u64 = 0;

    for item in &request.list {
        if item.userid == ADMIN_USERID {
            tracing::warn!(vid_name = %item.vid_name, "Skipping delete of admin-owned video");
            continue;
        }

        let removed = VideoRepo::delete(&state.pool, &item.userid, &item.vid_name).await?;
        deleted += removed;

        remove_artifacts(&state, &item.vid_name);
    }

    Ok(Json(json!({ "status": "OK", "deleted": deleted })))
}

/// Remove every on-disk artifact derived from one stored video.
fn remove_artifacts(state: &AppState, vid_name: &str) {
    let stem = storage::file_stem(vid_name);
    let upload_dir = &state.pipeline.upload_dir;
    let landmark_dir = &state.pipeline.landmark_dir;

    storage::remove_if_exists(&upload_dir.join(vid_name));
    storage::remove_if_exists(&upload_dir.join(format!("skeleton_{vid_name}")));
    storage::remove_if_exists(&landmark_dir.join(format!("skeleton_{stem}.csv")));
    storage::remove_if_exists(&landmark_dir.join(format!("skeleton_{stem}.json")));
}
