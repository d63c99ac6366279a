//! Handlers for the `/images/search_*` artifact endpoints.
//!
//! Each endpoint serves one artifact class from its configured directory:
//! stored/derived videos from the upload dir, landmark CSV/JSON from the
//! landmark dir, result JSON from the result dir. Lookup is exact first,
//! then relaxed (prefix/suffix-stripped stem match, newest wins) so that
//! files renamed by older analyzer versions stay reachable.

use std::path::{Path, PathBuf};

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::header;
use axum::http::HeaderValue;
use axum::response::Response;
use serde::Deserialize;
use swinglab_core::locate;
use swinglab_core::storage;
use tokio_util::io::ReaderStream;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ArtifactQuery {
    pub filename: String,
}

/// GET /images/search_video?filename= -- serve from the upload directory.
pub async fn search_video(
    State(state): State<AppState>,
    Query(query): Query<ArtifactQuery>,
) -> AppResult<Response> {
    serve_artifact(&state.pipeline.upload_dir, &query.filename).await
}

/// GET /images/search_json?filename= -- landmark JSON; `.json` is appended
/// when the caller omits it.
pub async fn search_json(
    State(state): State<AppState>,
    Query(query): Query<ArtifactQuery>,
) -> AppResult<Response> {
    let name = with_extension(&query.filename, "json");
    serve_artifact(&state.pipeline.landmark_dir, &name).await
}

/// GET /images/search_csv?filename= -- landmark CSV; `.csv` is appended
/// when the caller omits it.
pub async fn search_csv(
    State(state): State<AppState>,
    Query(query): Query<ArtifactQuery>,
) -> AppResult<Response> {
    let name = with_extension(&query.filename, "csv");
    serve_artifact(&state.pipeline.landmark_dir, &name).await
}

/// GET /images/search_result?filename= -- analysis result JSON.
pub async fn search_result(
    State(state): State<AppState>,
    Query(query): Query<ArtifactQuery>,
) -> AppResult<Response> {
    serve_artifact(&state.pipeline.result_dir, &query.filename).await
}

/// Resolve `requested` inside `dir` and stream it back.
///
/// Traversal attempts are a 400; no exact or relaxed match is a 404.
async fn serve_artifact(dir: &Path, requested: &str) -> AppResult<Response> {
    let exact = storage::resolve_confined(dir, requested)?;

    let path = if exact.is_file() {
        exact
    } else {
        locate::relaxed_lookup(dir, requested)
            .ok_or_else(|| AppError::NotFound(format!("No artifact matching '{requested}'")))?
    };

    stream_file(&path).await
}

async fn stream_file(path: &PathBuf) -> AppResult<Response> {
    let file = tokio::fs::File::open(path)
        .await
        .map_err(|e| AppError::InternalError(format!("Cannot open {}: {e}", path.display())))?;

    let stream = ReaderStream::new(file);

    let response = Response::builder()
        .header(header::CONTENT_TYPE, content_type_for(path))
        .body(Body::from_stream(stream))
        .map_err(|e| AppError::InternalError(format!("Failed to build response: {e}")))?;

    Ok(response)
}

/// Content type from the file extension; unknown extensions are served as
/// raw bytes.
fn content_type_for(path: &Path) -> HeaderValue {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    HeaderValue::from_static(match ext.as_str() {
        "mp4" => "video/mp4",
        "avi" => "video/x-msvideo",
        "mov" => "video/quicktime",
        "json" => "application/json",
        "csv" => "text/csv",
        _ => "application/octet-stream",
    })
}

/// Append `.{ext}` unless the name already ends with it (case-insensitive).
fn with_extension(name: &str, ext: &str) -> String {
    let suffix = format!(".{ext}");
    if name.to_ascii_lowercase().ends_with(&suffix) {
        name.to_string()
    } else {
        format!("{name}{suffix}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_appended_once() {
        assert_eq!(with_extension("skeleton_a", "json"), "skeleton_a.json");
        assert_eq!(with_extension("skeleton_a.json", "json"), "skeleton_a.json");
        assert_eq!(with_extension("skeleton_a.JSON", "json"), "skeleton_a.JSON");
    }

    #[test]
    fn content_types_match_extensions() {
        assert_eq!(content_type_for(Path::new("a.mp4")), "video/mp4");
        assert_eq!(content_type_for(Path::new("a.csv")), "text/csv");
        assert_eq!(
            content_type_for(Path::new("a.bin")),
            "application/octet-stream"
        );
    }
}
