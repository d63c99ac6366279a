//! Route definitions for upload, artifact retrieval, and video bookkeeping.
//!
//! Mounted at `/images` (the path the legacy frontend calls, kept verbatim).
//!
//! ```text
//! POST /upload            upload a video and run the analysis workflow
//! GET  /search_video      serve a stored or derived video by filename
//! GET  /search_json       serve a landmark JSON file
//! GET  /search_csv        serve a landmark CSV file
//! GET  /search_result     serve an analysis result JSON file
//! POST /file_search       list outcome rows for a user (admin sees all)
//! POST /file_delete       delete outcome rows and their artifacts
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{artifacts, files, upload};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload::upload_video))
        .route("/search_video", get(artifacts::search_video))
        .route("/search_json", get(artifacts::search_json))
        .route("/search_csv", get(artifacts::search_csv))
        .route("/search_result", get(artifacts::search_result))
        .route("/file_search", post(files::file_search))
        .route("/file_delete", post(files::file_delete))
}
