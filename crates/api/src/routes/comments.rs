//! Route definitions for per-frame annotation tags.
//!
//! Mounted at `/comments`.
//!
//! ```text
//! POST   /add                  append a tag
//! GET    /{analysis_id}        list tags for one analysis, by frame index
//! DELETE /delete/{id}          remove a tag by id
//! ```

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::comments;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/add", post(comments::add_tag))
        .route("/{analysis_id}", get(comments::list_tags))
        .route("/delete/{id}", delete(comments::delete_tag))
}
