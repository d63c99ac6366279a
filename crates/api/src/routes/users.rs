//! Route definitions for the account pass-through endpoints.
//!
//! Mounted at `/api` (legacy frontend paths, kept verbatim). All endpoints
//! are POST with JSON bodies whose field names carry the legacy `s_` prefix.
//!
//! ```text
//! POST /login5        credential check, returns the account row or "NOT"
//! POST /user_search   LIKE search on username
//! POST /user_insert   create an account
//! POST /user_edit     update an account
//! POST /user_delete   delete accounts by id list (admin is skipped)
//! ```

use axum::routing::post;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login5", post(users::login))
        .route("/user_search", post(users::user_search))
        .route("/user_insert", post(users::user_insert))
        .route("/user_edit", post(users::user_edit))
        .route("/user_delete", post(users::user_delete))
}
