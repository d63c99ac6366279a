//! Handlers for the `/api` account pass-through endpoints.
//!
//! These preserve the legacy wire shapes exactly: `s_`-prefixed request
//! fields, the bare `"NOT"` string on a failed login, and the
//! `{"status":"NOT"}` sentinel for empty search results. Passwords are
//! compared as stored, matching the system this replaces.

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use swinglab_db::models::user::UpsertUser;
use swinglab_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Account that user_delete refuses to remove.
const ADMIN_USERID: &str = "admin";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(rename = "s_userid")]
    pub userid: String,
    #[serde(rename = "s_userpass")]
    pub userpass: String,
}

#[derive(Debug, Deserialize)]
pub struct UserSearchRequest {
    #[serde(rename = "s_username")]
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct UserDeleteRequest {
    #[serde(rename = "s_userids")]
    pub userids: Vec<String>,
}

/// POST /api/login5 -- exact credential match. A hit returns the account
/// row; a miss returns 200 with the literal body `NOT`.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Response> {
    let account =
        UserRepo::find_by_credentials(&state.pool, &request.userid, &request.userpass).await?;

    match account {
        Some(account) => {
            tracing::info!(userid = %account.userid, "Login succeeded");
            Ok(Json(account).into_response())
        }
        None => {
            tracing::info!(userid = %request.userid, "Login rejected");
            Ok("NOT".into_response())
        }
    }
}

/// POST /api/user_search -- LIKE search on username; an empty search string
/// lists every account.
pub async fn user_search(
    State(state): State<AppState>,
    Json(request): Json<UserSearchRequest>,
) -> AppResult<Json<Value>> {
    let pattern = if request.username.is_empty() {
        "%".to_string()
    } else {
        format!("%{}%", request.username)
    };

    let rows = UserRepo::search_by_name(&state.pool, &pattern).await?;

    if rows.is_empty() {
        return Ok(Json(json!({ "status": "NOT" })));
    }
    Ok(Json(json!(rows)))
}

/// POST /api/user_insert -- create an account. Duplicate ids surface as 409
/// via the unique constraint.
pub async fn user_insert(
    State(state): State<AppState>,
    Json(request): Json<UpsertUser>,
) -> AppResult<Json<Value>> {
    if request.userid.trim().is_empty() {
        return Err(AppError::BadRequest("userid must not be empty".into()));
    }

    let account = UserRepo::create(&state.pool, &request).await?;
    tracing::info!(userid = %account.userid, "Account created");

    Ok(Json(json!({ "status": "OK" })))
}

/// POST /api/user_edit -- update an account; an unknown id is the
/// `{"status":"NOT"}` sentinel, not an error.
pub async fn user_edit(
    State(state): State<AppState>,
    Json(request): Json<UpsertUser>,
) -> AppResult<Json<Value>> {
    match UserRepo::update(&state.pool, &request).await? {
        Some(account) => {
            tracing::info!(userid = %account.userid, "Account updated");
            Ok(Json(json!({ "status": "OK" })))
        }
        None => Ok(Json(json!({ "status": "NOT" }))),
    }
}

/// POST /api/user_delete -- delete the listed accounts. The admin account
/// is filtered out of the list rather than rejected.
pub async fn user_delete(
    State(state): State<AppState>,
    Json(request): Json<UserDeleteRequest>,
) -> AppResult<Json<Value>> {
    let userids: Vec<String> = request
        .userids
        .into_iter()
        .filter(|id| id != ADMIN_USERID)
        .collect();

    if userids.is_empty() {
        return Ok(Json(json!({ "status": "NOT" })));
    }

    let deleted = UserRepo::delete_many(&state.pool, &userids).await?;
    tracing::info!(deleted, "Accounts deleted");

    Ok(Json(json!({ "status": "OK", "deleted": deleted })))
}
