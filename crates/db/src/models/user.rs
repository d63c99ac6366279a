//! Account rows from the `basemp` table.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `basemp` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserAccount {
    pub userid: String,
    pub userpass: String,
    pub username: String,
    pub usermail: String,
}

/// DTO for creating or editing an account.
///
/// The wire field names keep the legacy frontend's `s_` prefix.
#[derive(Debug, Deserialize)]
pub struct UpsertUser {
    #[serde(rename = "s_userid")]
    pub userid: String,
    #[serde(rename = "s_userpass")]
    pub userpass: String,
    #[serde(rename = "s_username")]
    pub username: String,
    #[serde(rename = "s_usermail")]
    pub usermail: String,
}
