//! Per-frame annotation tag rows from the `analysis_tag` table.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use swinglab_core::types::{DbId, Timestamp};

/// A row from the `analysis_tag` table. Serialized field names match what
/// the legacy frontend expects.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AnalysisTag {
    pub id: DbId,
    #[serde(rename = "userId")]
    pub userid: DbId,
    #[serde(rename = "analysisId")]
    pub analysis_id: String,
    #[serde(rename = "frameIndex")]
    pub frame_index: i32,
    pub tag: String,
    pub memo: Option<String>,
    #[serde(rename = "timestamp")]
    pub timestamp_sec: Timestamp,
}

/// DTO for appending a new tag. Field names mirror the legacy request body.
#[derive(Debug, Deserialize)]
pub struct CreateAnalysisTag {
    #[serde(rename = "userId")]
    pub userid: DbId,
    pub analysis_id: String,
    pub frame_index: i32,
    pub tag: String,
    pub memo: Option<String>,
}
