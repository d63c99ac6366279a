//! Uploaded-video outcome rows.

use serde::Serialize;
use sqlx::FromRow;
use swinglab_core::types::Timestamp;

/// A row from the `video` table: one successfully analyzed upload.
///
/// Rows are written only after the analysis pipeline succeeds and are never
/// mutated; deletion also removes the derived artifacts on disk.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct VideoRecord {
    pub userid: String,
    pub vid_name: String,
    /// Raw prediction code from the classifier (`-1` = unknown).
    pub eval: i32,
    pub upload_date: Timestamp,
}
