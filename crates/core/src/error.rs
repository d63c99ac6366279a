use std::path::PathBuf;

use crate::types::DbId;

/// General domain errors shared across the workspace.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failures inside the upload-analysis pipeline.
///
/// Every variant maps to a server error at the HTTP boundary; none of them
/// may leave an outcome row behind, which the upload handler enforces by
/// persisting strictly after the pipeline returns `Ok`.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// The analysis executable could not be started at all.
    #[error("failed to start analysis process: {0}")]
    Spawn(#[from] std::io::Error),

    /// The process ran but exited non-zero. Carries the bounded output
    /// preview so callers can surface a log excerpt without re-reading the
    /// log file.
    #[error("analysis process failed (exit={exit_code}): {preview}")]
    ProcessFailed { exit_code: i32, preview: String },

    /// The process exceeded its wall-clock budget and was force-killed.
    /// The full log file is the diagnostic reference.
    #[error("analysis timed out; see log at {}", log_path.display())]
    TimedOut { log_path: PathBuf },

    /// Neither the expected result path nor the fuzzy fallback found a
    /// result artifact.
    #[error("result file not found: {}", .0.display())]
    ResultNotFound(PathBuf),

    /// The result artifact exists but is unreadable, structurally invalid,
    /// or signals an analyzer-side error.
    #[error("analysis reported failure: {0}")]
    ResultInvalid(String),
}
