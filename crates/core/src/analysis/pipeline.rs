//! Orchestration of the external analysis processes for one upload.
//!
//! The handler saves the uploaded video, then calls [`run`], which invokes
//! the configured scripts, captures their output, locates and parses the
//! result artifact, and reduces everything to an [`AnalysisOutcome`]. Any
//! failure aborts before the caller persists an outcome row.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde_json::Value;

use crate::error::AnalysisError;
use crate::locate;
use crate::process::runner::{self, RunOutcome, RunSpec, RunStatus};
use crate::storage;

use super::report;

/// Which external process arrangement performs the analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineVariant {
    /// One script does pose extraction and classification and writes a
    /// result JSON file.
    Combined,
    /// Pose extraction and classification run as separate processes; the
    /// classifier reports its verdict on stdout.
    TwoStage,
}

impl PipelineVariant {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "combined" => Some(Self::Combined),
            "two_stage" | "two-stage" => Some(Self::TwoStage),
            _ => None,
        }
    }
}

/// Everything the pipeline needs to invoke the analyzers.
/// Assembled from the environment by the API crate.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Interpreter used to run the analysis scripts.
    pub python_bin: String,
    /// Combined analyzer (variant [`PipelineVariant::Combined`]).
    pub analyze_script: PathBuf,
    /// Pose/skeleton extractor (variant [`PipelineVariant::TwoStage`]).
    pub skeleton_script: PathBuf,
    /// Classifier (variant [`PipelineVariant::TwoStage`]).
    pub classify_script: PathBuf,
    /// Where uploaded videos and derived skeleton videos live.
    pub upload_dir: PathBuf,
    /// Where result JSON files are written.
    pub result_dir: PathBuf,
    /// Where per-run analyzer logs are written.
    pub log_dir: PathBuf,
    /// Where landmark CSV/JSON files are written.
    pub landmark_dir: PathBuf,
    /// Wall-clock budget per external process. Generous: the analyzers are
    /// slow (model loading, per-frame pose extraction).
    pub timeout: Duration,
    pub variant: PipelineVariant,
}

/// Everything the upload handler needs to build its response and the
/// persisted outcome row.
#[derive(Debug)]
pub struct AnalysisOutcome {
    /// Basename of the expected result JSON (combined variant only).
    pub result_json: Option<String>,
    /// Basename of the derived skeleton video, when one was produced.
    pub skeleton_video: Option<String>,
    /// Prediction code; `-1` when the analyzer produced none.
    pub pred: i32,
    pub prob_true: f64,
    pub prob_false: f64,
}

impl AnalysisOutcome {
    pub fn label(&self) -> &'static str {
        report::label_for(self.pred)
    }
}

/// Run the configured analysis pipeline against a saved upload.
///
/// `video_path` is the absolute path of the stored file, `stored_name` its
/// collision-safe basename.
pub async fn run(
    config: &PipelineConfig,
    video_path: &Path,
    stored_name: &str,
    user_id: &str,
) -> Result<AnalysisOutcome, AnalysisError> {
    match config.variant {
        PipelineVariant::Combined => run_combined(config, video_path, stored_name, user_id).await,
        PipelineVariant::TwoStage => run_two_stage(config, video_path, stored_name).await,
    }
}

async fn run_combined(
    config: &PipelineConfig,
    video_path: &Path,
    stored_name: &str,
    user_id: &str,
) -> Result<AnalysisOutcome, AnalysisError> {
    let result_name = format!("result_{stored_name}.json");
    let expected = config.result_dir.join(&result_name);
    let log_path = fresh_log_path(config);

    let spec = RunSpec {
        program: config.python_bin.clone(),
        args: vec![
            config.analyze_script.display().to_string(),
            "--video".into(),
            video_path.display().to_string(),
            "--out".into(),
            expected.display().to_string(),
            "--user".into(),
            user_id.to_string(),
        ],
        log_path: Some(log_path),
        timeout: config.timeout,
    };

    tracing::info!(
        video = %stored_name,
        script = %config.analyze_script.display(),
        "starting combined analysis"
    );
    let outcome = runner::run(&spec).await?;
    check_exit(&outcome, stored_name)?;

    let result = read_result(config, &expected, stored_name).await?;

    if let Some(message) = report::error_message(&result) {
        tracing::error!(video = %stored_name, error = %message, "analyzer reported an error");
        return Err(AnalysisError::ResultInvalid(message));
    }

    let class = report::classification(&result);
    Ok(AnalysisOutcome {
        result_json: Some(result_name),
        skeleton_video: report::skeleton_video_basename(&result),
        pred: class.pred,
        prob_true: class.prob_true,
        prob_false: class.prob_false,
    })
}

async fn run_two_stage(
    config: &PipelineConfig,
    video_path: &Path,
    stored_name: &str,
) -> Result<AnalysisOutcome, AnalysisError> {
    let stem = storage::file_stem(stored_name);
    let skeleton_name = format!("skeleton_{stored_name}");
    let skeleton_path = config.upload_dir.join(&skeleton_name);
    let landmark_csv = config.landmark_dir.join(format!("skeleton_{stem}.csv"));
    let landmark_json = config.landmark_dir.join(format!("skeleton_{stem}.json"));
    let log_path = fresh_log_path(config);

    let skeleton = RunSpec {
        program: config.python_bin.clone(),
        args: vec![
            config.skeleton_script.display().to_string(),
            video_path.display().to_string(),
            skeleton_path.display().to_string(),
            landmark_csv.display().to_string(),
            landmark_json.display().to_string(),
        ],
        log_path: Some(log_path.clone()),
        timeout: config.timeout,
    };

    tracing::info!(
        video = %stored_name,
        script = %config.skeleton_script.display(),
        "starting skeleton extraction"
    );
    let outcome = runner::run(&skeleton).await?;
    check_exit(&outcome, stored_name)?;

    let classify = RunSpec {
        program: config.python_bin.clone(),
        args: vec![
            config.classify_script.display().to_string(),
            stored_name.to_string(),
        ],
        log_path: Some(log_path),
        timeout: config.timeout,
    };

    tracing::info!(
        video = %stored_name,
        script = %config.classify_script.display(),
        "starting classification"
    );
    let outcome = runner::run(&classify).await?;
    check_exit(&outcome, stored_name)?;

    let pred = report::stdout_verdict(&outcome.stdout);
    Ok(AnalysisOutcome {
        result_json: None,
        skeleton_video: skeleton_path.is_file().then_some(skeleton_name),
        pred,
        prob_true: f64::NAN,
        prob_false: f64::NAN,
    })
}

/// Per-run log file under the configured log directory.
fn fresh_log_path(config: &PipelineConfig) -> PathBuf {
    config
        .log_dir
        .join(format!("analyze_{}.log", chrono::Utc::now().timestamp_millis()))
}

/// Turn a non-zero exit or timeout into the matching pipeline error.
fn check_exit(outcome: &RunOutcome, stored_name: &str) -> Result<(), AnalysisError> {
    match outcome.status {
        RunStatus::Exited(0) => Ok(()),
        RunStatus::Exited(code) => {
            tracing::error!(
                video = %stored_name,
                exit_code = code,
                preview = %outcome.preview,
                "analysis process failed"
            );
            Err(AnalysisError::ProcessFailed {
                exit_code: code,
                preview: outcome.preview.clone(),
            })
        }
        RunStatus::TimedOut => {
            let log_path = outcome.log_path.clone().unwrap_or_default();
            tracing::error!(
                video = %stored_name,
                log = %log_path.display(),
                "analysis process timed out"
            );
            Err(AnalysisError::TimedOut { log_path })
        }
    }
}

/// Locate (exact, then fuzzy) and parse the result artifact.
async fn read_result(
    config: &PipelineConfig,
    expected: &Path,
    stored_name: &str,
) -> Result<Value, AnalysisError> {
    let stem = storage::file_stem(stored_name);
    let result_path = locate::locate_result(expected, &config.result_dir, stem)
        .ok_or_else(|| AnalysisError::ResultNotFound(expected.to_path_buf()))?;

    let raw = tokio::fs::read_to_string(&result_path).await.map_err(|err| {
        AnalysisError::ResultInvalid(format!(
            "failed to read {}: {err}",
            result_path.display()
        ))
    })?;
    serde_json::from_str(&raw)
        .map_err(|err| AnalysisError::ResultInvalid(format!("malformed result JSON: {err}")))
}
