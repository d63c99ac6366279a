use std::path::PathBuf;
use std::time::Duration;

use swinglab_core::analysis::{PipelineConfig, PipelineVariant};

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds. Must exceed the analysis timeout,
    /// since the upload request holds the connection for the whole
    /// workflow (default: `660`).
    pub request_timeout_secs: u64,
    /// Maximum accepted request body size in megabytes (default: `512`).
    /// Uploads are whole videos, so this is far above the framework default.
    pub max_upload_mb: u64,
    /// Analysis workflow configuration (directories, scripts, timeout).
    pub analysis: AnalysisConfig,
}

/// Directories and external scripts for the analysis workflow.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Where uploaded and derived skeleton videos are stored.
    pub upload_dir: PathBuf,
    /// Where the analyzers write result JSON files.
    pub result_dir: PathBuf,
    /// Where per-run analyzer logs are written.
    pub log_dir: PathBuf,
    /// Where landmark CSV/JSON files are stored.
    pub landmark_dir: PathBuf,
    /// Interpreter used to run the analysis scripts.
    pub python_bin: String,
    pub analyze_script: PathBuf,
    pub skeleton_script: PathBuf,
    pub classify_script: PathBuf,
    /// Wall-clock budget per external process in seconds (default `600`;
    /// the analyzers are slow).
    pub analysis_timeout_secs: u64,
    pub pipeline_variant: PipelineVariant,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                 |
    /// |------------------------|-------------------------|
    /// | `HOST`                 | `0.0.0.0`               |
    /// | `PORT`                 | `3000`                  |
    /// | `CORS_ORIGINS`         | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS` | `660`                   |
    /// | `MAX_UPLOAD_MB`        | `512`                   |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "660".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let max_upload_mb: u64 = std::env::var("MAX_UPLOAD_MB")
            .unwrap_or_else(|_| "512".into())
            .parse()
            .expect("MAX_UPLOAD_MB must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            max_upload_mb,
            analysis: AnalysisConfig::from_env(),
        }
    }
}

impl AnalysisConfig {
    /// Load the workflow configuration from environment variables.
    ///
    /// | Env Var                 | Default                               |
    /// |-------------------------|---------------------------------------|
    /// | `UPLOAD_DIR`            | `data/uploaded-videos`                |
    /// | `RESULT_DIR`            | `data/result`                         |
    /// | `LOG_DIR`               | `data/result/logs`                    |
    /// | `LANDMARK_DIR`          | `data/uploaded-videos/landmarkFiles`  |
    /// | `PYTHON_BIN`            | `python3`                             |
    /// | `ANALYZE_SCRIPT`        | `resPy/analyze_golf_video.py`         |
    /// | `SKELETON_SCRIPT`       | `resPy/skeleton_video.py`             |
    /// | `CLASSIFY_SCRIPT`       | `resPy/classify_video.py`             |
    /// | `ANALYSIS_TIMEOUT_SECS` | `600`                                 |
    /// | `ANALYSIS_PIPELINE`     | `combined` (or `two_stage`)           |
    pub fn from_env() -> Self {
        let dir = |var: &str, default: &str| {
            PathBuf::from(std::env::var(var).unwrap_or_else(|_| default.into()))
        };

        let analysis_timeout_secs: u64 = std::env::var("ANALYSIS_TIMEOUT_SECS")
            .unwrap_or_else(|_| "600".into())
            .parse()
            .expect("ANALYSIS_TIMEOUT_SECS must be a valid u64");

        let variant_raw =
            std::env::var("ANALYSIS_PIPELINE").unwrap_or_else(|_| "combined".into());
        let pipeline_variant = PipelineVariant::parse(&variant_raw)
            .unwrap_or_else(|| panic!("Invalid ANALYSIS_PIPELINE '{variant_raw}'"));

        Self {
            upload_dir: dir("UPLOAD_DIR", "data/uploaded-videos"),
            result_dir: dir("RESULT_DIR", "data/result"),
            log_dir: dir("LOG_DIR", "data/result/logs"),
            landmark_dir: dir("LANDMARK_DIR", "data/uploaded-videos/landmarkFiles"),
            python_bin: std::env::var("PYTHON_BIN").unwrap_or_else(|_| "python3".into()),
            analyze_script: dir("ANALYZE_SCRIPT", "resPy/analyze_golf_video.py"),
            skeleton_script: dir("SKELETON_SCRIPT", "resPy/skeleton_video.py"),
            classify_script: dir("CLASSIFY_SCRIPT", "resPy/classify_video.py"),
            analysis_timeout_secs,
            pipeline_variant,
        }
    }

    /// Build the core pipeline configuration.
    pub fn pipeline(&self) -> PipelineConfig {
        PipelineConfig {
            python_bin: self.python_bin.clone(),
            analyze_script: self.analyze_script.clone(),
            skeleton_script: self.skeleton_script.clone(),
            classify_script: self.classify_script.clone(),
            upload_dir: self.upload_dir.clone(),
            result_dir: self.result_dir.clone(),
            log_dir: self.log_dir.clone(),
            landmark_dir: self.landmark_dir.clone(),
            timeout: Duration::from_secs(self.analysis_timeout_secs),
            variant: self.pipeline_variant,
        }
    }
}
