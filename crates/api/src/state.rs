use std::sync::Arc;

use swinglab_core::analysis::PipelineConfig;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: swinglab_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Pre-built analysis pipeline configuration.
    pub pipeline: Arc<PipelineConfig>,
}

impl AppState {
    pub fn new(pool: swinglab_db::DbPool, config: ServerConfig) -> Self {
        let pipeline = Arc::new(config.analysis.pipeline());
        Self {
            pool,
            config: Arc::new(config),
            pipeline,
        }
    }
}
