//! The upload-analysis workflow: report parsing and pipeline orchestration.

pub mod pipeline;
pub mod report;

pub use pipeline::{AnalysisOutcome, PipelineConfig, PipelineVariant};
