//! CLI error types.

use docship_config::ConfigError;
use docship_pipeline::{GraphError, PipelineError};

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Graph(#[from] GraphError),

    #[error("{0}")]
    Pipeline(#[from] PipelineError),
}
