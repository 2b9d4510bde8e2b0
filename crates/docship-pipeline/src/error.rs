//! Pipeline error types.

use crate::stage::ActionError;

/// Error detected while constructing or resolving the stage graph.
///
/// Graph errors are configuration mistakes: they are reported before any
/// stage action runs and no partial order is returned.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// A stage name was registered twice.
    #[error("stage '{0}' is registered more than once")]
    DuplicateStage(String),

    /// A stage declares a dependency on a name that was never registered.
    #[error("stage '{stage}' depends on unknown stage '{dependency}'")]
    UnknownDependency { stage: String, dependency: String },

    /// The dependency relation contains a cycle.
    #[error("dependency cycle: {}", .path.join(" -> "))]
    Cycle { path: Vec<String> },

    /// The requested target stage is not registered.
    #[error("unknown target stage '{0}'")]
    UnknownTarget(String),
}

/// Error raised by a pipeline run.
///
/// A run reports exactly one failure: the graph error, the first missing
/// configuration gate, or the first failing stage action. Stages after the
/// failure never run and completed stages are not rolled back.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("{0}")]
    Graph(#[from] GraphError),

    /// A stage's required configuration values are absent or empty.
    #[error("stage '{stage}' is missing required configuration: {}", .keys.join(", "))]
    MissingConfig { stage: String, keys: Vec<String> },

    /// A stage action failed.
    #[error("stage '{stage}' failed: {source}")]
    Stage {
        stage: String,
        #[source]
        source: ActionError,
    },
}
