//! Stage specification.

use crate::context::RunContext;

/// Error type returned by stage actions.
///
/// Actions come from different crates (filesystem work, external tool
/// invocations, the publisher), so the pipeline accepts any boxed error and
/// attributes it to the failing stage.
pub type ActionError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A unit of side-effecting work executed by the engine.
///
/// Implemented for any `Fn(&RunContext) -> Result<(), ActionError>` closure.
pub trait StageAction: Send + Sync {
    /// Run the action. Success or failure is the only visible outcome.
    fn run(&self, ctx: &RunContext) -> Result<(), ActionError>;
}

impl<F> StageAction for F
where
    F: Fn(&RunContext) -> Result<(), ActionError> + Send + Sync,
{
    fn run(&self, ctx: &RunContext) -> Result<(), ActionError> {
        self(ctx)
    }
}

/// A named stage: its dependencies, configuration gate, and action.
///
/// Stages are registered once with [`crate::PipelineBuilder`] and immutable
/// afterwards. Declaration order of dependencies is preserved; duplicate
/// dependency names collapse to the first occurrence.
pub struct StageSpec {
    name: String,
    dependencies: Vec<String>,
    required_config: Vec<String>,
    action: Box<dyn StageAction>,
}

impl StageSpec {
    /// Create a stage with the given name and action.
    pub fn new(name: impl Into<String>, action: impl StageAction + 'static) -> Self {
        Self {
            name: name.into(),
            dependencies: Vec::new(),
            required_config: Vec::new(),
            action: Box::new(action),
        }
    }

    /// Declare a dependency on another stage.
    #[must_use]
    pub fn depends_on(mut self, stage: impl Into<String>) -> Self {
        let stage = stage.into();
        if !self.dependencies.contains(&stage) {
            self.dependencies.push(stage);
        }
        self
    }

    /// Require a non-empty configuration value before this stage may run.
    #[must_use]
    pub fn requires_config(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        if !self.required_config.contains(&key) {
            self.required_config.push(key);
        }
        self
    }

    /// The stage name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names of stages that must complete before this one.
    #[must_use]
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// Configuration values gating this stage.
    #[must_use]
    pub fn required_config(&self) -> &[String] {
        &self.required_config
    }

    pub(crate) fn action(&self) -> &dyn StageAction {
        self.action.as_ref()
    }
}

impl std::fmt::Debug for StageSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageSpec")
            .field("name", &self.name)
            .field("dependencies", &self.dependencies)
            .field("required_config", &self.required_config)
            .finish_non_exhaustive()
    }
}

/// No-op action for tests.
#[cfg(test)]
pub(crate) fn ok_action(_: &RunContext) -> Result<(), ActionError> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn duplicate_dependencies_collapse() {
        let spec = StageSpec::new("toc", ok_action)
            .depends_on("download")
            .depends_on("metadata")
            .depends_on("download");

        assert_eq!(spec.dependencies(), ["download", "metadata"]);
    }

    #[test]
    fn duplicate_config_keys_collapse() {
        let spec = StageSpec::new("publish", ok_action)
            .requires_config("server")
            .requires_config("server");

        assert_eq!(spec.required_config(), ["server"]);
    }
}
