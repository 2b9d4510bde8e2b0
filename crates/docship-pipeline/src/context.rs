//! Per-run state shared with stage actions.

use std::collections::{BTreeSet, HashMap};

/// A configuration value required by an action is absent.
#[derive(Debug, thiserror::Error)]
#[error("configuration value '{0}' is not set")]
pub struct MissingValue(pub String);

/// State scoped to a single pipeline invocation.
///
/// Holds the requested target, the externally supplied configuration values
/// (immutable once the run starts), and the set of stages completed so far.
/// A fresh context is created per run; nothing survives between invocations.
#[derive(Debug)]
pub struct RunContext {
    target: String,
    values: HashMap<String, String>,
    completed: BTreeSet<String>,
}

impl RunContext {
    /// Create a context for the given target stage with no config values.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            values: HashMap::new(),
            completed: BTreeSet::new(),
        }
    }

    /// Create a context with externally supplied configuration values.
    pub fn with_values(target: impl Into<String>, values: HashMap<String, String>) -> Self {
        Self {
            target: target.into(),
            values,
            completed: BTreeSet::new(),
        }
    }

    /// The stage requested for completion.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Look up a configuration value.
    ///
    /// An empty string counts as absent, matching the gate semantics: a
    /// blank credential is as unusable as a missing one.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Look up a configuration value, erroring if absent.
    ///
    /// Stages gated via [`crate::StageSpec::requires_config`] can rely on the
    /// engine having checked presence, but propagate the error rather than
    /// panic if wired up without the gate.
    pub fn require(&self, key: &str) -> Result<&str, MissingValue> {
        self.value(key).ok_or_else(|| MissingValue(key.to_owned()))
    }

    /// Whether the named stage has completed in this run.
    #[must_use]
    pub fn is_completed(&self, stage: &str) -> bool {
        self.completed.contains(stage)
    }

    /// Stages completed so far, in name order.
    pub fn completed_stages(&self) -> impl Iterator<Item = &str> {
        self.completed.iter().map(String::as_str)
    }

    pub(crate) fn mark_completed(&mut self, stage: &str) {
        self.completed.insert(stage.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_value_counts_as_absent() {
        let mut values = HashMap::new();
        values.insert("server".to_owned(), String::new());
        values.insert("username".to_owned(), "deploy".to_owned());
        let ctx = RunContext::with_values("publish", values);

        assert_eq!(ctx.value("server"), None);
        assert_eq!(ctx.value("username"), Some("deploy"));
        assert_eq!(ctx.value("password"), None);
    }

    #[test]
    fn require_reports_the_key() {
        let ctx = RunContext::new("publish");

        let err = ctx.require("password").unwrap_err();
        assert_eq!(err.to_string(), "configuration value 'password' is not set");
    }

    #[test]
    fn completed_set_deduplicates() {
        let mut ctx = RunContext::new("build-site");
        ctx.mark_completed("clean");
        ctx.mark_completed("clean");

        assert_eq!(ctx.completed_stages().collect::<Vec<_>>(), ["clean"]);
    }
}
