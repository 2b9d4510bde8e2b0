//! Sequential stage execution.

use tracing::{error, info};

use crate::context::RunContext;
use crate::error::PipelineError;
use crate::graph::Pipeline;

/// Executes the resolved stage order for a run context's target.
///
/// Stages run strictly sequentially, each at most once per run. The first
/// failure (missing configuration gate or failing action) aborts the run;
/// stages not yet started never run and completed stages are not rolled
/// back.
pub struct Engine<'p> {
    pipeline: &'p Pipeline,
}

impl<'p> Engine<'p> {
    #[must_use]
    pub fn new(pipeline: &'p Pipeline) -> Self {
        Self { pipeline }
    }

    /// Run every stage in the target's dependency closure, in order.
    ///
    /// # Errors
    ///
    /// Returns the graph error, the first missing-configuration error, or
    /// the first stage failure. Exactly one failure is reported per run.
    pub fn run(&self, ctx: &mut RunContext) -> Result<(), PipelineError> {
        let order = self.pipeline.execution_order(ctx.target())?;
        info!(
            target_stage = ctx.target(),
            stages = order.len(),
            "resolved execution order"
        );

        for spec in order {
            let name = spec.name();
            if ctx.is_completed(name) {
                continue;
            }

            let missing: Vec<String> = spec
                .required_config()
                .iter()
                .filter(|key| ctx.value(key).is_none())
                .cloned()
                .collect();
            if !missing.is_empty() {
                error!(stage = name, keys = ?missing, "missing required configuration");
                return Err(PipelineError::MissingConfig {
                    stage: name.to_owned(),
                    keys: missing,
                });
            }

            info!(stage = name, "stage started");
            spec.action().run(ctx).map_err(|source| {
                error!(stage = name, error = %source, "stage failed");
                PipelineError::Stage {
                    stage: name.to_owned(),
                    source,
                }
            })?;
            ctx.mark_completed(name);
            info!(stage = name, "stage completed");
        }

        Ok(())
    }
}
