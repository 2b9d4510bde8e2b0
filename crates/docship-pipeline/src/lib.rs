//! Stage graph and execution engine for Docship.
//!
//! A build is described as a set of named stages with declared dependencies
//! and optional required configuration values. The graph is validated once at
//! construction (duplicates, unknown dependencies, cycles) and yields a
//! single immutable topological order; the engine then executes the
//! transitive dependency closure of a requested target strictly
//! sequentially, stopping at the first failure.
//!
//! # Quick Start
//!
//! ```
//! use docship_pipeline::{ActionError, Engine, PipelineBuilder, RunContext, StageSpec};
//!
//! fn noop(_ctx: &RunContext) -> Result<(), ActionError> {
//!     Ok(())
//! }
//!
//! let pipeline = PipelineBuilder::new()
//!     .stage(StageSpec::new("clean", noop))
//!     .stage(StageSpec::new("build", noop).depends_on("clean"))
//!     .build()?;
//!
//! let mut ctx = RunContext::new("build");
//! Engine::new(&pipeline).run(&mut ctx)?;
//! assert!(ctx.is_completed("clean"));
//! # Ok::<(), docship_pipeline::PipelineError>(())
//! ```

mod context;
mod engine;
mod error;
mod graph;
mod stage;

pub use context::{MissingValue, RunContext};
pub use engine::Engine;
pub use error::{GraphError, PipelineError};
pub use graph::{Pipeline, PipelineBuilder};
pub use stage::{ActionError, StageAction, StageSpec};
