//! Stage dependency graph.
//!
//! The graph is validated and topologically sorted once, when the pipeline
//! is built. Resolution for a target is then a filter over the precomputed
//! order, so cycles and unknown names surface at startup rather than on
//! every access.

use std::collections::HashMap;

use crate::error::GraphError;
use crate::stage::StageSpec;

/// Builder collecting stage registrations in declaration order.
#[derive(Default)]
pub struct PipelineBuilder {
    stages: Vec<StageSpec>,
}

impl PipelineBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a stage. Declaration order is the tie-break for stages with
    /// no relative ordering constraint.
    #[must_use]
    pub fn stage(mut self, spec: StageSpec) -> Self {
        self.stages.push(spec);
        self
    }

    /// Validate the graph and compute the execution order.
    ///
    /// # Errors
    ///
    /// Returns a [`GraphError`] for duplicate stage names, dependencies on
    /// unregistered stages, or dependency cycles.
    pub fn build(self) -> Result<Pipeline, GraphError> {
        Pipeline::from_stages(self.stages)
    }
}

/// A validated, immutable stage graph with a precomputed topological order.
#[derive(Debug)]
pub struct Pipeline {
    stages: Vec<StageSpec>,
    index: HashMap<String, usize>,
    order: Vec<usize>,
}

impl Pipeline {
    fn from_stages(stages: Vec<StageSpec>) -> Result<Self, GraphError> {
        let mut index = HashMap::with_capacity(stages.len());
        for (i, stage) in stages.iter().enumerate() {
            if index.insert(stage.name().to_owned(), i).is_some() {
                return Err(GraphError::DuplicateStage(stage.name().to_owned()));
            }
        }

        for stage in &stages {
            for dep in stage.dependencies() {
                if !index.contains_key(dep) {
                    return Err(GraphError::UnknownDependency {
                        stage: stage.name().to_owned(),
                        dependency: dep.clone(),
                    });
                }
            }
        }

        let order = topological_order(&stages, &index)?;

        Ok(Self {
            stages,
            index,
            order,
        })
    }

    /// Number of registered stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Look up a stage by name.
    #[must_use]
    pub fn stage(&self, name: &str) -> Option<&StageSpec> {
        self.index.get(name).map(|&i| &self.stages[i])
    }

    /// Resolve the execution order for a target stage: the target's
    /// transitive dependency closure, in topological order.
    ///
    /// The same graph and target always yield the same order.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownTarget`] if the target is not registered.
    pub fn execution_order(&self, target: &str) -> Result<Vec<&StageSpec>, GraphError> {
        let &start = self
            .index
            .get(target)
            .ok_or_else(|| GraphError::UnknownTarget(target.to_owned()))?;

        let mut required = vec![false; self.stages.len()];
        let mut stack = vec![start];
        while let Some(i) = stack.pop() {
            if required[i] {
                continue;
            }
            required[i] = true;
            for dep in self.stages[i].dependencies() {
                stack.push(self.index[dep]);
            }
        }

        Ok(self
            .order
            .iter()
            .filter(|&&i| required[i])
            .map(|&i| &self.stages[i])
            .collect())
    }
}

/// Depth-first topological sort visiting stages in declaration order, with
/// cycle detection via an explicit visitation state per node.
fn topological_order(
    stages: &[StageSpec],
    index: &HashMap<String, usize>,
) -> Result<Vec<usize>, GraphError> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Unvisited,
        InProgress,
        Done,
    }

    fn visit(
        i: usize,
        stages: &[StageSpec],
        index: &HashMap<String, usize>,
        marks: &mut [Mark],
        path: &mut Vec<usize>,
        order: &mut Vec<usize>,
    ) -> Result<(), GraphError> {
        match marks[i] {
            Mark::Done => return Ok(()),
            Mark::InProgress => {
                // Close the cycle at its first occurrence on the path.
                let start = path.iter().position(|&p| p == i).unwrap_or(0);
                let mut cycle: Vec<String> = path[start..]
                    .iter()
                    .map(|&p| stages[p].name().to_owned())
                    .collect();
                cycle.push(stages[i].name().to_owned());
                return Err(GraphError::Cycle { path: cycle });
            }
            Mark::Unvisited => {}
        }

        marks[i] = Mark::InProgress;
        path.push(i);
        for dep in stages[i].dependencies() {
            visit(index[dep], stages, index, marks, path, order)?;
        }
        path.pop();
        marks[i] = Mark::Done;
        order.push(i);
        Ok(())
    }

    let mut marks = vec![Mark::Unvisited; stages.len()];
    let mut path = Vec::new();
    let mut order = Vec::with_capacity(stages.len());
    for i in 0..stages.len() {
        visit(i, stages, index, &mut marks, &mut path, &mut order)?;
    }
    Ok(order)
}
