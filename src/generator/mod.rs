//! Synthetic workflow generation.
//!
//! A generated workflow is a layered DAG with a single `Start` source and a
//! single `End` sink. Task indices grow layer by layer and every link points
//! from a lower to a higher index, which keeps the result acyclic through the
//! wiring and repair passes.

pub mod layering;
pub(crate) mod repair;
pub(crate) mod wiring;

use crate::error::WorkflowError;
use crate::graph::WorkflowGraph;
use crate::task::{Dependency, Task};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::info;

pub const START_TASK_ID: &str = "Start";
pub const END_TASK_ID: &str = "End";

/// Inputs of a generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorParams {
    pub name: String,
    pub node_count: usize,
    pub min_execution_time: u32,
    pub max_execution_time: u32,
    /// Density knob in `[0, 1]`: fewer, wider layers and more extra links as it grows.
    pub connectivity: f64,
    pub min_data_amount: u32,
    pub max_data_amount: u32,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self {
            name: "generated-workflow".to_string(),
            node_count: 10,
            min_execution_time: 1,
            max_execution_time: 10,
            connectivity: 0.5,
            min_data_amount: 1,
            max_data_amount: 100,
        }
    }
}

impl GeneratorParams {
    pub fn validate(&self) -> Result<(), WorkflowError> {
        if self.node_count < 2 {
            return Err(WorkflowError::invalid(format!(
                "node count must be at least 2 (got {})",
                self.node_count
            )));
        }
        if !(0.0..=1.0).contains(&self.connectivity) {
            return Err(WorkflowError::invalid(format!(
                "connectivity must be between 0.0 and 1.0 (got {})",
                self.connectivity
            )));
        }
        if self.min_execution_time > self.max_execution_time {
            return Err(WorkflowError::invalid(format!(
                "min execution time {} exceeds max execution time {}",
                self.min_execution_time, self.max_execution_time
            )));
        }
        if self.min_data_amount > self.max_data_amount {
            return Err(WorkflowError::invalid(format!(
                "min data amount {} exceeds max data amount {}",
                self.min_data_amount, self.max_data_amount
            )));
        }
        Ok(())
    }
}

/// Sampling bounds for link data amounts.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DataRange {
    min: u32,
    max: u32,
}

impl DataRange {
    /// Uniform in `[min, min + (max - min) / divisor]`.
    fn sample(&self, rng: &mut StdRng, divisor: u32) -> f64 {
        let span = (self.max - self.min) / divisor;
        f64::from(self.min + rng.gen_range(0..=span))
    }

    pub(crate) fn full(&self, rng: &mut StdRng) -> f64 {
        self.sample(rng, 1)
    }

    pub(crate) fn half(&self, rng: &mut StdRng) -> f64 {
        self.sample(rng, 2)
    }

    pub(crate) fn third(&self, rng: &mut StdRng) -> f64 {
        self.sample(rng, 3)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Link {
    pub source: usize,
    pub target: usize,
    pub data_amount: f64,
}

/// Index-based workflow under construction.
#[derive(Debug)]
pub(crate) struct Draft {
    pub task_count: usize,
    pub links: Vec<Link>,
    pub incoming: Vec<Vec<usize>>,
    pub outgoing: Vec<Vec<usize>>,
    pairs: HashSet<(usize, usize)>,
}

impl Draft {
    pub(crate) fn new(task_count: usize) -> Self {
        Self {
            task_count,
            links: Vec::new(),
            incoming: vec![Vec::new(); task_count],
            outgoing: vec![Vec::new(); task_count],
            pairs: HashSet::new(),
        }
    }

    pub(crate) fn end(&self) -> usize {
        self.task_count - 1
    }

    pub(crate) fn link(&mut self, source: usize, target: usize, data_amount: f64) {
        debug_assert!(source < target, "links must point forward");
        self.links.push(Link {
            source,
            target,
            data_amount,
        });
        self.pairs.insert((source, target));
        self.outgoing[source].push(target);
        self.incoming[target].push(source);
    }

    pub(crate) fn has_link(&self, source: usize, target: usize) -> bool {
        self.pairs.contains(&(source, target))
    }
}

/// Id of the task at `index` in a workflow of `task_count` tasks.
pub fn task_id_for(index: usize, task_count: usize) -> String {
    if index == 0 {
        START_TASK_ID.to_string()
    } else if index + 1 == task_count {
        END_TASK_ID.to_string()
    } else if index <= 26 {
        char::from(b'A' + (index - 1) as u8).to_string()
    } else {
        format!("Node{}", index - 26)
    }
}

/// Random layered-DAG generator owning its random source.
pub struct WorkflowGenerator {
    seed: u64,
    rng: StdRng,
}

impl WorkflowGenerator {
    /// Reproducible generator: equal seeds and parameters give equal workflows.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generator seeded from the wall clock.
    pub fn new() -> Self {
        Self::with_seed(chrono::Utc::now().timestamp_millis() as u64)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn generate(&mut self, params: &GeneratorParams) -> Result<WorkflowGraph, WorkflowError> {
        params.validate()?;
        let n = params.node_count;
        let rng = &mut self.rng;

        let durations: Vec<f64> = (0..n)
            .map(|_| {
                f64::from(rng.gen_range(params.min_execution_time..=params.max_execution_time))
            })
            .collect();

        let layers = layering::build_layers(n, params.connectivity, rng);
        let data = DataRange {
            min: params.min_data_amount,
            max: params.max_data_amount,
        };

        let mut draft = Draft::new(n);
        wiring::add_primary_links(&mut draft, &layers, params.connectivity, data, rng);
        wiring::add_skip_links(&mut draft, &layers, params.connectivity, data, rng);
        wiring::add_sink_links(&mut draft, &layers, params.connectivity, data, rng);
        repair::ensure_incoming(&mut draft, data, rng);
        repair::ensure_reaches_end(&mut draft, data, rng);

        let mut graph = WorkflowGraph::new(params.name.clone());
        for (index, duration) in durations.into_iter().enumerate() {
            graph.add_task(Task::new(task_id_for(index, n), duration))?;
        }
        for link in &draft.links {
            graph.add_dependency(Dependency::new(
                task_id_for(link.source, n),
                task_id_for(link.target, n),
                link.data_amount,
            ))?;
        }

        info!(
            workflow = %params.name,
            seed = self.seed,
            tasks = graph.task_count(),
            dependencies = graph.dependency_count(),
            layers = layers.len(),
            "generated workflow"
        );
        Ok(graph)
    }
}

impl Default for WorkflowGenerator {
    fn default() -> Self {
        Self::new()
    }
}
