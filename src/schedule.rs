use crate::calculations::backward_pass::BackwardPass;
use crate::calculations::critical;
use crate::calculations::forward_pass::{self, ForwardPass};
use crate::calculations::{CostModel, approx_zero, ordering};
use crate::error::WorkflowError;
use crate::graph::{EdgeId, WorkflowGraph};
use crate::task_validation;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Schedule fields computed for one task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskTiming {
    pub task_id: String,
    pub duration: f64,
    pub earliest_start: f64,
    pub earliest_finish: f64,
    pub latest_start: f64,
    pub latest_finish: f64,
    pub slack: f64,
    pub on_critical_path: bool,
}

/// Schedule fields computed for one dependency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyTiming {
    pub edge_id: EdgeId,
    pub source: String,
    pub target: String,
    /// Cost added between the two tasks under the analysis' cost model.
    pub weight: f64,
    pub on_critical_path: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub task_count: usize,
    pub critical_count: usize,
    pub critical_path: Vec<String>,
    pub earliest_completion_time: f64,
    pub critical_path_execution_time: f64,
    pub critical_path_transfer_time: f64,
}

impl ScheduleSummary {
    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("tasks={}", self.task_count));
        parts.push(format!("critical={}", self.critical_count));
        parts.push(format!("completion={:.1}", self.earliest_completion_time));
        if self.critical_path_transfer_time > 0.0 {
            parts.push(format!("transfer={:.1}", self.critical_path_transfer_time));
        }
        if !self.critical_path.is_empty() {
            parts.push(format!("crit_path={}", self.critical_path.join("->")));
        }
        parts.join(", ")
    }
}

/// Which tasks an external manifest converter should pin to a host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementHints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    pub critical_path_task_ids: Vec<String>,
}

/// Result of one CPM analysis. Owns every computed field, leaving the graph
/// untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub cost_model: CostModel,
    pub tasks: Vec<TaskTiming>,
    pub dependencies: Vec<DependencyTiming>,
    pub ordered_critical_path: Vec<String>,
    pub earliest_completion_time: f64,
}

impl Schedule {
    pub fn task(&self, task_id: &str) -> Option<&TaskTiming> {
        self.tasks.iter().find(|t| t.task_id == task_id)
    }

    pub fn dependency(&self, edge_id: EdgeId) -> Option<&DependencyTiming> {
        self.dependencies.iter().find(|d| d.edge_id == edge_id)
    }

    pub fn earliest_completion_time(&self) -> f64 {
        self.earliest_completion_time
    }

    pub fn ordered_critical_path(&self) -> &[String] {
        &self.ordered_critical_path
    }

    /// Every critical task, ordered by earliest start then id.
    pub fn critical_tasks(&self) -> Vec<&str> {
        let mut critical: Vec<&TaskTiming> =
            self.tasks.iter().filter(|t| t.on_critical_path).collect();
        critical.sort_by(|a, b| {
            a.earliest_start
                .total_cmp(&b.earliest_start)
                .then_with(|| a.task_id.cmp(&b.task_id))
        });
        critical.into_iter().map(|t| t.task_id.as_str()).collect()
    }

    pub fn critical_path_execution_time(&self) -> f64 {
        self.ordered_critical_path
            .iter()
            .filter_map(|id| self.task(id))
            .map(|t| t.duration)
            .sum()
    }

    pub fn critical_path_transfer_time(&self) -> f64 {
        self.ordered_critical_path
            .windows(2)
            .filter_map(|pair| {
                self.dependencies.iter().find(|d| {
                    d.on_critical_path && d.source == pair[0] && d.target == pair[1]
                })
            })
            .map(|d| d.weight)
            .sum()
    }

    pub fn summary(&self) -> ScheduleSummary {
        ScheduleSummary {
            task_count: self.tasks.len(),
            critical_count: self.tasks.iter().filter(|t| t.on_critical_path).count(),
            critical_path: self.ordered_critical_path.clone(),
            earliest_completion_time: self.earliest_completion_time,
            critical_path_execution_time: self.critical_path_execution_time(),
            critical_path_transfer_time: self.critical_path_transfer_time(),
        }
    }

    pub fn placement_hints(&self, hostname: Option<String>) -> PlacementHints {
        PlacementHints {
            hostname,
            critical_path_task_ids: self.ordered_critical_path.clone(),
        }
    }
}

/// Critical Path Method analysis of a workflow graph under one cost model.
pub struct CpmAnalyzer<'a> {
    graph: &'a WorkflowGraph,
    cost_model: CostModel,
}

impl<'a> CpmAnalyzer<'a> {
    pub fn new(graph: &'a WorkflowGraph) -> Self {
        Self {
            graph,
            cost_model: CostModel::Plain,
        }
    }

    pub fn with_cost_model(graph: &'a WorkflowGraph, cost_model: CostModel) -> Self {
        Self { graph, cost_model }
    }

    pub fn transfer_weighted(graph: &'a WorkflowGraph, transfer_rate: f64) -> Self {
        Self::with_cost_model(graph, CostModel::TransferWeighted { transfer_rate })
    }

    pub fn cost_model(&self) -> CostModel {
        self.cost_model
    }

    /// Runs the topological ordering, both passes, and critical marking.
    pub fn analyze(&self) -> Result<Schedule, WorkflowError> {
        if let CostModel::TransferWeighted { transfer_rate } = self.cost_model {
            task_validation::validate_transfer_rate(transfer_rate)?;
        }

        let order = ordering::topological_order(self.graph)?;
        let early = ForwardPass::new(self.graph, self.cost_model).execute(&order);
        let project_end = forward_pass::completion_time(&early);
        let late = BackwardPass::new(self.graph, self.cost_model).execute(&order, project_end);

        let dag = self.graph.inner();
        let mut task_critical = vec![false; dag.node_count()];
        let mut tasks = Vec::with_capacity(dag.node_count());
        for node_ix in dag.node_indices() {
            let idx = node_ix.index();
            let (earliest_start, earliest_finish) = early[idx];
            let (latest_start, latest_finish) = late[idx];
            let slack = latest_start - earliest_start;
            let on_critical_path = approx_zero(slack);
            task_critical[idx] = on_critical_path;
            let task = &dag[node_ix];
            tasks.push(TaskTiming {
                task_id: task.id.clone(),
                duration: task.execution_time,
                earliest_start,
                earliest_finish,
                latest_start,
                latest_finish,
                slack,
                on_critical_path,
            });
        }

        let edge_critical =
            critical::mark_critical_edges(self.graph, self.cost_model, &early, &task_critical);
        let dependencies = self
            .graph
            .dependencies()
            .map(|(edge_id, dep)| DependencyTiming {
                edge_id,
                source: dep.source.clone(),
                target: dep.target.clone(),
                weight: self.cost_model.edge_weight(dep),
                on_critical_path: edge_critical[edge_id.0],
            })
            .collect();

        let ordered_critical_path =
            critical::ordered_critical_path(self.graph, &early, &task_critical, &edge_critical)
                .into_iter()
                .map(|ix| dag[ix].id.clone())
                .collect::<Vec<_>>();

        debug!(
            workflow = self.graph.name(),
            mode = self.cost_model.label(),
            tasks = dag.node_count(),
            dependencies = dag.edge_count(),
            completion = project_end,
            critical_path_len = ordered_critical_path.len(),
            "critical path analysis finished"
        );

        Ok(Schedule {
            cost_model: self.cost_model,
            tasks,
            dependencies,
            ordered_critical_path,
            earliest_completion_time: project_end,
        })
    }

    /// Analyzes one topology under several transfer rates in parallel.
    /// Results come back in the order of `transfer_rates`.
    pub fn sweep_transfer_rates(
        graph: &WorkflowGraph,
        transfer_rates: &[f64],
    ) -> Result<Vec<Schedule>, WorkflowError> {
        transfer_rates
            .par_iter()
            .map(|&rate| CpmAnalyzer::transfer_weighted(graph, rate).analyze())
            .collect()
    }
}
