use crate::error::WorkflowError;
use crate::graph::WorkflowGraph;
use crate::task::{Dependency, Task};
use crate::task_validation;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Workflow(#[from] WorkflowError),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphAttributes {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    pub execution_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub data_amount: f64,
}

/// Node-link document: the on-disk and over-the-wire shape of a workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDocument {
    #[serde(default = "default_directed")]
    pub directed: bool,
    pub graph: GraphAttributes,
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub links: Vec<LinkRecord>,
}

fn default_directed() -> bool {
    true
}

impl WorkflowDocument {
    pub fn from_graph(graph: &WorkflowGraph) -> Self {
        Self {
            directed: true,
            graph: GraphAttributes {
                name: graph.name().to_string(),
            },
            nodes: graph
                .tasks()
                .map(|task| NodeRecord {
                    id: task.id.clone(),
                    execution_time: task.execution_time,
                })
                .collect(),
            links: graph
                .dependencies()
                .map(|(_, dep)| LinkRecord {
                    source: dep.source.clone(),
                    target: dep.target.clone(),
                    data_amount: dep.data_amount,
                })
                .collect(),
        }
    }

    /// Rebuilds the graph, running the same validation as manual construction.
    pub fn into_graph(self) -> Result<WorkflowGraph, WorkflowError> {
        if !self.directed {
            return Err(WorkflowError::invalid(
                "workflow documents must describe a directed graph",
            ));
        }
        let tasks: Vec<Task> = self
            .nodes
            .into_iter()
            .map(|node| Task::new(node.id, node.execution_time))
            .collect();
        task_validation::validate_task_collection(&tasks)?;

        let mut graph = WorkflowGraph::new(self.graph.name);
        for task in tasks {
            graph.add_task(task)?;
        }
        for link in self.links {
            graph.add_dependency(Dependency::new(link.source, link.target, link.data_amount))?;
        }
        Ok(graph)
    }
}

pub mod file;

pub use file::{
    load_workflow_from_json, save_schedule_to_csv, save_schedule_to_json, save_workflow_to_json,
    workflow_from_json_str,
};
