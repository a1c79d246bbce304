use crate::error::WorkflowError;
use crate::task::{Dependency, Task};
use crate::task_validation;
use petgraph::Direction;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Stable identifier of a dependency: its insertion position in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(pub usize);

impl From<EdgeIndex> for EdgeId {
    fn from(value: EdgeIndex) -> Self {
        EdgeId(value.index())
    }
}

/// Directed workflow graph of tasks and data dependencies.
///
/// Tasks are stored in insertion order and addressed by their unique string id.
/// Adjacency in both directions is maintained by the underlying `DiGraph`;
/// lookups return edges in insertion order.
#[derive(Debug, Clone)]
pub struct WorkflowGraph {
    name: String,
    graph: DiGraph<Task, Dependency>,
    id_to_index: HashMap<String, NodeIndex>,
}

impl WorkflowGraph {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            graph: DiGraph::new(),
            id_to_index: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_task(&mut self, task: Task) -> Result<(), WorkflowError> {
        task_validation::validate_task(&task)?;
        if self.id_to_index.contains_key(&task.id) {
            return Err(WorkflowError::DuplicateTask(task.id));
        }
        let id = task.id.clone();
        let node_ix = self.graph.add_node(task);
        self.id_to_index.insert(id, node_ix);
        Ok(())
    }

    pub fn add_dependency(&mut self, dependency: Dependency) -> Result<EdgeId, WorkflowError> {
        let endpoint = |id: &str| {
            self.id_to_index
                .get(id)
                .copied()
                .ok_or_else(|| WorkflowError::UnknownEndpoint {
                    from: dependency.source.clone(),
                    to: dependency.target.clone(),
                    missing: id.to_string(),
                })
        };
        let u = endpoint(&dependency.source)?;
        let v = endpoint(&dependency.target)?;
        task_validation::validate_dependency(&dependency)?;
        Ok(self.graph.add_edge(u, v, dependency).into())
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.id_to_index.get(id).map(|&ix| &self.graph[ix])
    }

    pub fn contains_task(&self, id: &str) -> bool {
        self.id_to_index.contains_key(id)
    }

    pub fn task_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn dependency_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Tasks in insertion order.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> + '_ {
        self.graph.node_weights()
    }

    /// Dependencies in insertion order.
    pub fn dependencies(&self) -> impl Iterator<Item = (EdgeId, &Dependency)> + '_ {
        self.graph
            .edge_indices()
            .map(move |ix| (EdgeId::from(ix), &self.graph[ix]))
    }

    pub fn dependency(&self, id: EdgeId) -> Option<&Dependency> {
        self.graph.edge_weight(EdgeIndex::new(id.0))
    }

    pub fn outgoing(&self, id: &str) -> Vec<(EdgeId, &Dependency)> {
        self.edges_directed(id, Direction::Outgoing)
    }

    pub fn incoming(&self, id: &str) -> Vec<(EdgeId, &Dependency)> {
        self.edges_directed(id, Direction::Incoming)
    }

    pub fn has_dependency(&self, source: &str, target: &str) -> bool {
        match (self.id_to_index.get(source), self.id_to_index.get(target)) {
            (Some(&u), Some(&v)) => self.graph.find_edge(u, v).is_some(),
            _ => false,
        }
    }

    /// Ids of tasks without incoming dependencies.
    pub fn sources(&self) -> Vec<&str> {
        self.boundary(Direction::Incoming)
    }

    /// Ids of tasks without outgoing dependencies.
    pub fn sinks(&self) -> Vec<&str> {
        self.boundary(Direction::Outgoing)
    }

    pub(crate) fn inner(&self) -> &DiGraph<Task, Dependency> {
        &self.graph
    }

    fn edges_directed(&self, id: &str, direction: Direction) -> Vec<(EdgeId, &Dependency)> {
        let Some(&node_ix) = self.id_to_index.get(id) else {
            return Vec::new();
        };
        // petgraph walks adjacency newest-first
        let mut edges: Vec<(EdgeId, &Dependency)> = self
            .graph
            .edges_directed(node_ix, direction)
            .map(|edge| (EdgeId::from(edge.id()), edge.weight()))
            .collect();
        edges.sort_by_key(|(edge_id, _)| *edge_id);
        edges
    }

    fn boundary(&self, direction: Direction) -> Vec<&str> {
        self.graph
            .node_indices()
            .filter(|&ix| {
                self.graph
                    .neighbors_directed(ix, direction)
                    .next()
                    .is_none()
            })
            .map(|ix| self.graph[ix].id.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> WorkflowGraph {
        let mut g = WorkflowGraph::new("diamond");
        for (id, d) in [("A", 10.0), ("B", 25.0), ("C", 20.0), ("D", 5.0)] {
            g.add_task(Task::new(id, d)).unwrap();
        }
        g.add_dependency(Dependency::new("A", "B", 1.0)).unwrap();
        g.add_dependency(Dependency::new("A", "C", 2.0)).unwrap();
        g.add_dependency(Dependency::new("B", "D", 3.0)).unwrap();
        g.add_dependency(Dependency::new("C", "D", 4.0)).unwrap();
        g
    }

    #[test]
    fn adjacency_preserves_insertion_order() {
        let g = diamond();
        let targets: Vec<&str> = g
            .outgoing("A")
            .into_iter()
            .map(|(_, dep)| dep.target.as_str())
            .collect();
        assert_eq!(targets, vec!["B", "C"]);
        let ids: Vec<EdgeId> = g.incoming("D").into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![EdgeId(2), EdgeId(3)]);
    }

    #[test]
    fn unknown_ids_yield_empty_adjacency() {
        let g = diamond();
        assert!(g.outgoing("missing").is_empty());
        assert!(g.incoming("A").is_empty());
        assert!(g.outgoing("D").is_empty());
    }

    #[test]
    fn boundary_tasks_are_reported() {
        let g = diamond();
        assert_eq!(g.sources(), vec!["A"]);
        assert_eq!(g.sinks(), vec!["D"]);
    }
}
