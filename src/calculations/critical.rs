use crate::calculations::forward_pass::EarlyTimes;
use crate::calculations::{CostModel, approx_zero};
use crate::graph::WorkflowGraph;
use petgraph::Direction;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Flags, indexed by edge index, the dependencies whose endpoints are both
/// critical and whose forward timing is tight.
pub fn mark_critical_edges(
    graph: &WorkflowGraph,
    cost_model: CostModel,
    early: &EarlyTimes,
    task_critical: &[bool],
) -> Vec<bool> {
    let dag = graph.inner();
    dag.edge_references()
        .map(|edge| {
            let (u, v) = (edge.source().index(), edge.target().index());
            if !(task_critical[u] && task_critical[v]) {
                return false;
            }
            let arrival = early[u].1 + cost_model.edge_weight(edge.weight());
            approx_zero(arrival - early[v].0)
        })
        .collect()
}

/// Walks one start-to-end chain through the critical subgraph.
///
/// The chain starts at the critical task without an incoming critical edge
/// (earliest start, then id, breaks ties); if every critical task has one, the
/// critical task with the earliest start is used. At each step the critical
/// edge to the lexicographically smallest unvisited target is followed.
pub fn ordered_critical_path(
    graph: &WorkflowGraph,
    early: &EarlyTimes,
    task_critical: &[bool],
    edge_critical: &[bool],
) -> Vec<NodeIndex> {
    let dag = graph.inner();
    let by_start_then_id = |a: &NodeIndex, b: &NodeIndex| -> Ordering {
        early[a.index()]
            .0
            .total_cmp(&early[b.index()].0)
            .then_with(|| dag[*a].id.cmp(&dag[*b].id))
    };

    let critical: Vec<NodeIndex> = dag
        .node_indices()
        .filter(|ix| task_critical[ix.index()])
        .collect();

    let start = critical
        .iter()
        .copied()
        .filter(|&ix| {
            !dag.edges_directed(ix, Direction::Incoming)
                .any(|edge| edge_critical[edge.id().index()])
        })
        .min_by(by_start_then_id)
        .or_else(|| critical.iter().copied().min_by(by_start_then_id));

    let Some(start) = start else {
        return Vec::new();
    };

    let mut path = vec![start];
    let mut visited: HashSet<NodeIndex> = HashSet::from([start]);
    let mut current = start;
    loop {
        let next = dag
            .edges_directed(current, Direction::Outgoing)
            .filter(|edge| edge_critical[edge.id().index()] && !visited.contains(&edge.target()))
            .map(|edge| edge.target())
            .min_by(|a, b| dag[*a].id.cmp(&dag[*b].id));
        match next {
            Some(next) => {
                visited.insert(next);
                path.push(next);
                current = next;
            }
            None => break,
        }
    }
    path
}
