use crate::error::WorkflowError;
use crate::graph::WorkflowGraph;
use petgraph::algo::toposort;
use petgraph::graph::NodeIndex;

/// Linear order of the graph's tasks consistent with every dependency.
///
/// `toposort` walks the graph with an explicit DFS stack, so deep generated
/// workflows cannot exhaust the call stack.
pub fn topological_order(graph: &WorkflowGraph) -> Result<Vec<NodeIndex>, WorkflowError> {
    let inner = graph.inner();
    toposort(inner, None).map_err(|cycle| WorkflowError::CyclicGraph {
        task: inner[cycle.node_id()].id.clone(),
    })
}
