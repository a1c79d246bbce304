use crate::calculations::CostModel;
use crate::graph::WorkflowGraph;
use petgraph::Direction;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;

/// Latest start/finish per task, indexed by node index.
pub type LateTimes = Vec<(f64, f64)>;

pub struct BackwardPass<'a> {
    graph: &'a WorkflowGraph,
    cost_model: CostModel,
}

impl<'a> BackwardPass<'a> {
    pub fn new(graph: &'a WorkflowGraph, cost_model: CostModel) -> Self {
        Self { graph, cost_model }
    }

    /// Visits `order` back to front, anchoring every task without successors
    /// at `project_end`.
    pub fn execute(&self, order: &[NodeIndex], project_end: f64) -> LateTimes {
        let dag = self.graph.inner();
        let mut late: LateTimes = vec![(project_end, project_end); dag.node_count()];

        for &node_ix in order.iter().rev() {
            // Determine allowed late finish from successors' late starts
            let mut lf = project_end;
            let mut has_succ = false;
            for edge in dag.edges_directed(node_ix, Direction::Outgoing) {
                let (succ_ls, _) = late[edge.target().index()];
                let allowed = succ_ls - self.cost_model.edge_weight(edge.weight());
                if !has_succ || allowed < lf {
                    lf = allowed;
                }
                has_succ = true;
            }

            let ls = lf - dag[node_ix].execution_time;
            late[node_ix.index()] = (ls, lf);
        }

        late
    }
}
